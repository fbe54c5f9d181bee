//! Maintenance Window Optimizer
//!
//! Synthesizes a deterministic cost-over-time curve from an aggregated risk
//! factor and extracts its local minima as recommended intervention windows:
//! - **Base cost** grows exponentially with time (natural degradation) and
//!   scales linearly with the risk factor.
//! - **Seasonal adjustment** is a fixed periodic term carving recurring
//!   "valleys" of reduced operational cost (favorable weather, equipment
//!   availability).
//! - **Minima extraction** is a strict discrete comparison against both
//!   immediate neighbors — no smoothing, no plateau handling.
//!
//! The optimizer is a total, pure function of its input: no randomness, no
//! wall-clock dependence, identical input produces bit-identical output.

use crate::types::{CostPoint, MaintenanceWindowResult, OptimalPoint};

/// Fixed constants of the cost model.
///
/// These are parameters of the model itself, not derived from input. The
/// periodic amplitudes/frequencies were tuned so that the seasonal valleys
/// remain visible against the degradation growth over the 36-month horizon.
pub mod curve_model {
    /// Number of evenly spaced samples over the planning horizon
    pub const SAMPLE_COUNT: usize = 100;
    /// Planning horizon in months (inclusive endpoint)
    pub const HORIZON_MONTHS: f64 = 36.0;
    /// Baseline intervention cost at t=0 for a zero-risk asset
    pub const BASE_COST: f64 = 10_000.0;
    /// Exponential degradation growth rate (per month)
    pub const DEGRADATION_RATE: f64 = 0.08;
    /// Offset added to the risk factor so a zero-risk asset still degrades
    pub const RISK_OFFSET: f64 = 0.5;
    /// Amplitude of the fast (weather-driven) cost oscillation
    pub const WEATHER_AMPLITUDE: f64 = 5_000.0;
    /// Angular frequency of the weather oscillation (rad/month)
    pub const WEATHER_FREQUENCY: f64 = 0.5;
    /// Amplitude of the slow (equipment-availability) cost oscillation
    pub const EQUIPMENT_AMPLITUDE: f64 = 3_000.0;
    /// Angular frequency of the equipment oscillation (rad/month)
    pub const EQUIPMENT_FREQUENCY: f64 = 0.2;
    /// Maximum number of optimal points reported to the caller
    pub const MAX_OPTIMAL_POINTS: usize = 3;
    /// Keep every Nth sample in the display curve
    pub const DISPLAY_STRIDE: usize = 2;
}

/// Exponential degradation cost at time `t` months, scaled by risk.
fn base_cost(t: f64, risk_factor: f64) -> f64 {
    use curve_model::{BASE_COST, DEGRADATION_RATE, RISK_OFFSET};
    BASE_COST * (DEGRADATION_RATE * t).exp() * (RISK_OFFSET + risk_factor)
}

/// Periodic operational-opportunity adjustment at time `t` months.
///
/// Negative excursions are the maintenance "valleys" the optimizer hunts for.
fn seasonal_adjustment(t: f64) -> f64 {
    use curve_model::{
        EQUIPMENT_AMPLITUDE, EQUIPMENT_FREQUENCY, WEATHER_AMPLITUDE, WEATHER_FREQUENCY,
    };
    -WEATHER_AMPLITUDE * (WEATHER_FREQUENCY * t).sin()
        - EQUIPMENT_AMPLITUDE * (EQUIPMENT_FREQUENCY * t).cos()
}

/// Indices of strict local minima in a sampled curve.
///
/// A sample qualifies iff it is strictly below both immediate neighbors, so
/// only interior indices are candidates and flat regions yield nothing. Both
/// neighbors must be inspected, hence the windowed scan over an indexable
/// slice rather than a streaming pass.
fn local_minima(costs: &[f64]) -> Vec<usize> {
    let mut minima = Vec::new();
    for i in 1..costs.len().saturating_sub(1) {
        if costs[i] < costs[i - 1] && costs[i] < costs[i + 1] {
            minima.push(i);
        }
    }
    minima
}

/// Round to 1 decimal place (display time values).
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to 2 decimal places (display cost values).
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to 3 decimal places (reported risk factor).
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Compute the recommended maintenance windows for an aggregated risk factor.
///
/// `observation_count` is carried through to the result unchanged; the curve
/// itself depends only on `risk_factor`. The risk factor is a derived value
/// from the aggregator and is not re-validated here — for any finite input
/// this function cannot fail.
///
/// Internal computation runs at full f64 precision; only the outward-facing
/// fields are rounded (time 1 dp, cost 2 dp, risk factor 3 dp).
pub fn compute_maintenance_windows(
    risk_factor: f64,
    observation_count: usize,
) -> MaintenanceWindowResult {
    use curve_model::{DISPLAY_STRIDE, HORIZON_MONTHS, MAX_OPTIMAL_POINTS, SAMPLE_COUNT};

    // Evenly spaced time samples over [0, HORIZON_MONTHS], both endpoints
    // included.
    let step = HORIZON_MONTHS / (SAMPLE_COUNT - 1) as f64;
    let months: Vec<f64> = (0..SAMPLE_COUNT).map(|i| i as f64 * step).collect();

    let costs: Vec<f64> = months
        .iter()
        .map(|&t| base_cost(t, risk_factor) + seasonal_adjustment(t))
        .collect();

    // First minima in time order win, even when later valleys are cheaper.
    let annotations: Vec<OptimalPoint> = local_minima(&costs)
        .into_iter()
        .take(MAX_OPTIMAL_POINTS)
        .map(|i| OptimalPoint {
            month: round1(months[i]),
            cost: round2(costs[i]),
            // Truncated month, e.g. t=7.64 -> "Month 7"
            label: format!("Month {}", months[i] as i64),
        })
        .collect();

    let series_data: Vec<CostPoint> = months
        .iter()
        .zip(costs.iter())
        .step_by(DISPLAY_STRIDE)
        .map(|(&m, &c)| CostPoint {
            x: round1(m),
            y: round2(c),
        })
        .collect();

    MaintenanceWindowResult {
        series_data,
        annotations,
        avg_risk_factor: round3(risk_factor),
        total_points: observation_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::curve_model::{HORIZON_MONTHS, SAMPLE_COUNT};

    /// Full-resolution curve for inspection in tests.
    fn full_curve(risk_factor: f64) -> (Vec<f64>, Vec<f64>) {
        let step = HORIZON_MONTHS / (SAMPLE_COUNT - 1) as f64;
        let months: Vec<f64> = (0..SAMPLE_COUNT).map(|i| i as f64 * step).collect();
        let costs: Vec<f64> = months
            .iter()
            .map(|&t| base_cost(t, risk_factor) + seasonal_adjustment(t))
            .collect();
        (months, costs)
    }

    #[test]
    fn test_time_domain_spans_horizon_inclusive() {
        let (months, costs) = full_curve(0.0);
        assert_eq!(months.len(), 100);
        assert_eq!(costs.len(), 100);
        assert!((months[0] - 0.0).abs() < 1e-12);
        assert!((months[99] - 36.0).abs() < 1e-9);
        // Strictly increasing in t
        for w in months.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_cost_at_origin_matches_model() {
        // cost(0) = 10000 * (0.5 + rf) + season(0), season(0) = -3000
        let (_, costs) = full_curve(0.33);
        assert!((costs[0] - 5300.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_curve_is_stride_two_subsequence() {
        let result = compute_maintenance_windows(0.4, 5);
        assert_eq!(result.series_data.len(), 50);

        let (months, costs) = full_curve(0.4);
        for (k, point) in result.series_data.iter().enumerate() {
            let i = k * 2;
            assert!((point.x - round1(months[i])).abs() < 1e-12);
            assert!((point.y - round2(costs[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_at_most_three_annotations_in_chronological_order() {
        for rf in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let result = compute_maintenance_windows(rf, 1);
            assert!(result.annotations.len() <= 3);
            for w in result.annotations.windows(2) {
                assert!(
                    w[1].month > w[0].month,
                    "annotations out of order at rf={rf}"
                );
            }
        }
    }

    #[test]
    fn test_interior_minimum_exists_for_moderate_risk() {
        // With the chosen amplitudes the seasonal valleys beat the early
        // degradation growth, so at least one valley exists in (0, 36).
        let result = compute_maintenance_windows(0.33, 5);
        assert!(!result.annotations.is_empty());
        let first = &result.annotations[0];
        assert!(first.month > 0.0 && first.month < 36.0);
    }

    #[test]
    fn test_annotations_are_actual_local_minima() {
        let (months, costs) = full_curve(0.2);
        let result = compute_maintenance_windows(0.2, 3);
        for point in &result.annotations {
            let i = months
                .iter()
                .position(|&m| (round1(m) - point.month).abs() < 1e-12)
                .unwrap();
            assert!(i > 0 && i < costs.len() - 1);
            assert!(costs[i] < costs[i - 1]);
            assert!(costs[i] < costs[i + 1]);
        }
    }

    #[test]
    fn test_label_uses_truncated_month() {
        let result = compute_maintenance_windows(0.33, 5);
        let (months, costs) = full_curve(0.33);
        let minima = local_minima(&costs);
        for (point, &i) in result.annotations.iter().zip(minima.iter()) {
            assert_eq!(point.label, format!("Month {}", months[i] as i64));
        }
    }

    #[test]
    fn test_determinism_bit_identical() {
        let a = compute_maintenance_windows(0.32, 7);
        let b = compute_maintenance_windows(0.32, 7);
        assert_eq!(a, b);
        // Bit-level equality, not just PartialEq tolerance
        for (pa, pb) in a.series_data.iter().zip(b.series_data.iter()) {
            assert_eq!(pa.y.to_bits(), pb.y.to_bits());
        }
    }

    #[test]
    fn test_risk_factor_rounded_to_three_decimals() {
        let result = compute_maintenance_windows(1.0 / 3.0, 3);
        assert!((result.avg_risk_factor - 0.333).abs() < 1e-12);
    }

    #[test]
    fn test_boundaries_never_qualify_as_minima() {
        // Descending then ascending ramps: index 0 and the last index are
        // each below their single neighbor but must not be reported.
        assert_eq!(local_minima(&[1.0, 2.0, 3.0]), Vec::<usize>::new());
        assert_eq!(local_minima(&[3.0, 2.0, 1.0]), Vec::<usize>::new());
        assert_eq!(local_minima(&[3.0, 1.0, 2.0]), vec![1]);
    }

    #[test]
    fn test_plateau_yields_no_minimum() {
        // Equal neighboring values fail the strict comparison.
        assert_eq!(local_minima(&[2.0, 1.0, 1.0, 2.0]), Vec::<usize>::new());
    }

    #[test]
    fn test_higher_risk_shifts_curve_upward() {
        let low = compute_maintenance_windows(0.1, 1);
        let high = compute_maintenance_windows(0.9, 1);
        for (l, h) in low.series_data.iter().zip(high.series_data.iter()) {
            assert!(h.y > l.y);
        }
    }
}
