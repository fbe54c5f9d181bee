//! Maintenance planning core: risk aggregation + window optimization
//!
//! Two stateless stages, evaluated leaf-first:
//! 1. [`aggregator`] reduces per-segment risk observations to a scalar risk
//!    factor (the sole validation boundary).
//! 2. [`optimizer`] synthesizes the cost curve for that factor and extracts
//!    its local minima as recommended intervention windows.
//!
//! Every invocation is independent — no shared mutable state, no I/O.

pub mod aggregator;
pub mod optimizer;

pub use aggregator::{aggregate_risk, DEFAULT_RISK_FACTOR};
pub use optimizer::{compute_maintenance_windows, curve_model};

use crate::types::{AggregationError, MaintenanceWindowResult};

/// Composite entry point: aggregate observations, then optimize.
///
/// The optimizer is never invoked when aggregation fails — the error variants
/// ([`AggregationError::EmptyInput`], [`AggregationError::NoValidObservations`])
/// are expected outcomes the caller must surface, not faults.
pub fn plan_maintenance(
    observations: &[f64],
) -> Result<MaintenanceWindowResult, AggregationError> {
    let aggregate = aggregate_risk(observations)?;
    Ok(compute_maintenance_windows(
        aggregate.risk_factor,
        aggregate.valid_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_end_to_end() {
        let result = plan_maintenance(&[0.2, 0.3, 0.25, 0.4, 0.5]).unwrap();
        assert!((result.avg_risk_factor - 0.33).abs() < 1e-12);
        assert_eq!(result.total_points, 5);
        assert_eq!(result.series_data.len(), 50);
        // cost(0) = 10000 * (0.5 + 0.33) - 3000
        assert!((result.series_data[0].y - 5300.0).abs() < 1e-9);
        assert!(!result.annotations.is_empty());
    }

    #[test]
    fn test_plan_short_circuits_on_empty_input() {
        assert_eq!(plan_maintenance(&[]), Err(AggregationError::EmptyInput));
    }

    #[test]
    fn test_plan_counts_only_valid_points() {
        let result = plan_maintenance(&[0.2, 1.5, 0.4, -0.1]).unwrap();
        assert_eq!(result.total_points, 2);
        assert!((result.avg_risk_factor - 0.3).abs() < 1e-12);
    }
}
