//! Risk aggregation: validation + reduction of per-segment risk scores
//!
//! The aggregator is the sole validation boundary of the planning core.
//! Downstream code (the optimizer) assumes a valid scalar and never
//! re-validates. Out-of-range values are dropped, not rejected — a request
//! does not fail merely because some of its inputs are bad.

use statrs::statistics::Statistics;
use tracing::warn;

use crate::types::{AggregationError, RiskAggregate};

/// Risk factor assumed when a caller has no collaborator data at all.
///
/// Midpoint of the valid [0, 1] range. This is a fixed, documented constant
/// of the model, not a derived quantity — callers that reach the aggregator
/// with an actual (possibly empty) observation set get an explicit
/// [`AggregationError`] instead.
pub const DEFAULT_RISK_FACTOR: f64 = 0.5;

/// Reduce a sequence of raw risk observations to a single [`RiskAggregate`].
///
/// - Values outside the closed interval [0, 1] (including NaN) are filtered
///   out; a warn-level diagnostic reports the dropped count.
/// - Empty input yields [`AggregationError::EmptyInput`].
/// - Non-empty input with zero survivors yields
///   [`AggregationError::NoValidObservations`].
/// - Otherwise the arithmetic mean of the survivors is returned along with
///   the valid and dropped counts.
pub fn aggregate_risk(observations: &[f64]) -> Result<RiskAggregate, AggregationError> {
    if observations.is_empty() {
        return Err(AggregationError::EmptyInput);
    }

    let valid: Vec<f64> = observations
        .iter()
        .copied()
        .filter(|v| (0.0..=1.0).contains(v))
        .collect();

    let dropped = observations.len() - valid.len();

    if valid.is_empty() {
        return Err(AggregationError::NoValidObservations { dropped });
    }

    if dropped > 0 {
        warn!(
            dropped,
            supplied = observations.len(),
            "filtered critical points outside [0, 1]"
        );
    }

    let risk_factor = (&valid).mean();

    Ok(RiskAggregate {
        risk_factor,
        valid_count: valid.len(),
        dropped_count: dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_valid_observations() {
        let result = aggregate_risk(&[0.2, 0.3, 0.25, 0.4, 0.5]).unwrap();
        assert!((result.risk_factor - 0.33).abs() < 1e-12);
        assert_eq!(result.valid_count, 5);
        assert_eq!(result.dropped_count, 0);
    }

    #[test]
    fn test_empty_input_is_distinct_outcome() {
        let result = aggregate_risk(&[]);
        assert_eq!(result, Err(AggregationError::EmptyInput));
    }

    #[test]
    fn test_out_of_range_values_are_dropped_not_fatal() {
        let result = aggregate_risk(&[0.2, 1.5, 0.4, -0.1]).unwrap();
        // Valid subset is {0.2, 0.4} -> mean 0.3
        assert!((result.risk_factor - 0.3).abs() < 1e-12);
        assert_eq!(result.valid_count, 2);
        assert_eq!(result.dropped_count, 2);
    }

    #[test]
    fn test_all_invalid_reports_no_valid_observations() {
        let result = aggregate_risk(&[1.5, -0.1, 2.0]);
        assert_eq!(
            result,
            Err(AggregationError::NoValidObservations { dropped: 3 })
        );
    }

    #[test]
    fn test_nan_is_filtered_like_out_of_range() {
        let result = aggregate_risk(&[0.5, f64::NAN]).unwrap();
        assert!((result.risk_factor - 0.5).abs() < 1e-12);
        assert_eq!(result.dropped_count, 1);
    }

    #[test]
    fn test_boundary_values_are_valid() {
        let result = aggregate_risk(&[0.0, 1.0]).unwrap();
        assert!((result.risk_factor - 0.5).abs() < 1e-12);
        assert_eq!(result.valid_count, 2);
    }
}
