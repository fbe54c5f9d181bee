//! Core data types for maintenance window planning

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Cost Curve Types
// ============================================================================

/// A single display sample of the cost curve, rounded for the dashboard
/// (time in months to 1 decimal, cost to 2 decimals).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
    /// Elapsed time in months
    pub x: f64,
    /// Projected total maintenance cost
    pub y: f64,
}

/// A recommended intervention window: a local minimum of the cost curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalPoint {
    /// Elapsed time in months (1 decimal)
    pub month: f64,
    /// Projected cost at this point (2 decimals)
    pub cost: f64,
    /// Human-readable tag, e.g. "Month 7" (truncated integer month)
    pub label: String,
}

/// Aggregate output of a planning call.
///
/// Constructed fresh per invocation; holds no cross-request state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWindowResult {
    /// Downsampled cost curve for charting (every other sample of the
    /// full-resolution curve)
    pub series_data: Vec<CostPoint>,
    /// Up to 3 local minima in chronological order
    pub annotations: Vec<OptimalPoint>,
    /// Aggregated risk factor used to scale the curve (3 decimals)
    pub avg_risk_factor: f64,
    /// Number of valid observations the risk factor was derived from
    pub total_points: usize,
}

// ============================================================================
// Risk Aggregation Types
// ============================================================================

/// Result of reducing a set of per-segment risk observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAggregate {
    /// Arithmetic mean of the valid observations
    pub risk_factor: f64,
    /// Observations that survived range validation
    pub valid_count: usize,
    /// Observations dropped for falling outside [0, 1]
    pub dropped_count: usize,
}

/// Expected aggregation outcomes that carry no usable risk factor.
///
/// These are normal results, not faults: handlers surface them as a
/// structured payload with empty curve/annotation collections so callers
/// are forced to handle them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// Caller supplied zero observations
    #[error("no critical points were supplied")]
    EmptyInput,

    /// Every supplied observation fell outside [0, 1]
    #[error("no valid critical points (values must be between 0 and 1); {dropped} dropped")]
    NoValidObservations {
        /// How many observations were discarded
        dropped: usize,
    },
}
