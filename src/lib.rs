//! Railwise: Track Maintenance Planning Intelligence
//!
//! Estimates, from per-segment track risk scores, when a maintenance
//! intervention is cheapest.
//!
//! ## Architecture
//!
//! - **Planner**: deterministic cost-curve synthesis + local-minima
//!   extraction (the algorithmic core)
//! - **Inference**: fitted risk / tamping-priority models applied to tabular
//!   track data, supplying the planner's input
//! - **Report**: prompt contract for the natural-language report generator
//! - **API**: axum HTTP surface for the planning dashboard

pub mod api;
pub mod config;
pub mod inference;
pub mod planner;
pub mod report;
pub mod types;

// Re-export service configuration
pub use config::ServiceConfig;

// Re-export commonly used types
pub use types::{
    AggregationError, CostPoint, MaintenanceWindowResult, OptimalPoint, RiskAggregate,
};

// Re-export the planning core
pub use planner::{aggregate_risk, compute_maintenance_windows, plan_maintenance};

// Re-export inference components
pub use inference::{InferenceContext, InferenceOutput, LinearModel, ModelBundle, Preprocessor};

// Re-export report components
pub use report::{ReportGenerator, TemplateReporter};
