//! API route definitions
//!
//! Organizes endpoints for the planning dashboard:
//! - /api/v1/maintenance/windows - cost curve + optimal intervention points
//! - /api/v1/maintenance/report  - natural-language planning report
//! - /api/v1/inference           - raw predictions joined with input features

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, PlannerState};

/// Create all API routes for the dashboard
pub fn api_routes(state: PlannerState) -> Router {
    Router::new()
        .route(
            "/maintenance/windows",
            get(handlers::get_maintenance_windows),
        )
        .route(
            "/maintenance/windows",
            post(handlers::post_maintenance_windows),
        )
        .route("/maintenance/report", post(handlers::post_maintenance_report))
        .route("/inference", get(handlers::get_inference))
        .with_state(state)
}

/// Legacy health endpoint at root level
pub fn legacy_routes(state: PlannerState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
