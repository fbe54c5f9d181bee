//! API route handlers
//!
//! Request handling logic for the planning endpoints. Expected aggregation
//! outcomes (no input, no valid input) are part of the service contract:
//! they return 200 with an explanatory message and empty collections, never
//! an HTTP error. Only infrastructure failures (datasets unreadable,
//! generation backend down) surface as 5xx.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::config;
use crate::inference::{run_inference, InferenceContext, InferenceOutput};
use crate::planner::plan_maintenance;
use crate::report::ReportGenerator;
use crate::types::{AggregationError, CostPoint, MaintenanceWindowResult, OptimalPoint};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
///
/// Both members are read-only after startup; handlers share them by `Arc`
/// with no locking in the request path.
#[derive(Clone)]
pub struct PlannerState {
    /// Fitted model/preprocessor pairs, loaded once at startup
    pub inference: Arc<InferenceContext>,
    /// Report generation backend
    pub reporter: Arc<dyn ReportGenerator>,
}

// ============================================================================
// Request / Response Shapes
// ============================================================================

/// Body of POST /api/v1/maintenance/windows
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Current risk values of the critical points, each expected in [0, 1]
    pub critical_points: Vec<f64>,
}

/// Maintenance windows payload.
///
/// Mirrors the planning result on success; on an expected aggregation
/// outcome the collections are empty and `error` explains why.
#[derive(Debug, Serialize)]
pub struct MaintenanceWindowsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub series_data: Vec<CostPoint>,
    pub annotations: Vec<OptimalPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_risk_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_points: Option<usize>,
}

impl From<Result<MaintenanceWindowResult, AggregationError>> for MaintenanceWindowsResponse {
    fn from(outcome: Result<MaintenanceWindowResult, AggregationError>) -> Self {
        match outcome {
            Ok(result) => Self {
                error: None,
                series_data: result.series_data,
                annotations: result.annotations,
                avg_risk_factor: Some(result.avg_risk_factor),
                total_points: Some(result.total_points),
            },
            Err(e) => Self {
                error: Some(e.to_string()),
                series_data: Vec::new(),
                annotations: Vec::new(),
                avg_risk_factor: None,
                total_points: None,
            },
        }
    }
}

/// Response for POST /api/v1/maintenance/report
#[derive(Debug, Serialize)]
pub struct MaintenanceReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    pub annotations: Vec<OptimalPoint>,
}

/// Infrastructure failure payload (5xx only).
#[derive(Debug, Serialize)]
struct InternalError {
    error: String,
}

fn internal_error(context: &str, e: &anyhow::Error) -> Response {
    error!(error = %e, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalError {
            error: format!("{context}: {e}"),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - liveness probe
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// POST /api/v1/maintenance/windows - plan from caller-supplied risk scores
pub async fn post_maintenance_windows(
    Json(request): Json<PlanRequest>,
) -> Json<MaintenanceWindowsResponse> {
    Json(plan_maintenance(&request.critical_points).into())
}

/// GET /api/v1/maintenance/windows - plan from the inference pipeline's
/// current per-segment risk predictions
pub async fn get_maintenance_windows(State(state): State<PlannerState>) -> Response {
    let output = match run_inference(&state.inference, &config::get().data) {
        Ok(output) => output,
        Err(e) => return internal_error("inference pipeline failed", &e),
    };

    let scores = output.risk_scores();
    let response: MaintenanceWindowsResponse = plan_maintenance(&scores).into();
    Json(response).into_response()
}

/// POST /api/v1/maintenance/report - plan + natural-language report
pub async fn post_maintenance_report(
    State(state): State<PlannerState>,
    Json(request): Json<PlanRequest>,
) -> Response {
    match plan_maintenance(&request.critical_points) {
        Ok(result) => match state.reporter.generate(&result).await {
            Ok(report) => Json(MaintenanceReportResponse {
                error: None,
                report: Some(report),
                annotations: result.annotations,
            })
            .into_response(),
            Err(e) => internal_error("report generation failed", &e),
        },
        Err(e) => Json(MaintenanceReportResponse {
            error: Some(e.to_string()),
            report: None,
            annotations: Vec::new(),
        })
        .into_response(),
    }
}

/// GET /api/v1/inference - input features joined with model predictions
pub async fn get_inference(State(state): State<PlannerState>) -> Response {
    match run_inference(&state.inference, &config::get().data) {
        Ok(output) => Json::<InferenceOutput>(output).into_response(),
        Err(e) => internal_error("inference pipeline failed", &e),
    }
}
