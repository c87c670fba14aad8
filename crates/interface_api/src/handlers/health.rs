//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::RegistryHealthReport;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check across the stage adapters
///
/// A degraded pipeline still serves claims and answers 200; an unreachable
/// identity stage answers 503.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<RegistryHealthReport>) {
    let report = state.orchestrator.health_report().await;
    let status = if report.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
