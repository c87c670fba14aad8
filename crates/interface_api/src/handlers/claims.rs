//! Claims handlers

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use domain_claims::{ClaimDecision, ClaimRequest};

use crate::dto::claims::{ClaimSubmission, StatisticsResponse};
use crate::{error::ApiError, AppState};

/// Runs a claim through the pipeline
///
/// Every decision, `ERROR` included, is answered with 200; only a malformed
/// body is refused.
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(submission): Json<ClaimSubmission>,
) -> Result<Json<ClaimDecision>, ApiError> {
    submission.validate()?;
    let claim = ClaimRequest::from(submission);

    info!(claim_id = %claim.claim_id, user_id = %claim.user_id, "Claim submitted");

    let decision = state.orchestrator.process_claim(&claim).await;
    Ok(Json(decision))
}

/// Returns the pipeline counters
pub async fn statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    Json(state.orchestrator.statistics().into())
}
