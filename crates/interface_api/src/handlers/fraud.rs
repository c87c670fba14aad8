//! Fraud stage service

use axum::{extract::State, Json};

use domain_claims::{FraudAssessment, FraudAssessmentRequest};

use crate::{error::ApiError, AppState};

/// Scores a claim against the fraud rules
pub async fn assess_fraud(
    State(state): State<AppState>,
    Json(request): Json<FraudAssessmentRequest>,
) -> Result<Json<FraudAssessment>, ApiError> {
    if request.claim_amount.is_sign_negative() && !request.claim_amount.is_zero() {
        return Err(ApiError::BadRequest(format!(
            "claim amount cannot be negative: {}",
            request.claim_amount
        )));
    }
    Ok(Json(state.fraud.assess(&request)))
}
