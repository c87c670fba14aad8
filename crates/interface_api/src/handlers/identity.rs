//! Identity stage service

use axum::{extract::State, Json};

use domain_claims::{IdentityVerificationResult, VerifyIdentityRequest};

use crate::AppState;

/// Verifies a claimant's identity document
pub async fn verify_identity(
    State(state): State<AppState>,
    Json(request): Json<VerifyIdentityRequest>,
) -> Json<IdentityVerificationResult> {
    Json(state.identity.verify(&request.user_id, &request.name, &request.document_id))
}
