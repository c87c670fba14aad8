//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use core_kernel::{PolicyId, UserId};
use domain_claims::{Policy, PolicyValidationResult, ValidatePolicyRequest};

use crate::dto::policy::{PolicyListResponse, PolicyQuery};
use crate::{error::ApiError, AppState};

/// Lists policies, optionally for a single user
pub async fn list_policies(
    State(state): State<AppState>,
    Query(query): Query<PolicyQuery>,
) -> Result<Json<PolicyListResponse>, ApiError> {
    let policies = match query.user_id.as_deref().map(str::trim) {
        Some(user_id) if !user_id.is_empty() => {
            state.catalog().policies_for_user(&UserId::new(user_id)).await?
        }
        _ => state.catalog().all_policies().await?,
    };
    Ok(Json(policies.into()))
}

/// Gets a policy by ID
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Policy>, ApiError> {
    let policy_id = PolicyId::new(id);
    state
        .catalog()
        .get_policy(&policy_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Policy {} not found", policy_id)))
}

/// Validates a claim amount against a policy
///
/// An unknown policy is a business outcome (`INVALID`), not a 404.
pub async fn validate_policy(
    State(state): State<AppState>,
    Json(request): Json<ValidatePolicyRequest>,
) -> Result<Json<PolicyValidationResult>, ApiError> {
    let result = state
        .policies
        .evaluate(&request.policy_id, request.claim_amount)
        .await?;
    Ok(Json(result))
}
