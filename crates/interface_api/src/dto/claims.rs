//! Claims DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{ClaimId, UserId};
use domain_claims::{ClaimRequest, StatisticsSnapshot};

/// Body of `POST /api/v1/claims/submit`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ClaimSubmission {
    #[validate(length(min = 1, message = "claim_id is required"))]
    pub claim_id: String,
    /// May be empty; identity verification then rejects the claim
    #[serde(default)]
    pub user_id: String,
    #[validate(length(min = 1, message = "claim_type is required"))]
    pub claim_type: String,
    #[validate(custom(function = "non_negative", message = "claim_amount cannot be negative"))]
    pub claim_amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub incident_date: NaiveDate,
}

fn non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

impl From<ClaimSubmission> for ClaimRequest {
    fn from(submission: ClaimSubmission) -> Self {
        let request = ClaimRequest::new(
            ClaimId::new(submission.claim_id.trim()),
            UserId::new(submission.user_id.trim()),
            submission.claim_type,
            submission.claim_amount,
            submission.incident_date,
        );
        match submission.description {
            Some(description) => request.with_description(description),
            None => request,
        }
    }
}

/// Body of `GET /api/v1/claims/statistics`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub counters: StatisticsSnapshot,
    pub rejected: u64,
}

impl From<StatisticsSnapshot> for StatisticsResponse {
    fn from(counters: StatisticsSnapshot) -> Self {
        let rejected = counters.rejected();
        Self { counters, rejected }
    }
}
