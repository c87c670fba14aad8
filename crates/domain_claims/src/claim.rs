//! Claim submission

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, UserId};
use crate::error::ClaimError;

/// Claim type tag that the fraud rules treat specially
pub const ACCIDENT_CLAIM_TYPE: &str = "ACCIDENT";

/// An insurance claim as submitted for processing
///
/// Immutable once submitted; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Claim reference
    pub claim_id: ClaimId,
    /// Claimant reference
    pub user_id: UserId,
    /// Category tag (AUTO, ACCIDENT, HOME, HEALTH, ...)
    pub claim_type: String,
    /// Claimed amount, never negative
    pub claim_amount: Decimal,
    /// Free-text description of the incident
    #[serde(default)]
    pub description: String,
    /// Date the incident happened
    pub incident_date: NaiveDate,
}

impl ClaimRequest {
    /// Creates a claim with an empty description
    pub fn new(
        claim_id: impl Into<ClaimId>,
        user_id: impl Into<UserId>,
        claim_type: impl Into<String>,
        claim_amount: Decimal,
        incident_date: NaiveDate,
    ) -> Self {
        Self {
            claim_id: claim_id.into(),
            user_id: user_id.into(),
            claim_type: claim_type.into(),
            claim_amount,
            description: String::new(),
            incident_date,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the structural invariants the pipeline relies on.
    ///
    /// An empty user id is accepted here; identity verification
    /// fails closed on it and the claim is rejected, not errored.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.claim_id.is_blank() {
            return Err(ClaimError::InvalidRequest("claim id is required".to_string()));
        }
        if self.claim_amount.is_sign_negative() && !self.claim_amount.is_zero() {
            return Err(ClaimError::InvalidRequest(format!(
                "claim amount cannot be negative: {}",
                self.claim_amount
            )));
        }
        Ok(())
    }
}
