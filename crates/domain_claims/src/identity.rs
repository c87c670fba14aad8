//! Identity verification
//!
//! The first and only mandatory stage. The in-process verifier applies a
//! document check: all three inputs must be non-empty and the document
//! identifier must be at least [`MIN_DOCUMENT_ID_LEN`] characters long.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{
    DomainPort, HealthCheckable, HealthCheckResult, OperationMetadata, PortError, UserId,
};
use crate::ports::IdentityPort;

/// Minimum length of a document identifier that passes the check
pub const MIN_DOCUMENT_ID_LEN: usize = 8;

const VERIFIED_CONFIDENCE: Decimal = dec!(0.95);
const INVALID_DOCUMENT_CONFIDENCE: Decimal = dec!(0.45);

/// How the identity was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationMethod {
    GovernmentIdCheck,
    None,
}

/// Result of verifying a claimant's identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerificationResult {
    pub user_id: UserId,
    pub verified: bool,
    /// Confidence in [0, 1]
    pub confidence_score: Decimal,
    pub message: String,
    pub verification_method: VerificationMethod,
}

/// Wire body for a remote identity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyIdentityRequest {
    pub user_id: UserId,
    pub name: String,
    pub document_id: String,
}

/// In-process identity verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityVerifier;

impl IdentityVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Verifies a claimant. Never fails; missing input yields an unverified result.
    pub fn verify(&self, user_id: &UserId, name: &str, document_id: &str) -> IdentityVerificationResult {
        if user_id.as_str().is_empty() || name.is_empty() || document_id.is_empty() {
            debug!(user_id = %user_id, "Identity verification missing required input");
            return IdentityVerificationResult {
                user_id: user_id.clone(),
                verified: false,
                confidence_score: Decimal::ZERO,
                message: "Missing required verification information".to_string(),
                verification_method: VerificationMethod::None,
            };
        }

        let verified = document_id.chars().count() >= MIN_DOCUMENT_ID_LEN;
        let (confidence_score, message) = if verified {
            (VERIFIED_CONFIDENCE, "Identity verified successfully")
        } else {
            (INVALID_DOCUMENT_CONFIDENCE, "Identity verification failed - invalid document")
        };

        debug!(user_id = %user_id, verified, "Identity document checked");

        IdentityVerificationResult {
            user_id: user_id.clone(),
            verified,
            confidence_score,
            message: message.to_string(),
            verification_method: VerificationMethod::GovernmentIdCheck,
        }
    }
}

impl DomainPort for IdentityVerifier {}

#[async_trait]
impl HealthCheckable for IdentityVerifier {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("local-identity-verifier", "In-process identity verifier")
    }
}

#[async_trait]
impl IdentityPort for IdentityVerifier {
    async fn verify(
        &self,
        user_id: &UserId,
        name: &str,
        document_id: &str,
        _metadata: Option<OperationMetadata>,
    ) -> Result<IdentityVerificationResult, PortError> {
        Ok(IdentityVerifier::verify(self, user_id, name, document_id))
    }
}
