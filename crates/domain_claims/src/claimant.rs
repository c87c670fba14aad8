//! Claimant directory
//!
//! A claim only carries the claimant's user id. The name and document used
//! for identity verification, the claim-history marker fed to fraud scoring
//! and the policy the claim is filed against all come from a
//! [`ClaimantDirectory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{PolicyId, PortError, UserId};

/// History marker for a claimant without prior claims
pub const FIRST_TIME_CLAIM: &str = "FIRST_TIME_CLAIM";

/// What the pipeline knows about a claimant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimantProfile {
    pub name: String,
    pub document_id: String,
    /// Claim-history markers, e.g. `FIRST_TIME_CLAIM`
    pub history: String,
    /// Policy the claimant files against
    pub policy_id: PolicyId,
}

impl ClaimantProfile {
    pub fn new(
        name: impl Into<String>,
        document_id: impl Into<String>,
        history: impl Into<String>,
        policy_id: impl Into<PolicyId>,
    ) -> Self {
        Self {
            name: name.into(),
            document_id: document_id.into(),
            history: history.into(),
            policy_id: policy_id.into(),
        }
    }

    /// Profile for an unknown claimant. Identity inputs are empty, so
    /// verification fails closed.
    pub fn anonymous(policy_id: PolicyId) -> Self {
        Self {
            name: String::new(),
            document_id: String::new(),
            history: String::new(),
            policy_id,
        }
    }
}

impl Default for ClaimantProfile {
    fn default() -> Self {
        Self::new("John Doe", "ID12345678", FIRST_TIME_CLAIM, "POL-001")
    }
}

/// Source of claimant profiles
#[async_trait]
pub trait ClaimantDirectory: Send + Sync {
    /// Returns the profile for a user, or `PortError::NotFound`
    async fn profile(&self, user_id: &UserId) -> Result<ClaimantProfile, PortError>;
}

/// Answers every lookup with the same profile
#[derive(Debug, Clone, Default)]
pub struct PlaceholderClaimantDirectory {
    profile: ClaimantProfile,
}

impl PlaceholderClaimantDirectory {
    pub fn new(profile: ClaimantProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl ClaimantDirectory for PlaceholderClaimantDirectory {
    async fn profile(&self, _user_id: &UserId) -> Result<ClaimantProfile, PortError> {
        Ok(self.profile.clone())
    }
}

/// Per-user profiles held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryClaimantDirectory {
    profiles: HashMap<UserId, ClaimantProfile>,
}

impl InMemoryClaimantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, user_id: impl Into<UserId>, profile: ClaimantProfile) -> Self {
        self.profiles.insert(user_id.into(), profile);
        self
    }
}

#[async_trait]
impl ClaimantDirectory for InMemoryClaimantDirectory {
    async fn profile(&self, user_id: &UserId) -> Result<ClaimantProfile, PortError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claimant", user_id))
    }
}
