//! Claim decision - the terminal artifact of the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::ClaimId;
use crate::policy::PolicyStatus;

/// Overall outcome of a processed claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    /// Every stage passed (or was skipped in degraded mode)
    Approved,
    /// A stage returned a definitive negative result
    Rejected,
    /// The pipeline faulted; no decision on the merits was reached
    Error,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "APPROVED",
            DecisionStatus::Rejected => "REJECTED",
            DecisionStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verification stage, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Identity,
    Fraud,
    Policy,
}

impl PipelineStage {
    /// All stages in execution order
    pub const ALL: [PipelineStage; 3] = [
        PipelineStage::Identity,
        PipelineStage::Fraud,
        PipelineStage::Policy,
    ];

    /// Operation name used for timeouts and tracing
    pub fn operation(&self) -> &'static str {
        match self {
            PipelineStage::Identity => "identity.verify",
            PipelineStage::Fraud => "fraud.assess",
            PipelineStage::Policy => "policy.validate",
        }
    }

    /// Only the identity stage is mandatory
    pub fn is_mandatory(&self) -> bool {
        matches!(self, PipelineStage::Identity)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Identity => "identity",
            PipelineStage::Fraud => "fraud",
            PipelineStage::Policy => "policy",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single decision produced for a processed claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDecision {
    pub claim_id: ClaimId,
    pub timestamp: DateTime<Utc>,
    pub status: DecisionStatus,
    pub message: String,
    pub identity_verified: bool,
    pub fraud_check_passed: bool,
    /// Unset when the pipeline stopped before the policy stage
    pub policy_status: Option<PolicyStatus>,
    /// Stage whose negative result rejected the claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<PipelineStage>,
    /// Advisory stages skipped because their service was unreachable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_stages: Vec<PipelineStage>,
}

impl ClaimDecision {
    pub fn is_approved(&self) -> bool {
        self.status == DecisionStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.status == DecisionStatus::Rejected
    }

    pub fn is_error(&self) -> bool {
        self.status == DecisionStatus::Error
    }

    /// Returns true if the pipeline ran in degraded mode
    pub fn is_degraded(&self) -> bool {
        !self.degraded_stages.is_empty()
    }

    /// Compares two decisions ignoring their timestamps
    pub fn same_outcome(&self, other: &ClaimDecision) -> bool {
        self.claim_id == other.claim_id
            && self.status == other.status
            && self.message == other.message
            && self.identity_verified == other.identity_verified
            && self.fraud_check_passed == other.fraud_check_passed
            && self.policy_status == other.policy_status
            && self.rejected_by == other.rejected_by
            && self.degraded_stages == other.degraded_stages
    }
}

/// Mutable accumulator the orchestrator fills in stage by stage
#[derive(Debug, Clone)]
pub(crate) struct DecisionDraft {
    claim_id: ClaimId,
    pub(crate) identity_verified: bool,
    pub(crate) fraud_check_passed: bool,
    pub(crate) policy_status: Option<PolicyStatus>,
    pub(crate) degraded_stages: Vec<PipelineStage>,
}

impl DecisionDraft {
    pub(crate) fn new(claim_id: ClaimId) -> Self {
        Self {
            claim_id,
            identity_verified: false,
            fraud_check_passed: false,
            policy_status: None,
            degraded_stages: Vec::new(),
        }
    }

    pub(crate) fn degrade(&mut self, stage: PipelineStage) {
        self.degraded_stages.push(stage);
    }

    pub(crate) fn approve(self) -> ClaimDecision {
        self.finish(DecisionStatus::Approved, "Claim approved successfully".to_string(), None)
    }

    pub(crate) fn reject(self, stage: PipelineStage, message: String) -> ClaimDecision {
        self.finish(DecisionStatus::Rejected, message, Some(stage))
    }

    pub(crate) fn error(self, message: String) -> ClaimDecision {
        self.finish(DecisionStatus::Error, message, None)
    }

    fn finish(
        self,
        status: DecisionStatus,
        message: String,
        rejected_by: Option<PipelineStage>,
    ) -> ClaimDecision {
        ClaimDecision {
            claim_id: self.claim_id,
            timestamp: Utc::now(),
            status,
            message,
            identity_verified: self.identity_verified,
            fraud_check_passed: self.fraud_check_passed,
            policy_status: self.policy_status,
            rejected_by,
            degraded_stages: self.degraded_stages,
        }
    }
}
