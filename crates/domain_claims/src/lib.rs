//! Claim Verification Pipeline
//!
//! This crate decides insurance claims by running three independent stages
//! in a fixed order and combining their answers:
//!
//! ```text
//! ClaimRequest -> Identity (mandatory) -> Fraud (advisory) -> Policy (advisory) -> ClaimDecision
//! ```
//!
//! Each stage is reached through a port ([`IdentityPort`], [`FraudPort`],
//! [`PolicyPort`]) that is served either by an in-process engine or by a
//! remote HTTP service (see [`adapters`]). The [`ClaimOrchestrator`] never
//! fails: every claim ends as `APPROVED`, `REJECTED` or `ERROR`.

pub mod adapters;
pub mod claim;
pub mod claimant;
pub mod decision;
pub mod error;
pub mod fraud;
pub mod identity;
pub mod orchestrator;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod statistics;

pub use claim::ClaimRequest;
pub use claimant::{
    ClaimantDirectory, ClaimantProfile, InMemoryClaimantDirectory, PlaceholderClaimantDirectory,
};
pub use decision::{ClaimDecision, DecisionStatus, PipelineStage};
pub use error::ClaimError;
pub use fraud::{
    FraudAssessment, FraudAssessmentRequest, FraudScorer, Recommendation, RiskLevel,
};
pub use identity::{
    IdentityVerificationResult, IdentityVerifier, VerificationMethod, VerifyIdentityRequest,
};
pub use orchestrator::{ClaimOrchestrator, StageTimeouts};
pub use policy::{
    InMemoryPolicyCatalog, Policy, PolicyCatalog, PolicyStatus, PolicyValidationResult,
    PolicyValidator, ValidatePolicyRequest,
};
pub use ports::{FraudPort, IdentityPort, PolicyPort};
pub use registry::{StageConfig, StageRegistry};
pub use statistics::{PipelineStatistics, StatisticsSnapshot};
