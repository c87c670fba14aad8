//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for claim decisions and stage
//! results that give more meaningful error messages than standard assertions.

use domain_claims::{
    ClaimDecision, DecisionStatus, FraudAssessment, PipelineStage, PolicyStatus, RiskLevel,
};
use rust_decimal::Decimal;

/// Asserts that a decision approved the claim
pub fn assert_approved(decision: &ClaimDecision) {
    assert_eq!(
        decision.status,
        DecisionStatus::Approved,
        "Expected APPROVED, got {} with message '{}'",
        decision.status,
        decision.message
    );
}

/// Asserts that a decision rejected the claim at the given stage
pub fn assert_rejected_by(decision: &ClaimDecision, stage: PipelineStage) {
    assert_eq!(
        decision.status,
        DecisionStatus::Rejected,
        "Expected REJECTED by {}, got {} with message '{}'",
        stage,
        decision.status,
        decision.message
    );
    assert_eq!(
        decision.rejected_by,
        Some(stage),
        "Expected rejection by {}, got {:?}",
        stage,
        decision.rejected_by
    );
}

/// Asserts that a decision is an ERROR, distinct from any rejection
pub fn assert_errored(decision: &ClaimDecision) {
    assert_eq!(
        decision.status,
        DecisionStatus::Error,
        "Expected ERROR, got {} with message '{}'",
        decision.status,
        decision.message
    );
    assert!(
        decision.message.starts_with("Error processing claim:"),
        "ERROR decision message should name the fault, got '{}'",
        decision.message
    );
    assert!(decision.rejected_by.is_none(), "ERROR decisions have no rejecting stage");
}

/// Asserts the recorded policy status
pub fn assert_policy_status(decision: &ClaimDecision, expected: Option<PolicyStatus>) {
    assert_eq!(
        decision.policy_status, expected,
        "Policy status mismatch for claim {}",
        decision.claim_id
    );
}

/// Asserts exactly which advisory stages were skipped
pub fn assert_degraded(decision: &ClaimDecision, stages: &[PipelineStage]) {
    assert_eq!(
        decision.degraded_stages.as_slice(),
        stages,
        "Degraded stage mismatch for claim {}",
        decision.claim_id
    );
}

/// Asserts that a fraud score is in [0, 1] and consistent with its level
pub fn assert_assessment_consistent(assessment: &FraudAssessment) {
    assert!(
        assessment.risk_score >= Decimal::ZERO && assessment.risk_score <= Decimal::ONE,
        "Risk score out of range: {}",
        assessment.risk_score
    );
    let fraudulent_level = matches!(assessment.risk_level, RiskLevel::High | RiskLevel::Critical);
    assert_eq!(
        assessment.is_fraudulent, fraudulent_level,
        "Fraud flag {} inconsistent with level {}",
        assessment.is_fraudulent, assessment.risk_level
    );
}
