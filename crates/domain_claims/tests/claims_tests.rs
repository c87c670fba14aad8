//! End-to-end tests for the claim pipeline

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::ports::mock::MockBehavior;
use domain_claims::{
    ClaimantProfile, FraudScorer, InMemoryClaimantDirectory, PipelineStage, PolicyStatus,
    RiskLevel, Recommendation,
};
use test_utils::{
    assert_approved, assert_assessment_consistent, assert_degraded, assert_errored,
    assert_policy_status, assert_rejected_by, claim_request_strategy, document_id_strategy,
    fraud_request_strategy, AmountFixtures, ClaimFixtures, ClaimRequestBuilder, ClaimantFixtures,
    MockPipelineBuilder,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

// ============================================================================
// Reference scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_routine_claim_is_approved() {
        let pipeline = MockPipelineBuilder::new().build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_approved(&decision);
        assert_policy_status(&decision, Some(PolicyStatus::Valid));
        assert!(decision.identity_verified);
        assert!(decision.fraud_check_passed);
        assert_eq!(pipeline.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_amount_above_coverage_is_rejected_at_policy() {
        let pipeline = MockPipelineBuilder::new().build();
        let claim = ClaimFixtures::auto(AmountFixtures::above_auto_coverage());
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_rejected_by(&decision, PipelineStage::Policy);
        assert_policy_status(&decision, Some(PolicyStatus::ExceedsCoverage));
        assert!(decision.fraud_check_passed);
    }

    #[tokio::test]
    async fn test_inactive_policy_is_rejected_at_policy() {
        let pipeline = MockPipelineBuilder::new()
            .with_claimant(ClaimantFixtures::expired_policy_holder())
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_rejected_by(&decision, PipelineStage::Policy);
        assert_policy_status(&decision, Some(PolicyStatus::Inactive));
        assert_eq!(decision.message, "Policy validation failed: Policy is not active");
    }

    #[tokio::test]
    async fn test_short_document_stops_at_identity() {
        let pipeline = MockPipelineBuilder::new()
            .with_claimant(ClaimantFixtures::short_document())
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_rejected_by(&decision, PipelineStage::Identity);
        assert!(!decision.identity_verified);
        assert!(!decision.fraud_check_passed);
        assert_policy_status(&decision, None);
        assert_eq!(
            decision.message,
            "Identity verification failed: Identity verification failed - invalid document"
        );
        assert_eq!(pipeline.calls(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_large_accident_is_rejected_as_fraud() {
        let pipeline = MockPipelineBuilder::new()
            .with_claimant(ClaimantFixtures::repeat_claimant())
            .build();
        let claim = ClaimFixtures::accident(dec!(120000));
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_rejected_by(&decision, PipelineStage::Fraud);
        assert!(decision.identity_verified);
        assert!(!decision.fraud_check_passed);
        assert_eq!(
            decision.message,
            "Fraud detected: Critical fraud risk detected. Claim should be rejected."
        );
        assert_eq!(pipeline.calls(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_high_risk_without_critical_still_rejects() {
        let pipeline = MockPipelineBuilder::new()
            .with_claimant(ClaimantFixtures::repeat_claimant())
            .build();
        // 0.30 + 0.40 = 0.70: HIGH, manual review, but flagged fraudulent
        let claim = ClaimFixtures::auto(AmountFixtures::very_high());
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_rejected_by(&decision, PipelineStage::Fraud);
    }
}

// ============================================================================
// Degraded mode and faults
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_fraud_unreachable_fails_open() {
        let pipeline = MockPipelineBuilder::new()
            .with_fraud(MockBehavior::Unreachable)
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_approved(&decision);
        assert!(decision.fraud_check_passed);
        assert_degraded(&decision, &[PipelineStage::Fraud]);
        assert_eq!(pipeline.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_fraud_unreachable_does_not_hide_policy_rejection() {
        let pipeline = MockPipelineBuilder::new()
            .with_fraud(MockBehavior::Unreachable)
            .build();
        let claim = ClaimFixtures::auto(AmountFixtures::above_auto_coverage());
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_rejected_by(&decision, PipelineStage::Policy);
        assert_degraded(&decision, &[PipelineStage::Fraud]);
    }

    #[tokio::test]
    async fn test_fraud_timeout_fails_open() {
        let pipeline = MockPipelineBuilder::new()
            .with_fraud(MockBehavior::Hang)
            .with_timeout(Duration::from_millis(25))
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_approved(&decision);
        assert_degraded(&decision, &[PipelineStage::Fraud]);
    }

    #[tokio::test]
    async fn test_policy_unreachable_records_valid() {
        let pipeline = MockPipelineBuilder::new()
            .with_policy(MockBehavior::Unreachable)
            .build();
        let claim = ClaimFixtures::auto(AmountFixtures::above_auto_coverage());
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_approved(&decision);
        assert_policy_status(&decision, Some(PolicyStatus::Valid));
        assert_degraded(&decision, &[PipelineStage::Policy]);
    }

    #[tokio::test]
    async fn test_policy_timeout_fails_open() {
        let pipeline = MockPipelineBuilder::new()
            .with_policy(MockBehavior::Hang)
            .with_timeout(Duration::from_millis(25))
            .build();
        let claim = ClaimFixtures::auto(AmountFixtures::above_auto_coverage());
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_approved(&decision);
        assert_policy_status(&decision, Some(PolicyStatus::Valid));
        assert_degraded(&decision, &[PipelineStage::Policy]);
    }

    #[tokio::test]
    async fn test_identity_unreachable_is_error() {
        let pipeline = MockPipelineBuilder::new()
            .with_identity(MockBehavior::Unreachable)
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_errored(&decision);
        assert!(!decision.identity_verified);
        assert_eq!(pipeline.calls(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_identity_timeout_is_error() {
        let pipeline = MockPipelineBuilder::new()
            .with_identity(MockBehavior::Hang)
            .with_timeout(Duration::from_millis(25))
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_errored(&decision);
        assert!(decision.message.contains("Timeout"));
    }

    #[tokio::test]
    async fn test_malformed_policy_response_is_error() {
        let pipeline = MockPipelineBuilder::new()
            .with_policy(MockBehavior::Malformed("{\"valid\":".to_string()))
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_errored(&decision);
        assert!(decision.identity_verified);
        assert!(decision.fraud_check_passed);
    }

    #[tokio::test]
    async fn test_negative_amount_is_error() {
        let pipeline = MockPipelineBuilder::new().build();
        let claim = ClaimRequestBuilder::new().with_amount(dec!(-5)).build();
        let decision = pipeline.orchestrator.process_claim(&claim).await;

        assert_errored(&decision);
        assert_eq!(pipeline.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_claimant_is_rejected_not_errored() {
        let directory = InMemoryClaimantDirectory::new()
            .with_profile("USR-456", ClaimantFixtures::repeat_claimant());
        let pipeline = MockPipelineBuilder::new()
            .with_directory(Arc::new(directory))
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_rejected_by(&decision, PipelineStage::Identity);
    }

    #[tokio::test]
    async fn test_stubbed_stage_result_is_honoured() {
        let mut assessment = FraudScorer::new().assess(&domain_claims::FraudAssessmentRequest::for_claim(
            &ClaimFixtures::routine(),
            "",
        ));
        assessment.is_fraudulent = true;
        assessment.explanation = "Synthetic identity ring".to_string();

        let pipeline = MockPipelineBuilder::new()
            .with_fraud(MockBehavior::Respond(assessment))
            .build();
        let decision = pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;

        assert_rejected_by(&decision, PipelineStage::Fraud);
        assert_eq!(decision.message, "Fraud detected: Synthetic identity ring");
    }
}

// ============================================================================
// Pipeline-wide properties
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_processing_is_idempotent() {
        let pipeline = MockPipelineBuilder::new().build();
        let claim = ClaimFixtures::auto(AmountFixtures::above_auto_coverage());

        let first = pipeline.orchestrator.process_claim(&claim).await;
        let second = pipeline.orchestrator.process_claim(&claim).await;
        assert!(first.same_outcome(&second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_are_independent() {
        let pipeline = MockPipelineBuilder::new().build();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let orchestrator = pipeline.orchestrator.clone();
                let amount = if i % 2 == 0 { dec!(1000) } else { dec!(75000) };
                let claim = ClaimRequestBuilder::new()
                    .with_claim_id(format!("CLM-C-{:03}", i))
                    .with_amount(amount)
                    .build();
                tokio::spawn(async move { (i, orchestrator.process_claim(&claim).await) })
            })
            .collect();

        for handle in handles {
            let (i, decision) = handle.await.unwrap();
            assert_eq!(decision.claim_id.as_str(), format!("CLM-C-{:03}", i));
            if i % 2 == 0 {
                assert_approved(&decision);
            } else {
                assert_rejected_by(&decision, PipelineStage::Policy);
            }
        }

        let stats = pipeline.orchestrator.statistics();
        assert_eq!(stats.claims_processed, 32);
        assert_eq!(stats.approved, 16);
        assert_eq!(stats.rejected_policy, 16);
    }

    #[tokio::test]
    async fn test_statistics_track_outcomes() {
        let pipeline = MockPipelineBuilder::new()
            .with_claimant(ClaimantProfile::new("Jane Roe", "PASS98765", "", "POL-002"))
            .build();

        pipeline.orchestrator.process_claim(&ClaimFixtures::routine()).await;
        pipeline.orchestrator.process_claim(&ClaimFixtures::accident(dec!(120000))).await;

        let stats = pipeline.orchestrator.statistics();
        assert_eq!(stats.claims_processed, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.fraud_detected, 1);
        assert_eq!(stats.amount_withheld, dec!(120000));
    }

    proptest! {
        #[test]
        fn short_documents_never_reach_later_stages(
            document in document_id_strategy(),
            claim in claim_request_strategy(),
        ) {
            prop_assume!(document.chars().count() < 8);
            let pipeline = MockPipelineBuilder::new()
                .with_claimant(ClaimantProfile::new("John Doe", document, "", "POL-001"))
                .build();

            let decision = runtime().block_on(pipeline.orchestrator.process_claim(&claim));
            prop_assert!(decision.is_rejected());
            prop_assert_eq!(decision.rejected_by, Some(PipelineStage::Identity));
            prop_assert_eq!(pipeline.total_calls(), 1);
        }

        #[test]
        fn inactive_policy_rejects_any_amount(claim in claim_request_strategy()) {
            let pipeline = MockPipelineBuilder::new()
                .without_fraud()
                .with_claimant(ClaimantFixtures::expired_policy_holder())
                .build();

            let decision = runtime().block_on(pipeline.orchestrator.process_claim(&claim));
            prop_assert_eq!(decision.rejected_by, Some(PipelineStage::Policy));
            prop_assert_eq!(decision.policy_status, Some(PolicyStatus::Inactive));
        }

        #[test]
        fn fraud_unreachable_never_blocks_small_claims(amount in 0i64..5_000_000i64) {
            let pipeline = MockPipelineBuilder::new()
                .with_fraud(MockBehavior::Unreachable)
                .build();
            let claim = ClaimRequestBuilder::new().with_amount(Decimal::new(amount, 2)).build();

            let decision = runtime().block_on(pipeline.orchestrator.process_claim(&claim));
            prop_assert!(decision.is_approved());
            prop_assert!(decision.fraud_check_passed);
        }
    }
}

// ============================================================================
// Fraud rule table
// ============================================================================

mod fraud_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn assessments_are_internally_consistent(request in fraud_request_strategy()) {
            assert_assessment_consistent(&FraudScorer::new().assess(&request));
        }

        #[test]
        fn large_accidents_are_critical(
            request in fraud_request_strategy(),
            cents in 10_000_001i64..100_000_000i64,
        ) {
            let mut request = request;
            request.claim_type = "accident".to_string();
            request.claim_amount = Decimal::new(cents, 2);

            let assessment = FraudScorer::new().assess(&request);
            prop_assert_eq!(assessment.risk_level, RiskLevel::Critical);
            prop_assert_eq!(assessment.recommendation, Recommendation::Reject);
            prop_assert!(assessment.red_flags.len() >= 3);
        }

        #[test]
        fn red_flags_follow_rule_order(request in fraud_request_strategy()) {
            let flags = FraudScorer::new().assess(&request).red_flags;
            let order = [
                "High claim amount (> $50,000)",
                "Very high claim amount (> $100,000)",
                "High-value accident claim requires investigation",
                "User has history of multiple claims",
            ];
            let positions: Vec<usize> = flags
                .iter()
                .map(|f| order.iter().position(|o| o == f).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
