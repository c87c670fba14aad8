//! Claim Orchestrator
//!
//! Runs a claim through identity, fraud and policy, in that order, and
//! reduces the stage results to a single [`ClaimDecision`].
//!
//! # State machine
//!
//! ```text
//! START -> IDENTITY -> FRAUD -> POLICY -> DONE(APPROVED)
//!             |          |        |
//!             +----------+--------+----> DONE(REJECTED) | DONE(ERROR)
//! ```
//!
//! # Failure policy
//!
//! | Stage    | Negative result | Unreachable / timed out | Other fault |
//! |----------|-----------------|-------------------------|-------------|
//! | identity | REJECTED        | ERROR                   | ERROR       |
//! | fraud    | REJECTED        | skip, passed = true     | ERROR       |
//! | policy   | REJECTED        | skip, status = VALID    | ERROR       |
//!
//! Identity is the only stage the pipeline refuses to run without. Fraud and
//! policy are advisory: when their service is down the claim proceeds and the
//! skipped stage is recorded in [`ClaimDecision::degraded_stages`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, info_span, warn, Instrument};

use core_kernel::{
    AdapterHealth, HealthCheckResult, OperationMetadata, PolicyId, PortError,
    RegistryHealthReport,
};

use crate::claim::ClaimRequest;
use crate::claimant::{ClaimantDirectory, ClaimantProfile};
use crate::decision::{ClaimDecision, DecisionDraft, PipelineStage};
use crate::error::ClaimError;
use crate::fraud::FraudAssessmentRequest;
use crate::policy::PolicyStatus;
use crate::ports::{FraudPort, IdentityPort, PolicyPort};
use crate::statistics::{PipelineStatistics, StatisticsSnapshot};

const INITIATOR: &str = "claim-orchestrator";

/// Upper bound on each stage call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub identity: Duration,
    pub fraud: Duration,
    pub policy: Duration,
}

impl StageTimeouts {
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            identity: timeout,
            fraud: timeout,
            policy: timeout,
        }
    }

    pub fn for_stage(&self, stage: PipelineStage) -> Duration {
        match stage {
            PipelineStage::Identity => self.identity,
            PipelineStage::Fraud => self.fraud,
            PipelineStage::Policy => self.policy,
        }
    }
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            identity: Duration::from_millis(5_000),
            fraud: Duration::from_millis(3_000),
            policy: Duration::from_millis(3_000),
        }
    }
}

/// How the pipeline left the stage sequence
#[derive(Debug)]
enum StageOutcome {
    Approved,
    Rejected(PipelineStage, String),
}

/// Sequences the verification stages for each claim
///
/// Cloning is cheap; clones share ports and statistics. Claims processed
/// concurrently share nothing mutable besides the statistics counters.
#[derive(Clone)]
pub struct ClaimOrchestrator {
    identity: Arc<dyn IdentityPort>,
    fraud: Option<Arc<dyn FraudPort>>,
    policy: Option<Arc<dyn PolicyPort>>,
    claimants: Arc<dyn ClaimantDirectory>,
    default_policy: PolicyId,
    timeouts: StageTimeouts,
    statistics: Arc<PipelineStatistics>,
}

impl ClaimOrchestrator {
    /// Creates an orchestrator with only the mandatory identity stage wired
    pub fn new(identity: Arc<dyn IdentityPort>, claimants: Arc<dyn ClaimantDirectory>) -> Self {
        Self {
            identity,
            fraud: None,
            policy: None,
            claimants,
            default_policy: PolicyId::new("POL-001"),
            timeouts: StageTimeouts::default(),
            statistics: Arc::new(PipelineStatistics::new()),
        }
    }

    pub fn with_fraud(mut self, fraud: Arc<dyn FraudPort>) -> Self {
        self.fraud = Some(fraud);
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn PolicyPort>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Policy reference used for claimants without a directory record
    pub fn with_default_policy(mut self, policy_id: impl Into<PolicyId>) -> Self {
        self.default_policy = policy_id.into();
        self
    }

    pub fn timeouts(&self) -> StageTimeouts {
        self.timeouts
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    /// Processes one claim. Always produces exactly one decision.
    pub async fn process_claim(&self, claim: &ClaimRequest) -> ClaimDecision {
        let span = info_span!(
            "claim_pipeline",
            claim_id = %claim.claim_id,
            user_id = %claim.user_id,
        );

        async move {
            info!(claim_type = %claim.claim_type, amount = %claim.claim_amount, "Processing claim");

            let mut draft = DecisionDraft::new(claim.claim_id.clone());
            let decision = match self.run(claim, &mut draft).await {
                Ok(StageOutcome::Approved) => {
                    info!(degraded = ?draft.degraded_stages, "Claim approved");
                    draft.approve()
                }
                Ok(StageOutcome::Rejected(stage, message)) => {
                    warn!(%stage, %message, "Claim rejected");
                    draft.reject(stage, message)
                }
                Err(err) => {
                    error!(stage = ?err.failed_stage(), error = %err, "Claim processing failed");
                    draft.error(format!("Error processing claim: {}", err))
                }
            };

            self.statistics.record(&decision, claim.claim_amount);
            decision
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        claim: &ClaimRequest,
        draft: &mut DecisionDraft,
    ) -> Result<StageOutcome, ClaimError> {
        claim.validate()?;
        let claimant = self.claimant(claim).await?;

        // Identity: any failure to get an answer is fatal
        let identity = self
            .call_stage(
                PipelineStage::Identity,
                self.identity.verify(
                    &claim.user_id,
                    &claimant.name,
                    &claimant.document_id,
                    Some(metadata(claim, PipelineStage::Identity)),
                ),
            )
            .await
            .map_err(|e| ClaimError::stage(PipelineStage::Identity, e))?;

        if !identity.verified {
            return Ok(StageOutcome::Rejected(
                PipelineStage::Identity,
                format!("Identity verification failed: {}", identity.message),
            ));
        }
        draft.identity_verified = true;
        info!(confidence = %identity.confidence_score, "Identity verified");

        // Fraud: advisory
        let fraud = match &self.fraud {
            Some(port) => {
                let request = FraudAssessmentRequest::for_claim(claim, claimant.history.clone());
                let result = self
                    .call_stage(
                        PipelineStage::Fraud,
                        port.assess(&request, Some(metadata(claim, PipelineStage::Fraud))),
                    )
                    .await;
                self.advisory(PipelineStage::Fraud, result, draft)?
            }
            None => self.skip(PipelineStage::Fraud, "not configured", draft),
        };

        match fraud {
            Some(assessment) if assessment.is_fraudulent => {
                draft.fraud_check_passed = false;
                return Ok(StageOutcome::Rejected(
                    PipelineStage::Fraud,
                    format!("Fraud detected: {}", assessment.explanation),
                ));
            }
            Some(assessment) => {
                info!(risk_level = %assessment.risk_level, risk_score = %assessment.risk_score, "Fraud check passed");
                draft.fraud_check_passed = true;
            }
            None => draft.fraud_check_passed = true,
        }

        // Policy: advisory
        let policy = match &self.policy {
            Some(port) => {
                let result = self
                    .call_stage(
                        PipelineStage::Policy,
                        port.validate(
                            &claimant.policy_id,
                            claim.claim_amount,
                            Some(metadata(claim, PipelineStage::Policy)),
                        ),
                    )
                    .await;
                self.advisory(PipelineStage::Policy, result, draft)?
            }
            None => self.skip(PipelineStage::Policy, "not configured", draft),
        };

        match policy {
            Some(validation) => {
                draft.policy_status = Some(validation.status);
                if !validation.is_valid {
                    return Ok(StageOutcome::Rejected(
                        PipelineStage::Policy,
                        format!("Policy validation failed: {}", validation.message),
                    ));
                }
                info!(policy_id = %validation.policy_id, "Policy valid");
            }
            None => draft.policy_status = Some(PolicyStatus::Valid),
        }

        Ok(StageOutcome::Approved)
    }

    async fn claimant(&self, claim: &ClaimRequest) -> Result<ClaimantProfile, ClaimError> {
        match self.claimants.profile(&claim.user_id).await {
            Ok(profile) => Ok(profile),
            Err(e) if e.is_not_found() => {
                warn!("No claimant record; identity inputs will be empty");
                Ok(ClaimantProfile::anonymous(self.default_policy.clone()))
            }
            Err(e) => Err(ClaimError::ClaimantLookup(e)),
        }
    }

    /// Bounds a stage call by its configured timeout
    async fn call_stage<T, F>(&self, stage: PipelineStage, call: F) -> Result<T, PortError>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        let limit = self.timeouts.for_stage(stage);
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(PortError::timeout(stage.operation(), limit.as_millis() as u64)),
        }
    }

    /// Absorbs unreachable-service errors for an advisory stage
    fn advisory<T>(
        &self,
        stage: PipelineStage,
        result: Result<T, PortError>,
        draft: &mut DecisionDraft,
    ) -> Result<Option<T>, ClaimError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_unreachable() => {
                let reason = e.to_string();
                Ok(self.skip(stage, &reason, draft))
            }
            Err(e) => Err(ClaimError::stage(stage, e)),
        }
    }

    fn skip<T>(&self, stage: PipelineStage, reason: &str, draft: &mut DecisionDraft) -> Option<T> {
        warn!(%stage, reason, "Stage unavailable, continuing in degraded mode");
        draft.degrade(stage);
        None
    }

    /// Checks every wired stage
    ///
    /// A stage that is not wired reports `Unknown`, which degrades the pipeline.
    pub async fn health_report(&self) -> RegistryHealthReport {
        let identity = self.identity.health_check().await;
        let fraud = match &self.fraud {
            Some(port) => port.health_check().await,
            None => not_wired(PipelineStage::Fraud),
        };
        let policy = match &self.policy {
            Some(port) => port.health_check().await,
            None => not_wired(PipelineStage::Policy),
        };

        RegistryHealthReport::aggregate(
            [
                (PipelineStage::Identity, identity),
                (PipelineStage::Fraud, fraud),
                (PipelineStage::Policy, policy),
            ]
            .into_iter()
            .map(|(stage, result)| (stage.name().to_string(), stage.is_mandatory(), result))
            .collect(),
        )
    }

    /// Returns true if the given stage has a port wired
    pub fn is_wired(&self, stage: PipelineStage) -> bool {
        match stage {
            PipelineStage::Identity => true,
            PipelineStage::Fraud => self.fraud.is_some(),
            PipelineStage::Policy => self.policy.is_some(),
        }
    }
}

fn metadata(claim: &ClaimRequest, stage: PipelineStage) -> OperationMetadata {
    OperationMetadata::with_correlation_id(claim.claim_id.as_str())
        .initiated_by(INITIATOR)
        .with_context("stage", stage.name())
}

fn not_wired(stage: PipelineStage) -> HealthCheckResult {
    HealthCheckResult {
        adapter_id: format!("{}-disabled", stage.name()),
        status: AdapterHealth::Unknown,
        latency_ms: 0,
        message: Some(format!("{} stage is not configured", stage)),
        checked_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claimant::{InMemoryClaimantDirectory, PlaceholderClaimantDirectory};
    use crate::fraud::FraudScorer;
    use crate::identity::IdentityVerifier;
    use crate::policy::{InMemoryPolicyCatalog, PolicyValidator};
    use crate::ports::mock::{MockBehavior, MockFraudPort, MockIdentityPort, MockPolicyPort};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn claim(amount: Decimal) -> ClaimRequest {
        ClaimRequest::new(
            "CLM-T-001",
            "USR-123",
            "AUTO",
            amount,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    fn local() -> ClaimOrchestrator {
        ClaimOrchestrator::new(
            Arc::new(IdentityVerifier::new()),
            Arc::new(PlaceholderClaimantDirectory::default()),
        )
        .with_fraud(Arc::new(FraudScorer::new()))
        .with_policy(Arc::new(PolicyValidator::new(Arc::new(InMemoryPolicyCatalog::seeded()))))
    }

    #[tokio::test]
    async fn test_happy_path_is_approved() {
        let decision = local().process_claim(&claim(dec!(30000))).await;
        assert!(decision.is_approved());
        assert_eq!(decision.message, "Claim approved successfully");
        assert!(decision.identity_verified);
        assert!(decision.fraud_check_passed);
        assert_eq!(decision.policy_status, Some(PolicyStatus::Valid));
        assert!(!decision.is_degraded());
    }

    #[tokio::test]
    async fn test_policy_rejection_message() {
        let decision = local().process_claim(&claim(dec!(75000))).await;
        assert!(decision.is_rejected());
        assert_eq!(decision.rejected_by, Some(PipelineStage::Policy));
        assert_eq!(decision.message, "Policy validation failed: Claim amount exceeds policy coverage");
    }

    #[tokio::test]
    async fn test_unknown_claimant_fails_closed() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(IdentityVerifier::new()),
            Arc::new(InMemoryClaimantDirectory::new()),
        );
        let decision = orchestrator.process_claim(&claim(dec!(100))).await;
        assert!(decision.is_rejected());
        assert_eq!(
            decision.message,
            "Identity verification failed: Missing required verification information"
        );
    }

    #[tokio::test]
    async fn test_missing_advisory_stages_degrade() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(IdentityVerifier::new()),
            Arc::new(PlaceholderClaimantDirectory::default()),
        );
        let decision = orchestrator.process_claim(&claim(dec!(999999))).await;
        assert!(decision.is_approved());
        assert_eq!(decision.degraded_stages, vec![PipelineStage::Fraud, PipelineStage::Policy]);
        assert_eq!(decision.policy_status, Some(PolicyStatus::Valid));
    }

    #[tokio::test]
    async fn test_identity_timeout_is_error() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(MockIdentityPort::new(MockBehavior::Hang)),
            Arc::new(PlaceholderClaimantDirectory::default()),
        )
        .with_timeouts(StageTimeouts::uniform(Duration::from_millis(20)));

        let decision = orchestrator.process_claim(&claim(dec!(100))).await;
        assert!(decision.is_error());
        assert!(decision.message.starts_with("Error processing claim:"));
        assert!(decision.message.contains("identity.verify"));
    }

    #[tokio::test]
    async fn test_malformed_fraud_response_is_error() {
        let orchestrator = local().with_fraud(Arc::new(MockFraudPort::new(
            MockBehavior::Malformed("{".to_string()),
        )));
        let decision = orchestrator.process_claim(&claim(dec!(100))).await;
        assert!(decision.is_error());
        assert!(decision.identity_verified);
        assert!(!decision.fraud_check_passed);
    }

    #[tokio::test]
    async fn test_policy_unreachable_fails_open() {
        let policy = Arc::new(MockPolicyPort::new(MockBehavior::Unreachable));
        let orchestrator = local().with_policy(policy.clone());
        let decision = orchestrator.process_claim(&claim(dec!(100))).await;

        assert!(decision.is_approved());
        assert_eq!(decision.policy_status, Some(PolicyStatus::Valid));
        assert_eq!(decision.degraded_stages, vec![PipelineStage::Policy]);
        assert_eq!(policy.calls(), 1);
    }

    #[tokio::test]
    async fn test_claimant_lookup_failure_is_error() {
        struct Broken;

        #[async_trait::async_trait]
        impl ClaimantDirectory for Broken {
            async fn profile(&self, _user_id: &core_kernel::UserId) -> Result<ClaimantProfile, PortError> {
                Err(PortError::internal("directory offline"))
            }
        }

        let orchestrator = ClaimOrchestrator::new(Arc::new(IdentityVerifier::new()), Arc::new(Broken));
        let decision = orchestrator.process_claim(&claim(dec!(100))).await;
        assert!(decision.is_error());
        assert!(!decision.identity_verified);
    }

    #[tokio::test]
    async fn test_health_report_flags_unwired_stages() {
        let orchestrator = ClaimOrchestrator::new(
            Arc::new(IdentityVerifier::new()),
            Arc::new(PlaceholderClaimantDirectory::default()),
        );
        let report = orchestrator.health_report().await;
        assert_eq!(report.overall_status, AdapterHealth::Degraded);
        assert_eq!(report.total_count, 3);
        assert!(report.is_operational());

        assert!(local().health_report().await.is_fully_healthy());
    }
}
