//! Test Data Builders
//!
//! Provides builder patterns for constructing claims and fully wired
//! orchestrators with sensible defaults. Tests specify only what they care
//! about.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use core_kernel::{ClaimId, UserId};
use domain_claims::ports::mock::{MockBehavior, MockFraudPort, MockIdentityPort, MockPolicyPort};
use domain_claims::{
    ClaimOrchestrator, ClaimRequest, ClaimantDirectory, ClaimantProfile, FraudAssessment,
    FraudPort, IdentityPort, IdentityVerificationResult, PlaceholderClaimantDirectory,
    PolicyPort, PolicyValidationResult, StageTimeouts,
};
use rust_decimal::Decimal;

use crate::fixtures::{AmountFixtures, DateFixtures, IdFixtures};

/// Builder for claim requests
pub struct ClaimRequestBuilder {
    claim_id: ClaimId,
    user_id: UserId,
    claim_type: String,
    claim_amount: Decimal,
    description: String,
    incident_date: NaiveDate,
}

impl Default for ClaimRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRequestBuilder {
    /// Creates a new builder for a routine AUTO claim
    pub fn new() -> Self {
        Self {
            claim_id: IdFixtures::claim(),
            user_id: IdFixtures::user(),
            claim_type: "AUTO".to_string(),
            claim_amount: AmountFixtures::routine(),
            description: String::new(),
            incident_date: DateFixtures::incident(),
        }
    }

    pub fn with_claim_id(mut self, id: impl Into<ClaimId>) -> Self {
        self.claim_id = id.into();
        self
    }

    pub fn with_user_id(mut self, id: impl Into<UserId>) -> Self {
        self.user_id = id.into();
        self
    }

    pub fn with_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.claim_type = claim_type.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.claim_amount = amount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_incident_date(mut self, date: NaiveDate) -> Self {
        self.incident_date = date;
        self
    }

    pub fn build(self) -> ClaimRequest {
        ClaimRequest::new(
            self.claim_id,
            self.user_id,
            self.claim_type,
            self.claim_amount,
            self.incident_date,
        )
        .with_description(self.description)
    }
}

/// Builder for an orchestrator over counting mock ports
///
/// Every stage delegates to its in-process engine unless told otherwise.
/// The mocks stay reachable through [`MockPipeline`] so tests can assert how
/// often each stage ran.
pub struct MockPipelineBuilder {
    identity: MockIdentityPort,
    fraud: Option<MockFraudPort>,
    policy: Option<MockPolicyPort>,
    claimants: Arc<dyn ClaimantDirectory>,
    timeouts: StageTimeouts,
}

impl Default for MockPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPipelineBuilder {
    pub fn new() -> Self {
        Self {
            identity: MockIdentityPort::delegating(),
            fraud: Some(MockFraudPort::delegating()),
            policy: Some(MockPolicyPort::delegating()),
            claimants: Arc::new(PlaceholderClaimantDirectory::default()),
            timeouts: StageTimeouts::uniform(Duration::from_millis(200)),
        }
    }

    pub fn with_identity(mut self, behavior: MockBehavior<IdentityVerificationResult>) -> Self {
        self.identity = MockIdentityPort::new(behavior);
        self
    }

    pub fn with_fraud(mut self, behavior: MockBehavior<FraudAssessment>) -> Self {
        self.fraud = Some(MockFraudPort::new(behavior));
        self
    }

    pub fn with_policy(mut self, behavior: MockBehavior<PolicyValidationResult>) -> Self {
        self.policy = Some(MockPolicyPort::new(behavior));
        self
    }

    pub fn without_fraud(mut self) -> Self {
        self.fraud = None;
        self
    }

    pub fn without_policy(mut self) -> Self {
        self.policy = None;
        self
    }

    /// Uses one fixed claimant profile for every user
    pub fn with_claimant(mut self, profile: ClaimantProfile) -> Self {
        self.claimants = Arc::new(PlaceholderClaimantDirectory::new(profile));
        self
    }

    pub fn with_directory(mut self, directory: Arc<dyn ClaimantDirectory>) -> Self {
        self.claimants = directory;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts = StageTimeouts::uniform(timeout);
        self
    }

    pub fn build(self) -> MockPipeline {
        let identity = Arc::new(self.identity);
        let fraud = self.fraud.map(Arc::new);
        let policy = self.policy.map(Arc::new);

        let mut orchestrator =
            ClaimOrchestrator::new(identity.clone() as Arc<dyn IdentityPort>, self.claimants)
                .with_timeouts(self.timeouts);
        if let Some(fraud) = &fraud {
            orchestrator = orchestrator.with_fraud(fraud.clone() as Arc<dyn FraudPort>);
        }
        if let Some(policy) = &policy {
            orchestrator = orchestrator.with_policy(policy.clone() as Arc<dyn PolicyPort>);
        }

        MockPipeline {
            orchestrator,
            identity,
            fraud,
            policy,
        }
    }
}

/// An orchestrator plus handles on its mock ports
pub struct MockPipeline {
    pub orchestrator: ClaimOrchestrator,
    pub identity: Arc<MockIdentityPort>,
    pub fraud: Option<Arc<MockFraudPort>>,
    pub policy: Option<Arc<MockPolicyPort>>,
}

impl MockPipeline {
    /// Invocation counts as (identity, fraud, policy)
    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.identity.calls(),
            self.fraud.as_ref().map(|p| p.calls()).unwrap_or(0),
            self.policy.as_ref().map(|p| p.calls()).unwrap_or(0),
        )
    }

    /// Total number of stage invocations
    pub fn total_calls(&self) -> usize {
        let (identity, fraud, policy) = self.calls();
        identity + fraud + policy
    }
}
