//! Stage Ports
//!
//! One port per verification stage. The orchestrator only ever talks to these
//! traits, so a stage can be served by the in-process engine, a remote
//! service, or a test double without the pipeline noticing.
//!
//! # Error contract
//!
//! A port returns `Ok` whenever the stage produced an answer, including a
//! negative one. `Err` is reserved for "no answer": an unreachable service
//! ([`PortError::is_unreachable`]) or a response that could not be understood.

use async_trait::async_trait;
use rust_decimal::Decimal;

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, PolicyId, PortError, UserId};

use crate::fraud::{FraudAssessment, FraudAssessmentRequest};
use crate::identity::IdentityVerificationResult;
use crate::policy::PolicyValidationResult;

/// Port for identity verification
#[async_trait]
pub trait IdentityPort: DomainPort + HealthCheckable {
    /// Verifies that the claimant is who they claim to be
    async fn verify(
        &self,
        user_id: &UserId,
        name: &str,
        document_id: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<IdentityVerificationResult, PortError>;
}

/// Port for fraud risk assessment
#[async_trait]
pub trait FraudPort: DomainPort + HealthCheckable {
    /// Scores a claim for fraud risk
    async fn assess(
        &self,
        request: &FraudAssessmentRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<FraudAssessment, PortError>;
}

/// Port for policy validation
#[async_trait]
pub trait PolicyPort: DomainPort + HealthCheckable {
    /// Checks that a policy exists, is active and covers the amount
    async fn validate(
        &self,
        policy_id: &PolicyId,
        claim_amount: Decimal,
        metadata: Option<OperationMetadata>,
    ) -> Result<PolicyValidationResult, PortError>;
}

/// Test doubles for the stage ports
///
/// Each mock counts its invocations and answers according to a
/// [`MockBehavior`](mock::MockBehavior).
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    use crate::fraud::FraudScorer;
    use crate::identity::IdentityVerifier;
    use crate::policy::{InMemoryPolicyCatalog, PolicyValidator};

    /// How a mock port answers
    #[derive(Debug, Clone)]
    pub enum MockBehavior<T> {
        /// Run the in-process engine
        Delegate,
        /// Always return this result
        Respond(T),
        /// Fail as if the service refused the connection
        Unreachable,
        /// Fail with an undecodable response
        Malformed(String),
        /// Never answer
        Hang,
    }

    impl<T: Clone> MockBehavior<T> {
        async fn resolve(
            &self,
            stage: &str,
            delegate: impl std::future::Future<Output = Result<T, PortError>>,
        ) -> Result<T, PortError> {
            match self {
                MockBehavior::Delegate => delegate.await,
                MockBehavior::Respond(value) => Ok(value.clone()),
                MockBehavior::Unreachable => Err(PortError::connection(format!(
                    "{} service refused connection",
                    stage
                ))),
                MockBehavior::Malformed(body) => Err(PortError::transformation(format!(
                    "unexpected {} response: {}",
                    stage, body
                ))),
                MockBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(PortError::timeout(stage.to_string(), 3_600_000))
                }
            }
        }

        fn health(&self, adapter_id: &str) -> HealthCheckResult {
            let (status, message) = match self {
                MockBehavior::Unreachable | MockBehavior::Hang => {
                    (AdapterHealth::Unhealthy, "Mock adapter unreachable")
                }
                _ => (AdapterHealth::Healthy, "Mock adapter always healthy"),
            };
            HealthCheckResult {
                adapter_id: adapter_id.to_string(),
                status,
                latency_ms: 0,
                message: Some(message.to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    /// Mock identity port
    #[derive(Debug)]
    pub struct MockIdentityPort {
        behavior: MockBehavior<IdentityVerificationResult>,
        calls: Arc<AtomicUsize>,
    }

    impl MockIdentityPort {
        pub fn new(behavior: MockBehavior<IdentityVerificationResult>) -> Self {
            Self {
                behavior,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Delegates to the in-process verifier
        pub fn delegating() -> Self {
            Self::new(MockBehavior::Delegate)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockIdentityPort {}

    #[async_trait]
    impl HealthCheckable for MockIdentityPort {
        async fn health_check(&self) -> HealthCheckResult {
            self.behavior.health("mock-identity-port")
        }
    }

    #[async_trait]
    impl IdentityPort for MockIdentityPort {
        async fn verify(
            &self,
            user_id: &UserId,
            name: &str,
            document_id: &str,
            _metadata: Option<OperationMetadata>,
        ) -> Result<IdentityVerificationResult, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let local = IdentityVerifier::new();
            self.behavior
                .resolve("identity", async { Ok(local.verify(user_id, name, document_id)) })
                .await
        }
    }

    /// Mock fraud port
    #[derive(Debug)]
    pub struct MockFraudPort {
        behavior: MockBehavior<FraudAssessment>,
        calls: Arc<AtomicUsize>,
    }

    impl MockFraudPort {
        pub fn new(behavior: MockBehavior<FraudAssessment>) -> Self {
            Self {
                behavior,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Delegates to the in-process scorer
        pub fn delegating() -> Self {
            Self::new(MockBehavior::Delegate)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockFraudPort {}

    #[async_trait]
    impl HealthCheckable for MockFraudPort {
        async fn health_check(&self) -> HealthCheckResult {
            self.behavior.health("mock-fraud-port")
        }
    }

    #[async_trait]
    impl FraudPort for MockFraudPort {
        async fn assess(
            &self,
            request: &FraudAssessmentRequest,
            _metadata: Option<OperationMetadata>,
        ) -> Result<FraudAssessment, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.behavior
                .resolve("fraud", async { Ok(FraudScorer::new().assess(request)) })
                .await
        }
    }

    /// Mock policy port
    pub struct MockPolicyPort {
        behavior: MockBehavior<PolicyValidationResult>,
        validator: PolicyValidator,
        calls: Arc<AtomicUsize>,
    }

    impl MockPolicyPort {
        pub fn new(behavior: MockBehavior<PolicyValidationResult>) -> Self {
            Self {
                behavior,
                validator: PolicyValidator::new(Arc::new(InMemoryPolicyCatalog::seeded())),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Delegates to a validator over the seeded catalog
        pub fn delegating() -> Self {
            Self::new(MockBehavior::Delegate)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockPolicyPort {}

    #[async_trait]
    impl HealthCheckable for MockPolicyPort {
        async fn health_check(&self) -> HealthCheckResult {
            self.behavior.health("mock-policy-port")
        }
    }

    #[async_trait]
    impl PolicyPort for MockPolicyPort {
        async fn validate(
            &self,
            policy_id: &PolicyId,
            claim_amount: Decimal,
            _metadata: Option<OperationMetadata>,
        ) -> Result<PolicyValidationResult, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.behavior
                .resolve("policy", self.validator.evaluate(policy_id, claim_amount))
                .await
        }
    }
}
