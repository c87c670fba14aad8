//! Stage Registry
//!
//! Resolves each stage's [`AdapterSource`] to a concrete port and assembles
//! the orchestrator from them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::{AdapterSource, ExternalConfig};
//! use domain_claims::registry::{StageConfig, StageRegistry};
//!
//! let config = StageConfig::all_local()
//!     .with_fraud(AdapterSource::External(ExternalConfig::new("http://fraud:8080")));
//!
//! let registry = StageRegistry::build(&config, catalog)?;
//! let orchestrator = registry.orchestrator(claimants);
//! ```

use std::sync::Arc;

use core_kernel::{AdapterSource, PolicyId};
use tracing::info;

use crate::adapters::{HttpFraudAdapter, HttpIdentityAdapter, HttpPolicyAdapter};
use crate::claimant::ClaimantDirectory;
use crate::decision::PipelineStage;
use crate::error::ClaimError;
use crate::fraud::FraudScorer;
use crate::identity::IdentityVerifier;
use crate::orchestrator::{ClaimOrchestrator, StageTimeouts};
use crate::policy::{PolicyCatalog, PolicyValidator};
use crate::ports::{FraudPort, IdentityPort, PolicyPort};

/// Where each stage is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub identity: AdapterSource,
    pub fraud: AdapterSource,
    pub policy: AdapterSource,
    pub timeouts: StageTimeouts,
    /// Policy reference for claimants without a directory record
    pub default_policy: PolicyId,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::all_local()
    }
}

impl StageConfig {
    /// Every stage served by its in-process engine
    pub fn all_local() -> Self {
        Self {
            identity: AdapterSource::Local,
            fraud: AdapterSource::Local,
            policy: AdapterSource::Local,
            timeouts: StageTimeouts::default(),
            default_policy: PolicyId::new("POL-001"),
        }
    }

    pub fn with_identity(mut self, source: AdapterSource) -> Self {
        self.identity = source;
        self
    }

    pub fn with_fraud(mut self, source: AdapterSource) -> Self {
        self.fraud = source;
        self
    }

    pub fn with_policy(mut self, source: AdapterSource) -> Self {
        self.policy = source;
        self
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn source(&self, stage: PipelineStage) -> &AdapterSource {
        match stage {
            PipelineStage::Identity => &self.identity,
            PipelineStage::Fraud => &self.fraud,
            PipelineStage::Policy => &self.policy,
        }
    }
}

/// Resolved stage ports
#[derive(Clone)]
pub struct StageRegistry {
    identity: Arc<dyn IdentityPort>,
    fraud: Option<Arc<dyn FraudPort>>,
    policy: Option<Arc<dyn PolicyPort>>,
    timeouts: StageTimeouts,
    default_policy: PolicyId,
}

impl StageRegistry {
    /// Resolves every stage source. The identity stage cannot be disabled.
    pub fn build(config: &StageConfig, catalog: Arc<dyn PolicyCatalog>) -> Result<Self, ClaimError> {
        let identity: Arc<dyn IdentityPort> = match &config.identity {
            AdapterSource::Local => Arc::new(IdentityVerifier::new()),
            AdapterSource::External(external) => Arc::new(
                HttpIdentityAdapter::new(external.clone())
                    .map_err(|e| ClaimError::Configuration(e.to_string()))?
                    .with_timeout(config.timeouts.identity),
            ),
            AdapterSource::Disabled => return Err(ClaimError::IdentityStageRequired),
        };

        let fraud: Option<Arc<dyn FraudPort>> = match &config.fraud {
            AdapterSource::Local => Some(Arc::new(FraudScorer::new())),
            AdapterSource::External(external) => Some(Arc::new(
                HttpFraudAdapter::new(external.clone())
                    .map_err(|e| ClaimError::Configuration(e.to_string()))?
                    .with_timeout(config.timeouts.fraud),
            )),
            AdapterSource::Disabled => None,
        };

        let policy: Option<Arc<dyn PolicyPort>> = match &config.policy {
            AdapterSource::Local => Some(Arc::new(PolicyValidator::new(catalog))),
            AdapterSource::External(external) => Some(Arc::new(
                HttpPolicyAdapter::new(external.clone())
                    .map_err(|e| ClaimError::Configuration(e.to_string()))?
                    .with_timeout(config.timeouts.policy),
            )),
            AdapterSource::Disabled => None,
        };

        for stage in PipelineStage::ALL {
            info!(%stage, source = describe(config.source(stage)), "Stage adapter resolved");
        }

        Ok(Self {
            identity,
            fraud,
            policy,
            timeouts: config.timeouts,
            default_policy: config.default_policy.clone(),
        })
    }

    pub fn identity_port(&self) -> Arc<dyn IdentityPort> {
        self.identity.clone()
    }

    pub fn fraud_port(&self) -> Option<Arc<dyn FraudPort>> {
        self.fraud.clone()
    }

    pub fn policy_port(&self) -> Option<Arc<dyn PolicyPort>> {
        self.policy.clone()
    }

    /// Assembles an orchestrator over the resolved ports
    pub fn orchestrator(&self, claimants: Arc<dyn ClaimantDirectory>) -> ClaimOrchestrator {
        let mut orchestrator = ClaimOrchestrator::new(self.identity.clone(), claimants)
            .with_timeouts(self.timeouts)
            .with_default_policy(self.default_policy.clone());
        if let Some(fraud) = &self.fraud {
            orchestrator = orchestrator.with_fraud(fraud.clone());
        }
        if let Some(policy) = &self.policy {
            orchestrator = orchestrator.with_policy(policy.clone());
        }
        orchestrator
    }
}

fn describe(source: &AdapterSource) -> &str {
    match source {
        AdapterSource::Local => "local",
        AdapterSource::External(external) => external.base_url.as_str(),
        AdapterSource::Disabled => "disabled",
    }
}
