//! Policy validation
//!
//! Validation is a pure function of the catalog entry and the claimed amount.
//! The catalog itself sits behind [`PolicyCatalog`] so a real policy store can
//! replace the seeded in-memory one without touching the validator.
//!
//! Evaluation order, first match wins:
//!
//! 1. unknown policy id: `INVALID`
//! 2. inactive policy: `INACTIVE`
//! 3. amount above coverage: `EXCEEDS_COVERAGE`
//! 4. otherwise: `VALID`

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use core_kernel::{
    DomainPort, HealthCheckable, HealthCheckResult, OperationMetadata, PolicyId, PortError, UserId,
};
use crate::ports::PolicyPort;

/// A policy held in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: PolicyId,
    pub user_id: UserId,
    /// Line of business (AUTO, HOME, HEALTH, ...)
    pub policy_type: String,
    /// Administrative status label (ACTIVE, EXPIRED, ...)
    pub status: String,
    pub coverage_amount: Decimal,
    pub premium: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
}

/// Outcome category of a policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Valid,
    Invalid,
    Inactive,
    ExceedsCoverage,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Valid => "VALID",
            PolicyStatus::Invalid => "INVALID",
            PolicyStatus::Inactive => "INACTIVE",
            PolicyStatus::ExceedsCoverage => "EXCEEDS_COVERAGE",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a claim amount against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyValidationResult {
    pub policy_id: PolicyId,
    pub is_valid: bool,
    pub status: PolicyStatus,
    pub message: String,
    #[serde(default)]
    pub validation_errors: Vec<String>,
    /// Unset only when the policy does not exist
    pub coverage_limit: Option<Decimal>,
}

/// Wire body for a remote policy check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePolicyRequest {
    pub policy_id: PolicyId,
    pub claim_amount: Decimal,
}

/// Read access to the policy store
#[async_trait]
pub trait PolicyCatalog: Send + Sync {
    /// Looks up a policy by id
    async fn get_policy(&self, policy_id: &PolicyId) -> Result<Option<Policy>, PortError>;

    /// Lists the policies held by a user
    async fn policies_for_user(&self, user_id: &UserId) -> Result<Vec<Policy>, PortError>;

    /// Lists every policy, ordered by id
    async fn all_policies(&self) -> Result<Vec<Policy>, PortError>;
}

/// Read-only catalog held in memory
///
/// Populated once at construction, so concurrent readers need no locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyCatalog {
    policies: BTreeMap<PolicyId, Policy>,
}

impl InMemoryPolicyCatalog {
    pub fn new(policies: impl IntoIterator<Item = Policy>) -> Self {
        Self {
            policies: policies
                .into_iter()
                .map(|p| (p.policy_id.clone(), p))
                .collect(),
        }
    }

    /// The three demonstration policies: POL-001, POL-002 and POL-003
    pub fn seeded() -> Self {
        Self::new(seed_policies())
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[async_trait]
impl PolicyCatalog for InMemoryPolicyCatalog {
    async fn get_policy(&self, policy_id: &PolicyId) -> Result<Option<Policy>, PortError> {
        Ok(self.policies.get(policy_id).cloned())
    }

    async fn policies_for_user(&self, user_id: &UserId) -> Result<Vec<Policy>, PortError> {
        Ok(self
            .policies
            .values()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn all_policies(&self) -> Result<Vec<Policy>, PortError> {
        Ok(self.policies.values().cloned().collect())
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed_policies() -> Vec<Policy> {
    vec![
        Policy {
            policy_id: PolicyId::new("POL-001"),
            user_id: UserId::new("USR-123"),
            policy_type: "AUTO".to_string(),
            status: "ACTIVE".to_string(),
            coverage_amount: dec!(50000),
            premium: dec!(1200),
            start_date: ymd(2024, 1, 1),
            end_date: ymd(2025, 1, 1),
            is_active: true,
        },
        Policy {
            policy_id: PolicyId::new("POL-002"),
            user_id: UserId::new("USR-456"),
            policy_type: "HOME".to_string(),
            status: "ACTIVE".to_string(),
            coverage_amount: dec!(200000),
            premium: dec!(2400),
            start_date: ymd(2024, 1, 1),
            end_date: ymd(2025, 1, 1),
            is_active: true,
        },
        Policy {
            policy_id: PolicyId::new("POL-003"),
            user_id: UserId::new("USR-123"),
            policy_type: "HEALTH".to_string(),
            status: "EXPIRED".to_string(),
            coverage_amount: dec!(100000),
            premium: dec!(3600),
            start_date: ymd(2023, 1, 1),
            end_date: ymd(2024, 1, 1),
            is_active: false,
        },
    ]
}

/// Validates claim amounts against a catalog
#[derive(Clone)]
pub struct PolicyValidator {
    catalog: Arc<dyn PolicyCatalog>,
}

impl PolicyValidator {
    pub fn new(catalog: Arc<dyn PolicyCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the backing catalog
    pub fn catalog(&self) -> &Arc<dyn PolicyCatalog> {
        &self.catalog
    }

    /// Applies the evaluation order to a single policy lookup.
    ///
    /// Only a failing catalog produces `Err`; every business outcome is `Ok`.
    pub async fn evaluate(
        &self,
        policy_id: &PolicyId,
        claim_amount: Decimal,
    ) -> Result<PolicyValidationResult, PortError> {
        let policy = self.catalog.get_policy(policy_id).await?;
        let result = check(policy_id, policy.as_ref(), claim_amount);
        debug!(policy_id = %policy_id, status = %result.status, "Policy evaluated");
        Ok(result)
    }
}

/// Pure evaluation of one catalog entry
pub fn check(policy_id: &PolicyId, policy: Option<&Policy>, claim_amount: Decimal) -> PolicyValidationResult {
    let Some(policy) = policy else {
        return PolicyValidationResult {
            policy_id: policy_id.clone(),
            is_valid: false,
            status: PolicyStatus::Invalid,
            message: "Policy not found".to_string(),
            validation_errors: vec!["Policy ID does not exist".to_string()],
            coverage_limit: None,
        };
    };

    let limit = policy.coverage_amount;
    let (status, message, validation_errors) = if !policy.is_active {
        (
            PolicyStatus::Inactive,
            "Policy is not active",
            vec!["Policy is expired or inactive".to_string()],
        )
    } else if claim_amount > limit {
        (
            PolicyStatus::ExceedsCoverage,
            "Claim amount exceeds policy coverage",
            vec![format!(
                "Claim amount (${}) exceeds coverage limit (${})",
                claim_amount, limit
            )],
        )
    } else {
        (PolicyStatus::Valid, "Policy is valid for claim", Vec::new())
    };

    PolicyValidationResult {
        policy_id: policy_id.clone(),
        is_valid: status == PolicyStatus::Valid,
        status,
        message: message.to_string(),
        validation_errors,
        coverage_limit: Some(limit),
    }
}

impl DomainPort for PolicyValidator {}

#[async_trait]
impl HealthCheckable for PolicyValidator {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("local-policy-validator", "In-process policy validator")
    }
}

#[async_trait]
impl PolicyPort for PolicyValidator {
    async fn validate(
        &self,
        policy_id: &PolicyId,
        claim_amount: Decimal,
        _metadata: Option<OperationMetadata>,
    ) -> Result<PolicyValidationResult, PortError> {
        self.evaluate(policy_id, claim_amount).await
    }
}
