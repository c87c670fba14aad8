//! Fraud risk scoring
//!
//! A claim's risk score is the sum of the weights of the heuristic rules it
//! triggers, clamped to `[0, 1]`. Rules are evaluated in table order and each
//! triggered rule contributes one red flag, so the red-flag list preserves
//! evaluation order.
//!
//! | Score band      | Level    | Recommendation | Fraudulent |
//! |-----------------|----------|----------------|------------|
//! | `< 0.30`        | LOW      | APPROVE        | no         |
//! | `0.30 ..< 0.60` | MEDIUM   | MANUAL_REVIEW  | no         |
//! | `0.60 ..< 0.80` | HIGH     | MANUAL_REVIEW  | yes        |
//! | `>= 0.80`       | CRITICAL | REJECT         | yes        |

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{
    ClaimId, DomainPort, HealthCheckable, HealthCheckResult, OperationMetadata, PortError, UserId,
};
use crate::claim::{ClaimRequest, ACCIDENT_CLAIM_TYPE};
use crate::ports::FraudPort;

/// History marker for claimants with repeated claims
pub const MULTIPLE_CLAIMS_MARKER: &str = "MULTIPLE_CLAIMS";

const MEDIUM_THRESHOLD: Decimal = dec!(0.30);
const HIGH_THRESHOLD: Decimal = dec!(0.60);
const CRITICAL_THRESHOLD: Decimal = dec!(0.80);

/// Ordered risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Recommended handling for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    ManualReview,
    Reject,
}

/// Inputs to a fraud assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudAssessmentRequest {
    pub claim_id: ClaimId,
    pub user_id: UserId,
    pub claim_amount: Decimal,
    pub claim_type: String,
    pub incident_date: NaiveDate,
    /// Free-form history markers, e.g. `FIRST_TIME_CLAIM` or `MULTIPLE_CLAIMS`
    #[serde(default)]
    pub user_history: String,
}

impl FraudAssessmentRequest {
    /// Builds the assessment inputs for a submitted claim
    pub fn for_claim(claim: &ClaimRequest, user_history: impl Into<String>) -> Self {
        Self {
            claim_id: claim.claim_id.clone(),
            user_id: claim.user_id.clone(),
            claim_amount: claim.claim_amount,
            claim_type: claim.claim_type.clone(),
            incident_date: claim.incident_date,
            user_history: user_history.into(),
        }
    }

    /// Returns true for accident claims (case-insensitive)
    pub fn is_accident(&self) -> bool {
        self.claim_type.eq_ignore_ascii_case(ACCIDENT_CLAIM_TYPE)
    }
}

/// Outcome of a fraud assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub claim_id: ClaimId,
    pub is_fraudulent: bool,
    /// Clamped score in [0, 1]
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub explanation: String,
    /// One entry per triggered rule, in rule order
    pub red_flags: Vec<String>,
}

/// The weighted heuristic rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudRule {
    /// Amount above 50,000
    HighAmount,
    /// Amount above 100,000, on top of `HighAmount`
    VeryHighAmount,
    /// Accident claim above 75,000
    HighValueAccident,
    /// Claimant history carries the repeated-claims marker
    RepeatClaimant,
}

impl FraudRule {
    /// Evaluation order
    pub const ALL: [FraudRule; 4] = [
        FraudRule::HighAmount,
        FraudRule::VeryHighAmount,
        FraudRule::HighValueAccident,
        FraudRule::RepeatClaimant,
    ];

    pub fn weight(&self) -> Decimal {
        match self {
            FraudRule::HighAmount => dec!(0.30),
            FraudRule::VeryHighAmount => dec!(0.40),
            FraudRule::HighValueAccident => dec!(0.20),
            FraudRule::RepeatClaimant => dec!(0.25),
        }
    }

    pub fn red_flag(&self) -> &'static str {
        match self {
            FraudRule::HighAmount => "High claim amount (> $50,000)",
            FraudRule::VeryHighAmount => "Very high claim amount (> $100,000)",
            FraudRule::HighValueAccident => "High-value accident claim requires investigation",
            FraudRule::RepeatClaimant => "User has history of multiple claims",
        }
    }

    pub fn applies(&self, request: &FraudAssessmentRequest) -> bool {
        let amount = request.claim_amount;
        match self {
            FraudRule::HighAmount => amount > dec!(50000),
            FraudRule::VeryHighAmount => amount > dec!(100000),
            FraudRule::HighValueAccident => request.is_accident() && amount > dec!(75000),
            FraudRule::RepeatClaimant => request.user_history.contains(MULTIPLE_CLAIMS_MARKER),
        }
    }
}

/// Maps a clamped score to its band
pub fn classify(score: Decimal) -> (RiskLevel, Recommendation, bool) {
    if score < MEDIUM_THRESHOLD {
        (RiskLevel::Low, Recommendation::Approve, false)
    } else if score < HIGH_THRESHOLD {
        (RiskLevel::Medium, Recommendation::ManualReview, false)
    } else if score < CRITICAL_THRESHOLD {
        (RiskLevel::High, Recommendation::ManualReview, true)
    } else {
        (RiskLevel::Critical, Recommendation::Reject, true)
    }
}

fn explanation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low fraud risk detected. Claim can be processed normally.",
        RiskLevel::Medium => "Medium fraud risk detected. Manual review recommended.",
        RiskLevel::High => "High fraud risk detected. Thorough investigation required.",
        RiskLevel::Critical => "Critical fraud risk detected. Claim should be rejected.",
    }
}

/// In-process fraud scorer. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct FraudScorer;

impl FraudScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a claim against the rule table
    pub fn assess(&self, request: &FraudAssessmentRequest) -> FraudAssessment {
        let mut raw_score = Decimal::ZERO;
        let mut red_flags = Vec::new();

        for rule in FraudRule::ALL {
            if rule.applies(request) {
                raw_score += rule.weight();
                red_flags.push(rule.red_flag().to_string());
            }
        }

        let risk_score = raw_score.clamp(Decimal::ZERO, Decimal::ONE);
        let (risk_level, recommendation, is_fraudulent) = classify(risk_score);

        debug!(
            claim_id = %request.claim_id,
            %risk_score,
            %risk_level,
            flags = red_flags.len(),
            "Fraud assessment computed"
        );

        FraudAssessment {
            claim_id: request.claim_id.clone(),
            is_fraudulent,
            risk_score,
            risk_level,
            recommendation,
            explanation: explanation(risk_level).to_string(),
            red_flags,
        }
    }
}

impl DomainPort for FraudScorer {}

#[async_trait]
impl HealthCheckable for FraudScorer {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("local-fraud-scorer", "In-process fraud scorer")
    }
}

#[async_trait]
impl FraudPort for FraudScorer {
    async fn assess(
        &self,
        request: &FraudAssessmentRequest,
        _metadata: Option<OperationMetadata>,
    ) -> Result<FraudAssessment, PortError> {
        Ok(FraudScorer::assess(self, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: Decimal, claim_type: &str, history: &str) -> FraudAssessmentRequest {
        FraudAssessmentRequest {
            claim_id: ClaimId::new("CLM-F"),
            user_id: UserId::new("USR-123"),
            claim_amount: amount,
            claim_type: claim_type.to_string(),
            incident_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            user_history: history.to_string(),
        }
    }

    #[test]
    fn test_small_claim_is_low_risk() {
        let a = FraudScorer::new().assess(&request(dec!(30000), "AUTO", "FIRST_TIME_CLAIM"));
        assert_eq!(a.risk_score, Decimal::ZERO);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert_eq!(a.recommendation, Recommendation::Approve);
        assert!(!a.is_fraudulent);
        assert!(a.red_flags.is_empty());
    }

    #[test]
    fn test_boundary_at_fifty_thousand_is_exclusive() {
        let a = FraudScorer::new().assess(&request(dec!(50000), "AUTO", ""));
        assert_eq!(a.risk_level, RiskLevel::Low);

        let b = FraudScorer::new().assess(&request(dec!(50000.01), "AUTO", ""));
        assert_eq!(b.risk_score, dec!(0.30));
        assert_eq!(b.risk_level, RiskLevel::Medium);
        assert!(!b.is_fraudulent);
    }

    #[test]
    fn test_very_high_amount_is_high_and_fraudulent() {
        let a = FraudScorer::new().assess(&request(dec!(150000), "HOME", ""));
        assert_eq!(a.risk_score, dec!(0.70));
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.recommendation, Recommendation::ManualReview);
        assert!(a.is_fraudulent);
    }

    #[test]
    fn test_large_accident_is_critical() {
        let a = FraudScorer::new().assess(&request(dec!(120000), "Accident", ""));
        assert_eq!(a.risk_score, dec!(0.90));
        assert_eq!(a.risk_level, RiskLevel::Critical);
        assert_eq!(a.recommendation, Recommendation::Reject);
        assert_eq!(
            a.red_flags,
            vec![
                "High claim amount (> $50,000)".to_string(),
                "Very high claim amount (> $100,000)".to_string(),
                "High-value accident claim requires investigation".to_string(),
            ]
        );
    }

    #[test]
    fn test_accident_rule_ignores_case() {
        assert!(request(dec!(10), "accident", "").is_accident());
        assert!(!request(dec!(10), "AUTO", "").is_accident());

        let rule = FraudRule::HighValueAccident;
        assert!(rule.applies(&request(dec!(80000), "accident", "")));
        assert!(!rule.applies(&request(dec!(75000), "ACCIDENT", "")));
        assert!(!rule.applies(&request(dec!(80000), "AUTO", "")));
    }

    #[test]
    fn test_score_is_clamped() {
        let a = FraudScorer::new().assess(&request(dec!(500000), "ACCIDENT", "MULTIPLE_CLAIMS"));
        assert_eq!(a.risk_score, Decimal::ONE);
        assert_eq!(a.red_flags.len(), 4);
        assert_eq!(a.red_flags[3], "User has history of multiple claims");
    }

    #[test]
    fn test_repeat_claimant_alone_stays_low() {
        let a = FraudScorer::new().assess(&request(dec!(1000), "AUTO", "PRIOR;MULTIPLE_CLAIMS"));
        assert_eq!(a.risk_score, dec!(0.25));
        assert_eq!(a.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(dec!(0.29)).0, RiskLevel::Low);
        assert_eq!(classify(dec!(0.30)).0, RiskLevel::Medium);
        assert_eq!(classify(dec!(0.60)), (RiskLevel::High, Recommendation::ManualReview, true));
        assert_eq!(classify(dec!(0.80)), (RiskLevel::Critical, Recommendation::Reject, true));
    }
}
