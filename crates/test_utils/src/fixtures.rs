//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the claim pipeline. The values line up
//! with the seeded policy catalog so scenarios read the same in every test.

use chrono::NaiveDate;
use core_kernel::{ClaimId, PolicyId, UserId};
use domain_claims::{ClaimRequest, ClaimantProfile, Policy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Claimant holding POL-001 (active) and POL-003 (expired)
    pub fn user() -> UserId {
        UserId::new("USR-123")
    }

    /// Claimant holding POL-002
    pub fn home_owner() -> UserId {
        UserId::new("USR-456")
    }

    pub fn claim() -> ClaimId {
        ClaimId::new("CLM-2024-001")
    }

    /// Active AUTO policy, coverage 50,000
    pub fn active_policy() -> PolicyId {
        PolicyId::new("POL-001")
    }

    /// Active HOME policy, coverage 200,000
    pub fn home_policy() -> PolicyId {
        PolicyId::new("POL-002")
    }

    /// Expired HEALTH policy, coverage 100,000
    pub fn expired_policy() -> PolicyId {
        PolicyId::new("POL-003")
    }

    pub fn unknown_policy() -> PolicyId {
        PolicyId::new("POL-999")
    }
}

/// Fixture for claim amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// Well inside POL-001 coverage, no fraud rule fires
    pub fn routine() -> Decimal {
        dec!(30000)
    }

    /// Above POL-001 coverage, MEDIUM fraud risk only
    pub fn above_auto_coverage() -> Decimal {
        dec!(75000)
    }

    /// Triggers the high and very-high amount rules
    pub fn very_high() -> Decimal {
        dec!(150000)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn incident() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }
}

/// Fixture for claimant profiles
pub struct ClaimantFixtures;

impl ClaimantFixtures {
    /// The default placeholder identity
    pub fn john_doe() -> ClaimantProfile {
        ClaimantProfile::default()
    }

    /// Document id too short to pass verification
    pub fn short_document() -> ClaimantProfile {
        ClaimantProfile::new("John Doe", "ID123", "FIRST_TIME_CLAIM", "POL-001")
    }

    /// Claimant filing against the expired policy
    pub fn expired_policy_holder() -> ClaimantProfile {
        ClaimantProfile::new("John Doe", "ID12345678", "FIRST_TIME_CLAIM", "POL-003")
    }

    /// Claimant with a repeated-claims history
    pub fn repeat_claimant() -> ClaimantProfile {
        ClaimantProfile::new("Jane Roe", "PASS98765", "MULTIPLE_CLAIMS", "POL-002")
    }
}

/// Fixture for claim requests
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn auto(amount: Decimal) -> ClaimRequest {
        ClaimRequest::new(
            IdFixtures::claim(),
            IdFixtures::user(),
            "AUTO",
            amount,
            DateFixtures::incident(),
        )
        .with_description("Rear-ended at a junction")
    }

    pub fn accident(amount: Decimal) -> ClaimRequest {
        ClaimRequest::new(
            IdFixtures::claim(),
            IdFixtures::user(),
            "ACCIDENT",
            amount,
            DateFixtures::incident(),
        )
        .with_description("Multi-vehicle collision")
    }

    /// Approved end to end against POL-001
    pub fn routine() -> ClaimRequest {
        Self::auto(AmountFixtures::routine())
    }
}

/// Fixture for catalog policies
pub struct PolicyFixtures;

impl PolicyFixtures {
    pub fn active(policy_id: &str, coverage: Decimal) -> Policy {
        Policy {
            policy_id: PolicyId::new(policy_id),
            user_id: IdFixtures::user(),
            policy_type: "AUTO".to_string(),
            status: "ACTIVE".to_string(),
            coverage_amount: coverage,
            premium: dec!(1000),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            is_active: true,
        }
    }

    pub fn lapsed(policy_id: &str, coverage: Decimal) -> Policy {
        Policy {
            status: "LAPSED".to_string(),
            is_active: false,
            ..Self::active(policy_id, coverage)
        }
    }
}
