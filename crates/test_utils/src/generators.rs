//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claims and stage inputs that
//! respect the pipeline's structural invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{ClaimId, UserId};
use domain_claims::{ClaimRequest, FraudAssessmentRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-negative claim amounts with cents, up to 500,000
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..50_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for claim type tags, including mixed-case accident spellings
pub fn claim_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("AUTO".to_string()),
        Just("HOME".to_string()),
        Just("HEALTH".to_string()),
        Just("ACCIDENT".to_string()),
        Just("accident".to_string()),
        Just("Accident".to_string()),
    ]
}

/// Strategy for claimant history strings
pub fn history_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("FIRST_TIME_CLAIM".to_string()),
        Just("MULTIPLE_CLAIMS".to_string()),
        Just("PRIOR_THEFT;MULTIPLE_CLAIMS".to_string()),
    ]
}

/// Strategy for incident dates within 2020..2025
pub fn incident_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..1826i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default() + Duration::days(days)
    })
}

/// Strategy for document identifiers of 0 to 15 characters
pub fn document_id_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{0,15}"
}

/// Strategy for valid claim requests
pub fn claim_request_strategy() -> impl Strategy<Value = ClaimRequest> {
    (
        "CLM-[0-9]{4}",
        "USR-[0-9]{3}",
        claim_type_strategy(),
        claim_amount_strategy(),
        incident_date_strategy(),
    )
        .prop_map(|(claim_id, user_id, claim_type, amount, date)| {
            ClaimRequest::new(
                ClaimId::new(claim_id),
                UserId::new(user_id),
                claim_type,
                amount,
                date,
            )
        })
}

/// Strategy for fraud assessment inputs
pub fn fraud_request_strategy() -> impl Strategy<Value = FraudAssessmentRequest> {
    (claim_request_strategy(), history_strategy())
        .prop_map(|(claim, history)| FraudAssessmentRequest::for_claim(&claim, history))
}
