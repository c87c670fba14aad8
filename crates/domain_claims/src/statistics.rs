//! Pipeline counters
//!
//! Tallies of pipeline outcomes. They are written after a decision is made
//! and never read by the pipeline itself. Counts are atomics; the withheld
//! amount is a `Decimal` under a short-lived lock and saturates at
//! `Decimal::MAX`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::decision::{ClaimDecision, DecisionStatus, PipelineStage};

/// Running counters shared by every claim the orchestrator processes
#[derive(Debug, Default)]
pub struct PipelineStatistics {
    processed: AtomicU64,
    approved: AtomicU64,
    rejected_identity: AtomicU64,
    rejected_fraud: AtomicU64,
    rejected_policy: AtomicU64,
    errors: AtomicU64,
    fraud_detected: AtomicU64,
    /// Amount held back by fraud rejections
    withheld: Mutex<Decimal>,
    degraded_fraud: AtomicU64,
    degraded_policy: AtomicU64,
}

/// Point-in-time copy of [`PipelineStatistics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub claims_processed: u64,
    pub approved: u64,
    pub rejected_identity: u64,
    pub rejected_fraud: u64,
    pub rejected_policy: u64,
    pub errors: u64,
    pub fraud_detected: u64,
    pub amount_withheld: Decimal,
    pub degraded_fraud_skips: u64,
    pub degraded_policy_skips: u64,
}

impl StatisticsSnapshot {
    pub fn rejected(&self) -> u64 {
        self.rejected_identity + self.rejected_fraud + self.rejected_policy
    }
}

impl PipelineStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished decision for a claim of the given amount
    pub fn record(&self, decision: &ClaimDecision, claim_amount: Decimal) {
        self.processed.fetch_add(1, Ordering::Relaxed);

        match (decision.status, decision.rejected_by) {
            (DecisionStatus::Approved, _) => {
                self.approved.fetch_add(1, Ordering::Relaxed);
            }
            (DecisionStatus::Rejected, Some(PipelineStage::Identity)) => {
                self.rejected_identity.fetch_add(1, Ordering::Relaxed);
            }
            (DecisionStatus::Rejected, Some(PipelineStage::Fraud)) => {
                self.rejected_fraud.fetch_add(1, Ordering::Relaxed);
                self.fraud_detected.fetch_add(1, Ordering::Relaxed);
                let mut withheld = self.withheld();
                *withheld = withheld.checked_add(claim_amount).unwrap_or(Decimal::MAX);
            }
            (DecisionStatus::Rejected, Some(PipelineStage::Policy)) => {
                self.rejected_policy.fetch_add(1, Ordering::Relaxed);
            }
            (DecisionStatus::Rejected, None) | (DecisionStatus::Error, _) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
        }

        for stage in &decision.degraded_stages {
            match stage {
                PipelineStage::Fraud => self.degraded_fraud.fetch_add(1, Ordering::Relaxed),
                PipelineStage::Policy => self.degraded_policy.fetch_add(1, Ordering::Relaxed),
                PipelineStage::Identity => 0,
            };
        }
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            claims_processed: self.processed.load(Ordering::Relaxed),
            approved: self.approved.load(Ordering::Relaxed),
            rejected_identity: self.rejected_identity.load(Ordering::Relaxed),
            rejected_fraud: self.rejected_fraud.load(Ordering::Relaxed),
            rejected_policy: self.rejected_policy.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            fraud_detected: self.fraud_detected.load(Ordering::Relaxed),
            amount_withheld: *self.withheld(),
            degraded_fraud_skips: self.degraded_fraud.load(Ordering::Relaxed),
            degraded_policy_skips: self.degraded_policy.load(Ordering::Relaxed),
        }
    }

    fn withheld(&self) -> MutexGuard<'_, Decimal> {
        self.withheld.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionDraft;
    use core_kernel::ClaimId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_counts_by_outcome() {
        let stats = PipelineStatistics::new();
        let draft = || DecisionDraft::new(ClaimId::new("CLM-S"));

        stats.record(&draft().approve(), dec!(100));
        stats.record(&draft().reject(PipelineStage::Fraud, "Fraud detected: x".into()), dec!(120000.50));
        stats.record(&draft().reject(PipelineStage::Policy, "no".into()), dec!(1));
        stats.record(&draft().error("boom".into()), dec!(1));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.claims_processed, 4);
        assert_eq!(snapshot.approved, 1);
        assert_eq!(snapshot.rejected(), 2);
        assert_eq!(snapshot.fraud_detected, 1);
        assert_eq!(snapshot.amount_withheld, dec!(120000.50));
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn test_withheld_amount_keeps_large_claims() {
        let stats = PipelineStatistics::new();
        let fraud = || {
            DecisionDraft::new(ClaimId::new("CLM-L"))
                .reject(PipelineStage::Fraud, "Fraud detected: x".into())
        };

        stats.record(&fraud(), dec!(100000000000000000));
        assert_eq!(stats.snapshot().amount_withheld, dec!(100000000000000000));

        stats.record(&fraud(), dec!(1000000000000000000000.25));
        assert_eq!(
            stats.snapshot().amount_withheld,
            dec!(1000100000000000000000.25)
        );
    }

    #[test]
    fn test_withheld_amount_saturates() {
        let stats = PipelineStatistics::new();
        let fraud = DecisionDraft::new(ClaimId::new("CLM-M"))
            .reject(PipelineStage::Fraud, "Fraud detected: x".into());

        stats.record(&fraud, Decimal::MAX);
        stats.record(&fraud, Decimal::MAX);

        assert_eq!(stats.snapshot().amount_withheld, Decimal::MAX);
    }

    #[test]
    fn test_degraded_stages_are_tallied() {
        let stats = PipelineStatistics::new();
        let mut draft = DecisionDraft::new(ClaimId::new("CLM-D"));
        draft.degrade(PipelineStage::Fraud);
        draft.degrade(PipelineStage::Policy);
        stats.record(&draft.approve(), dec!(10));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.degraded_fraud_skips, 1);
        assert_eq!(snapshot.degraded_policy_skips, 1);
    }
}
