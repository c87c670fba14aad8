//! Claims pipeline errors

use thiserror::Error;

use core_kernel::{CoreError, PortError};
use crate::decision::PipelineStage;

/// Errors that can occur while assembling or running the claim pipeline
///
/// None of these escape [`ClaimOrchestrator::process_claim`](crate::ClaimOrchestrator::process_claim);
/// they are converted into an `ERROR` decision there.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid claim request: {0}")]
    InvalidRequest(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: PortError,
    },

    #[error("Claimant lookup failed: {0}")]
    ClaimantLookup(#[source] PortError),

    #[error("Identity stage is mandatory and cannot be disabled")]
    IdentityStageRequired,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClaimError {
    pub fn stage(stage: PipelineStage, source: PortError) -> Self {
        ClaimError::Stage { stage, source }
    }

    /// Returns the stage that faulted, if the error came from a stage call
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            ClaimError::Stage { stage, .. } => Some(*stage),
            ClaimError::ClaimantLookup(_) => Some(PipelineStage::Identity),
            _ => None,
        }
    }
}
