//! Remote Stage Adapters
//!
//! Adapters that implement the stage ports against services reachable over
//! the network. The in-process engines (`IdentityVerifier`, `FraudScorer`,
//! `PolicyValidator`) implement the same ports directly.
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::ExternalConfig;
//! use domain_claims::adapters::HttpFraudAdapter;
//! use domain_claims::FraudPort;
//! use std::sync::Arc;
//!
//! let adapter = HttpFraudAdapter::new(ExternalConfig::new("http://fraud:8080"))?;
//! let port: Arc<dyn FraudPort> = Arc::new(adapter);
//! ```

pub mod http;

pub use http::{
    HttpFraudAdapter, HttpIdentityAdapter, HttpPolicyAdapter, RemoteStageClient,
    FRAUD_ASSESS_PATH, HEALTH_PATH, IDENTITY_VERIFY_PATH, POLICY_VALIDATE_PATH,
};
