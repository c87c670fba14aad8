//! API configuration
//!
//! Every field can be set through an `API_`-prefixed environment variable,
//! e.g. `API_PORT=9090` or `API_FRAUD_SOURCE=remote`.

use std::time::Duration;

use serde::Deserialize;

use core_kernel::{AdapterSource, CoreError, PolicyId};
use domain_claims::{ClaimantProfile, StageConfig, StageTimeouts};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,

    /// Identity stage source: `local` or `remote`
    pub identity_source: String,
    pub identity_url: Option<String>,
    pub identity_timeout_ms: u64,

    /// Fraud stage source: `local`, `remote` or `disabled`
    pub fraud_source: String,
    pub fraud_url: Option<String>,
    pub fraud_timeout_ms: u64,

    /// Policy stage source: `local`, `remote` or `disabled`
    pub policy_source: String,
    pub policy_url: Option<String>,
    pub policy_timeout_ms: u64,

    /// Placeholder claimant identity used for every claim
    pub claimant_name: String,
    pub claimant_document_id: String,
    pub claimant_history: String,
    /// Policy claims are filed against
    pub default_policy_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            identity_source: "local".to_string(),
            identity_url: None,
            identity_timeout_ms: 5_000,
            fraud_source: "local".to_string(),
            fraud_url: None,
            fraud_timeout_ms: 3_000,
            policy_source: "local".to_string(),
            policy_url: None,
            policy_timeout_ms: 3_000,
            claimant_name: "John Doe".to_string(),
            claimant_document_id: "ID12345678".to_string(),
            claimant_history: "FIRST_TIME_CLAIM".to_string(),
            default_policy_id: "POL-001".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the per-stage source settings
    pub fn stage_config(&self) -> Result<StageConfig, CoreError> {
        Ok(StageConfig {
            identity: AdapterSource::from_setting(&self.identity_source, self.identity_url.as_deref())?,
            fraud: AdapterSource::from_setting(&self.fraud_source, self.fraud_url.as_deref())?,
            policy: AdapterSource::from_setting(&self.policy_source, self.policy_url.as_deref())?,
            timeouts: StageTimeouts {
                identity: Duration::from_millis(self.identity_timeout_ms),
                fraud: Duration::from_millis(self.fraud_timeout_ms),
                policy: Duration::from_millis(self.policy_timeout_ms),
            },
            default_policy: self.default_policy(),
        })
    }

    pub fn default_policy(&self) -> PolicyId {
        PolicyId::new(self.default_policy_id.trim())
    }

    /// Claimant profile served by the placeholder directory
    pub fn placeholder_claimant(&self) -> ClaimantProfile {
        ClaimantProfile::new(
            self.claimant_name.as_str(),
            self.claimant_document_id.as_str(),
            self.claimant_history.as_str(),
            self.default_policy(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_local() {
        let stages = ApiConfig::default().stage_config().unwrap();
        assert_eq!(stages.identity, AdapterSource::Local);
        assert_eq!(stages.fraud, AdapterSource::Local);
        assert_eq!(stages.timeouts.fraud, Duration::from_millis(3_000));
        assert_eq!(stages.default_policy, PolicyId::new("POL-001"));
    }

    #[test]
    fn test_remote_without_url_is_rejected() {
        let config = ApiConfig {
            fraud_source: "remote".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.stage_config().is_err());
    }

    #[test]
    fn test_placeholder_claimant() {
        let profile = ApiConfig::default().placeholder_claimant();
        assert_eq!(profile, ClaimantProfile::default());
    }
}
