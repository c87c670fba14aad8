//! Stage Registry Types
//!
//! Configuration describing where each pipeline stage is served from, and the
//! aggregated health report built from the stage adapters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::registry::{AdapterSource, ExternalConfig};
//!
//! let fraud = AdapterSource::External(ExternalConfig::new("http://fraud:8080"));
//! let policy = AdapterSource::Local;
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::ports::{AdapterHealth, HealthCheckResult};

/// Source configuration for a stage adapter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdapterSource {
    /// Use the in-process rule engine
    #[default]
    Local,

    /// Call a remote stage service with the given configuration
    External(ExternalConfig),

    /// The stage is not wired at all
    Disabled,
}

impl AdapterSource {
    /// Builds a source from a textual setting (`local`, `remote`, `disabled`)
    ///
    /// `remote` requires a base URL.
    pub fn from_setting(kind: &str, base_url: Option<&str>) -> Result<Self, CoreError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "local" | "" => Ok(AdapterSource::Local),
            "disabled" | "none" | "off" => Ok(AdapterSource::Disabled),
            "remote" | "external" | "http" => match base_url {
                Some(url) if !url.trim().is_empty() => {
                    Ok(AdapterSource::External(ExternalConfig::new(url.trim())))
                }
                _ => Err(CoreError::configuration(
                    "remote stage source requires a base URL",
                )),
            },
            other => Err(CoreError::configuration(format!(
                "unknown stage source '{}'",
                other
            ))),
        }
    }
}

/// Configuration for a remote adapter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalConfig {
    /// Base URL of the remote stage service
    pub base_url: String,
}

impl ExternalConfig {
    /// Creates a config with just a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Joins a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Result of health checks across all registered stage adapters
#[derive(Debug, Clone, Serialize)]
pub struct RegistryHealthReport {
    /// Overall health status
    pub overall_status: AdapterHealth,

    /// Health results by stage
    pub domain_health: HashMap<String, HealthCheckResult>,

    /// Number of healthy adapters
    pub healthy_count: usize,

    /// Number of adapters that are not healthy
    pub unhealthy_count: usize,

    /// Total number of registered adapters
    pub total_count: usize,
}

impl RegistryHealthReport {
    /// Aggregates per-stage results.
    ///
    /// Each entry is `(stage, mandatory, result)`. A mandatory stage that is not
    /// healthy makes the whole pipeline unhealthy; an advisory stage that is not
    /// healthy only degrades it.
    pub fn aggregate(entries: Vec<(String, bool, HealthCheckResult)>) -> Self {
        let mut overall_status = AdapterHealth::Healthy;
        let mut healthy_count = 0;
        let mut unhealthy_count = 0;
        let total_count = entries.len();
        let mut domain_health = HashMap::with_capacity(total_count);

        for (stage, mandatory, result) in entries {
            if result.status == AdapterHealth::Healthy {
                healthy_count += 1;
            } else {
                unhealthy_count += 1;
                let impact = match (mandatory, result.status) {
                    (true, AdapterHealth::Degraded) => AdapterHealth::Degraded,
                    (true, _) => AdapterHealth::Unhealthy,
                    (false, _) => AdapterHealth::Degraded,
                };
                overall_status = worst(overall_status, impact);
            }
            domain_health.insert(stage, result);
        }

        Self {
            overall_status,
            domain_health,
            healthy_count,
            unhealthy_count,
            total_count,
        }
    }

    /// Returns true if all adapters are healthy
    pub fn is_fully_healthy(&self) -> bool {
        self.overall_status == AdapterHealth::Healthy
    }

    /// Returns true if the system is at least partially operational
    pub fn is_operational(&self) -> bool {
        matches!(
            self.overall_status,
            AdapterHealth::Healthy | AdapterHealth::Degraded
        )
    }
}

fn worst(a: AdapterHealth, b: AdapterHealth) -> AdapterHealth {
    fn rank(h: AdapterHealth) -> u8 {
        match h {
            AdapterHealth::Healthy => 0,
            AdapterHealth::Unknown => 1,
            AdapterHealth::Degraded => 2,
            AdapterHealth::Unhealthy => 3,
        }
    }
    if rank(b) > rank(a) { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(status: AdapterHealth) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "test".to_string(),
            status,
            latency_ms: 1,
            message: None,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn test_source_from_setting() {
        assert_eq!(AdapterSource::from_setting("local", None).unwrap(), AdapterSource::Local);
        assert_eq!(AdapterSource::from_setting("Disabled", None).unwrap(), AdapterSource::Disabled);

        let remote = AdapterSource::from_setting("remote", Some("http://fraud:9000/")).unwrap();
        assert_eq!(remote, AdapterSource::External(ExternalConfig::new("http://fraud:9000/")));

        assert!(AdapterSource::from_setting("remote", None).is_err());
        assert!(AdapterSource::from_setting("carrier-pigeon", None).is_err());
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let config = ExternalConfig::new("http://fraud:9000/");
        assert_eq!(config.endpoint("/api/v1/fraud/assess"), "http://fraud:9000/api/v1/fraud/assess");
    }

    #[test]
    fn test_all_healthy_report() {
        let report = RegistryHealthReport::aggregate(vec![
            ("identity".to_string(), true, result(AdapterHealth::Healthy)),
            ("fraud".to_string(), false, result(AdapterHealth::Healthy)),
        ]);

        assert!(report.is_fully_healthy());
        assert_eq!(report.healthy_count, 2);
        assert_eq!(report.total_count, 2);
    }

    #[test]
    fn test_advisory_failure_degrades() {
        let report = RegistryHealthReport::aggregate(vec![
            ("identity".to_string(), true, result(AdapterHealth::Healthy)),
            ("fraud".to_string(), false, result(AdapterHealth::Unhealthy)),
            ("policy".to_string(), false, result(AdapterHealth::Healthy)),
        ]);

        assert_eq!(report.overall_status, AdapterHealth::Degraded);
        assert!(report.is_operational());
        assert_eq!(report.unhealthy_count, 1);
    }

    #[test]
    fn test_mandatory_failure_is_unhealthy() {
        let report = RegistryHealthReport::aggregate(vec![
            ("identity".to_string(), true, result(AdapterHealth::Unhealthy)),
            ("fraud".to_string(), false, result(AdapterHealth::Degraded)),
        ]);

        assert_eq!(report.overall_status, AdapterHealth::Unhealthy);
        assert!(!report.is_operational());
    }
}
