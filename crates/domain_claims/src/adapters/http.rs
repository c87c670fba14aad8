//! HTTP/JSON Stage Adapters
//!
//! Adapters that reach a stage hosted as a separate service. Each one posts
//! the stage's request body as JSON and decodes the stage's result type.
//!
//! # Error Handling
//!
//! Transport failures are mapped to `PortError` variants so the orchestrator
//! can tell an unreachable service from a broken one:
//! - Timeouts -> `PortError::Timeout`
//! - Connection refused / DNS failure -> `PortError::Connection`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - 404 -> `PortError::NotFound`
//! - Other 4xx -> `PortError::Validation`
//! - Undecodable body -> `PortError::Transformation`

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use core_kernel::{
    AdapterHealth, DomainPort, ExternalConfig, HealthCheckResult, HealthCheckable,
    OperationMetadata, PolicyId, PortError, UserId,
};

use crate::fraud::{FraudAssessment, FraudAssessmentRequest};
use crate::identity::{IdentityVerificationResult, VerifyIdentityRequest};
use crate::policy::{PolicyValidationResult, ValidatePolicyRequest};
use crate::ports::{FraudPort, IdentityPort, PolicyPort};

/// Route of the identity stage service
pub const IDENTITY_VERIFY_PATH: &str = "/api/v1/identity/verify";
/// Route of the fraud stage service
pub const FRAUD_ASSESS_PATH: &str = "/api/v1/fraud/assess";
/// Route of the policy stage service
pub const POLICY_VALIDATE_PATH: &str = "/api/v1/policies/validate";
/// Liveness route every stage service exposes
pub const HEALTH_PATH: &str = "/health";

const CORRELATION_HEADER: &str = "x-correlation-id";
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Pooled JSON client for one remote stage service
///
/// The underlying `reqwest::Client` is reference counted and safe to share
/// between concurrently processed claims.
#[derive(Debug, Clone)]
pub struct RemoteStageClient {
    service: &'static str,
    config: ExternalConfig,
    client: Client,
    request_timeout: Option<Duration>,
}

impl RemoteStageClient {
    pub fn new(service: &'static str, config: ExternalConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PortError::Internal {
                message: format!("failed to build HTTP client for {}", service),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            service,
            config,
            client,
            request_timeout: None,
        })
    }

    /// Bounds every request at the transport level
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        metadata: Option<&OperationMetadata>,
    ) -> Result<R, PortError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);

        if let Some(correlation_id) = metadata.and_then(|m| m.correlation_id.as_deref()) {
            request = request.header(CORRELATION_HEADER, correlation_id);
        }
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(path, e))?;

        debug!(
            service = self.service,
            url = %url,
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Stage service responded"
        );

        let response = self.check_status(response).await?;
        response.json::<R>().await.map_err(|e| {
            warn!(service = self.service, error = %e, "Undecodable stage response");
            PortError::transformation(format!("invalid {} response: {}", self.service, e))
        })
    }

    async fn check_status(&self, response: Response) -> Result<Response, PortError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        Err(map_status(self.service, status, retry_after, &body))
    }

    fn map_transport_error(&self, path: &str, error: reqwest::Error) -> PortError {
        let operation = format!("{} {}", self.service, path);
        if error.is_timeout() {
            let duration_ms = self
                .request_timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or_default();
            PortError::timeout(operation, duration_ms)
        } else if error.is_connect() || error.is_request() {
            PortError::Connection {
                message: format!("{} unreachable at {}", self.service, self.config.base_url),
                source: Some(Box::new(error)),
            }
        } else if error.is_decode() {
            PortError::transformation(error.to_string())
        } else {
            PortError::Internal {
                message: format!("{} request failed", operation),
                source: Some(Box::new(error)),
            }
        }
    }

    /// Checks the service's liveness route
    pub async fn health(&self, adapter_id: &str) -> HealthCheckResult {
        let started = Instant::now();
        let mut request = self.client.get(self.config.endpoint(HEALTH_PATH));
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let (status, message) = match request.send().await {
            Ok(response) if response.status().is_success() => {
                (AdapterHealth::Healthy, format!("{} reachable", self.service))
            }
            Ok(response) => {
                // Answers that would make a stage call unreachable mark the service down
                let status = response.status();
                let health = if map_status(self.service, status, None, "").is_unreachable() {
                    AdapterHealth::Unhealthy
                } else {
                    AdapterHealth::Degraded
                };
                (health, format!("{} answered {}", self.service, status))
            }
            Err(e) => (
                AdapterHealth::Unhealthy,
                format!("{} unreachable: {}", self.service, e),
            ),
        };

        HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status,
            latency_ms: started.elapsed().as_millis() as u64,
            message: Some(message),
            checked_at: chrono::Utc::now(),
        }
    }
}

/// Maps a non-success status code onto the port error taxonomy
pub fn map_status(
    service: &str,
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> PortError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        StatusCode::NOT_FOUND => PortError::not_found(service, body.trim()),
        s if s.is_server_error() => PortError::unavailable(format!("{} ({})", service, s)),
        s if s.is_client_error() => {
            PortError::validation(format!("{} rejected request ({}): {}", service, s, body.trim()))
        }
        s => PortError::transformation(format!("{} answered unexpected status {}", service, s)),
    }
}

/// Identity stage reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpIdentityAdapter {
    client: RemoteStageClient,
}

impl HttpIdentityAdapter {
    pub fn new(config: ExternalConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: RemoteStageClient::new("identity-service", config)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DomainPort for HttpIdentityAdapter {}

#[async_trait]
impl HealthCheckable for HttpIdentityAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        self.client.health("http-identity-adapter").await
    }
}

#[async_trait]
impl IdentityPort for HttpIdentityAdapter {
    async fn verify(
        &self,
        user_id: &UserId,
        name: &str,
        document_id: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<IdentityVerificationResult, PortError> {
        let body = VerifyIdentityRequest {
            user_id: user_id.clone(),
            name: name.to_string(),
            document_id: document_id.to_string(),
        };
        self.client
            .post_json(IDENTITY_VERIFY_PATH, &body, metadata.as_ref())
            .await
    }
}

/// Fraud stage reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpFraudAdapter {
    client: RemoteStageClient,
}

impl HttpFraudAdapter {
    pub fn new(config: ExternalConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: RemoteStageClient::new("fraud-service", config)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DomainPort for HttpFraudAdapter {}

#[async_trait]
impl HealthCheckable for HttpFraudAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        self.client.health("http-fraud-adapter").await
    }
}

#[async_trait]
impl FraudPort for HttpFraudAdapter {
    async fn assess(
        &self,
        request: &FraudAssessmentRequest,
        metadata: Option<OperationMetadata>,
    ) -> Result<FraudAssessment, PortError> {
        self.client
            .post_json(FRAUD_ASSESS_PATH, request, metadata.as_ref())
            .await
    }
}

/// Policy stage reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpPolicyAdapter {
    client: RemoteStageClient,
}

impl HttpPolicyAdapter {
    pub fn new(config: ExternalConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: RemoteStageClient::new("policy-service", config)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DomainPort for HttpPolicyAdapter {}

#[async_trait]
impl HealthCheckable for HttpPolicyAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        self.client.health("http-policy-adapter").await
    }
}

#[async_trait]
impl PolicyPort for HttpPolicyAdapter {
    async fn validate(
        &self,
        policy_id: &PolicyId,
        claim_amount: Decimal,
        metadata: Option<OperationMetadata>,
    ) -> Result<PolicyValidationResult, PortError> {
        let body = ValidatePolicyRequest {
            policy_id: policy_id.clone(),
            claim_amount,
        };
        self.client
            .post_json(POLICY_VALIDATE_PATH, &body, metadata.as_ref())
            .await
    }
}
