//! HTTP API Layer
//!
//! This crate provides the REST API for the claim pipeline using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim submission, per-stage service endpoints, policy catalog, health
//! - **Middleware**: tracing, CORS, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! The stage endpoints speak the same JSON the remote adapters in
//! `domain_claims::adapters` send, so one deployment can serve as the remote
//! fraud or policy stage of another.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{
    ClaimError, ClaimOrchestrator, FraudScorer, IdentityVerifier, InMemoryPolicyCatalog,
    PlaceholderClaimantDirectory, PolicyCatalog, PolicyValidator, StageRegistry,
};

use crate::config::ApiConfig;
use crate::handlers::{claims, fraud, health, identity, policy};
use crate::middleware::{audit_middleware, CORRELATION_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline used by claim submission
    pub orchestrator: ClaimOrchestrator,
    /// Engines behind the stage service endpoints
    pub identity: IdentityVerifier,
    pub fraud: FraudScorer,
    pub policies: PolicyValidator,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the pipeline described by the configuration over the seeded catalog
    pub fn from_config(config: ApiConfig) -> Result<Self, ClaimError> {
        let catalog: Arc<dyn PolicyCatalog> = Arc::new(InMemoryPolicyCatalog::seeded());
        let registry = StageRegistry::build(&config.stage_config()?, catalog.clone())?;
        let claimants = Arc::new(PlaceholderClaimantDirectory::new(config.placeholder_claimant()));
        let orchestrator = registry.orchestrator(claimants);
        Ok(Self::new(config, catalog, orchestrator))
    }

    /// Builds state around an already assembled orchestrator
    pub fn new(config: ApiConfig, catalog: Arc<dyn PolicyCatalog>, orchestrator: ClaimOrchestrator) -> Self {
        Self {
            orchestrator,
            identity: IdentityVerifier::new(),
            fraud: FraudScorer::new(),
            policies: PolicyValidator::new(catalog),
            config,
        }
    }

    /// Catalog backing the policy endpoints
    pub fn catalog(&self) -> &Arc<dyn PolicyCatalog> {
        self.policies.catalog()
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/submit", post(claims::submit_claim))
        .route("/statistics", get(claims::statistics));

    // Stage service routes
    let identity_routes = Router::new().route("/verify", post(identity::verify_identity));
    let fraud_routes = Router::new().route("/assess", post(fraud::assess_fraud));

    // Policy routes
    let policy_routes = Router::new()
        .route("/", get(policy::list_policies))
        .route("/validate", post(policy::validate_policy))
        .route("/:id", get(policy::get_policy));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/identity", identity_routes)
        .nest("/fraud", fraud_routes)
        .nest("/policies", policy_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    let correlation = HeaderName::from_static(CORRELATION_HEADER);

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                // Callers' correlation ids are kept; others get a fresh one
                .layer(SetRequestIdLayer::new(correlation.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(correlation))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
