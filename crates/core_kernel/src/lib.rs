//! Core Kernel - Foundational types shared by the claim pipeline
//!
//! This crate provides the building blocks used by the claims domain and the API layer:
//! - Strongly-typed string identifiers for claims, users and policies
//! - The port error taxonomy and adapter health types used by every stage adapter
//! - Stage source configuration and the aggregated health report

pub mod identifiers;
pub mod ports;
pub mod registry;
pub mod error;

pub use identifiers::{ClaimId, UserId, PolicyId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    OperationMetadata,
};
pub use registry::{AdapterSource, ExternalConfig, RegistryHealthReport};
pub use error::CoreError;
