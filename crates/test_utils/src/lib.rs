//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim pipeline test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims, claimants and policies
//! - `builders`: Builder patterns for claim requests and orchestrators
//! - `assertions`: Custom assertion helpers for decisions and stage results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
