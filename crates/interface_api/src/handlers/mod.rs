//! Request handlers

pub mod claims;
pub mod fraud;
pub mod health;
pub mod identity;
pub mod policy;
