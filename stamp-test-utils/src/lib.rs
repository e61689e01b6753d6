//! Test utilities shared across the stamp workspace
//!
//! This crate provides common testing infrastructure including:
//! - Throwaway `.netrc` homes ([`NetrcGuard`])
//! - Scoped environment variables ([`EnvVarGuard`])
//! - An in-memory GitHub commit status service ([`FakeStatusService`])
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across crate
//! boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod github;
pub mod netrc;

// Re-export commonly used items
pub use env::EnvVarGuard;
pub use github::FakeStatusService;
pub use netrc::NetrcGuard;
