//! # GitHub API Endpoints
//!
//! Endpoint implementations for the commit status resource.

pub mod statuses;
