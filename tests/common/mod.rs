//! Common test utilities and helpers
//!
//! Shared fixtures and runner doubles for the integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_runners;
