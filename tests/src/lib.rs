//! Shared fixtures and mocks for integration tests.

pub mod fixtures;
pub mod mocks;
