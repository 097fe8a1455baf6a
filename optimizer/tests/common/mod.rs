//! Shared fixtures and helpers for the optimizer test suites

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
