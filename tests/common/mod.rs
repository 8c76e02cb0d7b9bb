//! Common test utilities and shared infrastructure.
//!
//! This module provides all the shared functionality used across the test suite:
//! - `fixtures`: ballots, trees and seeded randomness
//! - `assertions`: solve-succeeds / solve-fails helpers

pub mod assertions;
pub mod fixtures;

// Re-export commonly used test helpers
#[allow(unused_imports)] // These are used across many test files
pub use fixtures::{f, sample_ballot, sample_tree, seeded_rng};
