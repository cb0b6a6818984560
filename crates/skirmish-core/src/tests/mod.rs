//! Cross-module tests for encounters and recaps.
//!
//! - **Determinism tests**: same seed, same inputs, same results
//! - **Integration tests**: full recaps against the standard catalog
//! - **Property tests**: state invariants under random compositions
//! - **Helper functions**: utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: seeded reproducibility across runs and worker counts
//! - `integration.rs`: end-to-end recaps
//! - `properties.rs`: proptest invariants
//! - `helpers.rs`: store, roster and observation helpers

mod determinism;
mod helpers;
mod properties;
