//! Shared helpers for the CLI integration tests.
//!
//! - `TestEnv`: scratch project plus fake `nim` and `python` scripts
//! - Fixtures: project files and script bodies

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
