//! Nuwa - build orchestrator for Nim-backed Python extensions
//!
//! Nuwa compiles a Nim module into a Python extension library, places it
//! inside the package for local development, or packs it into a wheel
//! tagged for the running interpreter.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use config::{ConfigResolver, EffectiveConfig, Overrides, ProjectConfig};
pub use domain::entities::{BuildResult, Diagnostic, Severity, SourceUnit};
pub use domain::value_objects::{BuildMode, CompatibilityTag, ExitCode, RuntimeInfo};
pub use error::{DiscoveryError, NuwaError, NuwaResult};
