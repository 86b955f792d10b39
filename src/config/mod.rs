//! Configuration module for Nuwa
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (NUWA_*)
//! 3. Project config (`pyproject.toml`, `[project]` and `[tool.nuwa]`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod resolver;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    config_path, env_profile, load, load_with_warnings, parse_with_warnings, with_env_overrides,
    PYPROJECT,
};
pub use resolver::{
    ConfigResolver, EffectiveConfig, OutputLocation, Overrides, ProjectMetadata, WatchSettings,
    DEFAULT_DEBOUNCE_MS, DEFAULT_TEST_COMMAND, DEFAULT_VERSION,
};
pub use types::{NuwaTable, ProfileFlags, ProjectConfig, ProjectTable, WatchTable};
