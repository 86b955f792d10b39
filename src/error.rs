//! Error types for Nuwa
//!
//! Uses `thiserror` for library errors. A failed compile is not an error:
//! it is a normal `BuildResult` carrying diagnostics.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::ExitCode;

/// Result type alias for Nuwa operations
pub type NuwaResult<T> = Result<T, NuwaError>;

/// Why source discovery could not settle on an entry file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Nothing usable was found
    #[error("no Nim entry point found in {dir}{}", detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    NotFound { dir: PathBuf, detail: Option<String> },

    /// More than one candidate and no rule picked one
    #[error("cannot choose an entry point in {dir}: found {}", candidates.join(", "))]
    Ambiguous { dir: PathBuf, candidates: Vec<String> },
}

/// Main error type for Nuwa operations
#[derive(Error, Debug)]
pub enum NuwaError {
    /// Bad profile, invalid identifier, missing explicit entry file, malformed project file
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Entry point discovery failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A required external tool is missing or unusable
    #[error("{tool} not found: {message}")]
    Environment { tool: String, message: String },

    /// Archive or in-place artifact could not be assembled
    #[error("packaging failed: {message}")]
    Packaging { message: String },

    /// Target archive already exists
    #[error("{path} already exists")]
    Conflict { path: PathBuf },

    /// Watch engine could not shut down cleanly
    #[error("watch error: {message}")]
    Watch { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// pyproject.toml parse error
    #[error("invalid pyproject.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// Zip writer error
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl NuwaError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn packaging(message: impl Into<String>) -> Self {
        Self::Packaging {
            message: message.into(),
        }
    }

    pub fn environment(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Environment {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NuwaError::Config { .. } | NuwaError::Toml(_) | NuwaError::Discovery(_) => {
                ExitCode::ConfigError
            }
            NuwaError::Environment { .. } => ExitCode::EnvironmentError,
            NuwaError::Packaging { .. }
            | NuwaError::Conflict { .. }
            | NuwaError::Watch { .. }
            | NuwaError::Io(_)
            | NuwaError::Zip(_) => ExitCode::PackagingError,
        }
    }

    /// Suggested fix shown under the error message
    pub fn remedy(&self) -> Option<String> {
        match self {
            NuwaError::Config { .. } => Some(
                "Check the [tool.nuwa] section of pyproject.toml and the command-line overrides."
                    .to_string(),
            ),
            NuwaError::Toml(_) => Some("Fix the TOML syntax in pyproject.toml.".to_string()),
            NuwaError::Discovery(DiscoveryError::NotFound { .. }) => Some(
                "Create <lib-name>.nim in the source directory or set `entry-point` in [tool.nuwa]."
                    .to_string(),
            ),
            NuwaError::Discovery(DiscoveryError::Ambiguous { .. }) => Some(
                "Set `entry-point` in [tool.nuwa] or pass --entry-point to pick one file."
                    .to_string(),
            ),
            NuwaError::Environment { tool, .. } if tool == "nim" => {
                Some("Install Nim from https://nim-lang.org/install.html".to_string())
            }
            NuwaError::Environment { tool, .. } => Some(format!(
                "Install {tool} or point Nuwa at it (NUWA_COMPILER / NUWA_PYTHON)."
            )),
            NuwaError::Conflict { .. } => {
                Some("Pass --force to overwrite the existing archive.".to_string())
            }
            NuwaError::Packaging { .. } => {
                Some("Check the `package-data` entries in [tool.nuwa].".to_string())
            }
            NuwaError::Watch { .. } | NuwaError::Io(_) | NuwaError::Zip(_) => None,
        }
    }
}
