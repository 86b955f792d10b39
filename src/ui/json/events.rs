//! JSON event types shared by the one-shot commands

use std::path::Path;

use serde::Serialize;

use nuwa::application::{BuildOutcome, CleanResult, DevelopResult};
use nuwa::{BuildResult, Diagnostic, Severity};

/// Final event of `develop` and `build`
#[derive(Debug, Clone, Serialize)]
pub struct ResultEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub success: bool,
    pub exit_code: i32,
    pub mode: &'a str,
    pub errors: usize,
    pub warnings: usize,
    pub duration_ms: u64,
    pub artifacts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub diagnostics: &'a [Diagnostic],
    /// Full compiler output, only kept when nothing could be parsed from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_log: Option<&'a str>,
}

impl<'a> ResultEvent<'a> {
    fn from_build(command: &'a str, mode: &'a str, build: &'a BuildResult, success: bool) -> Self {
        Self {
            event: "result",
            command,
            success,
            exit_code: build.exit_status().code(),
            mode,
            errors: build.count(Severity::Error),
            warnings: build.count(Severity::Warning),
            duration_ms: build.duration.as_millis() as u64,
            artifacts: build.artifacts.iter().map(|p| display(p)).collect(),
            tag: None,
            diagnostics: &build.diagnostics,
            raw_log: build.raw_log.as_deref(),
        }
    }

    pub fn develop(result: &'a DevelopResult) -> Self {
        Self::from_build("develop", result.mode.as_str(), &result.build, result.is_success())
    }

    pub fn build(outcome: &'a BuildOutcome) -> Self {
        let mut event = Self::from_build("build", "release", &outcome.build, outcome.is_success());
        event.tag = Some(outcome.tag.to_string());
        event
    }
}

/// Final event of `clean`
#[derive(Debug, Clone, Serialize)]
pub struct CleanEvent<'a> {
    pub event: &'static str,
    pub command: &'static str,
    pub success: bool,
    pub deleted: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: &'a [String],
}

impl<'a> CleanEvent<'a> {
    pub fn new(result: &'a CleanResult) -> Self {
        Self {
            event: "clean",
            command: "clean",
            success: result.is_success(),
            deleted: result.deleted.iter().map(|p| display(p)).collect(),
            skipped: result
                .skipped
                .iter()
                .map(|s| format!("{} ({})", display(&s.path), s.reason))
                .collect(),
            errors: &result.errors,
        }
    }
}

/// Emitted instead of a result when the command stopped early
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub exit_code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl<'a> ErrorEvent<'a> {
    pub fn new(command: &'a str, exit_code: i32, message: impl Into<String>, help: Option<String>) -> Self {
        Self {
            event: "error",
            command,
            exit_code,
            message: message.into(),
            help,
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
