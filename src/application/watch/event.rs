//! Watch event types and options

use std::path::PathBuf;

use serde::Serialize;

use crate::application::pipeline::ConfigRequest;
use crate::domain::entities::{BuildResult, Diagnostic, Severity};

/// Watch options
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Project root, profile and CLI overrides; re-resolved every generation
    pub request: ConfigRequest,
    /// Run the test command after each successful build
    pub run_tests: bool,
    /// Replaces `[tool.nuwa.watch] test-command`
    pub test_command: Option<String>,
    /// Rebuild on any `.nim` file under the source directory
    pub watch_all_sources: bool,
    /// `-d:release` instead of the develop defaults
    pub release: bool,
}

impl WatchOptions {
    pub fn new(request: ConfigRequest) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    pub fn with_run_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }

    pub fn with_test_command(mut self, command: Option<String>) -> Self {
        self.test_command = command;
        self
    }

    pub fn with_watch_all_sources(mut self, watch_all: bool) -> Self {
        self.watch_all_sources = watch_all;
        self
    }

    pub fn with_release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        project: String,
        watching: Vec<String>,
        debounce_ms: u64,
    },
    FileChanged {
        path: String,
    },
    BuildStarted {
        generation: u64,
    },
    /// Only emitted for the latest generation
    BuildComplete {
        generation: u64,
        success: bool,
        errors: usize,
        warnings: usize,
        duration_ms: u64,
        artifact: Option<String>,
        diagnostics: Vec<Diagnostic>,
        raw_log: Option<String>,
    },
    /// The pipeline stopped before a result existed (config, discovery, packaging)
    BuildError {
        generation: u64,
        message: String,
    },
    TestsStarted {
        command: String,
    },
    TestsComplete {
        success: bool,
        exit_code: Option<i32>,
        duration_ms: u64,
        output: String,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn build_complete(generation: u64, result: &BuildResult, artifact: Option<PathBuf>) -> Self {
        WatchEvent::BuildComplete {
            generation,
            success: result.success,
            errors: result.count(Severity::Error),
            warnings: result.count(Severity::Warning),
            duration_ms: result.duration.as_millis() as u64,
            artifact: artifact.map(|p| p.display().to_string()),
            diagnostics: result.diagnostics.clone(),
            raw_log: result.raw_log.clone(),
        }
    }

    /// Convert to JSON string with "command": "watch" and a timestamp included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
            obj.insert(
                "timestamp".to_string(),
                serde_json::json!(chrono::Utc::now().to_rfc3339()),
            );
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
