//! BuildResult entity - outcome of one compiler run

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::ExitCode;

use super::diagnostic::{Diagnostic, Severity};

/// A failed compile is a normal outcome, not an error value.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Output that matched no diagnostic pattern (linker text and the like)
    pub raw_log: Option<String>,
    /// Produced artifacts; the staged binary first, packaged outputs after
    pub artifacts: Vec<PathBuf>,
    /// `None` when the compiler was killed by a signal
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl BuildResult {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_fatal())
    }

    /// The binary the compiler wrote, if the build succeeded
    pub fn compiled_artifact(&self) -> Option<&PathBuf> {
        if self.success {
            self.artifacts.first()
        } else {
            None
        }
    }

    pub fn exit_status(&self) -> ExitCode {
        if self.success {
            ExitCode::Success
        } else {
            ExitCode::CompileFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_build_maps_to_compile_failure() {
        let result = BuildResult {
            success: false,
            diagnostics: vec![
                Diagnostic::new(Severity::Error, "a.nim", 1, 1, "boom"),
                Diagnostic::new(Severity::Hint, "a.nim", 2, 1, "unused"),
            ],
            exit_code: Some(1),
            ..BuildResult::default()
        };
        assert_eq!(result.exit_status(), ExitCode::CompileFailure);
        assert_eq!(result.count(Severity::Error), 1);
        assert_eq!(result.count(Severity::Hint), 1);
        assert_eq!(result.errors().count(), 1);
        assert!(result.compiled_artifact().is_none());
    }

    #[test]
    fn successful_build_exposes_first_artifact() {
        let result = BuildResult {
            success: true,
            artifacts: vec![PathBuf::from("build/nuwa/develop/demo_lib.so")],
            exit_code: Some(0),
            ..BuildResult::default()
        };
        assert_eq!(result.exit_status(), ExitCode::Success);
        assert_eq!(
            result.compiled_artifact(),
            Some(&PathBuf::from("build/nuwa/develop/demo_lib.so"))
        );
    }
}
