//! Clean result types

use std::path::PathBuf;

/// Reason why a path was left in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Symlinks are never followed or removed
    Symlink,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Symlink => write!(f, "symlink"),
        }
    }
}

/// A path that was skipped during clean
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedFile {
    pub fn new(path: PathBuf, reason: SkipReason) -> Self {
        Self { path, reason }
    }
}

/// Result of a clean operation
#[derive(Debug, Clone, Default)]
pub struct CleanResult {
    /// Paths that were removed
    pub deleted: Vec<PathBuf>,
    /// Paths that were skipped
    pub skipped: Vec<SkippedFile>,
    /// Per-path failures; they never stop the rest of the clean
    pub errors: Vec<String>,
}

impl CleanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_deleted(&mut self, path: PathBuf) {
        self.deleted.push(path);
    }

    pub fn add_skipped(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedFile::new(path, reason));
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
