//! Clean options

/// Options for the clean command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Remove the project-local dependency cache
    pub deps: bool,
    /// Remove build outputs
    pub artifacts: bool,
}

impl CleanOptions {
    /// Create new clean options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deps(mut self, deps: bool) -> Self {
        self.deps = deps;
        self
    }

    pub fn with_artifacts(mut self, artifacts: bool) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Neither flag means both
    pub fn cleans_deps(&self) -> bool {
        self.deps || !self.artifacts
    }

    pub fn cleans_artifacts(&self) -> bool {
        self.artifacts || !self.deps
    }
}
