//! Process exit code contract

/// Exit status reported by every build-triggering command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    Success,
    /// The compiler ran and reported errors
    CompileFailure,
    /// Configuration or entry point discovery failed
    ConfigError,
    /// A required external tool is missing
    EnvironmentError,
    /// Packaging, conflict, watch shutdown or IO failure after a successful compile
    PackagingError,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::CompileFailure => 1,
            ExitCode::ConfigError => 2,
            ExitCode::EnvironmentError => 3,
            ExitCode::PackagingError => 4,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }
}
