pub mod build;
pub mod clean;
pub mod diagnostics;
pub mod watch;
