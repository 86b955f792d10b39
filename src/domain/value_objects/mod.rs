//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod build_mode;
mod compat_tag;
mod config_warning;
mod exit_code;
mod hash;
mod identifier;
mod platform;

pub use build_mode::BuildMode;
pub use compat_tag::{CompatibilityTag, RuntimeInfo};
pub use config_warning::ConfigWarning;
pub use exit_code::ExitCode;
pub use hash::ContentHash;
pub use identifier::{normalize_module_name, Identifier};
pub use platform::OsFamily;
