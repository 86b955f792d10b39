//! Domain Entities
//!
//! - `Diagnostic` - one located compiler message
//! - `BuildResult` - outcome of a compiler run
//! - `SourceUnit` - entry file plus its inclusion closure

mod build_result;
mod diagnostic;
mod source_unit;

pub use build_result::BuildResult;
pub use diagnostic::{ContextLine, Diagnostic, Severity};
pub use source_unit::SourceUnit;
