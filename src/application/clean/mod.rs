//! Clean Use Case
//!
//! Removes build outputs and the project-local dependency cache.
//!
//! This module handles:
//! - Build directories (`nimcache/`, `build/`, `dist/`)
//! - The in-place compiled library in `<module>/` and `src/<module>/`
//! - Delegating dependency cache removal to the installer

mod options;
mod result;
mod use_case;

pub use options::CleanOptions;
pub use result::{CleanResult, SkipReason, SkippedFile};
pub use use_case::{CleanUseCase, ARTIFACT_DIRS};
