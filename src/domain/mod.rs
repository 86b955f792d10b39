//! Domain Layer
//!
//! Build concepts without process or filesystem side effects.
//!
//! - `entities/` - Diagnostic, BuildResult, SourceUnit
//! - `value_objects/` - BuildMode, ExitCode, CompatibilityTag, ContentHash
//! - `services/` - DiagnosticTranslator, inclusion directive parsing
//! - `ports/` - Interfaces implemented by infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
