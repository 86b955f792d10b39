//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod dependency_installer;
pub mod runtime_probe;
pub mod source_reader;

pub use dependency_installer::DependencyInstaller;
pub use runtime_probe::{RuntimeProbe, StaticProbe};
pub use source_reader::{CachedFileReader, MemoryReader, SourceReader};
