//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `compiler/` - Nim compiler invocation and child process supervision
//! - `fs/` - Atomic publication and the artifact lock
//! - `packaging/` - In-place install, wheel and sdist assembly
//! - `python` - Runtime probe backed by the target interpreter
//! - `nimble` - Third-party Nim package installer

pub mod compiler;
pub mod fs;
pub mod nimble;
pub mod packaging;
pub mod python;

// Re-export for convenience
pub use compiler::{CompileRequest, CompilerInvoker, ProcessSupervisor};
pub use fs::{ArtifactLock, StagedFile};
pub use nimble::NimbleInstaller;
pub use packaging::{install_inplace, SdistBuilder, WheelBuilder};
pub use python::PythonProbe;
