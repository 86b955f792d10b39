//! File system helpers: atomic publication and the artifact lock

mod atomic;
mod lock;

pub use atomic::{write_atomic, StagedFile};
pub use lock::ArtifactLock;
