//! Single-writer guard for artifact publication

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::NuwaResult;

/// Advisory exclusive lock, released on drop
#[derive(Debug)]
pub struct ArtifactLock {
    file: File,
    path: PathBuf,
}

impl ArtifactLock {
    /// Lock file under the project's build directory
    pub fn path_for(project_root: &Path) -> PathBuf {
        project_root.join("build").join("nuwa").join(".lock")
    }

    /// Block until the lock is held
    pub fn acquire(project_root: &Path) -> NuwaResult<Self> {
        let path = Self::path_for(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        file.lock_exclusive()?;
        tracing::trace!(lock = %path.display(), "artifact lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArtifactLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
