//! Atomic file publication
//!
//! Content is written to a temporary file in the target's directory and only
//! becomes visible through a rename. Dropping a [`StagedFile`] without
//! committing removes the temporary file and leaves the target untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{NuwaError, NuwaResult};

/// A fully written temporary file waiting to replace `target`
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Write `content` next to `target`, creating parent directories
    pub fn write(target: &Path, content: &[u8]) -> NuwaResult<Self> {
        let mut temp = Self::create(target)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Copy `source` next to `target`
    pub fn copy_from(source: &Path, target: &Path) -> NuwaResult<Self> {
        let mut temp = Self::create(target)?;
        let mut input = std::fs::File::open(source)?;
        std::io::copy(&mut input, &mut temp)?;
        temp.as_file().sync_all()?;
        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Empty temporary file next to `target`, for streaming writers
    pub fn create_empty(target: &Path) -> NuwaResult<Self> {
        Ok(Self {
            temp: Self::create(target)?,
            target: target.to_path_buf(),
        })
    }

    fn create(target: &Path) -> NuwaResult<NamedTempFile> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;
        Ok(tempfile::Builder::new()
            .prefix(".nuwa-")
            .suffix(".tmp")
            .tempfile_in(parent)?)
    }

    pub fn file_mut(&mut self) -> &mut std::fs::File {
        self.temp.as_file_mut()
    }

    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    #[cfg(unix)]
    pub fn set_executable(&self) -> NuwaResult<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(self.temp.path(), std::fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn set_executable(&self) -> NuwaResult<()> {
        Ok(())
    }

    /// Rename over the target, replacing anything there
    pub fn commit(self) -> NuwaResult<PathBuf> {
        self.temp
            .persist(&self.target)
            .map_err(|e| NuwaError::Io(e.error))?;
        Ok(self.target)
    }

    /// Rename only if the target does not exist yet
    pub fn commit_new(self) -> NuwaResult<PathBuf> {
        match self.temp.persist_noclobber(&self.target) {
            Ok(_) => Ok(self.target),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(NuwaError::Conflict { path: self.target })
            }
            Err(e) => Err(NuwaError::Io(e.error)),
        }
    }
}

/// Write `content` to `path` atomically, replacing any previous file
pub fn write_atomic(path: &Path, content: &[u8]) -> NuwaResult<()> {
    StagedFile::write(path, content)?.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pkg/demo_lib.so");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn interrupted_publish_leaves_target_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo_lib.so");
        std::fs::write(&path, b"previous build").unwrap();

        let staged = StagedFile::write(&path, b"new build").unwrap();
        let temp = staged.temp_path().to_path_buf();
        assert!(temp.exists());
        drop(staged);

        assert_eq!(std::fs::read(&path).unwrap(), b"previous build");
        assert!(!temp.exists());
    }

    #[test]
    fn interrupted_first_publish_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo_lib.so");
        drop(StagedFile::write(&path, b"partial").unwrap());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn commit_new_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.whl");
        std::fs::write(&path, b"old").unwrap();

        let err = StagedFile::write(&path, b"new")
            .unwrap()
            .commit_new()
            .unwrap_err();
        assert!(matches!(err, NuwaError::Conflict { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn copy_from_commits_bytes() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("staged.so");
        std::fs::write(&source, b"\x7fELF").unwrap();
        let target = dir.path().join("pkg/demo_lib.so");

        StagedFile::copy_from(&source, &target)
            .unwrap()
            .commit()
            .unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"\x7fELF");
    }
}
