//! Clean Use Case
//!
//! Orchestrates the removal of build outputs and dependency caches.

use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::domain::ports::DependencyInstaller;
use crate::domain::value_objects::OsFamily;

use super::options::CleanOptions;
use super::result::{CleanResult, SkipReason};

/// Directories under the project root that only ever hold build outputs
pub const ARTIFACT_DIRS: &[&str] = &["nimcache", "build", "dist"];

/// Clean use case - removes build outputs and delegates dependency cleanup
pub struct CleanUseCase<I>
where
    I: DependencyInstaller,
{
    installer: I,
}

impl<I> CleanUseCase<I>
where
    I: DependencyInstaller,
{
    pub fn new(installer: I) -> Self {
        Self { installer }
    }

    /// `config` is `None` when the project file could not be resolved; the
    /// in-place library is then left alone and the reason recorded.
    pub fn execute(
        &self,
        project_root: &Path,
        config: Option<&EffectiveConfig>,
        options: &CleanOptions,
        os: OsFamily,
    ) -> CleanResult {
        let mut result = CleanResult::new();

        if options.cleans_artifacts() {
            for dir in ARTIFACT_DIRS {
                remove_path(&project_root.join(dir), &mut result);
            }
            match config {
                Some(config) => {
                    for path in inplace_candidates(config, os) {
                        remove_path(&path, &mut result);
                    }
                }
                None => result.add_error(
                    "could not resolve pyproject.toml; skipped the in-place compiled library"
                        .to_string(),
                ),
            }
        }

        if options.cleans_deps() {
            match self.installer.clean(project_root) {
                Ok(removed) => result.deleted.extend(removed),
                Err(e) => result.add_error(format!("failed to clean dependencies: {e}")),
            }
        }

        tracing::info!(
            deleted = result.deleted.len(),
            errors = result.errors.len(),
            "clean finished"
        );
        result
    }
}

/// The compiled library in both conventional package locations plus the
/// configured one
fn inplace_candidates(config: &EffectiveConfig, os: OsFamily) -> Vec<PathBuf> {
    let file = config.library_file_name(os);
    let module = config.module_name.as_str();
    let mut candidates = vec![
        config.project_root.join(module).join(&file),
        config.project_root.join("src").join(module).join(&file),
        config.inplace_artifact(os),
    ];
    candidates.sort();
    candidates.dedup();
    candidates
}

fn remove_path(path: &Path, result: &mut CleanResult) {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return;
    };
    if meta.file_type().is_symlink() {
        result.add_skipped(path.to_path_buf(), SkipReason::Symlink);
        return;
    }
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match removed {
        Ok(()) => result.add_deleted(path.to_path_buf()),
        Err(e) => result.add_error(format!("failed to remove {}: {e}", path.display())),
    }
}
