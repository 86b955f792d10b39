//! Source archive (`.tar.gz`) of the project tree

use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use ignore::WalkBuilder;
use tar::{Builder, Header};

use crate::config::EffectiveConfig;
use crate::error::{NuwaError, NuwaResult};
use crate::infrastructure::fs::StagedFile;

use super::metadata::{metadata_file, normalize_dist_name, normalize_dist_version};

/// Top-level directories never shipped in a source archive
const EXCLUDED_DIRS: &[&str] = &["build", "dist", "nimcache", ".nimble", ".git"];

/// 1980-01-01T00:00:00Z, matching the wheel timestamps
const FIXED_MTIME: u64 = 315_532_800;

#[derive(Debug, Clone)]
pub struct SdistBuilder<'a> {
    config: &'a EffectiveConfig,
    dist_dir: PathBuf,
    force: bool,
}

impl<'a> SdistBuilder<'a> {
    pub fn new(config: &'a EffectiveConfig) -> Self {
        Self {
            config,
            dist_dir: config.project_root.join("dist"),
            force: false,
        }
    }

    pub fn with_dist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dist_dir = self.config.project_root.join(dir.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    fn base_name(&self) -> NuwaResult<String> {
        let name = self.config.metadata.name.as_deref().ok_or_else(|| {
            NuwaError::config("building an sdist requires [project].name in pyproject.toml")
        })?;
        Ok(format!(
            "{}-{}",
            normalize_dist_name(name),
            normalize_dist_version(&self.config.metadata.version)
        ))
    }

    pub fn target(&self) -> NuwaResult<PathBuf> {
        Ok(self.dist_dir.join(format!("{}.tar.gz", self.base_name()?)))
    }

    pub fn build(&self) -> NuwaResult<PathBuf> {
        let target = self.target()?;
        if target.exists() && !self.force {
            return Err(NuwaError::Conflict { path: target });
        }
        let base = self.base_name()?;
        let files = self.files()?;
        tracing::info!(sdist = %target.display(), files = files.len(), "writing sdist");

        let mut staged = StagedFile::create_empty(&target)?;
        {
            let encoder = GzEncoder::new(staged.file_mut(), Compression::default());
            let mut tar = Builder::new(encoder);

            let name = self.config.metadata.name.as_deref().unwrap_or_default();
            let pkg_info = metadata_file(name, &self.config.metadata);
            append(&mut tar, &format!("{base}/PKG-INFO"), pkg_info.as_bytes(), 0o644)?;

            for (relative, absolute) in &files {
                let content = std::fs::read(absolute)?;
                append(&mut tar, &format!("{base}/{relative}"), &content, mode_of(absolute))?;
            }
            tar.into_inner()?.finish()?;
        }
        staged.file_mut().sync_all()?;

        if self.force {
            staged.commit()
        } else {
            staged.commit_new()
        }
    }

    /// Project files, sorted, as (`/`-separated relative path, absolute path)
    fn files(&self) -> NuwaResult<Vec<(String, PathBuf)>> {
        let root = self.config.project_root.clone();
        let dist_dir = self.dist_dir.clone();
        let filter_root = root.clone();
        let walker = WalkBuilder::new(&root)
            .hidden(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let path = entry.path();
                if path == dist_dir {
                    return false;
                }
                match path.strip_prefix(&filter_root) {
                    Ok(rel) if rel.components().count() == 1 => !EXCLUDED_DIRS
                        .iter()
                        .any(|d| rel.as_os_str() == *d),
                    _ => true,
                }
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| NuwaError::packaging(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((relative, entry.path().to_path_buf()));
        }
        files.sort();
        Ok(files)
    }
}

fn append<W: std::io::Write>(
    tar: &mut Builder<W>,
    path: &str,
    content: &[u8],
    mode: u32,
) -> NuwaResult<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(mode);
    header.set_mtime(FIXED_MTIME);
    header.set_uid(0);
    header.set_gid(0);
    tar.append_data(&mut header, path, content)?;
    Ok(())
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) if meta.permissions().mode() & 0o111 != 0 => 0o755,
        _ => 0o644,
    }
}

#[cfg(not(unix))]
fn mode_of(_path: &Path) -> u32 {
    0o644
}
