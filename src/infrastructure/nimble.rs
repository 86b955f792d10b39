//! Nimble adapter for third-party Nim packages
//!
//! Packages are installed per project under `<root>/.nimble` so builds never
//! depend on what happens to be installed globally. A fingerprint of the
//! declared list is kept next to them; nimble only runs when it changes.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::ports::DependencyInstaller;
use crate::domain::value_objects::ContentHash;
use crate::error::{NuwaError, NuwaResult};
use crate::infrastructure::compiler::ProcessSupervisor;

pub const NIMBLE_DIR: &str = ".nimble";
const DEPS_STAMP: &str = "nuwa-deps.sha256";

#[derive(Debug, Clone)]
pub struct NimbleInstaller {
    binary: String,
    supervisor: ProcessSupervisor,
}

impl Default for NimbleInstaller {
    fn default() -> Self {
        Self::new("nimble")
    }
}

impl NimbleInstaller {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            supervisor: ProcessSupervisor::new(),
        }
    }

    /// Share a supervisor so a watch stop also ends a running install
    pub fn with_supervisor(mut self, supervisor: ProcessSupervisor) -> Self {
        self.supervisor = supervisor;
        self
    }

    pub fn local_dir(project_root: &Path) -> PathBuf {
        project_root.join(NIMBLE_DIR)
    }

    fn install_one(&self, dep: &str, local_dir: &Path) -> NuwaResult<()> {
        tracing::info!(dependency = dep, "installing nimble package");
        let mut command = Command::new(&self.binary);
        command.args(["install", "-y", dep]).env("NIMBLE_DIR", local_dir);
        let output = self.supervisor.run(&mut command).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NuwaError::environment(
                    self.binary.clone(),
                    "nimble is installed with Nim; make sure Nim is properly installed",
                )
            } else {
                NuwaError::environment(self.binary.clone(), e.to_string())
            }
        })?;

        if output.terminated {
            return Err(NuwaError::Watch {
                message: format!("installing nimble dependency '{dep}' was interrupted"),
            });
        }
        if output.success() {
            return Ok(());
        }
        if is_already_installed(&output.output) {
            tracing::debug!(dependency = dep, "already installed");
            return Ok(());
        }
        Err(NuwaError::environment(
            self.binary.clone(),
            format!(
                "failed to install nimble dependency '{dep}': {}",
                output.output.trim().lines().last().unwrap_or("no output")
            ),
        ))
    }
}

fn deps_fingerprint(deps: &[String]) -> String {
    ContentHash::from_content(&deps.join("\n")).hex().to_string()
}

/// The last successful install covered exactly `deps`
fn is_up_to_date(local_dir: &Path, deps: &[String]) -> bool {
    std::fs::read_to_string(local_dir.join(DEPS_STAMP))
        .is_ok_and(|stamp| stamp.trim() == deps_fingerprint(deps))
}

fn is_already_installed(text: &str) -> bool {
    text.to_lowercase().contains("already installed")
}

/// `pkgs2` (current nimble) wins over `pkgs` (older releases)
fn existing_search_path(local_dir: &Path) -> Option<PathBuf> {
    ["pkgs2", "pkgs"]
        .iter()
        .map(|name| local_dir.join(name))
        .find(|p| p.is_dir())
}

impl DependencyInstaller for NimbleInstaller {
    fn install(&self, deps: &[String], project_root: &Path) -> NuwaResult<Option<PathBuf>> {
        let local_dir = Self::local_dir(project_root);
        if deps.is_empty() {
            return Ok(existing_search_path(&local_dir));
        }
        if let Some(search_path) = existing_search_path(&local_dir) {
            if is_up_to_date(&local_dir, deps) {
                tracing::debug!(count = deps.len(), "nimble dependencies up to date");
                return Ok(Some(search_path));
            }
        }

        std::fs::create_dir_all(&local_dir)?;
        for dep in deps {
            self.install_one(dep, &local_dir)?;
        }
        std::fs::write(local_dir.join(DEPS_STAMP), deps_fingerprint(deps))?;
        Ok(existing_search_path(&local_dir))
    }

    fn search_path(&self, project_root: &Path) -> Option<PathBuf> {
        existing_search_path(&Self::local_dir(project_root))
    }

    fn clean(&self, project_root: &Path) -> NuwaResult<Vec<PathBuf>> {
        let local_dir = Self::local_dir(project_root);
        let Ok(meta) = std::fs::symlink_metadata(&local_dir) else {
            return Ok(Vec::new());
        };
        if meta.is_dir() {
            std::fs::remove_dir_all(&local_dir)?;
        } else {
            // A symlinked cache: drop the link, never its target
            std::fs::remove_file(&local_dir)?;
        }
        Ok(vec![local_dir])
    }
}
