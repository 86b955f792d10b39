//! DependencyInstaller port - fetches third-party Nim packages

use std::path::{Path, PathBuf};

use crate::error::NuwaResult;

pub trait DependencyInstaller {
    /// Install `deps` for the project. Returns the package search path to
    /// hand to the compiler, or `None` when nothing is installed locally.
    fn install(&self, deps: &[String], project_root: &Path) -> NuwaResult<Option<PathBuf>>;

    /// Search path of an existing local install, without installing anything
    fn search_path(&self, project_root: &Path) -> Option<PathBuf>;

    /// Remove the local package cache. Returns the removed paths.
    fn clean(&self, project_root: &Path) -> NuwaResult<Vec<PathBuf>>;
}
