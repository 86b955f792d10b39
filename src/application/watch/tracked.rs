//! Tracked file set with content hashes
//!
//! Decides whether a filesystem event is a real change to something the
//! build depends on. Editors that rewrite a file with identical bytes are
//! filtered out by comparing SHA-256 hashes.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::application::discovery::{canonical, SOURCE_EXTENSION};
use crate::domain::entities::SourceUnit;
use crate::domain::value_objects::ContentHash;

/// Why a change matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A file in the inclusion closure (or any source with `watch_all`)
    Source,
    /// A `.nim` file appeared in or vanished from the source directory;
    /// entry discovery may pick a different file
    Discovery,
    /// `pyproject.toml`; the next generation re-resolves everything
    Config,
}

#[derive(Debug, Default)]
pub struct TrackedFiles {
    config_file: PathBuf,
    source_dir: PathBuf,
    closure: BTreeSet<PathBuf>,
    watch_all: bool,
    /// Map of file path to content hash
    hashes: HashMap<PathBuf, ContentHash>,
}

impl TrackedFiles {
    pub fn new(config_file: &Path, source_dir: &Path, watch_all: bool) -> Self {
        let mut tracked = Self {
            config_file: canonical(config_file),
            source_dir: canonical(source_dir),
            closure: BTreeSet::new(),
            watch_all,
            hashes: HashMap::new(),
        };
        let config_file = tracked.config_file.clone();
        tracked.seed(&config_file);
        for file in tracked.source_files() {
            tracked.seed(&file);
        }
        tracked
    }

    /// Replace the closure after a fresh discovery
    pub fn update(&mut self, source_dir: &Path, unit: &SourceUnit) {
        let source_dir = canonical(source_dir);
        if source_dir != self.source_dir {
            self.source_dir = source_dir;
            for file in self.source_files() {
                self.seed(&file);
            }
        }
        self.closure = unit.closure().iter().map(|p| canonical(p)).collect();
        for file in self.closure.clone() {
            self.seed(&file);
        }
    }

    pub fn closure(&self) -> &BTreeSet<PathBuf> {
        &self.closure
    }

    /// Classify one event path; `None` for untracked files and no-op writes
    pub fn classify(&mut self, path: &Path) -> Option<ChangeKind> {
        let path = normalize(path);

        if path == self.config_file {
            return self.content_changed(&path).then_some(ChangeKind::Config);
        }
        if !path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            return None;
        }

        let in_source_dir = path.parent() == Some(self.source_dir.as_path());
        let known = self.hashes.contains_key(&path);
        let exists = path.is_file();
        if in_source_dir && known != exists {
            self.content_changed(&path);
            return Some(ChangeKind::Discovery);
        }

        let tracked = self.closure.contains(&path)
            || (self.watch_all && path.starts_with(&self.source_dir));
        if tracked && self.content_changed(&path) {
            return Some(ChangeKind::Source);
        }
        None
    }

    /// Update the stored hash; true when it differs from before
    fn content_changed(&mut self, path: &Path) -> bool {
        match ContentHash::of_file(path) {
            Some(hash) => self.hashes.insert(path.to_path_buf(), hash.clone()) != Some(hash),
            None => self.hashes.remove(path).is_some(),
        }
    }

    fn seed(&mut self, path: &Path) {
        if self.hashes.contains_key(path) {
            return;
        }
        if let Some(hash) = ContentHash::of_file(path) {
            self.hashes.insert(path.to_path_buf(), hash);
        }
    }

    /// Source files whose creation or change is watched from the start
    fn source_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut dirs = vec![self.source_dir.clone()];
        while let Some(dir) = dirs.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                let Ok(kind) = entry.file_type() else {
                    continue;
                };
                if kind.is_dir() && self.watch_all {
                    dirs.push(path);
                } else if kind.is_file() && path.extension().is_some_and(|e| e == SOURCE_EXTENSION) {
                    files.push(canonical(&path));
                }
            }
        }
        files
    }
}

/// Canonical path, also for files that were just deleted
fn normalize(path: &Path) -> PathBuf {
    if path.exists() {
        return canonical(path);
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => canonical(parent).join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, TrackedFiles) {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("pyproject.toml"), "[project]\nname = \"demo\"\n").unwrap();
        std::fs::create_dir_all(root.join("nim/sub")).unwrap();
        std::fs::write(root.join("nim/demo_lib.nim"), "include helpers\n").unwrap();
        std::fs::write(root.join("nim/helpers.nim"), "proc a() = discard\n").unwrap();
        std::fs::write(root.join("nim/sub/other.nim"), "").unwrap();

        let mut tracked = TrackedFiles::new(&root.join("pyproject.toml"), &root.join("nim"), false);
        let unit = SourceUnit::new(
            canonical(&root.join("nim/demo_lib.nim")),
            [canonical(&root.join("nim/helpers.nim"))],
        );
        tracked.update(&root.join("nim"), &unit);
        (dir, tracked)
    }

    #[test]
    fn identical_rewrite_is_noise() {
        let (dir, mut tracked) = setup();
        let helpers = dir.path().join("nim/helpers.nim");
        std::fs::write(&helpers, "proc a() = discard\n").unwrap();
        assert_eq!(tracked.classify(&helpers), None);

        std::fs::write(&helpers, "proc a() = echo 1\n").unwrap();
        assert_eq!(tracked.classify(&helpers), Some(ChangeKind::Source));
        assert_eq!(tracked.classify(&helpers), None);
    }

    #[test]
    fn config_changes_are_reported() {
        let (dir, mut tracked) = setup();
        let config = dir.path().join("pyproject.toml");
        std::fs::write(&config, "[project]\nname = \"demo2\"\n").unwrap();
        assert_eq!(tracked.classify(&config), Some(ChangeKind::Config));
    }

    #[test]
    fn untracked_sources_are_ignored_unless_watch_all() {
        let (dir, mut tracked) = setup();
        let other = dir.path().join("nim/sub/other.nim");
        std::fs::write(&other, "proc b() = discard\n").unwrap();
        assert_eq!(tracked.classify(&other), None);

        let mut all = TrackedFiles::new(
            &dir.path().join("pyproject.toml"),
            &dir.path().join("nim"),
            true,
        );
        std::fs::write(&other, "proc c() = discard\n").unwrap();
        assert_eq!(all.classify(&other), Some(ChangeKind::Source));
    }

    #[test]
    fn new_and_removed_sources_trigger_discovery() {
        let (dir, mut tracked) = setup();
        let fresh = dir.path().join("nim/fresh.nim");
        std::fs::write(&fresh, "").unwrap();
        assert_eq!(tracked.classify(&fresh), Some(ChangeKind::Discovery));

        std::fs::remove_file(&fresh).unwrap();
        assert_eq!(tracked.classify(&fresh), Some(ChangeKind::Discovery));
    }

    #[test]
    fn non_source_files_are_ignored() {
        let (dir, mut tracked) = setup();
        let notes = dir.path().join("nim/notes.txt");
        std::fs::write(&notes, "x").unwrap();
        assert_eq!(tracked.classify(&notes), None);
    }
}
