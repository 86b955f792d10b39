//! SourceUnit entity - an entry file and everything it textually includes

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    entry: PathBuf,
    /// Always contains `entry`
    closure: BTreeSet<PathBuf>,
}

impl SourceUnit {
    pub fn new(entry: PathBuf, closure: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut closure: BTreeSet<PathBuf> = closure.into_iter().collect();
        closure.insert(entry.clone());
        Self { entry, closure }
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn closure(&self) -> &BTreeSet<PathBuf> {
        &self.closure
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.closure.contains(path)
    }

    pub fn len(&self) -> usize {
        self.closure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closure.is_empty()
    }
}
