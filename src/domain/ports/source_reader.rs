//! SourceReader port - best-effort access to source lines for diagnostics

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Reads source files so diagnostics can show surrounding lines.
///
/// Failure is never an error: the caller simply shows no context.
pub trait SourceReader {
    fn read_lines(&self, path: &Path) -> Option<Vec<String>>;
}

/// Reads from disk on first request and remembers the result per path.
///
/// Files are read without locking; a concurrent edit may yield a newer
/// version than the compiler saw.
#[derive(Debug, Default)]
pub struct CachedFileReader {
    cache: Mutex<HashMap<PathBuf, Option<Vec<String>>>>,
}

impl CachedFileReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceReader for CachedFileReader {
    fn read_lines(&self, path: &Path) -> Option<Vec<String>> {
        let mut cache = self.cache.lock().ok()?;
        cache
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                std::fs::read_to_string(path)
                    .ok()
                    .map(|s| s.lines().map(str::to_string).collect())
            })
            .clone()
    }
}

/// In-memory reader for tests
#[derive(Debug, Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl SourceReader for MemoryReader {
    fn read_lines(&self, path: &Path) -> Option<Vec<String>> {
        self.files
            .get(path)
            .map(|s| s.lines().map(str::to_string).collect())
    }
}
