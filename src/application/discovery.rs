//! Source discovery
//!
//! Picks the compilation entry file and computes the set of files textually
//! included into it. Entry priority, first match wins:
//!
//! 1. the explicitly configured entry point
//! 2. `<lib-name>.nim`
//! 3. `lib.nim`
//! 4. the only `.nim` file in the source directory

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::domain::entities::SourceUnit;
use crate::domain::ports::{CachedFileReader, SourceReader};
use crate::domain::services::parse_includes;
use crate::error::{DiscoveryError, NuwaResult};

pub const SOURCE_EXTENSION: &str = "nim";

pub struct SourceDiscovery<'a, R: SourceReader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: SourceReader + ?Sized> SourceDiscovery<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Entry plus inclusion closure for a resolved configuration
    pub fn discover(&self, config: &EffectiveConfig) -> NuwaResult<SourceUnit> {
        let source_dir = config.source_path();
        let entry = find_entry(
            &source_dir,
            config.entry_point.as_deref(),
            config.lib_name.as_str(),
        )?;
        let entry = canonical(&entry);
        let closure = self.inclusion_closure(&entry);
        tracing::debug!(
            entry = %entry.display(),
            files = closure.len(),
            "discovered source unit"
        );
        Ok(SourceUnit::new(entry, closure))
    }

    /// Every file reachable from `entry` through `include`, entry included.
    /// Each file is visited once, so include cycles terminate. Unreadable
    /// files are left out.
    pub fn inclusion_closure(&self, entry: &Path) -> BTreeSet<PathBuf> {
        let mut visited = BTreeSet::new();
        let mut pending = vec![entry.to_path_buf()];

        while let Some(file) = pending.pop() {
            if visited.contains(&file) {
                continue;
            }
            let Some(lines) = self.reader.read_lines(&file) else {
                if file == entry {
                    visited.insert(file);
                }
                continue;
            };
            let base = file.parent().map(Path::to_path_buf).unwrap_or_default();
            visited.insert(file);

            for name in parse_includes(&lines.join("\n")) {
                let included = canonical(&base.join(name));
                if !visited.contains(&included) {
                    pending.push(included);
                }
            }
        }
        visited
    }
}

/// Resolve the entry file inside `source_dir`
pub fn find_entry(
    source_dir: &Path,
    explicit: Option<&Path>,
    lib_name: &str,
) -> Result<PathBuf, DiscoveryError> {
    if let Some(explicit) = explicit {
        let path = source_dir.join(explicit);
        return if path.is_file() {
            Ok(path)
        } else {
            Err(DiscoveryError::NotFound {
                dir: source_dir.to_path_buf(),
                detail: Some(format!("entry point {} does not exist", explicit.display())),
            })
        };
    }

    if !source_dir.is_dir() {
        return Err(DiscoveryError::NotFound {
            dir: source_dir.to_path_buf(),
            detail: Some("directory does not exist".to_string()),
        });
    }

    for name in [format!("{lib_name}.{SOURCE_EXTENSION}"), format!("lib.{SOURCE_EXTENSION}")] {
        let path = source_dir.join(&name);
        if path.is_file() {
            return Ok(path);
        }
    }

    let candidates = source_files(source_dir);
    match candidates.as_slice() {
        [] => Err(DiscoveryError::NotFound {
            dir: source_dir.to_path_buf(),
            detail: None,
        }),
        [only] => Ok(source_dir.join(only)),
        _ => Err(DiscoveryError::Ambiguous {
            dir: source_dir.to_path_buf(),
            candidates,
        }),
    }
}

/// Sorted names of the `.nim` files directly inside `dir`
pub fn source_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == SOURCE_EXTENSION)
        })
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Canonical form when the file exists, the joined path otherwise
pub fn canonical(path: &Path) -> PathBuf {
    canonicalize_plain(path).unwrap_or_else(|| path.to_path_buf())
}

fn canonicalize_plain(path: &Path) -> Option<PathBuf> {
    let canonical = std::fs::canonicalize(path).ok()?;
    // Strip the verbatim prefix Windows adds so paths stay comparable with
    // the ones the compiler prints
    #[cfg(windows)]
    {
        let text = canonical.to_string_lossy();
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            if !stripped.starts_with("UNC") {
                return Some(PathBuf::from(stripped));
            }
        }
    }
    Some(canonical)
}

/// Discover with a fresh disk reader
pub fn discover(config: &EffectiveConfig) -> NuwaResult<SourceUnit> {
    let reader = CachedFileReader::new();
    SourceDiscovery::new(&reader).discover(config)
}
