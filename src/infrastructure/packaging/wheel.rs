//! Wheel assembly
//!
//! Entries are collected in memory, sorted by archive path, and written with
//! fixed timestamps so the same inputs always produce the same bytes.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::EffectiveConfig;
use crate::domain::value_objects::{CompatibilityTag, OsFamily};
use crate::error::{NuwaError, NuwaResult};
use crate::infrastructure::fs::StagedFile;

use super::metadata::{
    dist_info_dir, metadata_file, normalize_dist_name, normalize_dist_version, record_file,
    wheel_file,
};
use super::mingw::MingwRuntime;

const COMPILED_EXTENSIONS: &[&str] = &["so", "pyd", "dylib", "dll"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    content: Vec<u8>,
    executable: bool,
}

/// Builds `<name>-<version>-<tag>.whl` from a compiled library
#[derive(Debug, Clone)]
pub struct WheelBuilder<'a> {
    config: &'a EffectiveConfig,
    tag: CompatibilityTag,
    os: OsFamily,
    dist_dir: PathBuf,
    force: bool,
    /// Looked up from the environment when unset
    mingw: Option<MingwRuntime>,
}

impl<'a> WheelBuilder<'a> {
    pub fn new(config: &'a EffectiveConfig, tag: CompatibilityTag, os: OsFamily) -> Self {
        Self {
            config,
            tag,
            os,
            dist_dir: config.project_root.join("dist"),
            force: false,
            mingw: None,
        }
    }

    /// Relative paths are taken from the project root
    pub fn with_dist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dist_dir = self.config.project_root.join(dir.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Where Windows wheels look for the MinGW runtime DLLs
    pub fn with_mingw_runtime(mut self, runtime: MingwRuntime) -> Self {
        self.mingw = Some(runtime);
        self
    }

    pub fn file_name(&self) -> NuwaResult<String> {
        let name = dist_name(self.config)?;
        Ok(format!(
            "{}-{}-{}.whl",
            normalize_dist_name(name),
            normalize_dist_version(&self.config.metadata.version),
            self.tag
        ))
    }

    pub fn target(&self) -> NuwaResult<PathBuf> {
        Ok(self.dist_dir.join(self.file_name()?))
    }

    /// Assemble and publish the wheel, returning its path
    pub fn build(&self, compiled: &Path) -> NuwaResult<PathBuf> {
        let target = self.target()?;
        if target.exists() && !self.force {
            return Err(NuwaError::Conflict { path: target });
        }

        let entries = self.collect(compiled)?;
        tracing::info!(
            wheel = %target.display(),
            entries = entries.len(),
            "writing wheel"
        );

        let mut staged = StagedFile::create_empty(&target)?;
        {
            let mut zip = ZipWriter::new(staged.file_mut());
            for (path, entry) in &entries {
                let mode = if entry.executable { 0o755 } else { 0o644 };
                let options = SimpleFileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .last_modified_time(DateTime::default())
                    .unix_permissions(mode);
                zip.start_file(path.as_str(), options)?;
                zip.write_all(&entry.content)?;
            }
            zip.finish()?;
        }
        staged.file_mut().sync_all()?;

        if self.force {
            staged.commit()
        } else {
            staged.commit_new()
        }
    }

    /// Every archive entry, including the generated `.dist-info` files
    fn collect(&self, compiled: &Path) -> NuwaResult<BTreeMap<String, Entry>> {
        let config = self.config;
        let module = config.module_name.as_str();
        let lib = config.lib_name.as_str();
        let package_dir = config.package_dir();
        let mut entries = BTreeMap::new();

        if package_dir.is_dir() {
            for (relative, absolute) in walk(&package_dir, true)? {
                if is_stale_library(&relative, lib) {
                    tracing::debug!(path = %absolute.display(), "skipping stale compiled library");
                    continue;
                }
                insert_file(&mut entries, format!("{module}/{relative}"), &absolute, false)?;
            }
        }

        for declared in &config.package_data {
            check_package_data_path(declared)?;
            let path = package_dir.join(declared);
            if path.is_dir() {
                for (relative, absolute) in walk(&path, false)? {
                    let archive = format!("{module}/{}/{relative}", slash_path(Path::new(declared)));
                    insert_file(&mut entries, archive, &absolute, false)?;
                }
            } else if path.is_file() {
                let archive = format!("{module}/{}", slash_path(Path::new(declared)));
                insert_file(&mut entries, archive, &path, false)?;
            } else {
                return Err(NuwaError::packaging(format!(
                    "package-data entry '{declared}' does not exist ({})",
                    path.display()
                )));
            }
        }

        let binary = format!("{module}/{}", config.library_file_name(self.os));
        insert_file(&mut entries, binary, compiled, true)?;

        if self.os == OsFamily::Windows {
            self.bundle_mingw_runtime(&mut entries)?;
        }

        let stub = compiled.with_file_name(format!("{lib}.pyi"));
        let stub_archive = format!("{module}/{lib}.pyi");
        if stub.is_file() && !entries.contains_key(&stub_archive) {
            insert_file(&mut entries, stub_archive, &stub, false)?;
        }

        let name = dist_name(config)?;
        let dist_info = dist_info_dir(
            &normalize_dist_name(name),
            &normalize_dist_version(&config.metadata.version),
        );
        entries.insert(
            format!("{dist_info}/WHEEL"),
            generated(wheel_file(&self.tag)),
        );
        entries.insert(
            format!("{dist_info}/METADATA"),
            generated(metadata_file(name, &config.metadata)),
        );

        let record_path = format!("{dist_info}/RECORD");
        let record = record_file(
            entries
                .iter()
                .map(|(path, entry)| (path.as_str(), entry.content.as_slice())),
            &record_path,
        );
        entries.insert(record_path, generated(record));

        Ok(entries)
    }

    /// Runtime DLLs go next to the `.pyd`, where Windows looks first
    fn bundle_mingw_runtime(&self, entries: &mut BTreeMap<String, Entry>) -> NuwaResult<()> {
        let runtime = self
            .mingw
            .clone()
            .unwrap_or_else(|| MingwRuntime::from_env(&self.config.compiler));
        let found = runtime.find();
        if found.is_empty() {
            tracing::warn!(
                searched = ?runtime.search_dirs(),
                "no MinGW runtime DLLs found; the wheel will need MinGW on PATH to import"
            );
        }
        for (name, source) in found {
            tracing::info!(dll = name, source = %source.display(), "bundling MinGW runtime");
            insert_file(entries, format!("{}/{name}", self.config.module_name), &source, false)?;
        }
        Ok(())
    }
}

/// Package data must stay inside the package directory
fn check_package_data_path(declared: &str) -> NuwaResult<()> {
    let escapes = Path::new(declared).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    // Backslash separators only split components on Windows
    if escapes || declared.split(['/', '\\']).any(|part| part == "..") {
        return Err(NuwaError::packaging(format!(
            "package-data entry '{declared}' must be a relative path inside the package"
        )));
    }
    Ok(())
}

fn dist_name(config: &EffectiveConfig) -> NuwaResult<&str> {
    config
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| NuwaError::config("building a wheel requires [project].name in pyproject.toml"))
}

fn generated(text: String) -> Entry {
    Entry {
        content: text.into_bytes(),
        executable: false,
    }
}

fn insert_file(
    entries: &mut BTreeMap<String, Entry>,
    archive: String,
    source: &Path,
    executable: bool,
) -> NuwaResult<()> {
    let content = std::fs::read(source).map_err(|e| {
        NuwaError::packaging(format!("cannot read {}: {e}", source.display()))
    })?;
    entries.insert(
        archive,
        Entry {
            content,
            executable,
        },
    );
    Ok(())
}

/// Files under `root` as (`/`-separated relative path, absolute path).
/// With `filtered`, ignore files are honoured and bytecode caches skipped.
fn walk(root: &Path, filtered: bool) -> NuwaResult<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    let walker = WalkBuilder::new(root)
        .standard_filters(filtered)
        .hidden(false)
        .require_git(false)
        .follow_links(false)
        .filter_entry(move |entry| !(filtered && entry.file_name() == "__pycache__"))
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| NuwaError::packaging(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if filtered
            && path
                .extension()
                .is_some_and(|ext| ext == "pyc" || ext == "pyo")
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        files.push((slash_path(relative), path.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Earlier in-place builds of the library, e.g. `demo_lib.so` or
/// `demo_lib.cpython-312-x86_64-linux-gnu.so`
fn is_stale_library(relative: &str, lib: &str) -> bool {
    if relative.contains('/') {
        return false;
    }
    let Some(rest) = relative.strip_prefix(lib).and_then(|r| r.strip_prefix('.')) else {
        return false;
    };
    rest.rsplit('.')
        .next()
        .is_some_and(|ext| COMPILED_EXTENSIONS.contains(&ext))
}
