//! Configuration resolution
//!
//! Precedence, lowest first:
//! 1. Built-in defaults
//! 2. `[project]` / `[tool.nuwa]` (after NUWA_* environment overrides)
//! 3. Profile flags, appended to the project flags
//! 4. CLI overrides, field by field; CLI flags are appended last

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::value_objects::{normalize_module_name, Identifier, OsFamily};
use crate::error::{NuwaError, NuwaResult};

use super::types::ProjectConfig;

pub const DEFAULT_SOURCE_DIR: &str = "nim";
pub const DEFAULT_PROJECT_NAME: &str = "nuwa_project";
pub const DEFAULT_VERSION: &str = "0.1.0";
pub const DEFAULT_BINDINGS: &str = "nimpy";
pub const DEFAULT_COMPILER: &str = "nim";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TEST_COMMAND: &str = "pytest -v";

/// CLI overrides accepted by every build-triggering command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub module_name: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub entry_point: Option<PathBuf>,
    pub output_location: Option<String>,
    /// Appended after base and profile flags
    pub nim_flags: Vec<String>,
}

impl Overrides {
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    pub fn with_entry_point(mut self, entry: impl Into<PathBuf>) -> Self {
        self.entry_point = Some(entry.into());
        self
    }

    pub fn with_output_location(mut self, location: impl Into<String>) -> Self {
        self.output_location = Some(location.into());
        self
    }

    pub fn with_nim_flags(mut self, flags: Vec<String>) -> Self {
        self.nim_flags = flags;
        self
    }
}

/// Where the in-place artifact and package sources live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    /// `<module>/` at the project root
    Auto,
    /// `src/<module>/`
    Src,
    /// Explicit directory, relative to the project root unless absolute
    Path(PathBuf),
}

impl OutputLocation {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "auto" => OutputLocation::Auto,
            "src" => OutputLocation::Src,
            other => OutputLocation::Path(PathBuf::from(other)),
        }
    }
}

/// Watch loop policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub debounce: Duration,
    pub test_command: String,
    /// Kill an in-flight build when pyproject.toml changes
    pub abort_on_config_change: bool,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            test_command: DEFAULT_TEST_COMMAND.to_string(),
            abort_on_config_change: false,
        }
    }
}

/// Distribution metadata taken from `[project]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// `None` when `[project].name` is absent; archives require it
    pub name: Option<String>,
    pub version: String,
    pub summary: Option<String>,
    pub requires_python: Option<String>,
    pub dependencies: Vec<String>,
    pub optional_dependencies: BTreeMap<String, Vec<String>>,
}

/// Fully resolved configuration for one build generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub project_root: PathBuf,
    /// As configured, relative to the project root unless absolute
    pub source_dir: PathBuf,
    pub module_name: Identifier,
    pub lib_name: Identifier,
    /// Only set when the user named one
    pub entry_point: Option<PathBuf>,
    pub output_location: OutputLocation,
    /// Base ++ profile ++ CLI, in order, never deduplicated
    pub nim_flags: Vec<String>,
    pub profiles: BTreeMap<String, Vec<String>>,
    pub active_profile: Option<String>,
    pub bindings: String,
    pub nimble_deps: Vec<String>,
    pub package_data: Vec<String>,
    pub compiler: String,
    pub python: String,
    pub watch: WatchSettings,
    pub metadata: ProjectMetadata,
}

impl EffectiveConfig {
    /// Absolute-ish source directory (joined to the project root)
    pub fn source_path(&self) -> PathBuf {
        self.project_root.join(&self.source_dir)
    }

    /// Directory holding the Python package and the in-place artifact
    pub fn package_dir(&self) -> PathBuf {
        match &self.output_location {
            OutputLocation::Auto => self.project_root.join(self.module_name.as_str()),
            OutputLocation::Src => self
                .project_root
                .join("src")
                .join(self.module_name.as_str()),
            OutputLocation::Path(p) => self.project_root.join(p),
        }
    }

    pub fn library_file_name(&self, os: OsFamily) -> String {
        os.library_file_name(self.lib_name.as_str())
    }

    /// Where `develop` puts the compiled library
    pub fn inplace_artifact(&self, os: OsFamily) -> PathBuf {
        self.package_dir().join(self.library_file_name(os))
    }

    pub fn config_file(&self) -> PathBuf {
        super::loader::config_path(&self.project_root)
    }
}

/// Merges defaults, project keys, a profile and CLI overrides.
///
/// The only filesystem access is the existence check for an explicitly
/// named entry point.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    profile: Option<String>,
    overrides: Overrides,
}

impl ConfigResolver {
    pub fn new(profile: Option<String>, overrides: Overrides) -> Self {
        Self { profile, overrides }
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn resolve(&self, project: &ProjectConfig, project_root: &Path) -> NuwaResult<EffectiveConfig> {
        let nuwa = project.nuwa();
        let table = project.project.clone().unwrap_or_default();

        let project_name = table
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

        let module_raw = self
            .overrides
            .module_name
            .clone()
            .or_else(|| nuwa.module_name.clone())
            .unwrap_or_else(|| normalize_module_name(&project_name));
        let module_name = Identifier::parse(&module_raw)?;

        let lib_raw = nuwa
            .lib_name
            .clone()
            .unwrap_or_else(|| format!("{}_lib", module_name));
        let lib_name = Identifier::parse(&lib_raw)
            .map_err(|_| NuwaError::config(format!("lib-name '{lib_raw}' is not a valid Python identifier")))?;

        let source_dir = self
            .overrides
            .source_dir
            .clone()
            .or_else(|| nuwa.nim_source.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
        if source_dir.as_os_str().is_empty() || source_dir.to_string_lossy().trim().is_empty() {
            return Err(NuwaError::config("nim-source cannot be empty"));
        }

        let profiles: BTreeMap<String, Vec<String>> = nuwa
            .profiles
            .iter()
            .map(|(name, flags)| (name.clone(), flags.nim_flags.clone()))
            .collect();

        let mut nim_flags = nuwa.nim_flags.clone().unwrap_or_default();
        if let Some(name) = &self.profile {
            let Some(profile_flags) = profiles.get(name) else {
                let available = if profiles.is_empty() {
                    "none defined".to_string()
                } else {
                    profiles.keys().cloned().collect::<Vec<_>>().join(", ")
                };
                return Err(NuwaError::config(format!(
                    "unknown profile '{name}' (available: {available})"
                )));
            };
            nim_flags.extend(profile_flags.iter().cloned());
        }
        nim_flags.extend(self.overrides.nim_flags.iter().cloned());

        let entry_point = self
            .overrides
            .entry_point
            .clone()
            .or_else(|| nuwa.entry_point.as_ref().map(PathBuf::from));
        if let Some(entry) = &entry_point {
            let full = project_root.join(&source_dir).join(entry);
            if !full.is_file() {
                return Err(NuwaError::config(format!(
                    "entry point {} does not exist",
                    full.display()
                )));
            }
        }

        let output_location = self
            .overrides
            .output_location
            .as_deref()
            .or(nuwa.output_location.as_deref())
            .map(OutputLocation::parse)
            .unwrap_or(OutputLocation::Auto);

        let watch = WatchSettings {
            debounce: Duration::from_millis(nuwa.watch.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
            test_command: nuwa
                .watch
                .test_command
                .clone()
                .unwrap_or_else(|| DEFAULT_TEST_COMMAND.to_string()),
            abort_on_config_change: nuwa.watch.abort_on_config_change.unwrap_or(false),
        };

        let metadata = ProjectMetadata {
            name: table.name.clone(),
            version: table
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            summary: table.description.clone(),
            requires_python: table.requires_python.clone(),
            dependencies: table.dependencies.clone(),
            optional_dependencies: table.optional_dependencies.clone(),
        };

        Ok(EffectiveConfig {
            project_root: project_root.to_path_buf(),
            source_dir,
            module_name,
            lib_name,
            entry_point,
            output_location,
            nim_flags,
            profiles,
            active_profile: self.profile.clone(),
            bindings: nuwa
                .bindings
                .clone()
                .unwrap_or_else(|| DEFAULT_BINDINGS.to_string()),
            nimble_deps: nuwa.nimble_deps.clone().unwrap_or_default(),
            package_data: nuwa.package_data.clone().unwrap_or_default(),
            compiler: nuwa
                .compiler
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            python: nuwa.python.clone().unwrap_or_else(default_python),
            watch,
            metadata,
        })
    }
}

fn default_python() -> String {
    if cfg!(windows) { "python" } else { "python3" }.to_string()
}
