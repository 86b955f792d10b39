//! Single-shot build pipeline
//!
//! Shared by develop, build and watch.
//!
//! ## Flow
//!
//! 1. Load `pyproject.toml` and resolve the effective configuration
//! 2. Discover the entry file and its inclusion closure
//! 3. Install third-party Nim packages when any are declared
//! 4. Compile and translate diagnostics
//!
//! Steps 1 to 3 fail with an error before the compiler ever runs. Step 4
//! only errors when the compiler cannot be started at all.

use std::path::{Path, PathBuf};

use crate::config::{self, ConfigResolver, ConfigWarning, EffectiveConfig, Overrides};
use crate::domain::entities::{BuildResult, SourceUnit};
use crate::domain::ports::DependencyInstaller;
use crate::domain::value_objects::{BuildMode, OsFamily};
use crate::error::NuwaResult;
use crate::infrastructure::compiler::{CompileRequest, CompilerInvoker, ProcessSupervisor};

/// What to resolve: project root, profile and CLI overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigRequest {
    pub project_root: PathBuf,
    /// Falls back to `NUWA_PROFILE` when `None`
    pub profile: Option<String>,
    pub overrides: Overrides,
}

impl ConfigRequest {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Read the project file and resolve it. Called once per build
    /// generation; nothing is cached between calls.
    pub fn resolve(&self) -> NuwaResult<(EffectiveConfig, Vec<ConfigWarning>)> {
        let (project, warnings) = config::load(&self.project_root)?;
        let profile = self.profile.clone().or_else(config::env_profile);
        let effective = ConfigResolver::new(profile, self.overrides.clone())
            .resolve(&project, &self.project_root)?;
        Ok((effective, warnings))
    }
}

/// Everything decided before the compiler starts
#[derive(Debug, Clone)]
pub struct PreparedBuild {
    pub unit: SourceUnit,
    /// Package search path handed to the compiler
    pub search_path: Option<PathBuf>,
}

/// Discover, install dependencies, compile
pub struct BuildPipeline<I>
where
    I: DependencyInstaller,
{
    installer: I,
    invoker: CompilerInvoker,
    os: OsFamily,
}

impl<I> BuildPipeline<I>
where
    I: DependencyInstaller,
{
    pub fn new(installer: I) -> Self {
        Self {
            installer,
            invoker: CompilerInvoker::default(),
            os: OsFamily::host(),
        }
    }

    /// Share a supervisor so another thread can terminate the compiler
    pub fn with_supervisor(mut self, supervisor: ProcessSupervisor) -> Self {
        self.invoker = CompilerInvoker::new(supervisor);
        self
    }

    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    pub fn os(&self) -> OsFamily {
        self.os
    }

    pub fn supervisor(&self) -> &ProcessSupervisor {
        self.invoker.supervisor()
    }

    pub fn prepare(&self, config: &EffectiveConfig) -> NuwaResult<PreparedBuild> {
        let unit = super::discovery::discover(config)?;
        let search_path = if config.nimble_deps.is_empty() {
            self.installer.search_path(&config.project_root)
        } else {
            self.installer
                .install(&config.nimble_deps, &config.project_root)?
        };
        Ok(PreparedBuild { unit, search_path })
    }

    pub fn compile(
        &self,
        config: &EffectiveConfig,
        prepared: &PreparedBuild,
        mode: BuildMode,
    ) -> NuwaResult<BuildResult> {
        let request = CompileRequest::new(
            config,
            prepared.unit.entry(),
            mode,
            prepared.search_path.clone(),
            self.os,
        );
        self.invoker.compile(&request)
    }

    /// `prepare` followed by `compile`
    pub fn run(
        &self,
        config: &EffectiveConfig,
        mode: BuildMode,
    ) -> NuwaResult<(PreparedBuild, BuildResult)> {
        let prepared = self.prepare(config)?;
        let result = self.compile(config, &prepared, mode)?;
        Ok((prepared, result))
    }
}

/// Project root for a CLI `--project` value: the nearest ancestor holding
/// `pyproject.toml`, or the starting directory itself
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| config::config_path(dir).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
