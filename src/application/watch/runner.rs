//! Pipeline steps the watch loop drives from its worker thread

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::application::pipeline::{BuildPipeline, ConfigRequest};
use crate::config::EffectiveConfig;
use crate::domain::entities::{BuildResult, SourceUnit};
use crate::domain::value_objects::BuildMode;
use crate::error::{NuwaError, NuwaResult};
use crate::infrastructure::compiler::ProcessSupervisor;
use crate::infrastructure::packaging::install_inplace;
use crate::infrastructure::NimbleInstaller;

use super::event::WatchOptions;

/// Outcome of the trailing test command
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub output: String,
    pub duration: Duration,
}

/// One build generation, split so the loop can decide about staleness
/// between compiling and publishing.
///
/// `resolve`, `build` and `run_tests` run on the worker thread; `publish`
/// and `terminate` are called from the loop itself.
pub trait WatchRunner: Send + Sync + 'static {
    fn resolve(&self) -> NuwaResult<EffectiveConfig>;

    fn build(&self, config: &EffectiveConfig) -> NuwaResult<(SourceUnit, BuildResult)>;

    /// Make a successful result visible; `None` when there was nothing to publish
    fn publish(&self, config: &EffectiveConfig, result: &BuildResult) -> NuwaResult<Option<PathBuf>>;

    fn run_tests(&self, command: &str, cwd: &Path) -> NuwaResult<TestOutcome>;

    /// Kill the in-flight child process, if any
    fn terminate(&self) -> NuwaResult<bool>;
}

/// Production runner: the develop pipeline plus in-place publication
pub struct PipelineRunner {
    request: ConfigRequest,
    pipeline: BuildPipeline<NimbleInstaller>,
    supervisor: ProcessSupervisor,
    mode: BuildMode,
}

impl PipelineRunner {
    /// Same request and build mode the watch loop was started with
    pub fn from_options(options: &WatchOptions) -> Self {
        Self::new(options.request.clone(), options.release)
    }

    pub fn new(request: ConfigRequest, release: bool) -> Self {
        let supervisor = ProcessSupervisor::new();
        let installer = NimbleInstaller::default().with_supervisor(supervisor.clone());
        Self {
            request,
            pipeline: BuildPipeline::new(installer).with_supervisor(supervisor.clone()),
            supervisor,
            mode: if release {
                BuildMode::Release
            } else {
                BuildMode::Develop
            },
        }
    }
}

impl WatchRunner for PipelineRunner {
    fn resolve(&self) -> NuwaResult<EffectiveConfig> {
        let (config, warnings) = self.request.resolve()?;
        for warning in warnings {
            tracing::warn!(key = %warning.key, suggestion = ?warning.suggestion, "unknown config key");
        }
        Ok(config)
    }

    fn build(&self, config: &EffectiveConfig) -> NuwaResult<(SourceUnit, BuildResult)> {
        let (prepared, result) = self.pipeline.run(config, self.mode)?;
        Ok((prepared.unit, result))
    }

    fn publish(&self, config: &EffectiveConfig, result: &BuildResult) -> NuwaResult<Option<PathBuf>> {
        match result.compiled_artifact() {
            Some(compiled) => install_inplace(config, compiled, self.pipeline.os()).map(Some),
            None => Ok(None),
        }
    }

    fn run_tests(&self, command: &str, cwd: &Path) -> NuwaResult<TestOutcome> {
        tracing::info!(command, "running tests");
        let output = self.supervisor.run(shell(command).current_dir(cwd))?;
        Ok(TestOutcome {
            success: output.success(),
            exit_code: output.exit_code,
            output: output.output,
            duration: output.duration,
        })
    }

    fn terminate(&self) -> NuwaResult<bool> {
        self.supervisor.terminate().map_err(|e| NuwaError::Watch {
            message: format!("failed to stop child process: {e}"),
        })
    }
}

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}
