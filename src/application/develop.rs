//! Develop Use Case
//!
//! Compiles the project and places the library inside the Python package so
//! `import <module>` picks it up without installing anything.

use std::path::PathBuf;

use crate::config::EffectiveConfig;
use crate::domain::entities::BuildResult;
use crate::domain::ports::DependencyInstaller;
use crate::domain::value_objects::BuildMode;
use crate::error::NuwaResult;
use crate::infrastructure::packaging::install_inplace;

use super::pipeline::BuildPipeline;

/// Outcome of one develop run
#[derive(Debug, Clone)]
pub struct DevelopResult {
    pub mode: BuildMode,
    pub build: BuildResult,
    /// Published in-place library, set only on success
    pub artifact: Option<PathBuf>,
}

impl DevelopResult {
    pub fn is_success(&self) -> bool {
        self.build.success && self.artifact.is_some()
    }
}

pub struct DevelopUseCase<I>
where
    I: DependencyInstaller,
{
    pipeline: BuildPipeline<I>,
}

impl<I> DevelopUseCase<I>
where
    I: DependencyInstaller,
{
    pub fn new(pipeline: BuildPipeline<I>) -> Self {
        Self { pipeline }
    }

    /// `release` switches from the debug defaults to `-d:release`
    pub fn execute(&self, config: &EffectiveConfig, release: bool) -> NuwaResult<DevelopResult> {
        let mode = if release {
            BuildMode::Release
        } else {
            BuildMode::Develop
        };
        let (_, build) = self.pipeline.run(config, mode)?;
        let artifact = match build.compiled_artifact() {
            Some(compiled) => Some(install_inplace(config, compiled, self.pipeline.os())?),
            None => None,
        };

        let mut build = build;
        if let Some(path) = &artifact {
            build.artifacts.push(path.clone());
        }
        Ok(DevelopResult {
            mode,
            build,
            artifact,
        })
    }
}
