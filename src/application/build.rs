//! Build Use Case
//!
//! Release compile followed by wheel assembly (and optionally an sdist).
//! Everything that can be checked up front (project name, interpreter,
//! an existing archive) is checked before the compiler starts.

use std::path::PathBuf;

use crate::config::EffectiveConfig;
use crate::domain::entities::BuildResult;
use crate::domain::ports::{DependencyInstaller, RuntimeProbe};
use crate::domain::value_objects::{BuildMode, CompatibilityTag};
use crate::error::{NuwaError, NuwaResult};
use crate::infrastructure::packaging::{SdistBuilder, WheelBuilder};

use super::pipeline::BuildPipeline;

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Relative to the project root; `dist/` when `None`
    pub dist_dir: Option<PathBuf>,
    /// Overwrite existing archives
    pub force: bool,
    /// Also produce a source archive
    pub sdist: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dist_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dist_dir = dir;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_sdist(mut self, sdist: bool) -> Self {
        self.sdist = sdist;
        self
    }
}

/// Outcome of one build run
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub build: BuildResult,
    pub tag: CompatibilityTag,
    pub wheel: Option<PathBuf>,
    pub sdist: Option<PathBuf>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.build.success && self.wheel.is_some()
    }
}

pub struct BuildUseCase<I, P>
where
    I: DependencyInstaller,
    P: RuntimeProbe,
{
    pipeline: BuildPipeline<I>,
    probe: P,
}

impl<I, P> BuildUseCase<I, P>
where
    I: DependencyInstaller,
    P: RuntimeProbe,
{
    pub fn new(pipeline: BuildPipeline<I>, probe: P) -> Self {
        Self { pipeline, probe }
    }

    pub fn execute(&self, config: &EffectiveConfig, options: &BuildOptions) -> NuwaResult<BuildOutcome> {
        let info = self.probe.probe()?;
        let tag = CompatibilityTag::from_runtime(&info);
        tracing::info!(%tag, "compatibility tag");

        let mut wheel = WheelBuilder::new(config, tag.clone(), self.pipeline.os()).with_force(options.force);
        let mut sdist = SdistBuilder::new(config).with_force(options.force);
        if let Some(dir) = &options.dist_dir {
            wheel = wheel.with_dist_dir(dir);
            sdist = sdist.with_dist_dir(dir);
        }

        let wheel_target = wheel.target()?;
        if wheel_target.exists() && !options.force {
            return Err(NuwaError::Conflict { path: wheel_target });
        }
        if options.sdist {
            let sdist_target = sdist.target()?;
            if sdist_target.exists() && !options.force {
                return Err(NuwaError::Conflict { path: sdist_target });
            }
        }

        let (_, mut build) = self.pipeline.run(config, BuildMode::Release)?;
        let Some(compiled) = build.compiled_artifact().cloned() else {
            return Ok(BuildOutcome {
                build,
                tag,
                wheel: None,
                sdist: None,
            });
        };

        let wheel_path = wheel.build(&compiled)?;
        build.artifacts.push(wheel_path.clone());
        let sdist_path = if options.sdist {
            let path = sdist.build()?;
            build.artifacts.push(path.clone());
            Some(path)
        } else {
            None
        };

        Ok(BuildOutcome {
            build,
            tag,
            wheel: Some(wheel_path),
            sdist: sdist_path,
        })
    }
}
