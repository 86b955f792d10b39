//! Command handlers
//!
//! Each handler returns the process exit code. Failures that stop a
//! command before a build result exists are returned as errors and
//! rendered by `main`.

pub mod build;
pub mod clean;
pub mod develop;
pub mod watch;

use std::path::Path;

use anyhow::{Context, Result};

use nuwa::application::{find_project_root, ConfigRequest};
use nuwa::{EffectiveConfig, ExitCode};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::ui::context::UiContext;
use crate::ui::output::print_config_warnings;

pub fn dispatch(cli: &Cli, ui: &UiContext) -> Result<i32> {
    let project = find_project_root(&absolute(&cli.project)?);
    tracing::debug!(project = %project.display(), "project root");

    match &cli.command {
        Commands::Develop { build, release } => develop::cmd_develop(&project, build, *release, ui),
        Commands::Build {
            build,
            dist_dir,
            force,
            sdist,
        } => build::cmd_build(&project, build, dist_dir.clone(), *force, *sdist, ui),
        Commands::Watch {
            build,
            run_tests,
            test_command,
            watch_all_sources,
            release,
        } => watch::cmd_watch(
            &project,
            build,
            watch::WatchFlags {
                run_tests: *run_tests,
                test_command: test_command.clone(),
                watch_all_sources: *watch_all_sources,
                release: *release,
            },
            ui,
        ),
        Commands::Clean { deps, artifacts } => clean::cmd_clean(&project, *deps, *artifacts, ui),
    }
}

pub(crate) fn config_request(project: &Path, build: &BuildArgs) -> ConfigRequest {
    ConfigRequest::new(project)
        .with_profile(build.profile.clone())
        .with_overrides(build.overrides())
}

/// Resolve once and surface unknown-key warnings
pub(crate) fn resolve(request: &ConfigRequest, ui: &UiContext) -> Result<EffectiveConfig> {
    let (config, warnings) = request.resolve()?;
    print_config_warnings(ui, &warnings);
    Ok(config)
}

/// Compile failures exit with 1; a successful compile whose artifact could
/// not be published counts as a packaging failure
pub(crate) fn outcome_code(compiled: bool, published: bool) -> i32 {
    let code = match (compiled, published) {
        (true, true) => ExitCode::Success,
        (true, false) => ExitCode::PackagingError,
        (false, _) => ExitCode::CompileFailure,
    };
    code.code()
}

fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    Ok(cwd.join(path))
}
