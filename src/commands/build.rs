use std::path::{Path, PathBuf};

use anyhow::Result;

use nuwa::application::{BuildOptions, BuildPipeline, BuildUseCase};
use nuwa::infrastructure::{NimbleInstaller, PythonProbe};

use crate::cli::BuildArgs;
use crate::ui::context::UiContext;
use crate::ui::json::{emit_event, events::ResultEvent};
use crate::ui::views::build::{render_build_header, render_build_result};
use crate::ui::views::diagnostics::{render_annotations, render_diagnostics};

use super::{config_request, outcome_code, resolve};

pub fn cmd_build(
    project: &Path,
    build: &BuildArgs,
    dist_dir: Option<PathBuf>,
    force: bool,
    sdist: bool,
    ui: &UiContext,
) -> Result<i32> {
    let config = resolve(&config_request(project, build), ui)?;

    if !ui.json {
        print!("{}", render_build_header(&config, ui.color, ui.unicode));
    }

    let options = BuildOptions::new()
        .with_dist_dir(dist_dir)
        .with_force(force)
        .with_sdist(sdist);
    let use_case = BuildUseCase::new(
        BuildPipeline::new(NimbleInstaller::default()),
        PythonProbe::new(config.python.clone()),
    );
    let outcome = use_case.execute(&config, &options)?;

    if ui.json {
        emit_event(&ResultEvent::build(&outcome))?;
    } else {
        if ui.annotate() {
            print!("{}", render_annotations(&outcome.build));
        }
        eprint!(
            "{}",
            render_diagnostics(&outcome.build, ui.verbose, ui.color, ui.unicode)
        );
        print!("{}", render_build_result(&outcome, ui.color, ui.unicode));
    }

    Ok(outcome_code(outcome.build.success, outcome.wheel.is_some()))
}
