use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use nuwa::application::{PipelineRunner, WatchEvent, WatchOptions, WatchUseCase};

use crate::cli::BuildArgs;
use crate::ui::context::UiContext;
use crate::ui::json::emit_line;
use crate::ui::views::watch::{render_watch_event, render_watch_header};

use super::config_request;

#[derive(Debug, Clone, Default)]
pub struct WatchFlags {
    pub run_tests: bool,
    pub test_command: Option<String>,
    pub watch_all_sources: bool,
    pub release: bool,
}

pub fn cmd_watch(project: &Path, build: &BuildArgs, flags: WatchFlags, ui: &UiContext) -> Result<i32> {
    // Unknown-key warnings are logged by the runner on every generation
    let request = config_request(project, build);

    let options = WatchOptions::new(request)
        .with_run_tests(flags.run_tests)
        .with_test_command(flags.test_command)
        .with_watch_all_sources(flags.watch_all_sources)
        .with_release(flags.release);
    let runner = PipelineRunner::from_options(&options);
    let use_case = WatchUseCase::new(options, runner);

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .context("failed to install the Ctrl+C handler")?;

    if !ui.json {
        print!(
            "{}",
            render_watch_header(
                &project.display().to_string(),
                flags.run_tests,
                ui.color,
                ui.unicode
            )
        );
    }

    let ui = *ui;
    use_case.start(running, move |event| print_event(&event, &ui))?;
    Ok(0)
}

fn print_event(event: &WatchEvent, ui: &UiContext) {
    if ui.json {
        if let Err(e) = emit_line(&event.to_json()) {
            tracing::debug!(error = %e, "failed to write watch event");
        }
        return;
    }

    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
    let rendered = render_watch_event(&timestamp, event, ui.color, ui.unicode);

    match event {
        WatchEvent::Error { .. } | WatchEvent::BuildError { .. } => eprint!("{rendered}"),
        WatchEvent::BuildComplete {
            success: false,
            diagnostics,
            raw_log,
            ..
        } => {
            print!("{rendered}");
            let result = nuwa::BuildResult {
                success: false,
                diagnostics: diagnostics.clone(),
                raw_log: raw_log.clone(),
                ..nuwa::BuildResult::default()
            };
            eprint!(
                "{}",
                crate::ui::views::diagnostics::render_diagnostics(
                    &result,
                    ui.verbose,
                    ui.color,
                    ui.unicode
                )
            );
        }
        WatchEvent::TestsComplete {
            success, output, ..
        } => {
            print!("{rendered}");
            if !success || ui.verbose > 0 {
                for line in output.lines() {
                    println!("  {line}");
                }
            }
        }
        _ => print!("{rendered}"),
    }
}
