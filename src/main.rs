//! Nuwa CLI - build Nim extensions for Python
//!
//! Usage: nuwa <COMMAND>
//!
//! Commands:
//!   develop  Compile and place the library inside the package
//!   build    Compile in release mode and produce a wheel
//!   watch    Rebuild whenever a tracked source changes
//!   clean    Remove build artifacts and installed Nim packages
//!
//! Exit codes: 0 success, 1 compile failure, 2 configuration,
//! 3 missing tool, 4 packaging.

mod cli;
mod commands;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::ui::context::UiContext;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ui = UiContext::new(cli.json, cli.verbose, cli.color);
    let code = match commands::dispatch(&cli, &ui) {
        Ok(code) => code,
        Err(err) => {
            ui::error::print_error(cli.command.name(), &err, &ui);
            ui::error::exit_code_for(&err)
        }
    };

    std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// `NUWA_LOG` takes a full filter directive and wins over `-v`
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "nuwa=warn",
        1 => "nuwa=info",
        2 => "nuwa=debug",
        _ => "nuwa=trace",
    };
    let filter = EnvFilter::try_from_env("NUWA_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    // Stdout is reserved for results and NDJSON events
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
