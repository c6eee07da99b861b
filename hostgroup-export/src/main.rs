use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use hostgroup_export::config::{load_config, ExportConfig};
use hostgroup_export::error::{ExportError, INTERRUPTED_EXIT_CODE};
use tracing::{debug, error, warn};

mod cli;
mod console;
mod export_cmd;
mod logging;
mod path_guard;

use cli::Cli;
use console::Console;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_filter, cli.verbose);
    install_interrupt_handler();

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    match export_cmd::run_export(&cli, &config, &mut console) {
        Ok(outcome) => {
            debug!(?outcome, "run finished");
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err),
    }
}

/// Build the run configuration: file values first, then flag overrides.
fn resolve_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => ExportConfig::default(),
    };

    if let Some(dir) = &cli.dir {
        config.source_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(marker) = &cli.marker {
        config.archive_marker = marker.clone();
    }
    Ok(config)
}

fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        eprintln!("\n\n{}", "Export cancelled by user".yellow());
        std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
    });
    if let Err(err) = installed {
        warn!(error = %err, "could not install interrupt handler");
    }
}

fn report_failure(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ExportError>() {
        Some(ExportError::Interrupted) => {
            eprintln!("\n\n{}", "Export cancelled by user".yellow());
            ExitCode::from(INTERRUPTED_EXIT_CODE)
        }
        Some(export_err) => {
            eprintln!("{} {export_err}", "error:".red().bold());
            ExitCode::from(export_err.exit_code())
        }
        None => {
            error!(error = ?err, "unexpected failure");
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
