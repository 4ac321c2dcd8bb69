//! CLI entry point for the dpeak clustering tool.
//!
//! Parses command-line arguments with clap, runs the density-peak pipeline,
//! renders the labelling to stdout, and maps failures to exit codes. Logging
//! is initialised eagerly so every later stage can emit structured `tracing`
//! diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dpeak_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Logs a command failure, attaching stable error codes when the failure
/// originated in the clustering core.
fn log_failure(err: &anyhow::Error) {
    let core = err.downcast_ref::<CliError>().and_then(|cli| match cli {
        CliError::Core(core) => Some(core),
        _ => None,
    });
    let code = core.map(|core| field::display(core.code().as_str()));
    let data_source_code = core
        .and_then(dpeak_core::DpcError::data_source_code)
        .map(|code| field::display(code.as_str()));

    error!(
        error = %err,
        code,
        data_source_code,
        "command execution failed"
    );
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
