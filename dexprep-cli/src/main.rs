//! CLI entry point for generating benchmark descriptors.
//!
//! Parses command-line arguments with clap, generates the requested
//! descriptors while listing each created file on stdout, and maps errors to
//! a non-zero exit code. Logging is initialized eagerly so generation can emit
//! structured diagnostics via `tracing`.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dexprep_cli::{
    cli::{Cli, CliError, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments and execute the command, streaming one summary line
/// per created descriptor to stdout.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    let outcome = run_cli(cli, &mut stdout);
    stdout.flush().context("failed to flush output")?;
    outcome.context("failed to generate descriptors")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code_field = match err.downcast_ref::<CliError>() {
            Some(CliError::Core(core)) => Some(field::display(core.code().as_str())),
            _ => None,
        };

        error!(error = format!("{err:#}"), code = code_field, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
