//! Diagnostics setup for the `dexprep` binary.
//!
//! Every event goes to `stderr`; `stdout` is reserved for the list of created
//! descriptors. Events recorded through the `log` crate are forwarded into
//! the same subscriber.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Environment variable selecting `human` or `json` log output.
pub const LOG_FORMAT_ENV: &str = "DEXPREP_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Output format for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

/// Failures while configuring diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `DEXPREP_LOG_FORMAT` was set to something other than UTF-8.
    #[error("`{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable that was read.
        name: &'static str,
        /// Error from [`env::var`].
        #[source]
        source: env::VarError,
    },
    /// `DEXPREP_LOG_FORMAT` named a format other than `human` or `json`.
    #[error("log format `{provided}` is not one of `human`, `json`")]
    UnsupportedFormat {
        /// Value as read, trimmed and lowercased.
        provided: String,
    },
    /// A global subscriber could not be registered.
    #[error("could not register the tracing subscriber: {source}")]
    InstallFailed {
        /// Registration error.
        #[source]
        source: TryInitError,
    },
}

/// Sets up diagnostics once per process; later calls return immediately.
///
/// `RUST_LOG` filters events and defaults to `info`, which shows one event
/// per created descriptor. `DEXPREP_LOG_FORMAT=json` switches to JSON lines.
/// When another subscriber is already global, it is left in place.
///
/// # Errors
/// Returns [`LoggingError`] if `DEXPREP_LOG_FORMAT` holds invalid Unicode or
/// an unsupported format.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let format = format_from_env()?;
    if let Err(LoggingError::InstallFailed { source }) = install_subscriber(format) {
        report_existing_subscriber(&source);
    }
    let _ = INSTALLED.set(());
    Ok(())
}

fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source,
        }),
    }
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let base = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let output = match format {
        LogFormat::Human => base.boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // A `log` logger set elsewhere keeps priority.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[expect(
    clippy::print_stderr,
    reason = "tracing cannot report on its own installation"
)]
fn report_existing_subscriber(source: &TryInitError) {
    eprintln!("keeping the existing tracing subscriber: {source}");
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}
