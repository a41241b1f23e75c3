//! Command implementations and argument parsing for the dexprep CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use dexprep_core::{DexError, EmitOptions, Family, GenerationReport, OutputLayout, run_families_with};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_DATA_ROOT: &str = "rodinia";
const DEFAULT_EXE_ROOT: &str = "exe";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "dexprep",
    about = "Generate benchmark descriptors from Rodinia datasets."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write one descriptor per benchmark case.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Root of the downloaded Rodinia suite; datasets are read from `<root>/data`.
    #[arg(long = "data-root", default_value = DEFAULT_DATA_ROOT)]
    pub data_root: PathBuf,

    /// Directory receiving one subdirectory of descriptors per family.
    #[arg(long = "exe-root", default_value = DEFAULT_EXE_ROOT)]
    pub exe_root: PathBuf,

    /// Restrict generation to these families (defaults to all of them).
    #[arg(long = "family", value_enum, value_delimiter = ',')]
    pub families: Vec<FamilyArg>,

    /// Append a trailing `result` line so the runtime prints each outcome.
    #[arg(long = "print-outputs")]
    pub print_outputs: bool,
}

/// Benchmark families selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Random integer world path search.
    Pathfinder,
    /// Network training step over random weights.
    Backprop,
    /// Thermal simulation over temperature and power grids.
    Hotspot,
    /// Clustering of labelled point datasets.
    Kmeans,
}

impl From<FamilyArg> for Family {
    fn from(value: FamilyArg) -> Self {
        match value {
            FamilyArg::Pathfinder => Self::Pathfinder,
            FamilyArg::Backprop => Self::Backprop,
            FamilyArg::Hotspot => Self::Hotspot,
            FamilyArg::Kmeans => Self::Kmeans,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Descriptor generation failed.
    #[error(transparent)]
    Core(#[from] DexError),
    /// The summary could not be written to the output stream.
    #[error("failed to write generation summary: {source}")]
    Output {
        /// Underlying write failure.
        #[source]
        source: io::Error,
    },
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Files written, grouped per family.
    pub report: GenerationReport,
}

/// Executes the CLI command represented by `cli`.
///
/// Each created file is announced on `out` as soon as it is written, so a
/// failing run still lists the descriptors produced before the failure.
///
/// # Errors
/// Returns [`CliError::Core`] when generation fails and [`CliError::Output`]
/// when `out` rejects a write.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dexprep_cli::cli::{Cli, Command, FamilyArg, GenerateCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// std::fs::create_dir(dir.path().join("rodinia"))?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         data_root: dir.path().join("rodinia"),
///         exe_root: dir.path().join("exe"),
///         families: vec![FamilyArg::Pathfinder],
///         print_outputs: false,
///     }),
/// };
/// let mut out = Vec::new();
/// let summary = run_cli(cli, &mut out)?;
/// assert_eq!(summary.report.file_count(), 1);
/// assert!(String::from_utf8(out)?.starts_with("Created "));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli, out),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli, out: &mut dyn Write) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(generate, out)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command, out),
    fields(families = field::Empty, print_outputs = command.print_outputs),
)]
pub(super) fn run_generate(
    command: GenerateCommand,
    out: &mut dyn Write,
) -> Result<ExecutionSummary, CliError> {
    let families = selected_families(&command.families);
    let names: Vec<&str> = families.iter().map(|family| family.as_str()).collect();
    Span::current().record("families", field::display(names.join(",")));

    let layout = OutputLayout::new(command.data_root, command.exe_root);
    let options = EmitOptions::new().with_echo_result(command.print_outputs);

    // Only the first write failure is kept; later lines are not attempted.
    let mut write_failure = None;
    let outcome = run_families_with(&layout, &families, &options, &mut |path| {
        if write_failure.is_none() {
            write_failure = write_created(&mut *out, path).err();
        }
    });
    let report = outcome?;
    if let Some(source) = write_failure {
        return Err(CliError::Output { source });
    }

    info!(files = report.file_count(), "command completed");
    Ok(ExecutionSummary { report })
}

/// Every family when none were requested, otherwise the requested ones.
pub(super) fn selected_families(requested: &[FamilyArg]) -> Vec<Family> {
    if requested.is_empty() {
        return Family::ALL.to_vec();
    }
    requested.iter().copied().map(Family::from).collect()
}

/// Writes the `Created <path>` line announcing one descriptor.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::Path;
/// # use dexprep_cli::cli::write_created;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut buffer = Vec::new();
/// write_created(&mut buffer, Path::new("exe/hotspot/64.dx"))?;
/// assert_eq!(String::from_utf8(buffer)?, "Created exe/hotspot/64.dx\n");
/// # Ok(())
/// # }
/// ```
pub fn write_created(mut writer: impl Write, path: &Path) -> io::Result<()> {
    writeln!(writer, "Created {}", path.display())?;
    writer.flush()
}
