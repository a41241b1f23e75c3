//! Command-line interface orchestration for dexprep.
//!
//! The CLI offers a single `generate` command that checks for the dataset
//! root and writes every selected benchmark family's descriptors.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FamilyArg, GenerateCommand, run_cli, write_created,
};

#[cfg(test)]
mod test_helpers;
