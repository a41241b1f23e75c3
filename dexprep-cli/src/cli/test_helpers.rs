//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests lay out temporary Rodinia trees and assert error
//! handling behaviour. These helpers keep the test cases concise.

use std::io;

use dexprep_test_support::fixtures::DatasetTree;

use super::{Cli, CliError, Command, FamilyArg, GenerateCommand, run_cli};

pub(super) fn dataset_tree() -> DatasetTree {
    match DatasetTree::new() {
        Ok(tree) => tree,
        Err(err) => panic!("failed to create dataset tree: {err}"),
    }
}

pub(super) fn generate_command(tree: &DatasetTree, families: &[FamilyArg]) -> GenerateCommand {
    GenerateCommand {
        data_root: tree.data_root(),
        exe_root: tree.exe_root(),
        families: families.to_vec(),
        print_outputs: false,
    }
}

pub(super) fn run_cli_expecting_error(command: GenerateCommand, panic_msg: &str) -> CliError {
    let cli = Cli {
        command: Command::Generate(command),
    };
    match run_cli(cli, &mut io::sink()) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
