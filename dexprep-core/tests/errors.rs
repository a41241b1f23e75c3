//! Stable error codes exposed by the core library.
use std::io;
use std::path::PathBuf;

use dexprep_core::{DexError, DexErrorCode};
use rstest::rstest;

fn io_error() -> io::Error {
    io::Error::other("boom")
}

#[rstest]
#[case(
    DexError::DatasetRootMissing { path: PathBuf::from("rodinia") },
    DexErrorCode::DatasetRootMissing,
    "DEX_DATASET_ROOT_MISSING",
)]
#[case(
    DexError::DatasetRead { path: PathBuf::from("a"), source: io_error() },
    DexErrorCode::DatasetRead,
    "DEX_DATASET_READ",
)]
#[case(
    DexError::DescriptorWrite { path: PathBuf::from("b"), source: io_error() },
    DexErrorCode::DescriptorWrite,
    "DEX_DESCRIPTOR_WRITE",
)]
#[case(
    DexError::CreateDir { path: PathBuf::from("c"), source: io_error() },
    DexErrorCode::CreateDir,
    "DEX_CREATE_DIR",
)]
#[case(
    DexError::DuplicateBinding { name: "k".into() },
    DexErrorCode::DuplicateBinding,
    "DEX_DUPLICATE_BINDING",
)]
#[case(
    DexError::EmptyBenchmarkName,
    DexErrorCode::EmptyBenchmarkName,
    "DEX_EMPTY_BENCHMARK_NAME"
)]
fn returns_expected_code(
    #[case] error: DexError,
    #[case] expected: DexErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
    assert_eq!(error.code().to_string(), text);
}

#[test]
fn missing_root_message_names_the_path() {
    let error = DexError::DatasetRootMissing {
        path: PathBuf::from("rodinia"),
    };
    let message = error.to_string();
    assert!(message.contains("`rodinia`"), "unexpected message: {message}");
    assert!(message.contains("Rodinia benchmark suite"));
}
