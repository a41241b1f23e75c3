//! Error types for descriptor generation.
//!
//! Every failure the generator can hit is fatal for the run: a missing dataset
//! root aborts before any output is written, and I/O failures abort the case
//! being generated along with every case after it.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced while loading datasets or emitting descriptors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DexError {
    /// The dataset root directory does not exist.
    #[error(
        "dataset root `{path}` is missing; download the Rodinia benchmark suite and place it there"
    )]
    DatasetRootMissing {
        /// Directory that was expected to hold the datasets.
        path: PathBuf,
    },
    /// A dataset file could not be opened or read.
    #[error("failed to read dataset `{path}`: {source}")]
    DatasetRead {
        /// Dataset file that failed.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A descriptor file could not be created or written.
    #[error("failed to write descriptor `{path}`: {source}")]
    DescriptorWrite {
        /// Descriptor file that failed.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An output directory could not be created.
    #[error("failed to create output directory `{path}`: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Two bindings in one descriptor share a name.
    #[error("binding `{name}` is declared more than once")]
    DuplicateBinding {
        /// The repeated binding name.
        name: String,
    },
    /// A descriptor was assembled without a benchmark name.
    #[error("benchmark name must not be empty")]
    EmptyBenchmarkName,
}

define_error_codes! {
    /// Stable codes describing [`DexError`] variants.
    enum DexErrorCode for DexError {
        /// The dataset root directory does not exist.
        DatasetRootMissing => DatasetRootMissing { .. } => "DEX_DATASET_ROOT_MISSING",
        /// A dataset file could not be opened or read.
        DatasetRead => DatasetRead { .. } => "DEX_DATASET_READ",
        /// A descriptor file could not be created or written.
        DescriptorWrite => DescriptorWrite { .. } => "DEX_DESCRIPTOR_WRITE",
        /// An output directory could not be created.
        CreateDir => CreateDir { .. } => "DEX_CREATE_DIR",
        /// Two bindings in one descriptor share a name.
        DuplicateBinding => DuplicateBinding { .. } => "DEX_DUPLICATE_BINDING",
        /// A descriptor was assembled without a benchmark name.
        EmptyBenchmarkName => EmptyBenchmarkName => "DEX_EMPTY_BENCHMARK_NAME",
    }
}

/// Convenient result alias for descriptor generation.
pub type Result<T, E = DexError> = std::result::Result<T, E>;
