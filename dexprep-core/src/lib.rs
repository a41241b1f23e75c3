//! Descriptor generation for Rodinia benchmark cases.
//!
//! Turns raw benchmark datasets into `.dx` descriptors: short program
//! fragments that bind a benchmark's named inputs and invoke the routine the
//! runtime already defines. Datasets are parsed into literal tables, tables
//! are rendered into nested array syntax, and inputs without a natural
//! dataset are expressed as seeded random tensors that the runtime evaluates
//! itself.

pub mod cases;
mod dataset;
mod descriptor;
mod error;
mod format;
mod literal;
mod random;

pub use crate::{
    cases::{FamilyReport, Family, GenerationReport, OutputLayout, run_families, run_families_with},
    dataset::{LoadMode, NumericTable, chunk, load_table, parse_table},
    descriptor::{
        DESCRIPTOR_EXTENSION, Descriptor, DescriptorBuilder, DisplayDescriptor, EmitOptions, Expr,
        RESULT_NAME, ShapeParameter, ValueBinding, write_descriptor_file,
    },
    error::{DexError, DexErrorCode, Result},
    format::{Separator, format_rows, format_table, format_vector},
    literal::ensure_float,
    random::{DEFAULT_SEED, ElementType, Generator, IndexSet, RandomTensor, TensorType},
};
