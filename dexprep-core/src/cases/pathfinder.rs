//! Pathfinder cases over a random integer world.

use std::path::{Path, PathBuf};

use tracing::instrument;

use super::{Family, OutputLayout, descriptor_path, emit_case, generate_all, prepare_dir};
use crate::{
    descriptor::{Descriptor, EmitOptions, ShapeParameter},
    error::Result,
    random::{ElementType, Generator, IndexSet, RandomTensor, TensorType},
};

/// A world of `rows` x `cols` integer costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathfinderCase {
    /// Number of rows walked by the dynamic program.
    pub rows: usize,
    /// Number of columns per row.
    pub cols: usize,
}

impl PathfinderCase {
    /// Output file stem: `<rows>_<cols>`.
    #[must_use]
    pub fn stem(&self) -> String {
        format!("{}_{}", self.rows, self.cols)
    }
}

/// The generated case list.
#[must_use]
pub const fn cases() -> [PathfinderCase; 1] {
    [PathfinderCase {
        rows: 100,
        cols: 100_000,
    }]
}

/// Builds the descriptor for `case`.
///
/// # Errors
/// Propagates descriptor validation failures.
pub fn descriptor(case: &PathfinderCase) -> Result<Descriptor> {
    let world = RandomTensor::new(TensorType::matrix(
        IndexSet::named("rows"),
        IndexSet::named("cols"),
        ElementType::Int,
    ))
    .with_generator(Generator::RandInt);
    Descriptor::builder(Family::Pathfinder.as_str())
        .with_shape(ShapeParameter::fin("rows", case.rows))
        .with_shape(ShapeParameter::fin("cols", case.cols))
        .with_binding("world", world)
        .build()
}

/// Generates the descriptor for a single world size.
///
/// # Errors
/// Returns a [`crate::DexError`] when the output directory or descriptor
/// cannot be written.
#[instrument(
    name = "pathfinder.case",
    err,
    skip(layout, case, options),
    fields(rows = case.rows, cols = case.cols),
)]
pub fn generate_case(
    layout: &OutputLayout,
    case: &PathfinderCase,
    options: &EmitOptions,
) -> Result<PathBuf> {
    let dir = layout.output_dir(Family::Pathfinder.as_str());
    prepare_dir(&dir)?;
    emit_case(descriptor_path(&dir, &case.stem()), &descriptor(case)?, options)
}

/// Generates every case in [`cases`], passing each written file to
/// `on_created`.
///
/// # Errors
/// Stops at the first case that fails.
pub fn generate(
    layout: &OutputLayout,
    options: &EmitOptions,
    on_created: &mut dyn FnMut(&Path),
) -> Result<Vec<PathBuf>> {
    prepare_dir(&layout.output_dir(Family::Pathfinder.as_str()))?;
    generate_all(&cases(), on_created, |case| {
        generate_case(layout, case, options)
    })
}
