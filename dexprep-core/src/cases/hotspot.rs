//! Hotspot cases built from paired temperature and power grids.
//!
//! The grid files hold one cell per line, so each grid is rebuilt by chunking
//! the cells into rows of the grid size.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use tracing::instrument;

use super::{Family, OutputLayout, descriptor_path, emit_case, generate_all, prepare_dir};
use crate::{
    dataset::{LoadMode, NumericTable, load_table},
    descriptor::{Descriptor, EmitOptions},
    error::Result,
    format::{Separator, format_table},
};

const ITERATIONS: i64 = 360;

/// A square grid of `size` x `size` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HotspotCase {
    /// Grid edge length, which is also the row chunk size.
    pub size: NonZeroUsize,
}

impl HotspotCase {
    /// Temperature grid file name.
    #[must_use]
    pub fn temperature_file(&self) -> String {
        format!("temp_{}", self.size)
    }

    /// Power grid file name.
    #[must_use]
    pub fn power_file(&self) -> String {
        format!("power_{}", self.size)
    }
}

const CASES: [HotspotCase; 3] = [grid(64), grid(512), grid(1024)];

const fn grid(size: usize) -> HotspotCase {
    match NonZeroUsize::new(size) {
        Some(edge) => HotspotCase { size: edge },
        None => panic!("grid size must be non-zero"),
    }
}

/// The generated case list.
#[must_use]
pub const fn cases() -> [HotspotCase; 3] {
    CASES
}

/// Builds the descriptor from loaded temperature and power grids.
///
/// # Errors
/// Propagates descriptor validation failures.
pub fn descriptor(temperature: &NumericTable, power: &NumericTable) -> Result<Descriptor> {
    Descriptor::builder(Family::Hotspot.as_str())
        .with_binding("numIterations", ITERATIONS)
        .with_binding("T", format_table(temperature, Separator::Multiline))
        .with_binding("P", format_table(power, Separator::Multiline))
        .build()
}

/// Generates the descriptor for a single grid size.
///
/// # Errors
/// Returns a [`crate::DexError`] when either grid cannot be read or the
/// descriptor cannot be written.
#[instrument(name = "hotspot.case", err, skip(layout, case, options), fields(size = case.size.get()))]
pub fn generate_case(
    layout: &OutputLayout,
    case: &HotspotCase,
    options: &EmitOptions,
) -> Result<PathBuf> {
    let data_dir = layout.dataset_dir(Family::Hotspot);
    let mode = LoadMode::FlatChunked {
        chunk_size: case.size,
    };
    let temperature = load_table(&data_dir.join(case.temperature_file()), mode)?;
    let power = load_table(&data_dir.join(case.power_file()), mode)?;

    let dir = layout.output_dir(Family::Hotspot.as_str());
    prepare_dir(&dir)?;
    emit_case(
        descriptor_path(&dir, &case.size.to_string()),
        &descriptor(&temperature, &power)?,
        options,
    )
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
    prepare_dir(&layout.output_dir(Family::Hotspot.as_str()))?;
    generate_all(&cases(), on_created, |case| {
        generate_case(layout, case, options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sizes_are_fixed() {
        let sizes: Vec<usize> = cases().iter().map(|case| case.size.get()).collect();
        assert_eq!(sizes, [64, 512, 1024]);
    }

    #[test]
    fn file_names_embed_grid_size() {
        let case = cases()[0];
        assert_eq!(case.temperature_file(), "temp_64");
        assert_eq!(case.power_file(), "power_64");
    }

    #[test]
    fn descriptor_places_iterations_before_grids() {
        let temperature = NumericTable::new(vec![vec!["1.0".to_owned(), "2.0".to_owned()]]);
        let power = NumericTable::new(vec![vec!["3.0".to_owned(), "4.0".to_owned()]]);
        let text = descriptor(&temperature, &power)
            .expect("names are unique")
            .render(&EmitOptions::new());
        assert_eq!(
            text,
            "numIterations = 360\nT = [[1.0,2.0]]\nP = [[3.0,4.0]]\n\n\
             include \"hotspot.dx\"\n\n%bench \"hotspot\"\nresult = hotspot numIterations T P\n"
        );
    }
}
