//! K-means cases built from the suite's labelled point datasets.

use std::path::{Path, PathBuf};

use tracing::{Span, field, instrument};

use super::{Family, OutputLayout, descriptor_path, emit_case, generate_all, prepare_dir};
use crate::{
    dataset::{LoadMode, NumericTable, load_table},
    descriptor::{Descriptor, EmitOptions},
    error::Result,
    format::{Separator, format_table},
};

const THRESHOLD: i64 = 0;
const MAX_ITERATIONS: i64 = 500;
const LABEL_FIELDS: usize = 1;

/// One dataset file clustered into a fixed number of clusters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KmeansCase {
    /// File name inside the kmeans dataset directory.
    pub dataset: &'static str,
    /// Number of clusters requested.
    pub clusters: i64,
}

impl KmeansCase {
    /// Output file stem: the dataset name without its extension.
    #[must_use]
    pub fn stem(&self) -> &'static str {
        self.dataset
            .rsplit_once('.')
            .map_or(self.dataset, |(stem, _)| stem)
    }
}

/// The generated case list.
#[must_use]
pub const fn cases() -> [KmeansCase; 3] {
    [
        KmeansCase {
            dataset: "100",
            clusters: 10,
        },
        KmeansCase {
            dataset: "204800.txt",
            clusters: 8,
        },
        KmeansCase {
            dataset: "kdd_cup",
            clusters: 5,
        },
    ]
}

/// Builds the descriptor for `case` from its loaded `points`.
///
/// # Errors
/// Propagates descriptor validation failures.
pub fn descriptor(case: &KmeansCase, points: &NumericTable) -> Result<Descriptor> {
    Descriptor::builder(Family::Kmeans.as_str())
        .with_binding("points", format_table(points, Separator::Multiline))
        .with_binding("k", case.clusters)
        .with_binding("threshold", THRESHOLD)
        .with_binding("max_iterations", MAX_ITERATIONS)
        .build()
}

/// Generates the descriptor for a single case.
///
/// # Errors
/// Returns a [`crate::DexError`] when the dataset cannot be read or the
/// descriptor cannot be written.
#[instrument(
    name = "kmeans.case",
    err,
    skip(layout, case, options),
    fields(dataset = case.dataset, clusters = case.clusters, points = field::Empty),
)]
pub fn generate_case(
    layout: &OutputLayout,
    case: &KmeansCase,
    options: &EmitOptions,
) -> Result<PathBuf> {
    let source = layout.dataset_dir(Family::Kmeans).join(case.dataset);
    let points = load_table(
        &source,
        LoadMode::Lines {
            skip_leading: LABEL_FIELDS,
        },
    )?;
    Span::current().record("points", points.row_count());

    let dir = layout.output_dir(Family::Kmeans.as_str());
    prepare_dir(&dir)?;
    emit_case(
        descriptor_path(&dir, case.stem()),
        &descriptor(case, &points)?,
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
    prepare_dir(&layout.output_dir(Family::Kmeans.as_str()))?;
    generate_all(&cases(), on_created, |case| {
        generate_case(layout, case, options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("100", "100")]
    #[case("204800.txt", "204800")]
    #[case("kdd_cup", "kdd_cup")]
    fn stem_drops_extension(#[case] dataset: &'static str, #[case] expected: &str) {
        let case = KmeansCase {
            dataset,
            clusters: 1,
        };
        assert_eq!(case.stem(), expected);
    }

    #[test]
    fn descriptor_binds_points_then_scalars() {
        let points = NumericTable::new(vec![
            vec!["1.0".to_owned(), "2.0".to_owned()],
            vec!["3.0".to_owned(), "4.0".to_owned()],
        ]);
        let case = KmeansCase {
            dataset: "100",
            clusters: 10,
        };
        let text = descriptor(&case, &points)
            .expect("names are unique")
            .render(&EmitOptions::new());
        assert_eq!(
            text,
            "points = [[1.0,2.0],\n  [3.0,4.0]]\nk = 10\nthreshold = 0\nmax_iterations = 500\n\n\
             include \"kmeans.dx\"\n\n%bench \"kmeans\"\n\
             result = kmeans points k threshold max_iterations\n"
        );
    }
}
