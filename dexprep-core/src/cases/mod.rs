//! Benchmark families and the run orchestration that drives them.
//!
//! Each family owns a hardcoded, ordered case list and a driver that turns
//! every case into one descriptor file under its own output subdirectory.
//! Families run one after another; the first failure stops the run.

pub mod backprop;
pub mod hotspot;
pub mod kmeans;
pub mod pathfinder;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{Span, field, info, instrument};

use crate::{
    descriptor::{DESCRIPTOR_EXTENSION, Descriptor, EmitOptions, write_descriptor_file},
    error::{DexError, Result},
};

/// A benchmark family with its own routine definitions in the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    /// Dynamic-programming path search over a random integer grid.
    Pathfinder,
    /// Training step of a small fully connected network.
    Backprop,
    /// Thermal simulation over temperature and power grids.
    Hotspot,
    /// K-means clustering of labelled point datasets.
    Kmeans,
}

impl Family {
    /// Every family, in run order.
    pub const ALL: [Self; 4] = [Self::Pathfinder, Self::Backprop, Self::Hotspot, Self::Kmeans];

    /// Benchmark routine name, which is also the output directory name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pathfinder => "pathfinder",
            Self::Backprop => "backprop",
            Self::Hotspot => "hotspot",
            Self::Kmeans => "kmeans",
        }
    }
}

/// Locations of the dataset tree and the generated descriptor tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    data_root: PathBuf,
    exe_root: PathBuf,
}

impl OutputLayout {
    /// Creates a layout reading from `data_root` and writing under `exe_root`.
    #[must_use]
    pub fn new(data_root: impl Into<PathBuf>, exe_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            exe_root: exe_root.into(),
        }
    }

    /// Root of the downloaded benchmark suite.
    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Root of the generated descriptor tree.
    #[must_use]
    pub fn exe_root(&self) -> &Path {
        &self.exe_root
    }

    /// Directory holding the raw datasets of `family`.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use dexprep_core::{Family, OutputLayout};
    ///
    /// let layout = OutputLayout::new("rodinia", "exe");
    /// assert_eq!(layout.dataset_dir(Family::Kmeans), Path::new("rodinia/data/kmeans"));
    /// ```
    #[must_use]
    pub fn dataset_dir(&self, family: Family) -> PathBuf {
        self.data_root.join("data").join(family.as_str())
    }

    /// Output directory named `dir_name` under the descriptor root.
    #[must_use]
    pub fn output_dir(&self, dir_name: &str) -> PathBuf {
        self.exe_root.join(dir_name)
    }
}

/// Files written for one family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyReport {
    /// Family that produced the files.
    pub family: Family,
    /// Descriptor files in creation order.
    pub created: Vec<PathBuf>,
}

/// Outcome of [`run_families`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Per-family results in run order.
    pub families: Vec<FamilyReport>,
}

impl GenerationReport {
    /// Every created file across all families, in creation order.
    pub fn created(&self) -> impl Iterator<Item = &Path> {
        self.families
            .iter()
            .flat_map(|report| report.created.iter().map(PathBuf::as_path))
    }

    /// Number of descriptor files written.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.families.iter().map(|report| report.created.len()).sum()
    }
}

/// Generates descriptors for every family in `families`.
///
/// Families always run in [`Family::ALL`] order regardless of the order of
/// `families`; repeated entries run once. An empty selection runs nothing.
///
/// # Errors
/// Returns [`DexError::DatasetRootMissing`] before touching the output tree
/// when the dataset root does not exist. Any other [`DexError`] aborts the
/// remaining cases and families.
pub fn run_families(
    layout: &OutputLayout,
    families: &[Family],
    options: &EmitOptions,
) -> Result<GenerationReport> {
    run_families_with(layout, families, options, &mut |_| {})
}

/// Like [`run_families`], but hands each descriptor path to `on_created` as
/// soon as the file is written.
///
/// Files written before a failure have already been reported when the error
/// is returned.
///
/// # Errors
/// Same as [`run_families`].
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use dexprep_core::{EmitOptions, Family, OutputLayout, run_families_with};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// std::fs::create_dir(dir.path().join("rodinia"))?;
/// let layout = OutputLayout::new(dir.path().join("rodinia"), dir.path().join("exe"));
/// let mut seen = Vec::new();
/// run_families_with(&layout, &[Family::Pathfinder], &EmitOptions::new(), &mut |path| {
///     seen.push(path.to_path_buf());
/// })?;
/// assert_eq!(seen, [dir.path().join("exe/pathfinder/100_100000.dx")]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cases.run",
    err,
    skip(layout, families, options, on_created),
    fields(data_root = field::Empty, exe_root = field::Empty, files = field::Empty),
)]
pub fn run_families_with(
    layout: &OutputLayout,
    families: &[Family],
    options: &EmitOptions,
    on_created: &mut dyn FnMut(&Path),
) -> Result<GenerationReport> {
    let span = Span::current();
    span.record("data_root", field::display(layout.data_root().display()));
    span.record("exe_root", field::display(layout.exe_root().display()));

    if !layout.data_root().exists() {
        return Err(DexError::DatasetRootMissing {
            path: layout.data_root().to_path_buf(),
        });
    }

    let mut report = GenerationReport::default();
    for family in Family::ALL {
        if !families.contains(&family) {
            continue;
        }
        let created = run_family(layout, family, options, on_created)?;
        report.families.push(FamilyReport { family, created });
    }

    span.record("files", report.file_count());
    info!(files = report.file_count(), "generation completed");
    Ok(report)
}

#[instrument(
    name = "cases.family",
    err,
    skip(layout, family, options, on_created),
    fields(family = family.as_str()),
)]
fn run_family(
    layout: &OutputLayout,
    family: Family,
    options: &EmitOptions,
    on_created: &mut dyn FnMut(&Path),
) -> Result<Vec<PathBuf>> {
    match family {
        Family::Pathfinder => pathfinder::generate(layout, options, on_created),
        Family::Backprop => backprop::generate(layout, options, on_created),
        Family::Hotspot => hotspot::generate(layout, options, on_created),
        Family::Kmeans => kmeans::generate(layout, options, on_created),
    }
}

/// Runs `generate_case` over `cases` in order, reporting each written file.
pub(crate) fn generate_all<C>(
    cases: &[C],
    on_created: &mut dyn FnMut(&Path),
    mut generate_case: impl FnMut(&C) -> Result<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(cases.len());
    for case in cases {
        let path = generate_case(case)?;
        on_created(&path);
        created.push(path);
    }
    Ok(created)
}

/// Creates `dir` and any missing parents.
pub(crate) fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| DexError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// `<dir>/<stem>.dx`
pub(crate) fn descriptor_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.{DESCRIPTOR_EXTENSION}"))
}

/// Writes one case file and reports it to the operator.
pub(crate) fn emit_case(
    path: PathBuf,
    descriptor: &Descriptor,
    options: &EmitOptions,
) -> Result<PathBuf> {
    write_descriptor_file(&path, descriptor, options)?;
    info!(
        path = %path.display(),
        benchmark = descriptor.benchmark(),
        "Created descriptor"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(Family::Pathfinder, "pathfinder")]
    #[case(Family::Backprop, "backprop")]
    #[case(Family::Hotspot, "hotspot")]
    #[case(Family::Kmeans, "kmeans")]
    fn family_names_match_routine_names(#[case] family: Family, #[case] expected: &str) {
        assert_eq!(family.as_str(), expected);
    }

    #[test]
    fn layout_places_outputs_under_exe_root() {
        let layout = OutputLayout::new("data-in", "exe-out");
        assert_eq!(layout.output_dir("backprop-ad"), Path::new("exe-out/backprop-ad"));
        assert_eq!(
            descriptor_path(&layout.output_dir("hotspot"), "64"),
            Path::new("exe-out/hotspot/64.dx")
        );
    }
}
