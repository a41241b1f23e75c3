//! Temporary dataset and output trees for generator tests.
//!
//! A [`DatasetTree`] mirrors the on-disk layout of the benchmark suite:
//! `<root>/rodinia/data/<family>/<file>` for inputs and `<root>/exe` for
//! generated descriptors, both inside one temporary directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a dataset root and an output root.
pub struct DatasetTree {
    dir: TempDir,
}

impl DatasetTree {
    /// Creates an empty tree with the dataset root already present.
    ///
    /// # Errors
    /// Returns an [`io::Error`] when the temporary directory cannot be
    /// created.
    pub fn new() -> io::Result<Self> {
        let tree = Self::without_data_root()?;
        fs::create_dir_all(tree.data_root())?;
        Ok(tree)
    }

    /// Creates a tree whose dataset root does not exist.
    ///
    /// # Errors
    /// Returns an [`io::Error`] when the temporary directory cannot be
    /// created.
    pub fn without_data_root() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Temporary directory containing both roots.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Dataset root passed to the generator.
    #[must_use]
    pub fn data_root(&self) -> PathBuf {
        self.dir.path().join("rodinia")
    }

    /// Descriptor output root passed to the generator.
    #[must_use]
    pub fn exe_root(&self) -> PathBuf {
        self.dir.path().join("exe")
    }

    /// Writes `contents` to `rodinia/data/<family>/<name>`.
    ///
    /// # Errors
    /// Returns an [`io::Error`] when the file or its parents cannot be
    /// written.
    pub fn write_dataset(&self, family: &str, name: &str, contents: &str) -> io::Result<PathBuf> {
        let dir = self.data_root().join("data").join(family);
        fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// `count` records of `<index> <fields...>` with integer fields.
///
/// Field `f` of record `r` is `r * fields + f`, so every value is distinct
/// and none carries a decimal point.
#[must_use]
pub fn labelled_points(count: usize, fields: usize) -> String {
    let mut out = String::new();
    for record in 0..count {
        out.push_str(&record.to_string());
        for field in 0..fields {
            out.push(' ');
            out.push_str(&(record * fields + field).to_string());
        }
        out.push('\n');
    }
    out
}

/// `count` cells, one per line, valued `0.5`, `1.5`, ...
#[must_use]
pub fn flat_cells(count: usize) -> String {
    (0..count).map(|cell| format!("{cell}.5\n")).collect()
}
