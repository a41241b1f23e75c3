//! Dataset ingestion for raw Rodinia text layouts.
//!
//! Two layouts occur in the suite. Record files carry one point per line with
//! whitespace-separated fields and a leading label. Grid files carry one cell
//! per line with no row delimiters at all, so rows have to be rebuilt by
//! chunking the flat sequence.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::Path;

use tracing::{Span, debug, field, instrument};

use crate::{
    error::{DexError, Result},
    literal::ensure_float,
};

/// Rows of literal strings, in source order.
///
/// Dimensions are taken verbatim from the input: rows are never padded,
/// truncated or checked against a target shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumericTable {
    rows: Vec<Vec<String>>,
}

impl NumericTable {
    /// Wraps pre-built rows.
    ///
    /// # Examples
    /// ```
    /// use dexprep_core::NumericTable;
    ///
    /// let table = NumericTable::new(vec![vec!["1.0".into(), "2.0".into()]]);
    /// assert_eq!(table.row_count(), 1);
    /// ```
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns the rows as slices.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows in the table.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the table, yielding its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl From<Vec<Vec<String>>> for NumericTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Describes how a dataset file is split into rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    /// One row per non-empty line, fields split on whitespace.
    Lines {
        /// Number of leading label tokens dropped from each line.
        skip_leading: usize,
    },
    /// One cell per non-empty line, regrouped into rows of `chunk_size` cells.
    ///
    /// Cells are kept verbatim apart from surrounding whitespace. A trailing
    /// partial row is kept rather than rejected.
    FlatChunked {
        /// Number of cells per rebuilt row.
        chunk_size: NonZeroUsize,
    },
}

impl LoadMode {
    /// Short label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lines { .. } => "lines",
            Self::FlatChunked { .. } => "flat_chunked",
        }
    }
}

/// Loads the dataset at `path` into a [`NumericTable`].
///
/// # Errors
/// Returns [`DexError::DatasetRead`] when the file cannot be opened or read,
/// including when it is not valid UTF-8.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dexprep_core::{LoadMode, load_table};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1 2\n1 3 4.5\n")?;
/// let table = load_table(file.path(), LoadMode::Lines { skip_leading: 1 })?;
/// assert_eq!(table.rows()[1], ["3.0", "4.5"]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "dataset.load",
    err,
    skip(path, mode),
    fields(path = field::Empty, mode = field::Empty, rows = field::Empty),
)]
pub fn load_table(path: &Path, mode: LoadMode) -> Result<NumericTable> {
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("mode", field::display(mode.label()));

    let read_error = |source| DexError::DatasetRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;
    let table = parse_table(BufReader::new(file), mode).map_err(read_error)?;

    span.record("rows", table.row_count());
    debug!(rows = table.row_count(), "dataset loaded");
    Ok(table)
}

/// Parses dataset text from `reader` into a [`NumericTable`].
///
/// Lines are split on LF or CRLF. Lines that are empty or contain only
/// whitespace are skipped in both modes. Record fields are normalized with
/// [`ensure_float`]; grid cells are not.
///
/// # Errors
/// Returns the reader's [`io::Error`] unchanged.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use std::num::NonZeroUsize;
/// use dexprep_core::{LoadMode, parse_table};
///
/// let mode = LoadMode::FlatChunked { chunk_size: NonZeroUsize::new(2).unwrap() };
/// let table = parse_table(Cursor::new("1\n2\n3\n"), mode).unwrap();
/// assert_eq!(table.rows(), [vec!["1", "2"], vec!["3"]]);
/// ```
pub fn parse_table<R: BufRead>(reader: R, mode: LoadMode) -> io::Result<NumericTable> {
    let lines = non_empty_lines(reader)?;
    let rows = match mode {
        LoadMode::Lines { skip_leading } => lines
            .iter()
            .map(|line| {
                line.split_whitespace()
                    .skip(skip_leading)
                    .map(|token| ensure_float(token).into_owned())
                    .collect()
            })
            .collect(),
        LoadMode::FlatChunked { chunk_size } => {
            let cells: Vec<String> = lines
                .iter()
                .map(|line| line.trim().to_owned())
                .collect();
            chunk(&cells, chunk_size)
        }
    };
    Ok(NumericTable::new(rows))
}

/// Splits `items` into consecutive groups of `size`.
///
/// Yields `ceil(N / size)` groups. Every group but the last holds exactly
/// `size` items; the last holds the remainder when `N` is not a multiple of
/// `size`. Concatenating the groups reproduces `items`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use dexprep_core::chunk;
///
/// let groups = chunk(&[1, 2, 3, 4, 5], NonZeroUsize::new(2).unwrap());
/// assert_eq!(groups, [vec![1, 2], vec![3, 4], vec![5]]);
/// ```
#[must_use]
pub fn chunk<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}

fn non_empty_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for entry in reader.lines() {
        let line = entry?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
