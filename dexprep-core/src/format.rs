//! Rendering of literal tables into the runtime's nested array syntax.

use crate::dataset::NumericTable;

/// Separator placed between the rows of a rendered table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    /// A bare comma, keeping the whole table on one line.
    Compact,
    /// A comma followed by a line break and a two space indent.
    #[default]
    Multiline,
}

impl Separator {
    /// Returns the literal separator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => ",",
            Self::Multiline => ",\n  ",
        }
    }
}

/// Renders a flat sequence as `[a,b,c]`.
///
/// # Examples
/// ```
/// use dexprep_core::format_vector;
///
/// assert_eq!(format_vector(&["1.0", "2.0"]), "[1.0,2.0]");
/// assert_eq!(format_vector::<&str>(&[]), "[]");
/// ```
#[must_use]
pub fn format_vector<S: AsRef<str>>(items: &[S]) -> String {
    join_bracketed(items.iter().map(AsRef::as_ref), ",")
}

/// Renders a table as a bracketed list of row vectors.
///
/// # Examples
/// ```
/// use dexprep_core::{NumericTable, Separator, format_table};
///
/// let table = NumericTable::new(vec![
///     vec!["1.0".into(), "2.0".into()],
///     vec!["3.0".into(), "4.0".into()],
/// ]);
/// assert_eq!(format_table(&table, Separator::Compact), "[[1.0,2.0],[3.0,4.0]]");
/// assert_eq!(
///     format_table(&table, Separator::Multiline),
///     "[[1.0,2.0],\n  [3.0,4.0]]",
/// );
/// ```
#[must_use]
pub fn format_table(table: &NumericTable, separator: Separator) -> String {
    format_rows(table.rows(), separator)
}

/// Renders arbitrary row slices with the same layout as [`format_table`].
#[must_use]
pub fn format_rows<R, S>(rows: &[R], separator: Separator) -> String
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let rendered: Vec<String> = rows.iter().map(|row| format_vector(row.as_ref())).collect();
    join_bracketed(rendered.iter().map(String::as_str), separator.as_str())
}

fn join_bracketed<'a>(items: impl Iterator<Item = &'a str>, separator: &str) -> String {
    let mut out = String::from("[");
    for (index, item) in items.enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        out.push_str(item);
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(Separator::Compact, "[[1.0],[2.0,3.0],[]]")]
    #[case(Separator::Multiline, "[[1.0],\n  [2.0,3.0],\n  []]")]
    fn format_rows_preserves_ragged_rows(#[case] separator: Separator, #[case] expected: &str) {
        let rows = vec![vec!["1.0"], vec!["2.0", "3.0"], vec![]];
        assert_eq!(format_rows(&rows, separator), expected);
    }

    #[test]
    fn format_table_of_empty_table_is_empty_brackets() {
        assert_eq!(format_table(&NumericTable::default(), Separator::Multiline), "[]");
    }

    #[test]
    fn format_vector_keeps_literals_verbatim() {
        assert_eq!(format_vector(&["-1e5", "0.25", "x"]), "[-1e5,0.25,x]");
    }
}
