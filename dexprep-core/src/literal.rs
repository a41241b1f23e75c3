//! Canonicalisation of raw numeric tokens into float literals.

use std::borrow::Cow;

/// Returns `token` as a literal suitable for a `Float` slot.
///
/// Tokens containing a `.` are returned untouched; anything else gains a
/// `.0` suffix. No further validation is performed, so non-numeric text is
/// passed through with the same rule applied.
///
/// # Examples
/// ```
/// use dexprep_core::ensure_float;
///
/// assert_eq!(ensure_float("3"), "3.0");
/// assert_eq!(ensure_float("2.5"), "2.5");
/// assert_eq!(ensure_float("1e-3"), "1e-3.0");
/// ```
#[must_use]
pub fn ensure_float(token: &str) -> Cow<'_, str> {
    if token.contains('.') {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(format!("{token}.0"))
    }
}
