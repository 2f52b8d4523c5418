//! Line normalization and the small scanning primitives the other stages use.

/// Whether a normalized line carries any text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Text,
}

/// Strips leading and trailing whitespace. Nothing else is touched.
#[inline]
pub fn normalize_line(raw: &str) -> &str {
    raw.trim()
}

/// Classifies an already normalized line.
pub fn classify_line(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text
    }
}

/// Fixed-prefix comparison. Lines shorter than `prefix` simply do not match.
#[inline]
pub fn starts_with_prefix(line: &str, prefix: &str) -> bool {
    line.as_bytes().starts_with(prefix.as_bytes())
}

/// Byte index of the first char at or after `from` that satisfies `pred`.
///
/// Returns `None` when `from` is past the end, is not a char boundary, or no
/// char matches.
pub fn find_first<P>(line: &str, from: usize, mut pred: P) -> Option<usize>
where
    P: FnMut(char) -> bool,
{
    let rest = line.get(from..)?;
    rest.char_indices()
        .find(|&(_, c)| pred(c))
        .map(|(offset, _)| from + offset)
}
