//! Brace depth counting.

/// Net nesting change of one line: `{` count minus `}` count.
///
/// Braces inside comments or string literals are counted like any other.
pub fn brace_delta(line: &str) -> i32 {
    line.bytes().fold(0, |acc, b| match b {
        b'{' => acc + 1,
        b'}' => acc - 1,
        _ => acc,
    })
}
