//! `#include` normalization.
//!
//! Angle-bracket includes become quoted includes so the mirror resolves every
//! header relative to itself. Includes of disallowed external libraries are
//! dropped from the output instead.

use crate::normalize::{find_first, starts_with_prefix};

/// Default disallowed include prefixes.
pub const DEFAULT_DISALLOWED: &[&str] = &["boost"];

const DIRECTIVE: &str = "include";

/// Outcome of inspecting one normalized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeAction {
    /// Not an `#include` directive.
    NotInclude,
    /// An include with nothing to rewrite (already quoted).
    Unchanged,
    /// The rewritten line.
    Rewritten(String),
    /// The include names a disallowed dependency; drop the line.
    Excluded,
}

/// Inspects a normalized line and decides how an include directive is emitted.
pub fn rewrite_include(line: &str, disallowed: &[String]) -> IncludeAction {
    if !starts_with_prefix(line, "#") {
        return IncludeAction::NotInclude;
    }
    let Some(word) = find_first(line, 1, |c| c != ' ' && c != '\t') else {
        return IncludeAction::NotInclude;
    };
    if !starts_with_prefix(&line[word..], DIRECTIVE) {
        return IncludeAction::NotInclude;
    }

    let args = word + DIRECTIVE.len();
    let open = find_first(line, args, |c| c == '<');
    let close = find_first(line, args, |c| c == '>');
    if open.is_none() && close.is_none() {
        return IncludeAction::Unchanged;
    }

    if let Some(open) = open {
        let target = &line[open + 1..];
        if disallowed
            .iter()
            .any(|prefix| !prefix.is_empty() && starts_with_prefix(target, prefix))
        {
            return IncludeAction::Excluded;
        }
    }

    let mut rewritten = line.to_string();
    // '<' and '>' are single bytes, so replacing in place keeps offsets valid.
    for idx in [open, close].into_iter().flatten() {
        rewritten.replace_range(idx..idx + 1, "\"");
    }
    IncludeAction::Rewritten(rewritten)
}
