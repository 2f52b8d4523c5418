//! Manifest generation from a source tree.
//!
//! Produces the manifest the mirror run consumes: directories before their
//! contents, entries as `/`-prefixed paths relative to the scanned root.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::manifest::ExtensionSet;

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &[".git", ".svn", "target", "node_modules"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Walks `root` and returns manifest lines for directories and recognized files.
///
/// Directory names containing a `.` cannot be expressed in the manifest and
/// are skipped together with their contents.
pub fn scan_manifest(root: &Path, extensions: &ExtensionSet) -> Result<Vec<String>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let mut out = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !is_excluded_dir(e, &excludes)
                && !(e.depth() > 0 && e.file_type().is_dir() && e.file_name().to_string_lossy().contains('.'))
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if entry.depth() == 0 {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?;
        let line = format!(
            "/{}",
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        );

        if entry.file_type().is_dir() || extensions.kind_of(&line).is_some() {
            out.push(line);
        }
    }
    Ok(out)
}

/// Writes manifest lines, one per line.
pub fn write_manifest<W: Write>(entries: &[String], writer: &mut W) -> std::io::Result<()> {
    for entry in entries {
        writeln!(writer, "{}", entry)?;
    }
    Ok(())
}
