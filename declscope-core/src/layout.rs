//! Mirror path convention.
//!
//! A manifest entry names a path relative to the input root ("all" by
//! default); its output lands at the same relative path under the output
//! root ("new" by default).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeclscopeError, DeclscopeResult, IoResultExt};

pub const DEFAULT_INPUT_ROOT: &str = "all";
pub const DEFAULT_OUTPUT_ROOT: &str = "new";

/// Whether `ensure_output_dir` had to create anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOutcome {
    Created,
    Existing,
}

/// Input and output roots of a mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLayout {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
}

impl Default for MirrorLayout {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT)
    }
}

/// Splits an entry on `/` and `\` and rejects components that would leave
/// the root.
fn entry_components(entry: &str) -> DeclscopeResult<Vec<&str>> {
    if entry.contains('\0') {
        return Err(DeclscopeError::path(entry, "contains null bytes"));
    }
    let parts: Vec<&str> = entry
        .split(['/', '\\'])
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    for part in &parts {
        if *part == ".." {
            return Err(DeclscopeError::path(entry, "parent traversal (..) is not allowed"));
        }
        if part.ends_with(':') {
            return Err(DeclscopeError::path(entry, "drive prefixes are not allowed"));
        }
    }
    Ok(parts)
}

impl MirrorLayout {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    fn join(root: &Path, entry: &str) -> DeclscopeResult<PathBuf> {
        let mut path = root.to_path_buf();
        path.extend(entry_components(entry)?);
        Ok(path)
    }

    /// Where the entry is read from.
    pub fn input_path(&self, entry: &str) -> DeclscopeResult<PathBuf> {
        Self::join(&self.input_root, entry)
    }

    /// Where the entry is written to.
    pub fn output_path(&self, entry: &str) -> DeclscopeResult<PathBuf> {
        Self::join(&self.output_root, entry)
    }

    /// Makes sure the mirrored directory for `entry` exists. Idempotent.
    pub fn ensure_output_dir(&self, entry: &str) -> DeclscopeResult<DirOutcome> {
        let dir = self.output_path(entry)?;
        if dir.is_dir() {
            return Ok(DirOutcome::Existing);
        }
        fs::create_dir_all(&dir).with_path(&dir)?;
        Ok(DirOutcome::Created)
    }
}
