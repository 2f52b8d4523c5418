//! Manifest reading: one relative path per line, processed in order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeclscopeError, DeclscopeResult};
use crate::handler::FileKind;

/// Suffixes (without the dot) that select a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSet {
    pub compilable: Vec<String>,
    pub header: Vec<String>,
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            compilable: vec!["hpp".into(), "cpp".into(), "c".into()],
            header: vec!["h".into()],
        }
    }
}

impl ExtensionSet {
    /// File kind for `entry`, if its suffix is recognized.
    pub fn kind_of(&self, entry: &str) -> Option<FileKind> {
        let has_suffix = |exts: &[String]| {
            exts.iter().any(|ext| {
                entry
                    .strip_suffix(ext.as_str())
                    .and_then(|rest| rest.strip_suffix('.'))
                    .is_some_and(|stem| !stem.is_empty() && !stem.ends_with(['/', '\\']))
            })
        };
        if has_suffix(&self.compilable) {
            Some(FileKind::Compilable)
        } else if has_suffix(&self.header) {
            Some(FileKind::Header)
        } else {
            None
        }
    }
}

/// What a manifest line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// No `.` in the entry: mirror the directory.
    Directory,
    /// A file handled as the given kind.
    File(FileKind),
    /// Blank, or a file with an unrecognized suffix.
    Skipped,
}

/// One trimmed manifest line with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub raw: String,
    pub kind: EntryKind,
}

/// Classifies a manifest line.
pub fn classify_entry(raw: &str, extensions: &ExtensionSet) -> EntryKind {
    let entry = raw.trim();
    if entry.is_empty() {
        return EntryKind::Skipped;
    }
    if !entry.contains('.') {
        return EntryKind::Directory;
    }
    extensions
        .kind_of(entry)
        .map_or(EntryKind::Skipped, EntryKind::File)
}

/// Parses manifest text.
pub fn parse_manifest(text: &str, extensions: &ExtensionSet) -> Vec<ManifestEntry> {
    text.lines()
        .map(|line| {
            let raw = line.trim();
            ManifestEntry {
                raw: raw.to_string(),
                kind: classify_entry(raw, extensions),
            }
        })
        .collect()
}

/// Reads and parses a manifest file. A missing manifest is fatal.
pub fn read_manifest(path: &Path, extensions: &ExtensionSet) -> DeclscopeResult<Vec<ManifestEntry>> {
    let text = fs::read_to_string(path).map_err(|e| {
        DeclscopeError::manifest(path, format!("cannot read manifest: {}", e))
    })?;
    Ok(parse_manifest(&text, extensions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_entry() {
        let ext = ExtensionSet::default();
        assert_eq!(classify_entry("/src/core", &ext), EntryKind::Directory);
        assert_eq!(classify_entry("/src/a.cpp", &ext), EntryKind::File(FileKind::Compilable));
        assert_eq!(classify_entry("/src/a.hpp", &ext), EntryKind::File(FileKind::Compilable));
        assert_eq!(classify_entry("/src/a.c", &ext), EntryKind::File(FileKind::Compilable));
        assert_eq!(classify_entry("/src/a.h", &ext), EntryKind::File(FileKind::Header));
        assert_eq!(classify_entry("  /src/a.h  ", &ext), EntryKind::File(FileKind::Header));
        assert_eq!(classify_entry("/README.md", &ext), EntryKind::Skipped);
        assert_eq!(classify_entry("/src/a.cc", &ext), EntryKind::Skipped);
        assert_eq!(classify_entry("", &ext), EntryKind::Skipped);
        assert_eq!(classify_entry("   ", &ext), EntryKind::Skipped);
    }

    #[test]
    fn test_bare_suffix_is_not_a_file() {
        let ext = ExtensionSet::default();
        assert_eq!(ext.kind_of(".c"), None);
        assert_eq!(ext.kind_of(".hpp"), None);
        assert_eq!(ext.kind_of("/src/.h"), None);
        assert_eq!(ext.kind_of("\\src\\.cpp"), None);
        assert_eq!(ext.kind_of("/src/a.h"), Some(FileKind::Header));
        assert_eq!(ext.kind_of("x.c"), Some(FileKind::Compilable));
    }

    #[test]
    fn test_custom_extensions() {
        let ext = ExtensionSet {
            compilable: vec!["cc".into()],
            header: vec!["hh".into()],
        };
        assert_eq!(classify_entry("a.cc", &ext), EntryKind::File(FileKind::Compilable));
        assert_eq!(classify_entry("a.hh", &ext), EntryKind::File(FileKind::Header));
        assert_eq!(classify_entry("a.cpp", &ext), EntryKind::Skipped);
    }

    #[test]
    fn test_parse_manifest_keeps_order() {
        let entries = parse_manifest("/src\n/src/a.cpp\n\n/src/a.h\n", &ExtensionSet::default());
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntryKind::Directory,
                EntryKind::File(FileKind::Compilable),
                EntryKind::Skipped,
                EntryKind::File(FileKind::Header),
            ]
        );
        assert_eq!(entries[1].raw, "/src/a.cpp");
    }

    #[test]
    fn test_read_manifest_missing() {
        let path = std::env::temp_dir().join("declscope_no_such_manifest.txt");
        let err = read_manifest(&path, &ExtensionSet::default()).unwrap_err();
        assert!(matches!(err, DeclscopeError::Manifest { .. }));
    }
}
