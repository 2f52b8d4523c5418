//! Configuration loading from declscope.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::engine::{ClassRule, EngineOptions, HeaderMode, Variant};
use crate::error::DeclscopeError;
use crate::manifest::ExtensionSet;

pub const CONFIG_FILE: &str = "declscope.toml";

/// Main configuration structure for declscope.toml.
///
/// Every field is optional; unset fields keep the built-in defaults and
/// command-line flags win over both.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeclscopeConfig {
    /// Root the manifest entries are read from.
    pub input_root: Option<String>,
    /// Root the mirror is written to.
    pub output_root: Option<String>,
    /// Preset: "legacy" or "revised".
    pub variant: Option<Variant>,
    /// "nested" or "flat".
    pub class_rule: Option<ClassRule>,
    /// "pass-through" or "extract".
    pub header_mode: Option<HeaderMode>,
    /// Include prefixes dropped from the output.
    pub disallowed_includes: Option<Vec<String>>,
    /// Suffixes of compilable units, without the dot.
    pub compilable_extensions: Option<Vec<String>>,
    /// Suffixes of headers, without the dot.
    pub header_extensions: Option<Vec<String>>,
    /// Process files in parallel.
    pub parallel: Option<bool>,
}

impl DeclscopeConfig {
    /// Engine options: the variant preset with the individual overrides applied.
    pub fn engine_options(&self) -> EngineOptions {
        let mut options = EngineOptions::for_variant(self.variant.unwrap_or_default());
        if let Some(rule) = self.class_rule {
            options = options.with_class_rule(rule);
        }
        if let Some(mode) = self.header_mode {
            options = options.with_header_mode(mode);
        }
        if let Some(prefixes) = &self.disallowed_includes {
            options = options.with_disallowed_includes(prefixes.iter().cloned());
        }
        options
    }

    /// Extension set with the configured suffix lists.
    pub fn extensions(&self) -> Result<ExtensionSet, DeclscopeError> {
        let mut set = ExtensionSet::default();
        if let Some(exts) = &self.compilable_extensions {
            set.compilable = normalize_extensions(exts)?;
        }
        if let Some(exts) = &self.header_extensions {
            set.header = normalize_extensions(exts)?;
        }
        Ok(set)
    }
}

/// Strips a leading dot and rejects empty suffixes.
pub fn normalize_extensions(exts: &[String]) -> Result<Vec<String>, DeclscopeError> {
    exts.iter()
        .map(|ext| {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                Err(DeclscopeError::invalid_argument("empty file extension"))
            } else {
                Ok(ext.to_string())
            }
        })
        .collect()
}

/// Loads a specific configuration file.
pub fn load_config_file(path: &Path) -> Result<DeclscopeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| DeclscopeError::config(path, e.to_string()))?;
    Ok(cfg)
}

/// Loads configuration from declscope.toml in `dir` if it exists.
pub fn load_config(dir: &Path) -> Result<Option<DeclscopeConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}
