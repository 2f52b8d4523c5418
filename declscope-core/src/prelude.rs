//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use declscope_core::prelude::*;
//! ```

// Engine
pub use crate::engine::{extract_lines, ClassRule, EngineOptions, Extractor, HeaderMode, Variant};

// Errors
pub use crate::error::{DeclscopeError, DeclscopeResult};

// Runs
pub use crate::layout::MirrorLayout;
pub use crate::manifest::{read_manifest, ExtensionSet, ManifestEntry};
pub use crate::mirror::{Declscope, RunSummary};

// Configuration
pub use crate::config::{load_config, DeclscopeConfig};
