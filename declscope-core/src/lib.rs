//! declscope-core: declaration-surface extraction for C-family source trees.
//!
//! Given a source file, the engine emits a reduced copy holding only the
//! declarations: namespace/class/struct openings, member and method
//! signatures, data members. Function bodies are dropped. It is a line-based
//! brace-counting filter, not a C++ parser.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use declscope_core::prelude::*;
//!
//! let kept = extract_lines("class A {\n  void f() {\n    g();\n  }\n};", &EngineOptions::legacy());
//! assert_eq!(kept, ["class A {", "void f() {", "}", "};"]);
//! ```
//!
//! # Module Organization
//!
//! - [`normalize`]: line trimming and prefix/index helpers
//! - [`include`]: `#include` rewriting and filtering
//! - [`braces`]: brace depth counting
//! - [`keywords`]: the injected keyword set
//! - [`engine`]: struct scope stack and declaration-boundary state machine
//! - [`handler`]: pass-through and extraction file handlers
//! - [`manifest`], [`layout`], [`mirror`]: manifest-driven mirror runs
//! - [`scan`]: manifest generation from a source tree
//!
//! # Cargo Features
//!
//! - `parallel` (default): process manifest files on a rayon pool
//! - `scan` (default): manifest generation

pub mod braces;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod include;
pub mod keywords;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod mirror;
pub mod normalize;
pub mod prelude;
pub mod report;

#[cfg(feature = "scan")]
pub mod scan;

// Error types
pub use error::{DeclscopeError, DeclscopeResult, IoResultExt};

// Engine
pub use braces::brace_delta;
pub use engine::{
    extract_lines, ClassRule, EngineOptions, EngineState, Extractor, HeaderMode, Variant,
};
pub use include::{rewrite_include, IncludeAction, DEFAULT_DISALLOWED};
pub use keywords::KeywordSet;
pub use normalize::{classify_line, find_first, normalize_line, starts_with_prefix, LineKind};

// File handlers
pub use handler::{extract, handler_for, pass_through, process_file, FileKind, FileStats, Handler};

// Manifest and mirror runs
pub use layout::{DirOutcome, MirrorLayout, DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT};
pub use manifest::{classify_entry, parse_manifest, read_manifest, EntryKind, ExtensionSet, ManifestEntry};
pub use mirror::{extract_file, Declscope, FileRecord, RunSummary};

// Configuration
pub use config::{load_config, load_config_file, DeclscopeConfig, CONFIG_FILE};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_run_summary};

// Reporting
pub use report::{format_plain, print_json, print_plain};

#[cfg(feature = "scan")]
pub use scan::{scan_manifest, write_manifest};

#[cfg(test)]
mod tests;
