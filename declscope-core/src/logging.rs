//! Structured logging for mirror runs, using **tracing**.
//!
//! Levels used across the crate:
//! - `info`: one event per handled file (`handler::process_file`) and the
//!   run totals from [`log_run_summary`]
//! - `debug`: run steps such as manifest loading and output root creation
//! - `warn`: skipped manifest entries and a trace request that forces a
//!   sequential run
//!
//! The library only emits events; the binary installs the subscriber. Output
//! is JSON on stderr so stdout stays free for `--single` and `--scan`.

use tracing::{error, info, warn};

use crate::mirror::RunSummary;

/// Installs the JSON subscriber on stderr, filtered by `RUST_LOG`
/// (e.g. `RUST_LOG=declscope_core=debug` to see run steps).
///
/// Call once at program start.
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Emits the totals of a finished mirror run, plus a warning when manifest
/// entries were skipped.
pub fn log_run_summary(summary: &RunSummary) {
    if !summary.skipped.is_empty() {
        warn!(
            skipped = summary.skipped.len(),
            first = %summary.skipped[0],
            "manifest entries skipped"
        );
    }
    info!(
        directories_created = summary.directories_created,
        directories_existing = summary.directories_existing,
        headers = summary.headers,
        compilable_units = summary.compilable_units,
        lines_read = summary.lines_read,
        lines_written = summary.lines_written,
        "mirror written"
    );
}

pub fn log_info(message: &str) {
    info!(detail = %message);
}

pub fn log_error(message: &str) {
    error!(detail = %message);
}
