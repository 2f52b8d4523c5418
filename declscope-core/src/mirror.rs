//! Builder API and run orchestration for a declarations-only mirror.
//!
//! ```rust,ignore
//! use declscope_core::prelude::*;
//!
//! let summary = Declscope::new("content.txt")
//!     .input_root("all")
//!     .output_root("new")
//!     .options(EngineOptions::revised())
//!     .run()?;
//!
//! println!("{} lines kept", summary.lines_written);
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::EngineOptions;
use crate::error::{DeclscopeResult, IoResultExt};
use crate::handler::{handler_for, process_file, reborrow_trace, FileKind, FileStats, Handler};
use crate::layout::{DirOutcome, MirrorLayout};
use crate::manifest::{read_manifest, EntryKind, ExtensionSet, ManifestEntry};

/// Result for one handled file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub entry: String,
    pub kind: FileKind,
    pub handler: Handler,
    pub stats: FileStats,
}

/// Totals of a mirror run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub directories_created: usize,
    pub directories_existing: usize,
    pub headers: usize,
    pub compilable_units: usize,
    pub skipped: Vec<String>,
    pub lines_read: usize,
    pub lines_written: usize,
    pub files: Vec<FileRecord>,
}

impl RunSummary {
    fn record_dir(&mut self, outcome: DirOutcome) {
        match outcome {
            DirOutcome::Created => self.directories_created += 1,
            DirOutcome::Existing => self.directories_existing += 1,
        }
    }

    fn record_file(&mut self, record: FileRecord) {
        match record.kind {
            FileKind::Header => self.headers += 1,
            FileKind::Compilable => self.compilable_units += 1,
        }
        self.lines_read += record.stats.lines_read;
        self.lines_written += record.stats.lines_written;
        self.files.push(record);
    }
}

/// Builder for configuring a mirror run.
#[derive(Debug, Clone)]
pub struct Declscope {
    manifest: PathBuf,
    layout: MirrorLayout,
    options: EngineOptions,
    extensions: ExtensionSet,
    parallel: bool,
    trace: Option<PathBuf>,
}

impl Declscope {
    /// Create a run over the given manifest file.
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            layout: MirrorLayout::default(),
            options: EngineOptions::default(),
            extensions: ExtensionSet::default(),
            parallel: false,
            trace: None,
        }
    }

    pub fn input_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.layout.input_root = root.into();
        self
    }

    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.layout.output_root = root.into();
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    /// Process files on the rayon pool. Ignored while tracing.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Write a per-line engine trace of every extracted file to `path`.
    pub fn trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace = Some(path.into());
        self
    }

    pub fn layout(&self) -> &MirrorLayout {
        &self.layout
    }

    /// Reads the manifest and mirrors every entry.
    pub fn run(&self) -> DeclscopeResult<RunSummary> {
        let entries = read_manifest(&self.manifest, &self.extensions)?;
        debug!(
            manifest = %self.manifest.display(),
            entries = entries.len(),
            input_root = %self.layout.input_root.display(),
            output_root = %self.layout.output_root.display(),
            "starting mirror run"
        );
        self.run_entries(&entries)
    }

    /// Mirrors already parsed manifest entries.
    pub fn run_entries(&self, entries: &[ManifestEntry]) -> DeclscopeResult<RunSummary> {
        let mut summary = RunSummary::default();
        let outcome = self.layout.ensure_output_dir("")?;
        debug!(root = %self.layout.output_root.display(), ?outcome, "output root ready");

        match &self.trace {
            Some(path) => {
                if self.parallel {
                    warn!("tracing requested, processing files sequentially");
                }
                let mut file = BufWriter::new(File::create(path).with_path(path)?);
                {
                    let sink: &mut dyn Write = &mut file;
                    self.run_sequential(entries, &mut summary, Some(sink))?;
                }
                file.flush().with_path(path)?;
            }
            None if self.parallel => self.run_parallel(entries, &mut summary)?,
            None => self.run_sequential(entries, &mut summary, None)?,
        }

        debug!(
            headers = summary.headers,
            compilable_units = summary.compilable_units,
            lines_read = summary.lines_read,
            lines_written = summary.lines_written,
            "mirror run finished"
        );
        Ok(summary)
    }

    fn run_sequential(
        &self,
        entries: &[ManifestEntry],
        summary: &mut RunSummary,
        mut trace: Option<&mut dyn Write>,
    ) -> DeclscopeResult<()> {
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => summary.record_dir(self.layout.ensure_output_dir(&entry.raw)?),
                EntryKind::File(kind) => {
                    if let Some(sink) = trace.as_mut() {
                        writeln!(sink, "== {}", entry.raw).with_path(&entry.raw)?;
                    }
                    let record = self.handle(&entry.raw, kind, reborrow_trace(&mut trace))?;
                    summary.record_file(record);
                }
                EntryKind::Skipped => self.skip(entry, summary),
            }
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self, entries: &[ManifestEntry], summary: &mut RunSummary) -> DeclscopeResult<()> {
        // Directories first, in manifest order, so files can land in them.
        let mut files = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => summary.record_dir(self.layout.ensure_output_dir(&entry.raw)?),
                EntryKind::File(kind) => files.push((entry.raw.as_str(), kind)),
                EntryKind::Skipped => self.skip(entry, summary),
            }
        }

        let records = files
            .par_iter()
            .map(|(raw, kind)| self.handle(raw, *kind, None))
            .collect::<DeclscopeResult<Vec<_>>>()?;
        for record in records {
            summary.record_file(record);
        }
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(&self, entries: &[ManifestEntry], summary: &mut RunSummary) -> DeclscopeResult<()> {
        self.run_sequential(entries, summary, None)
    }

    fn handle(
        &self,
        raw: &str,
        kind: FileKind,
        trace: Option<&mut dyn Write>,
    ) -> DeclscopeResult<FileRecord> {
        let handler = handler_for(kind, self.options.header_mode);
        let input = self.layout.input_path(raw)?;
        let output = self.layout.output_path(raw)?;
        let stats = process_file(handler, &input, &output, &self.options, trace)?;
        Ok(FileRecord {
            entry: raw.to_string(),
            kind,
            handler,
            stats,
        })
    }

    fn skip(&self, entry: &ManifestEntry, summary: &mut RunSummary) {
        if !entry.raw.is_empty() {
            warn!(entry = %entry.raw, "unrecognized manifest entry skipped");
            summary.skipped.push(entry.raw.clone());
        }
    }
}

/// Extracts a single file, picking the handler from its suffix.
///
/// Files with an unknown suffix are treated as compilable units.
pub fn extract_file<W: Write>(
    path: &Path,
    writer: &mut W,
    options: &EngineOptions,
    extensions: &ExtensionSet,
    trace: Option<&mut dyn Write>,
) -> DeclscopeResult<FileStats> {
    let name = path.to_string_lossy();
    let kind = extensions.kind_of(&name).unwrap_or(FileKind::Compilable);
    let reader = std::io::BufReader::new(File::open(path).with_path(path)?);
    let stats = match handler_for(kind, options.header_mode) {
        Handler::PassThrough => crate::handler::pass_through(reader, writer),
        Handler::Extract => crate::handler::extract(reader, writer, options, trace),
    }
    .with_path(path)?;
    Ok(stats)
}
