//! File handlers: stream one input file into its mirrored output.
//!
//! Both handlers read the input exactly once, line by line, and write kept
//! lines in input order. File handles are owned locals, so they are closed
//! on every return path, including `?` early exits.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{EngineOptions, Extractor, HeaderMode};
use crate::error::{DeclscopeResult, IoResultExt};
use crate::normalize::normalize_line;

/// Kind of source file, decided by the manifest entry's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `.h`
    Header,
    /// `.hpp`, `.cpp`, `.c`
    Compilable,
}

/// Which transformation a file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handler {
    PassThrough,
    Extract,
}

/// Picks the handler for a file kind under the configured header mode.
pub fn handler_for(kind: FileKind, header_mode: HeaderMode) -> Handler {
    match (kind, header_mode) {
        (FileKind::Header, HeaderMode::PassThrough) => Handler::PassThrough,
        (FileKind::Header, HeaderMode::Extract) | (FileKind::Compilable, _) => Handler::Extract,
    }
}

/// Line counts of one handled file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub lines_read: usize,
    pub lines_written: usize,
}

/// Shortens the borrow of an optional trace sink so it can be handed out
/// once per file.
pub(crate) fn reborrow_trace<'s>(trace: &'s mut Option<&mut dyn Write>) -> Option<&'s mut dyn Write> {
    match trace {
        Some(sink) => {
            let sink: &'s mut dyn Write = &mut **sink;
            Some(sink)
        }
        None => None,
    }
}

/// Calls `f` with every line of `reader`, without its line terminator.
///
/// Bytes that are not valid UTF-8 are replaced rather than treated as errors.
fn for_each_line<R, F>(mut reader: R, mut f: F) -> std::io::Result<usize>
where
    R: BufRead,
    F: FnMut(&str) -> std::io::Result<()>,
{
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(count);
        }
        count += 1;
        let text = String::from_utf8_lossy(&buf);
        f(text.trim_end_matches(['\n', '\r']))?;
    }
}

/// Copies every trimmed line unchanged.
pub fn pass_through<R: BufRead, W: Write>(reader: R, writer: &mut W) -> std::io::Result<FileStats> {
    let mut written = 0;
    let read = for_each_line(reader, |raw| {
        writeln!(writer, "{}", normalize_line(raw))?;
        written += 1;
        Ok(())
    })?;
    Ok(FileStats {
        lines_read: read,
        lines_written: written,
    })
}

/// Runs the declaration extraction pipeline over every line.
pub fn extract<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &EngineOptions,
    trace: Option<&mut dyn Write>,
) -> std::io::Result<FileStats> {
    let mut extractor = Extractor::new(options);
    if let Some(sink) = trace {
        extractor = extractor.with_trace(sink);
    }
    let mut written = 0;
    let read = for_each_line(reader, |raw| {
        if let Some(kept) = extractor.process_line(raw)? {
            writeln!(writer, "{}", kept)?;
            written += 1;
        }
        Ok(())
    })?;
    Ok(FileStats {
        lines_read: read,
        lines_written: written,
    })
}

/// Handles one file from `input` to `output`.
///
/// The output's parent directory is created when missing.
pub fn process_file(
    handler: Handler,
    input: &Path,
    output: &Path,
    options: &EngineOptions,
    trace: Option<&mut dyn Write>,
) -> DeclscopeResult<FileStats> {
    let source = File::open(input).with_path(input)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    let mut sink = BufWriter::new(File::create(output).with_path(output)?);
    let reader = BufReader::new(source);

    // Read and write failures are both reported against the input file.
    let stats = match handler {
        Handler::PassThrough => pass_through(reader, &mut sink),
        Handler::Extract => extract(reader, &mut sink, options, trace),
    }
    .with_path(input)?;
    sink.flush().with_path(output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        handler = ?handler,
        lines_read = stats.lines_read,
        lines_written = stats.lines_written,
        "file handled"
    );
    Ok(stats)
}
