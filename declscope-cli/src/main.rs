//! declscope CLI - declarations-only mirror generator for C-family code bases.
//!
//! Modes:
//! - Manifest run (default): mirror every manifest entry from the input root
//!   into the output root
//! - `--single FILE`: extract one file to stdout
//! - `--scan DIR`: print a manifest for a source tree

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use declscope_core::{
    config::normalize_extensions, extract_file, init_structured_logging, load_config,
    load_config_file, log_error, log_info, log_run_summary, print_json, print_plain,
    scan_manifest, write_manifest, ClassRule, Declscope, DeclscopeConfig, EngineOptions, ExtensionSet,
    HeaderMode, Variant, DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT,
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum VariantArg {
    /// Headers are copied unchanged
    Legacy,
    /// Headers are pruned like compilable units
    Revised,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ClassRuleArg {
    /// `class` inside a namespace needs one more level before pruning
    Nested,
    /// `class` only counts at the top level
    Flat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderArg {
    PassThrough,
    Extract,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Declarations-only mirror generator for C-family code bases")]
pub struct Cli {
    /// Manifest listing one relative path per line
    #[arg(default_value = "content.txt")]
    manifest: PathBuf,

    /// Configuration file (defaults to ./declscope.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root the manifest entries are read from
    #[arg(long)]
    input_root: Option<PathBuf>,

    /// Root the mirror is written to
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Behaviour preset
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// How `class` raises the declaration boundary
    #[arg(long, value_enum)]
    class_rule: Option<ClassRuleArg>,

    /// What to do with `.h` files
    #[arg(long, value_enum)]
    headers: Option<HeaderArg>,

    /// Include prefixes to drop (replaces the configured list)
    #[arg(long, num_args = 1..)]
    disallow: Vec<String>,

    /// Compilable unit suffixes (replaces the configured list)
    #[arg(long, num_args = 1..)]
    compilable_ext: Vec<String>,

    /// Header suffixes (replaces the configured list)
    #[arg(long, num_args = 1..)]
    header_ext: Vec<String>,

    /// Process files in parallel
    #[arg(long)]
    parallel: bool,

    /// Write a per-line engine trace to this file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Extract a single file to stdout instead of running the manifest
    #[arg(long, value_name = "FILE", conflicts_with = "scan")]
    single: Option<PathBuf>,

    /// Print a manifest for the given source tree and exit
    #[arg(long, value_name = "DIR")]
    scan: Option<PathBuf>,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Legacy => Variant::Legacy,
            VariantArg::Revised => Variant::Revised,
        }
    }
}

impl From<ClassRuleArg> for ClassRule {
    fn from(v: ClassRuleArg) -> Self {
        match v {
            ClassRuleArg::Nested => ClassRule::Nested,
            ClassRuleArg::Flat => ClassRule::Flat,
        }
    }
}

impl From<HeaderArg> for HeaderMode {
    fn from(v: HeaderArg) -> Self {
        match v {
            HeaderArg::PassThrough => HeaderMode::PassThrough,
            HeaderArg::Extract => HeaderMode::Extract,
        }
    }
}

/// Loads the explicit config file, or ./declscope.toml when present.
fn resolve_config(cli: &Cli) -> Result<DeclscopeConfig> {
    match &cli.config {
        Some(path) => load_config_file(path),
        None => Ok(load_config(Path::new("."))?.unwrap_or_default()),
    }
}

/// Folds command-line flags over the file configuration.
fn merge_cli(cli: &Cli, mut cfg: DeclscopeConfig) -> DeclscopeConfig {
    if let Some(root) = &cli.input_root {
        cfg.input_root = Some(root.to_string_lossy().into_owned());
    }
    if let Some(root) = &cli.output_root {
        cfg.output_root = Some(root.to_string_lossy().into_owned());
    }
    if let Some(v) = cli.variant {
        cfg.variant = Some(v.into());
    }
    if let Some(rule) = cli.class_rule {
        cfg.class_rule = Some(rule.into());
    }
    if let Some(mode) = cli.headers {
        cfg.header_mode = Some(mode.into());
    }
    if !cli.disallow.is_empty() {
        cfg.disallowed_includes = Some(cli.disallow.clone());
    }
    if !cli.compilable_ext.is_empty() {
        cfg.compilable_extensions = Some(cli.compilable_ext.clone());
    }
    if !cli.header_ext.is_empty() {
        cfg.header_extensions = Some(cli.header_ext.clone());
    }
    if cli.parallel {
        cfg.parallel = Some(true);
    }
    cfg
}

/// Opens the trace sink for `--single`, if requested.
fn open_trace(path: Option<&Path>) -> Result<Option<BufWriter<File>>> {
    path.map(|p| {
        File::create(p)
            .map(BufWriter::new)
            .with_context(|| format!("Failed to create trace file: {}", p.display()))
    })
    .transpose()
}

fn run_single(path: &Path, options: &EngineOptions, extensions: &ExtensionSet, trace: Option<&Path>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut trace_file = open_trace(trace)?;

    let stats = match trace_file.as_mut() {
        Some(file) => {
            let sink: &mut dyn Write = file;
            extract_file(path, &mut out, options, extensions, Some(sink))?
        }
        None => extract_file(path, &mut out, options, extensions, None)?,
    };
    out.flush()?;
    if let Some(mut file) = trace_file {
        file.flush()?;
    }
    log_info(&format!(
        "{}: {} of {} lines kept",
        path.display(),
        stats.lines_written,
        stats.lines_read
    ));
    Ok(())
}

fn run_scan(dir: &Path, extensions: &ExtensionSet) -> Result<()> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {}", dir.display()));
    }
    let entries = scan_manifest(dir, extensions)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_manifest(&entries, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let cfg = merge_cli(&cli, resolve_config(&cli)?);
    let options = cfg.engine_options();
    let extensions = cfg.extensions()?;

    if let Some(dir) = &cli.scan {
        return run_scan(dir, &extensions);
    }

    if let Some(file) = &cli.single {
        return run_single(file, &options, &extensions, cli.trace.as_deref());
    }

    let mut builder = Declscope::new(&cli.manifest)
        .input_root(cfg.input_root.as_deref().unwrap_or(DEFAULT_INPUT_ROOT))
        .output_root(cfg.output_root.as_deref().unwrap_or(DEFAULT_OUTPUT_ROOT))
        .options(options)
        .extensions(extensions)
        .parallel(cfg.parallel.unwrap_or(false));
    if let Some(trace) = &cli.trace {
        builder = builder.trace(trace);
    }

    let summary = builder
        .run()
        .with_context(|| format!("Mirror run failed for manifest: {}", cli.manifest.display()))?;

    log_run_summary(&summary);

    if cli.json {
        print_json(&summary);
    } else {
        print_plain(&summary);
    }
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] declscope internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    init_structured_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log_error(&format!("{:#}", e));
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
