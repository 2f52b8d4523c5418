//! Declaration-scope extraction engine.
//!
//! A per-line state machine over trimmed source text. It tracks the net brace
//! depth of the file and a *boundary* depth: lines that sit below the boundary
//! belong to the declaration shell (namespace and class bodies) and are kept,
//! lines at or above it are implementation bodies and are dropped. The one
//! exception is the line that crosses from `boundary - 1` into the body, which
//! carries the signature of the function being opened.
//!
//! `struct` bodies are preserved whole. While the struct stack is non-empty
//! every line is emitted verbatim and only a separate cursor tracks braces;
//! the boundary machine resumes once the outermost struct closes.
//!
//! Nothing here understands comments, strings or macros. The engine is a
//! best-effort textual filter.

use std::borrow::Cow;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::braces::brace_delta;
use crate::include::{rewrite_include, IncludeAction, DEFAULT_DISALLOWED};
use crate::keywords::{KeywordSet, CLASS, NAMESPACE, STRUCT};
use crate::normalize::normalize_line;

/// How a `class` keyword moves the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassRule {
    /// `class` at any depth raises the boundary to 3 when a namespace (or an
    /// enclosing class) already raised it to 2, otherwise to 2.
    #[default]
    Nested,
    /// `class` is only recognized at depth 0 and always raises to 2.
    Flat,
}

/// What the header handler does with `.h` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMode {
    /// Copy every trimmed line.
    #[default]
    PassThrough,
    /// Run the full extraction pipeline.
    Extract,
}

/// Named presets for the two historical behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Legacy,
    Revised,
}

/// Engine configuration, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub class_rule: ClassRule,
    pub header_mode: HeaderMode,
    /// Include prefixes whose lines are dropped (matched right after `<`).
    pub disallowed_includes: Vec<String>,
}

impl EngineOptions {
    /// Headers are copied, compilable units are pruned.
    pub fn legacy() -> Self {
        Self {
            class_rule: ClassRule::Nested,
            header_mode: HeaderMode::PassThrough,
            disallowed_includes: DEFAULT_DISALLOWED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Headers are pruned like compilable units.
    pub fn revised() -> Self {
        Self {
            header_mode: HeaderMode::Extract,
            ..Self::legacy()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Legacy => Self::legacy(),
            Variant::Revised => Self::revised(),
        }
    }

    pub fn with_class_rule(mut self, rule: ClassRule) -> Self {
        self.class_rule = rule;
        self
    }

    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    pub fn with_disallowed_includes(
        mut self,
        prefixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.disallowed_includes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Mutable per-file state. Created fresh for every input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    depth: i32,
    previous_depth: i32,
    boundary: i32,
    struct_stack: Vec<i32>,
    struct_cursor: i32,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            depth: 0,
            previous_depth: 0,
            boundary: 1,
            struct_stack: Vec::new(),
            struct_cursor: 0,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn previous_depth(&self) -> i32 {
        self.previous_depth
    }

    pub fn boundary(&self) -> i32 {
        self.boundary
    }

    /// Number of open `struct` scopes.
    pub fn struct_depth(&self) -> usize {
        self.struct_stack.len()
    }

    pub fn struct_cursor(&self) -> i32 {
        self.struct_cursor
    }

    pub fn in_struct(&self) -> bool {
        !self.struct_stack.is_empty()
    }

    fn raise_for_namespace(&mut self) {
        if self.depth == 0 {
            self.boundary = 2;
        }
    }

    fn raise_for_class(&mut self, rule: ClassRule) {
        match rule {
            ClassRule::Nested => {
                self.boundary = if self.boundary == 2 { 3 } else { 2 };
            }
            ClassRule::Flat => {
                if self.depth == 0 {
                    self.boundary = 2;
                }
            }
        }
    }

    /// Opens a struct scope at the current effective depth.
    fn enter_struct(&mut self) {
        let entry = if self.in_struct() {
            self.struct_cursor
        } else {
            self.depth
        };
        self.struct_stack.push(entry);
        self.struct_cursor = entry;
    }

    /// Advances the struct cursor and closes every struct the line ends.
    ///
    /// When the outermost struct closes, `depth` is restored to its entry
    /// depth; surplus closing braces on that line are discarded.
    fn advance_struct(&mut self, delta: i32) {
        self.struct_cursor += delta;
        let mut closed = None;
        while let Some(&entry) = self.struct_stack.last() {
            if self.struct_cursor > entry {
                break;
            }
            closed = self.struct_stack.pop();
        }
        if let (true, Some(entry)) = (self.struct_stack.is_empty(), closed) {
            self.depth = entry;
            self.struct_cursor = entry;
        }
    }

    /// Applies the boundary rule to a line outside any struct.
    fn advance_boundary(&mut self, delta: i32) -> bool {
        self.depth += delta;
        let shell = self.boundary - 1;
        let keep = self.depth <= shell || (self.previous_depth == shell && self.depth >= self.boundary);
        self.previous_depth = self.depth;
        if self.depth == 0 {
            self.boundary = 1;
        }
        keep
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the extraction pipeline line by line for a single file.
pub struct Extractor<'a> {
    options: &'a EngineOptions,
    keywords: &'a KeywordSet,
    state: EngineState,
    trace: Option<&'a mut dyn Write>,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor with the C++ keyword set.
    pub fn new(options: &'a EngineOptions) -> Self {
        Self::with_keywords(options, KeywordSet::cpp())
    }

    pub fn with_keywords(options: &'a EngineOptions, keywords: &'a KeywordSet) -> Self {
        Self {
            options,
            keywords,
            state: EngineState::new(),
            trace: None,
        }
    }

    /// Streams a record of the engine state before each line is processed.
    pub fn with_trace(mut self, sink: &'a mut dyn Write) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Feeds one physical line. Returns the text to emit, if any.
    pub fn process_line(&mut self, raw: &str) -> std::io::Result<Option<String>> {
        let mut line = Cow::Borrowed(normalize_line(raw));
        self.write_trace(&line)?;

        if !self.state.in_struct() {
            if self.keywords.line_opens(&line, NAMESPACE) {
                self.state.raise_for_namespace();
            } else if self.keywords.line_opens(&line, CLASS) {
                self.state.raise_for_class(self.options.class_rule);
            }
        }

        if self.keywords.line_opens(&line, STRUCT) {
            self.state.enter_struct();
        } else {
            match rewrite_include(&line, &self.options.disallowed_includes) {
                IncludeAction::Excluded => return Ok(None),
                IncludeAction::Rewritten(text) => line = Cow::Owned(text),
                IncludeAction::NotInclude | IncludeAction::Unchanged => {}
            }
        }

        let delta = brace_delta(&line);
        if self.state.in_struct() {
            self.state.advance_struct(delta);
            return Ok(Some(line.into_owned()));
        }

        if self.state.advance_boundary(delta) {
            Ok(Some(line.into_owned()))
        } else {
            Ok(None)
        }
    }

    fn write_trace(&mut self, line: &str) -> std::io::Result<()> {
        let Some(sink) = self.trace.as_mut() else {
            return Ok(());
        };
        writeln!(
            sink,
            "{} boundary={} previous_depth={} depth={} structs={} cursor={}",
            line,
            self.state.boundary,
            self.state.previous_depth,
            self.state.depth,
            self.state.struct_stack.len(),
            self.state.struct_cursor,
        )
    }
}

/// Extracts the declaration lines of an in-memory source text.
pub fn extract_lines(source: &str, options: &EngineOptions) -> Vec<String> {
    let mut extractor = Extractor::new(options);
    source
        .lines()
        // no trace sink, so no I/O can fail
        .filter_map(|raw| extractor.process_line(raw).ok().flatten())
        .collect()
}
