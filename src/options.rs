//! Compilation configuration (spec §6.3): every knob a host can set before
//! calling [`crate::compile`]/[`crate::compile_string`].

use std::fmt;
use std::rc::Rc;

use crate::error::SassResult;
use crate::importer::Importer;
use crate::value::Value;

/// Emitter formatting mode (spec §6.3 `output-style`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Expanded,
    Nested,
    Compact,
    Compressed,
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputStyle::Expanded => "expanded",
            OutputStyle::Nested => "nested",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        };
        f.write_str(s)
    }
}

/// Source map emission mode (spec §6.3 `source-map`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
    #[default]
    Off,
    Inline,
    External,
}

/// A host-supplied function callback, consulted before built-ins (spec
/// §6.2).
pub trait HostFunction: fmt::Debug {
    fn call(&self, positional: &[Value], named: &[(String, Value)]) -> SassResult<Value>;
}

/// Every setting a host may adjust before compiling (spec §6.3). Built with
/// the builder pattern the way `grass`'s own `Options` is used from its
/// CLI and library entry points.
#[derive(Clone)]
pub struct Options {
    pub(crate) precision: usize,
    pub(crate) output_style: OutputStyle,
    pub(crate) source_map: SourceMapMode,
    pub(crate) source_map_contents: bool,
    pub(crate) source_map_embed: bool,
    pub(crate) omit_source_map_url: bool,
    pub(crate) include_paths: Vec<std::path::PathBuf>,
    pub(crate) importers: Vec<Rc<dyn Importer>>,
    pub(crate) functions: Vec<(String, Rc<dyn HostFunction>)>,
    pub(crate) indented_syntax: bool,
    pub(crate) indent: String,
    pub(crate) linefeed: String,
    pub(crate) extend_iteration_limit: usize,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("precision", &self.precision)
            .field("output_style", &self.output_style)
            .field("source_map", &self.source_map)
            .field("include_paths", &self.include_paths)
            .field("indented_syntax", &self.indented_syntax)
            .finish_non_exhaustive()
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            precision: 10,
            output_style: OutputStyle::default(),
            source_map: SourceMapMode::default(),
            source_map_contents: false,
            source_map_embed: false,
            omit_source_map_url: false,
            include_paths: Vec::new(),
            importers: Vec::new(),
            functions: Vec::new(),
            indented_syntax: false,
            indent: "  ".to_string(),
            linefeed: "\n".to_string(),
            extend_iteration_limit: crate::extend::EXTEND_ITERATION_LIMIT,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    #[must_use]
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn style(mut self, style: OutputStyle) -> Self {
        self.output_style = style;
        self
    }

    #[must_use]
    pub fn source_map(mut self, mode: SourceMapMode) -> Self {
        self.source_map = mode;
        self
    }

    #[must_use]
    pub fn source_map_contents(mut self, yes: bool) -> Self {
        self.source_map_contents = yes;
        self
    }

    #[must_use]
    pub fn source_map_embed(mut self, yes: bool) -> Self {
        self.source_map_embed = yes;
        self
    }

    #[must_use]
    pub fn omit_source_map_url(mut self, yes: bool) -> Self {
        self.omit_source_map_url = yes;
        self
    }

    #[must_use]
    pub fn include_path<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.include_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn add_importer(mut self, importer: Rc<dyn Importer>) -> Self {
        self.importers.push(importer);
        self
    }

    #[must_use]
    pub fn add_function(mut self, name: impl Into<String>, func: Rc<dyn HostFunction>) -> Self {
        self.functions.push((name.into(), func));
        self
    }

    #[must_use]
    pub fn indented_syntax(mut self, yes: bool) -> Self {
        self.indented_syntax = yes;
        self
    }

    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn linefeed(mut self, linefeed: impl Into<String>) -> Self {
        self.linefeed = linefeed.into();
        self
    }

    #[must_use]
    pub fn extend_iteration_limit(mut self, limit: usize) -> Self {
        self.extend_iteration_limit = limit;
        self
    }
}
