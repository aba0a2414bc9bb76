//! A Sass-to-CSS compiler core: the SassScript evaluator, the selector
//! algebra, and the `@extend` engine, in pure Rust.
//!
//! The lexer/parser, file resolver/importer, emitter and host/CLI surface
//! are intentionally light external interfaces; the engineering depth is
//! in [`eval`], [`selector::algebra`] and [`extend`]. All functionality is
//! exposed through [`StyleSheet`]/[`compile_string`].
//!
//! ## Use as a library
//! ```no_run
//! use sasswright::{Options, StyleSheet};
//!
//! fn main() -> sasswright::SassResult<()> {
//!     let css = StyleSheet::from_path("input.scss", &Options::default())?;
//!     println!("{css}");
//!     Ok(())
//! }
//! ```

#![deny(missing_debug_implementations)]
#![allow(clippy::module_name_repetitions)]

use std::fs;
use std::path::Path;

use peekmore::PeekMore;

use crate::extend::SubsetMap;
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::stmt::Stmt;

mod args;
mod atrule;
mod builtin;
mod common;
mod error;
mod eval;
mod exec;
mod extend;
mod format;
mod importer;
mod lexer;
mod options;
mod scope;
mod selector;
mod stmt;
mod token;
mod unit;
mod utils;
mod value;

pub use crate::error::{Frame, SassError, SassErrorKind, SassResult};
pub use crate::importer::{FsImporter, ImportResult, Importer, Syntax};
pub use crate::options::{HostFunction, Options, OutputStyle, SourceMapMode};
pub use crate::value::Value;

/// Compile a Sass/SCSS string to CSS (spec §1, §5: one compile call is the
/// entire public surface of the core).
pub fn compile_string(input: &str, options: &Options) -> SassResult<String> {
    let mut codemap = codemap::CodeMap::new();
    let file = codemap.add_file("stdin".to_string(), input.to_string());
    let tokens: Vec<token::Token> = lexer::Lexer::new(file.source(), file.clone()).collect();
    run(tokens, options)
}

/// Compile a file from disk, resolving its own nested `@import`s relative
/// to its directory plus `options.include_paths` (spec §6.1).
pub fn compile_file<P: AsRef<Path>>(path: P, options: &Options) -> SassResult<String> {
    let source = fs::read_to_string(path.as_ref()).map_err(|e| {
        SassError::new(
            SassErrorKind::ImportNotFound(format!("{}: {e}", path.as_ref().display())),
            codemap::Span::dummy(),
        )
    })?;
    let mut codemap = codemap::CodeMap::new();
    let file = codemap.add_file(path.as_ref().to_string_lossy().into_owned(), source);
    let tokens: Vec<token::Token> = lexer::Lexer::new(file.source(), file.clone()).collect();
    run(tokens, options)
}

fn run(tokens: Vec<token::Token>, options: &Options) -> SassResult<String> {
    let mut iter = tokens.into_iter().peekmore();
    let mut global_scope = Scope::new_global();
    let mut extends = SubsetMap::new(options.extend_iteration_limit);
    let root_selector = SelectorList::new();
    let mut stmts = Vec::new();
    let mut root_extra = Vec::new();

    exec::exec_stmts(
        &mut iter,
        &mut global_scope,
        &root_selector,
        &mut extends,
        None,
        false,
        0,
        &mut stmts,
        &mut root_extra,
    )?;
    stmts.extend(root_extra);

    let mut selectors = Vec::new();
    collect_selectors(&stmts, &mut selectors);
    let rewritten = extends.rewrite_all(selectors, codemap::Span::dummy())?;
    let mut rewritten_iter = rewritten.into_iter();
    apply_rewritten(&mut stmts, &mut rewritten_iter);

    Ok(format::emit(&stmts, options))
}

fn collect_selectors(stmts: &[Stmt], out: &mut Vec<SelectorList>) {
    for stmt in stmts {
        match stmt {
            Stmt::RuleSet { selector, body } => {
                out.push(selector.clone());
                collect_selectors(body, out);
            }
            Stmt::Media { body, .. } | Stmt::Supports { body, .. } | Stmt::UnknownAtRule { body, .. } => {
                collect_selectors(body, out);
            }
            Stmt::Style(..) | Stmt::Comment(..) => {}
        }
    }
}

fn apply_rewritten(stmts: &mut [Stmt], rewritten: &mut std::vec::IntoIter<SelectorList>) {
    for stmt in stmts.iter_mut() {
        match stmt {
            Stmt::RuleSet { selector, body } => {
                if let Some(r) = rewritten.next() {
                    *selector = r;
                }
                apply_rewritten(body, rewritten);
            }
            Stmt::Media { body, .. } | Stmt::Supports { body, .. } | Stmt::UnknownAtRule { body, .. } => {
                apply_rewritten(body, rewritten);
            }
            Stmt::Style(..) | Stmt::Comment(..) => {}
        }
    }
}

/// A parsed, fully-evaluated stylesheet (spec §3.3: the CSS tree, post
/// expansion). Kept as a named type, mirroring the teacher's own
/// `StyleSheet`, so a host can compile once and format multiple times
/// without re-running the evaluator.
#[derive(Debug)]
pub struct StyleSheet {
    css: String,
}

impl StyleSheet {
    /// Parse and fully evaluate `input`, returning the rendered CSS.
    pub fn new(input: &str, options: &Options) -> SassResult<String> {
        compile_string(input, options)
    }

    /// As [`StyleSheet::new`], reading from a file and resolving its own
    /// `@import`s relative to it.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &Options) -> SassResult<String> {
        compile_file(path, options)
    }

    /// Compile and keep the rendered CSS on the returned value for reuse.
    pub fn compile(input: &str, options: &Options) -> SassResult<StyleSheet> {
        Ok(StyleSheet {
            css: compile_string(input, options)?,
        })
    }

    #[must_use]
    pub fn css(&self) -> &str {
        &self.css
    }
}

impl std::fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.css)
    }
}
