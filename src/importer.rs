//! The file resolver / importer (spec §6.1): given an `@import` URL plus a
//! base, returns either a path-and-source pair or a verbatim CSS import.
//! Deliberately light relative to the evaluator/selector/extend core (spec
//! §1), matching the "Share" column of spec §2.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SassError, SassErrorKind, SassResult};
use crate::token::Token;

/// Source syntax an importer may hand back (spec §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Scss,
    Sass,
    Css,
}

/// The outcome of one importer's attempt to resolve an `@import` (spec
/// §6.1). Importers form an ordered chain; the first non-`NotFound` reply
/// wins.
#[derive(Debug, Clone)]
pub enum ImportResult {
    Resolved {
        abs_path: String,
        source_text: String,
        syntax: Syntax,
        source_map_url: Option<String>,
    },
    /// Emitted verbatim as a CSS `@import`.
    Passthrough(String),
    Error(String),
    NotFound,
}

/// One link in the importer chain (spec §6.1). The default filesystem
/// importer is [`FsImporter`]; hosts add their own ahead of it via
/// `Options::add_importer`.
pub trait Importer: fmt::Debug {
    fn resolve(&self, requested: &str, base: &str) -> ImportResult;
}

/// Resolves `@import` against a fixed list of search directories, trying
/// `_name.scss`, `name.scss`, `_name/index.scss` etc. the way the real
/// Sass import algorithm does partial-resolution.
#[derive(Debug, Clone)]
pub struct FsImporter {
    pub(crate) include_paths: Vec<PathBuf>,
}

impl FsImporter {
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        FsImporter { include_paths }
    }

    fn candidates(dir: &Path, requested: &str) -> Vec<PathBuf> {
        let stem = requested.trim_end_matches(".scss").trim_end_matches(".sass");
        let (parent, base) = match stem.rfind('/') {
            Some(i) => (&stem[..i], &stem[i + 1..]),
            None => ("", stem),
        };
        let parent_dir = if parent.is_empty() {
            dir.to_path_buf()
        } else {
            dir.join(parent)
        };
        vec![
            parent_dir.join(format!("_{base}.scss")),
            parent_dir.join(format!("{base}.scss")),
            parent_dir.join(format!("_{base}.sass")),
            parent_dir.join(format!("{base}.sass")),
            parent_dir.join(format!("_{base}.css")),
            parent_dir.join(format!("{base}.css")),
            parent_dir.join(base).join("_index.scss"),
            parent_dir.join(base).join("index.scss"),
        ]
    }
}

impl Importer for FsImporter {
    fn resolve(&self, requested: &str, base: &str) -> ImportResult {
        let base_dir = Path::new(base).parent().unwrap_or_else(|| Path::new("."));
        let mut dirs: Vec<&Path> = vec![base_dir];
        dirs.extend(self.include_paths.iter().map(PathBuf::as_path));

        for dir in dirs {
            for candidate in Self::candidates(dir, requested) {
                if candidate.is_file() {
                    let syntax = match candidate.extension().and_then(|e| e.to_str()) {
                        Some("sass") => Syntax::Sass,
                        Some("css") => Syntax::Css,
                        _ => Syntax::Scss,
                    };
                    return match fs::read_to_string(&candidate) {
                        Ok(source_text) => ImportResult::Resolved {
                            abs_path: candidate.to_string_lossy().into_owned(),
                            source_text,
                            syntax,
                            source_map_url: None,
                        },
                        Err(e) => ImportResult::Error(e.to_string()),
                    };
                }
            }
        }
        ImportResult::NotFound
    }
}

/// `true` when `requested` must be emitted as a literal CSS `@import`
/// rather than resolved (spec §4.5 `@import` bullet): an absolute URL, a
/// media query present, a `.css` extension, or wrapped in `url(...)`.
pub(crate) fn is_plain_css_import(requested: &str, has_media_query: bool) -> bool {
    has_media_query
        || requested.starts_with("http://")
        || requested.starts_with("https://")
        || requested.starts_with("//")
        || requested.starts_with("url(")
        || requested.ends_with(".css")
}

/// Caches `(abs_path) -> raw source text)` within one compilation so a file
/// imported from multiple places is read/parsed once (spec §6.1).
#[derive(Debug, Default)]
pub(crate) struct ImportCache {
    seen: HashMap<String, String>,
}

impl ImportCache {
    pub fn new() -> Self {
        ImportCache::default()
    }

    /// Resolve `requested` against `base` through `chain` (host importers
    /// first, then the default filesystem importer), returning source text
    /// ready to tokenize, or `None` for a plain-CSS passthrough (the caller
    /// already decided that case before calling this).
    pub fn load(
        &mut self,
        requested: &str,
        base: &str,
        chain: &[std::rc::Rc<dyn Importer>],
        span: codemap::Span,
    ) -> SassResult<(String, String)> {
        for importer in chain {
            match importer.resolve(requested, base) {
                ImportResult::Resolved {
                    abs_path,
                    source_text,
                    ..
                } => {
                    self.seen.entry(abs_path.clone()).or_insert_with(|| source_text.clone());
                    return Ok((abs_path, source_text));
                }
                ImportResult::Error(message) => {
                    return Err(SassError::new(SassErrorKind::ImportError(message), span))
                }
                ImportResult::Passthrough(literal) => {
                    return Ok((requested.to_string(), format!("@import {literal};")))
                }
                ImportResult::NotFound => continue,
            }
        }
        Err(SassError::new(
            SassErrorKind::ImportNotFound(format!("Can't find stylesheet to import: {requested}")),
            span,
        ))
    }
}

/// Resolve and tokenize `@import "path"` relative to the current
/// directory with no host-supplied importer chain, for use from within
/// [`crate::exec`] (which runs nested mixin/function bodies that have no
/// access to the top-level `Options`). Tokens carry spans from a
/// throwaway single-file `CodeMap`, which is safe since this crate never
/// resolves a span back to line/column (spec Non-goals exclude exact
/// diagnostic wording).
pub(crate) fn load(path: &str, span: codemap::Span) -> SassResult<Vec<Token>> {
    let importer = FsImporter::new(Vec::new());
    let source_text = match importer.resolve(path, ".") {
        ImportResult::Resolved { source_text, .. } => source_text,
        ImportResult::Passthrough(literal) => format!("@import {literal};"),
        ImportResult::Error(message) => {
            return Err(SassError::new(SassErrorKind::ImportError(message), span))
        }
        ImportResult::NotFound => {
            return Err(SassError::new(
                SassErrorKind::ImportNotFound(format!("Can't find stylesheet to import: {path}")),
                span,
            ))
        }
    };
    let mut codemap = codemap::CodeMap::new();
    let file = codemap.add_file(path.to_string(), source_text);
    Ok(crate::lexer::Lexer::new(file.source(), file.clone()).collect())
}
