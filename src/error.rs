//! The error taxonomy of spec §7, collapsed to one `thiserror` enum per
//! `SPEC_FULL.md`'s ambient-error-handling section. Errors are never
//! caught internally (spec §7 "Propagation policy"): they unwind to
//! [`crate::compile`] and are enriched with a call-stack trace there.

use std::fmt;

use codemap::Span;
use thiserror::Error;

/// One frame of the call-stack trace attached to a [`SassError`]: pushed on
/// mixin/function entry and on `@import`, per spec §6.4.
#[derive(Debug, Clone)]
pub struct Frame {
    pub span: Span,
    pub callee: Option<String>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.callee {
            Some(name) => write!(f, "  in {name}"),
            None => write!(f, "  at top level"),
        }
    }
}

/// The taxonomy of spec §7. Variants are grouped by the categories the
/// spec names; the `message` carried on each is free text, not contractual
/// wording (spec Non-goals explicitly exclude "reproducing exact error
/// wording").
#[derive(Debug, Error, Clone)]
pub enum SassErrorKind {
    #[error("{0}")]
    SyntaxError(String),
    #[error("{0}")]
    InvalidSass(String),
    #[error("{0}")]
    InvalidParent(String),
    #[error("{0}")]
    UnsatisfiedExtend(String),
    #[error("{0}")]
    IncompatibleUnits(String),
    #[error("{0}")]
    DivisionByZero(String),
    #[error("{0}")]
    UndefinedOperation(String),
    #[error("{0}")]
    InvalidNullOperation(String),
    #[error("{0}")]
    AlphaChannelsNotEqual(String),
    #[error("{0}")]
    TypeMismatch(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    MissingArgument(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Undefined mixin: {0}")]
    UndefinedMixin(String),
    #[error("Undefined function: {0}")]
    UndefinedFunction(String),
    #[error("{0}")]
    RecursionLimitExceeded(String),
    #[error("{0}")]
    NestingLimitExceeded(String),
    #[error("{0}")]
    ImportNotFound(String),
    #[error("{0}")]
    ImportError(String),
    #[error("{0}")]
    UserError(String),
}

/// A compile failure: kind, primary span, and (filled in as the error
/// unwinds) a call-stack trace, matching spec §6.4.
#[derive(Debug, Error, Clone)]
#[error("{kind}")]
pub struct SassError {
    pub kind: SassErrorKind,
    pub span: Span,
    pub trace: Vec<Frame>,
}

impl SassError {
    pub fn new(kind: SassErrorKind, span: Span) -> Self {
        SassError {
            kind,
            span,
            trace: Vec::new(),
        }
    }

    /// Enrich the error with one more call-stack frame, innermost first.
    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.trace.push(frame);
        self
    }
}

/// `(message, span)` converts directly into a `SassError` of the most
/// common kind, `InvalidSass`, mirroring the teacher's `("msg", pos).into()`
/// convenience used throughout parsing code.
impl From<(&str, Span)> for SassError {
    fn from((msg, span): (&str, Span)) -> Self {
        SassError::new(SassErrorKind::InvalidSass(msg.to_string()), span)
    }
}

impl From<(String, Span)> for SassError {
    fn from((msg, span): (String, Span)) -> Self {
        SassError::new(SassErrorKind::InvalidSass(msg), span)
    }
}

pub type SassResult<T> = Result<T, SassError>;
