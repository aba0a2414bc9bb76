//! The dynamic value sum type of spec §3.2.

pub(crate) mod color;
pub(crate) mod map;
pub(crate) mod number;
pub(crate) mod style;

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use codemap::Span;

pub use color::SassColor;
pub use map::SassMap;
pub use number::SassNumber;

use crate::atrule::function::Function;
use crate::common::{Brackets, ListSeparator, QuoteKind};
use crate::error::{SassError, SassErrorKind, SassResult};

/// `Value::String`: quoted text never contains its own quote characters
/// (spec §3.2 invariant); escaping is purely an emitter concern.
#[derive(Debug, Clone, PartialEq)]
pub enum SassString {
    Quoted { text: String, quote: QuoteKind },
    Unquoted(String),
}

impl SassString {
    pub fn text(&self) -> &str {
        match self {
            SassString::Quoted { text, .. } | SassString::Unquoted(text) => text,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, SassString::Quoted { .. })
    }

    pub fn to_css_string(&self) -> String {
        match self {
            SassString::Unquoted(s) => s.clone(),
            SassString::Quoted { text, quote } => {
                let q = match quote {
                    QuoteKind::Single => '\'',
                    _ => '"',
                };
                let mut out = String::with_capacity(text.len() + 2);
                out.push(q);
                for c in text.chars() {
                    if c == q || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push(q);
                out
            }
        }
    }
}

/// A list's extra bookkeeping: whether it came from a `…` rest-argument
/// position (and if so, the keyword arguments it also carries), per spec
/// §3.2 List / GLOSSARY "Arglist".
#[derive(Debug, Clone, Default)]
pub struct ArgListMeta {
    pub is_arglist: bool,
    pub keywords: Vec<(String, Value)>,
}

/// Either a user-defined function (closure over its defining scope) or a
/// built-in, referenced by name (spec §3.2 Function).
#[derive(Debug, Clone)]
pub enum FunctionKind {
    UserDefined(Rc<Function>),
    Builtin,
}

#[derive(Debug, Clone)]
pub struct SassFunction {
    pub name: String,
    pub kind: FunctionKind,
    /// "was declared as pure CSS" flag (spec §3.2): a function-like token
    /// the parser recognized but chose not to evaluate, e.g. `var(--x)`.
    pub is_pure_css: bool,
}

impl PartialEq for SassFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(SassNumber),
    Color(Box<SassColor>),
    String(SassString),
    List(Vec<Value>, ListSeparator, Brackets, ArgListMeta),
    Map(SassMap),
    Function(Box<SassFunction>),
}

impl Value {
    pub fn string(text: impl Into<String>, quote: QuoteKind) -> Self {
        if quote == QuoteKind::None {
            Value::String(SassString::Unquoted(text.into()))
        } else {
            Value::String(SassString::Quoted {
                text: text.into(),
                quote,
            })
        }
    }

    pub fn list(elems: Vec<Value>, separator: ListSeparator, brackets: Brackets) -> Self {
        Value::List(elems, separator, brackets, ArgListMeta::default())
    }

    pub fn arglist(elems: Vec<Value>, keywords: Vec<(String, Value)>) -> Self {
        Value::List(
            elems,
            ListSeparator::Comma,
            Brackets::None,
            ArgListMeta {
                is_arglist: true,
                keywords,
            },
        )
    }

    /// Sass truthiness: only `false` and `null` are falsy (spec §3.2).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Treat a non-list value as a one-element list (spec §4.4.5 "List
    /// functions ... treat a non-list argument as a one-element list").
    pub fn as_list(&self) -> Vec<Value> {
        match self {
            Value::List(elems, ..) => elems.clone(),
            Value::Map(m) => m.clone().as_list(),
            other => vec![other.clone()],
        }
    }

    pub fn separator(&self) -> ListSeparator {
        match self {
            Value::List(_, sep, ..) => *sep,
            _ => ListSeparator::Undecided,
        }
    }

    pub fn is_bracketed(&self) -> bool {
        matches!(self, Value::List(_, _, Brackets::Bracketed, _))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(..) => "bool",
            Value::Number(..) => "number",
            Value::Color(..) => "color",
            Value::String(..) => "string",
            Value::List(..) => "list",
            Value::Map(..) => "map",
            Value::Function(..) => "function",
        }
    }

    /// Structural equality with Sass semantics (spec §4.4.1 EQ/NEQ).
    pub fn equals(&self, other: &Value, span: Span) -> SassResult<bool> {
        Ok(match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.eq(b, span)?,
            (Value::Color(a), Value::Color(b)) => {
                a.red() == b.red()
                    && a.green() == b.green()
                    && a.blue() == b.blue()
                    && (a.alpha() - b.alpha()).abs() < crate::unit::EPSILON
            }
            (Value::String(a), Value::String(b)) => a.text() == b.text(),
            (Value::List(a, sep_a, br_a, _), Value::List(b, sep_b, br_b, _)) => {
                if sep_a != sep_b || br_a != br_b || a.len() != b.len() {
                    false
                } else {
                    let mut eq = true;
                    for (x, y) in a.iter().zip(b.iter()) {
                        if !x.equals(y, span)? {
                            eq = false;
                            break;
                        }
                    }
                    eq
                }
            }
            (Value::Map(a), Value::Map(b)) => {
                let a = a.clone().entries();
                let b = b.clone().entries();
                if a.len() != b.len() {
                    false
                } else {
                    let mut eq = true;
                    'outer: for (k, v) in &a {
                        for (k2, v2) in &b {
                            if k.equals(k2, span)? {
                                if !v.equals(v2, span)? {
                                    eq = false;
                                }
                                continue 'outer;
                            }
                        }
                        eq = false;
                        break;
                    }
                    eq
                }
            }
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        })
    }

    pub fn cmp(&self, other: &Value, span: Span) -> SassResult<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.cmp(b, span),
            _ => Err(SassError::new(
                SassErrorKind::UndefinedOperation(format!(
                    "Undefined operation: comparing {} and {}.",
                    self.type_name(),
                    other.type_name()
                )),
                span,
            )),
        }
    }

    /// Sass's `inspect()`: a debug-oriented rendering that, unlike
    /// `to_css_string`, can represent `null` and unrenderable values.
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::List(elems, sep, brackets, _) if elems.is_empty() => {
                if *brackets == Brackets::Bracketed {
                    "[]".to_string()
                } else if *sep == ListSeparator::Comma {
                    "()".to_string()
                } else {
                    "()".to_string()
                }
            }
            Value::List(elems, sep, brackets, _) => {
                let inner = elems
                    .iter()
                    .map(Value::inspect)
                    .collect::<Vec<_>>()
                    .join(sep.as_str());
                if *brackets == Brackets::Bracketed {
                    format!("[{inner}]")
                } else {
                    inner
                }
            }
            Value::Map(m) => {
                let inner = m
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({inner})")
            }
            other => other.to_css_string_unchecked(),
        }
    }

    /// Render to CSS, failing for values with no valid CSS representation
    /// (e.g. `null` at the top level of a declaration is handled by the
    /// caller, not here).
    pub fn to_css_string(&self, span: Span) -> SassResult<String> {
        if let Value::Map(..) = self {
            return Err(SassError::new(
                SassErrorKind::TypeMismatch(format!("{} isn't a valid CSS value.", self.inspect())),
                span,
            ));
        }
        Ok(self.to_css_string_unchecked())
    }

    fn to_css_string_unchecked(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_css_string(10),
            Value::Color(c) => c.to_string(),
            Value::String(s) => s.to_css_string(),
            Value::List(elems, sep, brackets, _) => {
                let inner = elems
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(Value::to_css_string_unchecked)
                    .collect::<Vec<_>>()
                    .join(sep.as_str());
                if *brackets == Brackets::Bracketed {
                    format!("[{inner}]")
                } else {
                    inner
                }
            }
            Value::Map(m) => format!("{m:?}"),
            Value::Function(f) => f.name.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string_unchecked())
    }
}
