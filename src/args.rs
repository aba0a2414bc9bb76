//! Argument binding (spec §4.4.2): matching a call's positional/named
//! arguments against a declaration's formal parameter list, including
//! `...` rest/keyword-rest collection.

use codemap::{Span, Spanned};

use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::Value;

/// One argument at a call site: `foo(1, $b: 2, $rest...)`.
#[derive(Debug, Clone)]
pub(crate) enum CallArg {
    Positional(Spanned<Value>),
    Named(String, Spanned<Value>),
    /// `$list...`: spread a list (and, if it's an arglist, its keywords)
    /// across the remaining positional/named slots.
    Rest(Spanned<Value>),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CallArgs(pub Vec<CallArg>);

/// One formal parameter: `$name`, `$name: default`, or `$name...`.
#[derive(Debug, Clone)]
pub(crate) struct FuncArg {
    pub name: String,
    pub default: Option<Vec<crate::token::Token>>,
    pub is_rest: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FuncArgs(pub Vec<FuncArg>);

impl CallArgs {
    pub fn empty() -> Self {
        CallArgs(Vec::new())
    }

    /// The `index`-th positional argument, if any.
    pub fn positional(&self, index: usize) -> Option<Value> {
        let mut i = 0;
        for arg in &self.0 {
            if let CallArg::Positional(v) = arg {
                if i == index {
                    return Some(v.node.clone());
                }
                i += 1;
            }
        }
        None
    }

    /// The argument passed as `$name`, if any.
    pub fn named(&self, name: &str) -> Option<Value> {
        self.0.iter().find_map(|arg| match arg {
            CallArg::Named(n, v) if n == name => Some(v.node.clone()),
            _ => None,
        })
    }

    /// A builtin with both positional and named forms for the same
    /// parameter (e.g. `adjust-color($color, $red: ...)`): try position
    /// first, then the keyword.
    pub fn get(&self, index: usize, name: &str) -> Option<Value> {
        self.positional(index).or_else(|| self.named(name))
    }

    /// Flatten to positional values only, for builtins that don't accept
    /// named arguments.
    pub fn to_positional(&self, span: Span) -> SassResult<Vec<Value>> {
        let mut out = Vec::new();
        for arg in &self.0 {
            match arg {
                CallArg::Positional(v) => out.push(v.node.clone()),
                CallArg::Rest(v) => out.extend(v.node.as_list()),
                CallArg::Named(name, _) => {
                    return Err(SassError::new(
                        SassErrorKind::InvalidArgument(format!(
                            "No argument named ${name}."
                        )),
                        span,
                    ))
                }
            }
        }
        Ok(out)
    }
}

/// Bind `args` against `formals`, evaluating defaults (already-evaluated
/// `Value`s are threaded in as `defaults_eval`, parallel to `formals`,
/// since default expressions may reference earlier parameters).
pub(crate) fn bind(
    formals: &FuncArgs,
    args: CallArgs,
    eval_default: impl Fn(&[crate::token::Token]) -> SassResult<Value>,
    span: Span,
) -> SassResult<Vec<(String, Value)>> {
    let mut positional: Vec<Spanned<Value>> = Vec::new();
    let mut named: Vec<(String, Spanned<Value>)> = Vec::new();
    let mut extra_positional: Vec<Value> = Vec::new();
    let mut extra_keywords: Vec<(String, Value)> = Vec::new();

    for arg in args.0 {
        match arg {
            CallArg::Positional(v) => positional.push(v),
            CallArg::Named(name, v) => named.push((name, v)),
            CallArg::Rest(v) => match &v.node {
                Value::List(elems, _, _, meta) => {
                    for e in elems {
                        positional.push(Spanned {
                            node: e.clone(),
                            span: v.span,
                        });
                    }
                    for (k, val) in &meta.keywords {
                        named.push((
                            k.clone(),
                            Spanned {
                                node: val.clone(),
                                span: v.span,
                            },
                        ));
                    }
                }
                Value::Map(m) => {
                    for (k, val) in m.iter() {
                        if let Value::String(s) = &k {
                            named.push((
                                s.text().to_string(),
                                Spanned {
                                    node: val.clone(),
                                    span: v.span,
                                },
                            ));
                        }
                    }
                }
                other => positional.push(Spanned {
                    node: other.clone(),
                    span: v.span,
                }),
            },
        }
    }

    let mut bound: Vec<(String, Value)> = Vec::new();
    let mut pos_iter = positional.into_iter();

    for formal in &formals.0 {
        if formal.is_rest {
            continue;
        }
        if let Some(v) = pos_iter.next() {
            bound.push((formal.name.clone(), v.node));
            continue;
        }
        if let Some(idx) = named.iter().position(|(n, _)| *n == formal.name) {
            let (_, v) = named.remove(idx);
            bound.push((formal.name.clone(), v.node));
            continue;
        }
        if let Some(default) = &formal.default {
            bound.push((formal.name.clone(), eval_default(default)?));
            continue;
        }
        return Err(SassError::new(
            SassErrorKind::MissingArgument(format!(
                "Missing argument ${}.",
                formal.name
            )),
            span,
        ));
    }

    extra_positional.extend(pos_iter.map(|v| v.node));
    extra_keywords.extend(named.into_iter().map(|(n, v)| (n, v.node)));

    if let Some(rest_formal) = formals.0.iter().find(|f| f.is_rest) {
        let arglist = Value::arglist(extra_positional, extra_keywords);
        bound.push((rest_formal.name.clone(), arglist));
    } else if !extra_positional.is_empty() || !extra_keywords.is_empty() {
        return Err(SassError::new(
            SassErrorKind::InvalidArgument(
                "Too many arguments.".to_string(),
            ),
            span,
        ));
    }

    Ok(bound)
}

pub(crate) fn list_value(elems: Vec<Value>, sep: ListSeparator) -> Value {
    Value::list(elems, sep, Brackets::None)
}

/// Parses a `@mixin`/`@function` declaration's formal parameter list,
/// starting just after the opening `(` and consuming the closing `)`.
pub(crate) fn parse_func_args<I: Iterator<Item = crate::token::Token>>(
    toks: &mut peekmore::PeekMoreIterator<I>,
) -> SassResult<FuncArgs> {
    use crate::utils::{devour_whitespace, eat_ident_no_interpolation};

    let mut out = Vec::new();
    devour_whitespace(toks);
    if toks.peek().map(|t| t.kind) == Some(')') {
        toks.next();
        return Ok(FuncArgs(out));
    }
    loop {
        devour_whitespace(toks);
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        if toks.peek().map(|t| t.kind) != Some('$') {
            return Err(SassError::new(
                SassErrorKind::SyntaxError("Expected argument name.".to_string()),
                span,
            ));
        }
        toks.next();
        let name = eat_ident_no_interpolation(toks)?;
        devour_whitespace(toks);

        let is_rest = toks.peek().map(|t| t.kind) == Some('.')
            && toks.peek_nth(1).map(|t| t.kind) == Some('.')
            && toks.peek_nth(2).map(|t| t.kind) == Some('.');
        if is_rest {
            toks.next();
            toks.next();
            toks.next();
            devour_whitespace(toks);
            out.push(FuncArg {
                name,
                default: None,
                is_rest: true,
            });
        } else {
            let default = if toks.peek().map(|t| t.kind) == Some(':') {
                toks.next();
                devour_whitespace(toks);
                let mut depth = 0i32;
                let mut toks_buf = Vec::new();
                loop {
                    match toks.peek().map(|t| t.kind) {
                        None => break,
                        Some('(') => {
                            depth += 1;
                            toks_buf.push(toks.next().unwrap());
                        }
                        Some(')') if depth == 0 => break,
                        Some(')') => {
                            depth -= 1;
                            toks_buf.push(toks.next().unwrap());
                        }
                        Some(',') if depth == 0 => break,
                        _ => toks_buf.push(toks.next().unwrap()),
                    }
                }
                Some(toks_buf)
            } else {
                None
            };
            out.push(FuncArg {
                name,
                default,
                is_rest: false,
            });
        }

        devour_whitespace(toks);
        match toks.peek().map(|t| t.kind) {
            Some(',') => {
                toks.next();
            }
            Some(')') => {
                toks.next();
                break;
            }
            _ => {
                return Err(SassError::new(
                    SassErrorKind::SyntaxError("expected \",\" or \")\".".to_string()),
                    span,
                ))
            }
        }
    }
    Ok(FuncArgs(out))
}
