//! The statement-level executor (spec §3.3, §4.5, §4.6): one interleaved
//! parse-and-evaluate pass over a token stream, the same philosophy as
//! [`crate::eval`] applied one level up from expressions to statements.
//! There is no separate statement AST stage — a selector is resolved,
//! a declaration's value computed, and a mixin body expanded all in the
//! same walk that recognizes the grammar.

use peekmore::{PeekMore, PeekMoreIterator};

use crate::args::{parse_func_args, CallArgs, FuncArgs};
use crate::atrule::function::Function;
use crate::atrule::if_rule::If;
use crate::atrule::mixin::Mixin;
use crate::atrule::unknown::parse_unknown_params;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::extend::SubsetMap;
use crate::scope::{Scope, ScopeKind};
use crate::selector::algebra::resolve_parent;
use crate::selector::parse::parse_selector_list;
use crate::selector::SelectorList;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::utils::{
    devour_whitespace, eat_comment, eat_ident, eat_variable_value,
    read_until_closing_curly_brace, read_until_open_curly_brace,
    read_until_semicolon_or_closing_curly_brace,
};
use crate::value::style::Style;
use crate::value::Value;

/// How deep a mixin/function call chain may nest before it is treated as
/// runaway recursion (spec §4.5 edge case).
const RECURSION_LIMIT: u32 = 500;

/// Non-local exit from a statement sequence. Only `@return` inside a
/// function body produces `Return`; everything else threads `Continue`
/// back up so callers know whether to keep iterating (e.g. a `@while`
/// loop stops as soon as its body returns from the enclosing function).
#[derive(Debug)]
pub(crate) enum Flow {
    Continue,
    Return(Value),
}

/// An `@include foo { ... }` block body, captured with the scope it
/// closed over, so a later `@content` inside the mixin evaluates it
/// against the *call site*'s environment (spec §4.5).
#[derive(Debug, Clone)]
pub(crate) struct ContentBlock {
    pub body: Vec<Token>,
    pub scope: Scope,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn exec_stmts<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<Flow> {
    loop {
        devour_whitespace(toks);
        let Some(tok) = toks.peek().copied() else {
            return Ok(Flow::Continue);
        };
        match tok.kind {
            '/' if toks.peek_nth(1).map(|t| t.kind) == Some('*') => {
                toks.next();
                toks.next();
                let comment = eat_comment(toks, scope, super_selector)?;
                out.push(Stmt::Comment(comment));
            }
            '/' if toks.peek_nth(1).map(|t| t.kind) == Some('/') => {
                crate::utils::read_until_newline(toks);
                devour_whitespace(toks);
            }
            '$' => {
                toks.next();
                let name = crate::utils::eat_ident_no_interpolation(toks)?;
                devour_whitespace(toks);
                if toks.next().map(|t| t.kind) != Some(':') {
                    return Err(("expected \":\".", tok.pos()).into());
                }
                let decl = eat_variable_value(toks, scope, super_selector)?;
                if decl.global {
                    if decl.default {
                        scope.assign_default(&name, decl.val, true);
                    } else {
                        scope.assign_global(&name, decl.val);
                    }
                } else if decl.default {
                    scope.assign_default(&name, decl.val, false);
                } else {
                    scope.assign(&name, decl.val);
                }
            }
            '@' => {
                toks.next();
                let name = eat_ident(toks, scope, super_selector)?;
                let flow = exec_at_rule(
                    &name.node,
                    name.span,
                    toks,
                    scope,
                    super_selector,
                    extends,
                    content,
                    in_function,
                    depth,
                    out,
                    root_out,
                )?;
                if let Flow::Return(v) = flow {
                    return Ok(Flow::Return(v));
                }
                if matches!(flow, Flow::Continue) {
                }
            }
            '}' => {
                toks.next();
                return Ok(Flow::Continue);
            }
            _ => {
                exec_rule_or_style(toks, scope, super_selector, extends, content, in_function, depth, out, root_out)?;
            }
        }
        if toks.peek().is_none() {
            return Ok(Flow::Continue);
        }
    }
}

/// Distinguishes a nested ruleset (`a.b { ... }`) from a declaration
/// (`color: red;`) by scanning ahead for the first unnested `{`, `;` or
/// `:` that isn't part of a pseudo-selector/interpolation — mirroring the
/// teacher's own lookahead for this ambiguity.
#[allow(clippy::too_many_arguments)]
fn exec_rule_or_style<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<()> {
    let is_ruleset = looks_like_ruleset(toks);

    if is_ruleset {
        let selector_toks = read_until_open_curly_brace(toks);
        toks.next();
        let parsed = parse_selector_list(selector_toks, scope, super_selector)?;
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        let mut resolved = SelectorList {
            components: Vec::new(),
            is_optional: false,
        };
        for complex in &parsed.components {
            let r = resolve_parent(complex, super_selector, true, span)?;
            resolved.components.extend(r.components);
        }

        let mut body = Vec::new();
        devour_whitespace(toks);
        let mut child_scope = scope.child(ScopeKind::Block);
        exec_stmts(
            toks,
            &mut child_scope,
            &resolved,
            extends,
            content,
            in_function,
            depth,
            &mut body,
            root_out,
        )?;
        out.push(Stmt::RuleSet {
            selector: resolved,
            body,
        });
    } else {
        let property = Style::eat_property(toks, scope, super_selector)?;
        devour_whitespace(toks);
        if toks.peek().map(|t| t.kind) != Some(':') {
            let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
            return Err(("expected \":\".", span).into());
        }
        toks.next();
        devour_whitespace(toks);
        let value_toks = read_until_semicolon_or_closing_curly_brace(toks);
        if toks.peek().map(|t| t.kind) == Some(';') {
            toks.next();
        }
        let style = Style::from_tokens(property, value_toks, scope, super_selector)?;
        out.push(Stmt::Style(style));
    }
    Ok(())
}

/// Peek ahead (on a cheap cloned cursor) for the first top-level `{` or
/// `;` to tell a ruleset from a declaration without consuming anything.
fn looks_like_ruleset<I: Iterator<Item = Token> + Clone>(toks: &PeekMoreIterator<I>) -> bool {
    let mut probe = toks.clone();
    let mut depth = 0i32;
    loop {
        match probe.next() {
            None => return false,
            Some(t) if t.kind == '(' => depth += 1,
            Some(t) if t.kind == ')' => depth -= 1,
            Some(t) if depth == 0 && t.kind == '{' => return true,
            Some(t) if depth == 0 && (t.kind == ';' || t.kind == '}') => return false,
            _ => {}
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn exec_at_rule<I: Iterator<Item = Token> + Clone>(
    name: &str,
    name_span: codemap::Span,
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<Flow> {
    devour_whitespace(toks);
    match name.to_ascii_lowercase().as_str() {
        "mixin" => {
            let decl_name = eat_ident(toks, scope, super_selector)?;
            devour_whitespace(toks);
            let args = if toks.peek().map(|t| t.kind) == Some('(') {
                toks.next();
                parse_func_args(toks)?
            } else {
                FuncArgs::default()
            };
            devour_whitespace(toks);
            if toks.next().map(|t| t.kind) != Some('{') {
                return Err(("expected \"{\".", decl_name.span).into());
            }
            let body = read_until_closing_curly_brace(toks);
            toks.next();
            let mixin = Mixin::new(scope.clone(), args, body, decl_name.span);
            scope.insert_mixin(&decl_name.node, mixin);
            Ok(Flow::Continue)
        }
        "function" => {
            let decl_name = eat_ident(toks, scope, super_selector)?;
            devour_whitespace(toks);
            if toks.next().map(|t| t.kind) != Some('(') {
                return Err(("expected \"(\".", decl_name.span).into());
            }
            let args = parse_func_args(toks)?;
            devour_whitespace(toks);
            if toks.next().map(|t| t.kind) != Some('{') {
                return Err(("expected \"{\".", decl_name.span).into());
            }
            let body = read_until_closing_curly_brace(toks);
            toks.next();
            let func = Function::new(decl_name.node.clone(), scope.clone(), args, body, decl_name.span);
            scope.insert_fn(&decl_name.node, func);
            Ok(Flow::Continue)
        }
        "include" => {
            let decl_name = eat_ident(toks, scope, super_selector)?;
            devour_whitespace(toks);
            let call_args = if toks.peek().map(|t| t.kind) == Some('(') {
                toks.next();
                crate::eval::parse_call_args(toks, scope, super_selector)?
            } else {
                CallArgs::empty()
            };
            devour_whitespace(toks);
            let include_content = if toks.peek().map(|t| t.kind) == Some('{') {
                toks.next();
                let body = read_until_closing_curly_brace(toks);
                toks.next();
                Some(ContentBlock {
                    body,
                    scope: scope.clone(),
                })
            } else {
                if toks.peek().map(|t| t.kind) == Some(';') {
                    toks.next();
                }
                None
            };

            if depth + 1 > RECURSION_LIMIT {
                return Err(SassError::new(
                    SassErrorKind::RecursionLimitExceeded(
                        "Max mixin recursion depth exceeded.".to_string(),
                    ),
                    decl_name.span,
                ));
            }
            let Some(mixin) = scope.get_mixin(&decl_name.node) else {
                return Err(SassError::new(
                    SassErrorKind::UndefinedMixin(decl_name.node.clone()),
                    decl_name.span,
                ));
            };
            mixin.call(
                call_args,
                include_content,
                super_selector,
                extends,
                depth + 1,
                out,
                root_out,
                decl_name.span,
            )?;
            Ok(Flow::Continue)
        }
        "content" => {
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let Some(cb) = content else {
                return Err(SassError::new(
                    SassErrorKind::InvalidSass(
                        "@content is only allowed within mixin declarations.".to_string(),
                    ),
                    name_span,
                ));
            };
            let mut content_scope = cb.scope.clone();
            let mut iter = cb.body.clone().into_iter().peekmore();
            exec_stmts(
                &mut iter,
                &mut content_scope,
                super_selector,
                extends,
                None,
                in_function,
                depth,
                out,
                root_out,
            )
        }
        "return" => {
            if !in_function {
                return Err(SassError::new(
                    SassErrorKind::InvalidSass(
                        "@return is only allowed within function declarations.".to_string(),
                    ),
                    name_span,
                ));
            }
            let value_toks = read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let value = crate::eval::from_vec(value_toks, scope, super_selector)?;
            Ok(Flow::Return(value.node))
        }
        "if" => {
            let if_stmt = If::from_tokens(toks)?;
            if_stmt.eval(scope, super_selector, extends, content, in_function, depth, out, root_out)
        }
        "each" => exec_each(toks, scope, super_selector, extends, content, in_function, depth, out, root_out),
        "for" => exec_for(toks, scope, super_selector, extends, content, in_function, depth, out, root_out),
        "while" => exec_while(toks, scope, super_selector, extends, content, in_function, depth, out, root_out),
        "extend" => {
            if super_selector.components.is_empty() {
                return Err(SassError::new(
                    SassErrorKind::InvalidSass(
                        "@extend may only be used within style rules.".to_string(),
                    ),
                    name_span,
                ));
            }
            let target_toks = read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let (target_toks, is_optional) = strip_optional_flag(target_toks);
            let target = parse_selector_list(target_toks, scope, super_selector)?;
            for extender in &super_selector.components {
                for target_complex in &target.components {
                    for target_compound in target_complex.compounds() {
                        extends.add_extend(extender.clone(), target_compound.clone(), is_optional);
                    }
                }
            }
            Ok(Flow::Continue)
        }
        "error" => {
            let value_toks = read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let value = crate::eval::from_vec(value_toks, scope, super_selector)?;
            Err(SassError::new(
                SassErrorKind::UserError(value.node.to_css_string(value.span).unwrap_or_else(|_| value.node.inspect())),
                value.span,
            ))
        }
        "warn" => {
            let value_toks = read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let value = crate::eval::from_vec(value_toks, scope, super_selector)?;
            log::warn!("{}", value.node.inspect());
            Ok(Flow::Continue)
        }
        "debug" => {
            let value_toks = read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let value = crate::eval::from_vec(value_toks, scope, super_selector)?;
            log::debug!("{}:{} DEBUG: {}", "stdin", name_span.low().0, value.node.inspect());
            Ok(Flow::Continue)
        }
        "charset" => {
            read_until_semicolon_or_closing_curly_brace(toks);
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            Ok(Flow::Continue)
        }
        "at-root" => {
            devour_whitespace(toks);
            let (reset_selector, escape_media) = if toks.peek().map(|t| t.kind) == Some('(') {
                toks.next();
                let mut query = String::new();
                let mut paren_depth = 1i32;
                while let Some(tok) = toks.next() {
                    match tok.kind {
                        '(' => {
                            paren_depth += 1;
                            query.push(tok.kind);
                        }
                        ')' => {
                            paren_depth -= 1;
                            if paren_depth == 0 {
                                break;
                            }
                            query.push(tok.kind);
                        }
                        _ => query.push(tok.kind),
                    }
                }
                at_root_query(&query)
            } else {
                (true, false)
            };
            devour_whitespace(toks);
            if toks.next().map(|t| t.kind) != Some('{') {
                return Err(("expected \"{\".", name_span).into());
            }
            let body = read_until_closing_curly_brace(toks);
            toks.next();
            let inner_selector = if reset_selector {
                SelectorList::new()
            } else {
                super_selector.clone()
            };
            let mut iter = body.into_iter().peekmore();
            if escape_media {
                let mut escaped = Vec::new();
                let flow = exec_stmts(
                    &mut iter, scope, &inner_selector, extends, content, in_function, depth,
                    &mut escaped, root_out,
                )?;
                root_out.extend(escaped);
                Ok(flow)
            } else {
                let flow = exec_stmts(
                    &mut iter, scope, &inner_selector, extends, content, in_function, depth, out,
                    root_out,
                )?;
                Ok(flow)
            }
        }
        "media" | "supports" => {
            let (params, has_block) = parse_unknown_params(toks, scope, super_selector)?;
            if !has_block {
                return Err(("expected \"{\".", name_span).into());
            }
            let mut body = Vec::new();
            exec_stmts(
                toks,
                scope,
                super_selector,
                extends,
                content,
                in_function,
                depth,
                &mut body,
                root_out,
            )?;
            let body = bubble_at_body(body, super_selector);
            let is_media = name.eq_ignore_ascii_case("media");

            // A `@media`/`@supports` directly nested in one of the same
            // kind intersects its query with the enclosing one instead of
            // nesting literally (spec §4.5).
            let mut own = Vec::new();
            let mut lifted = Vec::new();
            for stmt in body {
                match stmt {
                    Stmt::Media { query: inner, body: inner_body } if is_media => {
                        lifted.push(Stmt::Media {
                            query: intersect_queries(&params, &inner),
                            body: inner_body,
                        });
                    }
                    Stmt::Supports { query: inner, body: inner_body } if !is_media => {
                        lifted.push(Stmt::Supports {
                            query: intersect_queries(&params, &inner),
                            body: inner_body,
                        });
                    }
                    other => own.push(other),
                }
            }
            if !own.is_empty() {
                out.push(if is_media {
                    Stmt::Media { query: params.clone(), body: own }
                } else {
                    Stmt::Supports { query: params.clone(), body: own }
                });
            }
            out.extend(lifted);
            Ok(Flow::Continue)
        }
        "use" | "forward" => Err(SassError::new(
            SassErrorKind::ImportError(
                "The module system (@use/@forward) is not supported.".to_string(),
            ),
            name_span,
        )),
        "import" => {
            devour_whitespace(toks);
            let quote = toks.next().map(|t| t.kind);
            let path = match quote {
                Some(q @ '"') | Some(q @ '\'') => {
                    let spanned = crate::utils::parse_quoted_string(toks, scope, q, super_selector)?;
                    match spanned.node {
                        Value::String(s) => s.text().to_string(),
                        _ => unreachable!(),
                    }
                }
                _ => return Err(("expected string.", name_span).into()),
            };
            if toks.peek().map(|t| t.kind) == Some(';') {
                toks.next();
            }
            let imported = crate::importer::load(&path, name_span)?;
            let mut iter = imported.into_iter().peekmore();
            exec_stmts(
                &mut iter,
                scope,
                super_selector,
                extends,
                content,
                in_function,
                depth,
                out,
                root_out,
            )
        }
        _ => {
            let (params, has_block) = parse_unknown_params(toks, scope, super_selector)?;
            let body = if has_block {
                let mut body = Vec::new();
                exec_stmts(
                    toks,
                    scope,
                    super_selector,
                    extends,
                    content,
                    in_function,
                    depth,
                    &mut body,
                    root_out,
                )?;
                body
            } else {
                Vec::new()
            };
            out.push(Stmt::UnknownAtRule {
                name: name.to_string(),
                params,
                body,
            });
            Ok(Flow::Continue)
        }
    }
}

fn strip_optional_flag(mut toks: Vec<Token>) -> (Vec<Token>, bool) {
    while matches!(toks.last(), Some(t) if t.kind.is_whitespace()) {
        toks.pop();
    }
    let word: String = toks
        .iter()
        .rev()
        .take_while(|t| t.kind.is_alphabetic())
        .map(|t| t.kind)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if word.eq_ignore_ascii_case("optional") {
        let cut = toks.len() - word.len();
        let mut rest = toks[..cut].to_vec();
        while matches!(rest.last(), Some(t) if t.kind.is_whitespace()) {
            rest.pop();
        }
        if matches!(rest.last(), Some(t) if t.kind == '!') {
            rest.pop();
        }
        while matches!(rest.last(), Some(t) if t.kind.is_whitespace()) {
            rest.pop();
        }
        (rest, true)
    } else {
        (toks, false)
    }
}

/// Wraps declarations/comments appearing directly under a `@media`/
/// `@supports` body in a fresh ruleset using the enclosing selector —
/// otherwise bubbling the at-rule out of its selector context would drop
/// it and leave a bare declaration, invalid outside a style rule (spec
/// §4.5, GLOSSARY "Bubble").
fn bubble_at_body(body: Vec<Stmt>, super_selector: &SelectorList) -> Vec<Stmt> {
    if super_selector.components.is_empty() {
        return body;
    }
    let (direct, nested): (Vec<Stmt>, Vec<Stmt>) = body
        .into_iter()
        .partition(|s| matches!(s, Stmt::Style(..) | Stmt::Comment(..)));
    let mut out = Vec::with_capacity(nested.len() + 1);
    if !direct.is_empty() {
        out.push(Stmt::RuleSet {
            selector: super_selector.clone(),
            body: direct,
        });
    }
    out.extend(nested);
    out
}

/// Splits a comma-separated media/supports query list at top level,
/// leaving parenthesized feature queries (`(min-width: 900px)`) intact.
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut cur = String::new();
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                cur.push(c);
            }
            ')' => {
                depth -= 1;
                cur.push(c);
            }
            ',' if depth == 0 => {
                parts.push(cur.trim().to_string());
                cur = String::new();
            }
            _ => cur.push(c),
        }
    }
    if !cur.trim().is_empty() || parts.is_empty() {
        parts.push(cur.trim().to_string());
    }
    parts
}

/// A `@media`/`@supports` nested inside another of the same kind
/// intersects queries: every clause of the outer query is ANDed with
/// every clause of the inner one, cartesian-product style (spec §4.5).
fn intersect_queries(outer: &str, inner: &str) -> String {
    let outer_clauses = split_top_level(outer);
    let inner_clauses = split_top_level(inner);
    let mut combined = Vec::with_capacity(outer_clauses.len() * inner_clauses.len());
    for o in &outer_clauses {
        for i in &inner_clauses {
            combined.push(format!("{o} and {i}"));
        }
    }
    combined.join(", ")
}

/// Parses an `@at-root (with: ...)`/`(without: ...)` query into
/// `(reset_selector, escape_media)`. The three escapable contexts are
/// `rule`, `media` and `supports` (`all` means all three); `without`
/// escapes exactly the named contexts, `with` escapes their complement.
/// An unrecognized or malformed query falls back to the default
/// (reset the selector, stay inside any enclosing `@media`/`@supports`).
fn at_root_query(raw: &str) -> (bool, bool) {
    const UNIVERSE: [&str; 3] = ["rule", "media", "supports"];
    let Some((kw, rest)) = raw.trim().split_once(':') else {
        return (true, false);
    };
    let kw = kw.trim().to_ascii_lowercase();
    let keywords: Vec<String> = rest
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let expand = |ks: &[String]| -> Vec<&'static str> {
        if ks.iter().any(|k| k == "all") {
            UNIVERSE.to_vec()
        } else {
            UNIVERSE.iter().copied().filter(|u| ks.iter().any(|k| k == u)).collect()
        }
    };
    let escape_set: Vec<&str> = match kw.as_str() {
        "without" => expand(&keywords),
        "with" => {
            let included = expand(&keywords);
            UNIVERSE.iter().copied().filter(|u| !included.contains(u)).collect()
        }
        _ => return (true, false),
    };
    let reset_selector = escape_set.contains(&"rule");
    let escape_media = escape_set.contains(&"media") || escape_set.contains(&"supports");
    (reset_selector, escape_media)
}

#[allow(clippy::too_many_arguments)]
fn exec_each<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<Flow> {
    devour_whitespace(toks);
    let mut names = Vec::new();
    loop {
        if toks.peek().map(|t| t.kind) != Some('$') {
            let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
            return Err(("expected \"$\".", span).into());
        }
        toks.next();
        names.push(crate::utils::eat_ident_no_interpolation(toks)?);
        devour_whitespace(toks);
        if toks.peek().map(|t| t.kind) == Some(',') {
            toks.next();
            devour_whitespace(toks);
        } else {
            break;
        }
    }
    let kw = eat_ident(toks, scope, super_selector)?;
    if kw.node != "in" {
        return Err(("Expected \"in\".", kw.span).into());
    }
    devour_whitespace(toks);
    let list_toks = read_until_open_curly_brace(toks);
    toks.next();
    let body = read_until_closing_curly_brace(toks);
    toks.next();

    let list_val = crate::eval::from_vec(list_toks, scope, super_selector)?;
    let items = list_val.node.as_list();

    for item in items {
        let mut child = scope.child(ScopeKind::Block);
        if names.len() == 1 {
            child.assign(&names[0], item);
        } else {
            let parts = item.as_list();
            for (i, n) in names.iter().enumerate() {
                child.assign(n, parts.get(i).cloned().unwrap_or(Value::Null));
            }
        }
        let mut iter = body.clone().into_iter().peekmore();
        let flow = exec_stmts(
            &mut iter, &mut child, super_selector, extends, content, in_function, depth, out, root_out,
        )?;
        if let Flow::Return(v) = flow {
            return Ok(Flow::Return(v));
        }
    }
    Ok(Flow::Continue)
}

#[allow(clippy::too_many_arguments)]
fn exec_for<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<Flow> {
    devour_whitespace(toks);
    if toks.peek().map(|t| t.kind) != Some('$') {
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        return Err(("expected \"$\".", span).into());
    }
    toks.next();
    let var = crate::utils::eat_ident_no_interpolation(toks)?;
    devour_whitespace(toks);
    let from_kw = eat_ident(toks, scope, super_selector)?;
    if from_kw.node != "from" {
        return Err(("Expected \"from\".", from_kw.span).into());
    }
    devour_whitespace(toks);

    let mut from_toks = Vec::new();
    let through;
    loop {
        let ident_start = toks.peek().map(|t| t.kind.is_alphabetic()).unwrap_or(false);
        if ident_start {
            let save = toks.clone();
            let ident = eat_ident(toks, scope, super_selector)?;
            if ident.node == "to" {
                through = false;
                break;
            } else if ident.node == "through" {
                through = true;
                break;
            }
            *toks = save;
        }
        match toks.next() {
            Some(t) => from_toks.push(t),
            None => return Err(("expected \"to\" or \"through\".", from_kw.span).into()),
        }
    }
    devour_whitespace(toks);
    let to_toks = read_until_open_curly_brace(toks);
    toks.next();
    let body = read_until_closing_curly_brace(toks);
    toks.next();

    let from_val = crate::eval::from_vec(from_toks, scope, super_selector)?;
    let to_val = crate::eval::from_vec(to_toks, scope, super_selector)?;
    let (from_n, to_n) = match (&from_val.node, &to_val.node) {
        (Value::Number(a), Value::Number(b)) => (a.value, b.value),
        _ => {
            return Err(SassError::new(
                SassErrorKind::TypeMismatch("@for bounds must be numbers.".to_string()),
                from_val.span,
            ))
        }
    };
    let (start, end) = (from_n.round() as i64, to_n.round() as i64);
    let range: Box<dyn Iterator<Item = i64>> = if start <= end {
        if through {
            Box::new(start..=end)
        } else {
            Box::new(start..end)
        }
    } else if through {
        Box::new((end..=start).rev())
    } else {
        Box::new(((end + 1)..=start).rev())
    };

    for i in range {
        let mut child = scope.child(ScopeKind::Block);
        child.assign(&var, Value::Number(crate::value::SassNumber::new_unitless(i as f64)));
        let mut iter = body.clone().into_iter().peekmore();
        let flow = exec_stmts(
            &mut iter, &mut child, super_selector, extends, content, in_function, depth, out, root_out,
        )?;
        if let Flow::Return(v) = flow {
            return Ok(Flow::Return(v));
        }
    }
    Ok(Flow::Continue)
}

#[allow(clippy::too_many_arguments)]
fn exec_while<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &mut Scope,
    super_selector: &SelectorList,
    extends: &mut SubsetMap,
    content: Option<&ContentBlock>,
    in_function: bool,
    depth: u32,
    out: &mut Vec<Stmt>,
    root_out: &mut Vec<Stmt>,
) -> SassResult<Flow> {
    devour_whitespace(toks);
    let cond_toks = read_until_open_curly_brace(toks);
    toks.next();
    let body = read_until_closing_curly_brace(toks);
    toks.next();

    // A generous but finite cap guards against a condition that never
    // turns false rather than hanging the compiler (spec §4.6 edge case).
    const MAX_ITERATIONS: u32 = 1_000_000;
    let mut iterations = 0u32;
    loop {
        let cond = crate::eval::from_vec(cond_toks.clone(), scope, super_selector)?;
        if !cond.node.is_truthy() {
            break;
        }
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            return Err(SassError::new(
                SassErrorKind::RecursionLimitExceeded("@while loop did not terminate.".to_string()),
                cond.span,
            ));
        }
        let mut iter = body.clone().into_iter().peekmore();
        let flow = exec_stmts(
            &mut iter, scope, super_selector, extends, content, in_function, depth, out, root_out,
        )?;
        if let Flow::Return(v) = flow {
            return Ok(Flow::Return(v));
        }
    }
    Ok(Flow::Continue)
}
