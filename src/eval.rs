//! SassScript parsing and evaluation, interleaved in one pass (spec §4.4):
//! `from_tokens` both recognizes the grammar and evaluates it against a
//! live [`Scope`], rather than building a separate expression AST first.
//! This mirrors the teacher's own `Value::from_tokens`.

use codemap::{Span, Spanned};
use peekmore::{PeekMore, PeekMoreIterator};

use crate::args::{CallArg, CallArgs};
use crate::common::{Brackets, ListSeparator, Op, QuoteKind};
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::token::Token;
use crate::unit::Unit;
use crate::utils::{devour_whitespace, eat_ident_no_interpolation, parse_quoted_string};
use crate::value::{SassColor, SassNumber, SassString, Value};

pub(crate) fn from_vec(
    toks: Vec<Token>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Spanned<Value>> {
    let mut iter = toks.into_iter().peekmore();
    from_tokens(&mut iter, scope, super_selector)
}

/// Parse and evaluate one (possibly comma-separated) value expression off
/// the front of `toks`, consuming it entirely. Does not require the
/// stream to be empty afterward when called as a sub-parse (e.g. a single
/// interpolation's contents).
pub(crate) fn from_tokens<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Spanned<Value>> {
    devour_whitespace(toks);
    let start = toks.peek().map(|t| t.pos());
    let value = parse_comma_list(toks, scope, super_selector)?;
    devour_whitespace(toks);
    let span = start.unwrap_or_else(codemap::Span::dummy);
    Ok(Spanned { node: value, span })
}

fn parse_comma_list<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut elems = vec![parse_space_list(toks, scope, super_selector)?];
    devour_whitespace(toks);
    while toks.peek().map(|t| t.kind) == Some(',') {
        toks.next();
        devour_whitespace(toks);
        if toks.peek().is_none() || matches!(toks.peek().map(|t| t.kind), Some(')') | Some(']')) {
            break;
        }
        elems.push(parse_space_list(toks, scope, super_selector)?);
        devour_whitespace(toks);
    }
    Ok(if elems.len() == 1 {
        elems.pop().unwrap()
    } else {
        Value::list(elems, ListSeparator::Comma, Brackets::None)
    })
}

fn parse_space_list<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut elems = vec![parse_or(toks, scope, super_selector)?];
    loop {
        devour_whitespace(toks);
        match toks.peek().map(|t| t.kind) {
            Some(',') | Some(')') | Some(']') | None => break,
            _ => {}
        }
        if peek_keyword(toks, "and") || peek_keyword(toks, "or") {
            break;
        }
        elems.push(parse_or(toks, scope, super_selector)?);
    }
    Ok(if elems.len() == 1 {
        elems.pop().unwrap()
    } else {
        Value::list(elems, ListSeparator::Space, Brackets::None)
    })
}

fn parse_or<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_and(toks, scope, super_selector)?;
    loop {
        devour_whitespace(toks);
        if !peek_keyword(toks, "or") {
            break;
        }
        eat_keyword(toks, "or");
        devour_whitespace(toks);
        let rhs = parse_and(toks, scope, super_selector)?;
        lhs = if lhs.is_truthy() { lhs } else { rhs };
    }
    Ok(lhs)
}

fn parse_and<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_equality(toks, scope, super_selector)?;
    loop {
        devour_whitespace(toks);
        if !peek_keyword(toks, "and") {
            break;
        }
        eat_keyword(toks, "and");
        devour_whitespace(toks);
        let rhs = parse_equality(toks, scope, super_selector)?;
        lhs = if lhs.is_truthy() { rhs } else { lhs };
    }
    Ok(lhs)
}

fn parse_equality<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_relational(toks, scope, super_selector)?;
    loop {
        devour_whitespace(toks);
        let op = match (toks.peek().map(|t| t.kind), toks.peek_nth(1).map(|t| t.kind)) {
            (Some('='), Some('=')) => Some(Op::Equal),
            (Some('!'), Some('=')) => Some(Op::NotEqual),
            _ => None,
        };
        let Some(op) = op else { break };
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        toks.next();
        toks.next();
        devour_whitespace(toks);
        let rhs = parse_relational(toks, scope, super_selector)?;
        let eq = lhs.equals(&rhs, span)?;
        lhs = Value::Bool(if op == Op::Equal { eq } else { !eq });
    }
    Ok(lhs)
}

fn parse_relational<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_additive(toks, scope, super_selector)?;
    loop {
        devour_whitespace(toks);
        let (op, len) = match (toks.peek().map(|t| t.kind), toks.peek_nth(1).map(|t| t.kind)) {
            (Some('<'), Some('=')) => (Some(Op::LessThanOrEqual), 2),
            (Some('>'), Some('=')) => (Some(Op::GreaterThanOrEqual), 2),
            (Some('<'), _) => (Some(Op::LessThan), 1),
            (Some('>'), _) => (Some(Op::GreaterThan), 1),
            _ => (None, 0),
        };
        let Some(op) = op else { break };
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        for _ in 0..len {
            toks.next();
        }
        devour_whitespace(toks);
        let rhs = parse_additive(toks, scope, super_selector)?;
        let ord = lhs.cmp(&rhs, span)?;
        let result = match op {
            Op::LessThan => ord.is_lt(),
            Op::LessThanOrEqual => ord.is_le(),
            Op::GreaterThan => ord.is_gt(),
            Op::GreaterThanOrEqual => ord.is_ge(),
            _ => unreachable!(),
        };
        lhs = Value::Bool(result);
    }
    Ok(lhs)
}

fn parse_additive<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_multiplicative(toks, scope, super_selector)?;
    loop {
        let before_ws = toks.clone();
        let had_ws_before = devour_whitespace(toks);
        let op = match toks.peek().map(|t| t.kind) {
            Some('+') => Some(Op::Plus),
            Some('-') => {
                // `1-2` (no surrounding space) is still subtraction; `a-b`
                // as part of an identifier is handled upstream by eat_ident
                // consuming the `-` before we ever get here.
                Some(Op::Minus)
            }
            _ => {
                *toks = before_ws;
                break;
            }
        };
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        toks.next();
        let had_ws_after = devour_whitespace(toks);
        if toks.peek().is_none() {
            *toks = before_ws;
            break;
        }
        let _ = (had_ws_before, had_ws_after);
        let rhs = parse_multiplicative(toks, scope, super_selector)?;
        lhs = apply_binary(lhs, op.unwrap(), rhs, span)?;
    }
    Ok(lhs)
}

fn parse_multiplicative<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    let mut lhs = parse_unary(toks, scope, super_selector)?;
    loop {
        devour_whitespace(toks);
        let op = match toks.peek().map(|t| t.kind) {
            Some('*') => Some(Op::Mul),
            Some('/') => Some(Op::Div),
            Some('%') => Some(Op::Rem),
            _ => None,
        };
        let Some(op) = op else { break };
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        toks.next();
        devour_whitespace(toks);
        let rhs = parse_unary(toks, scope, super_selector)?;
        lhs = apply_binary(lhs, op, rhs, span)?;
    }
    Ok(lhs)
}

fn parse_unary<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    devour_whitespace(toks);
    if peek_keyword(toks, "not") {
        let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        eat_keyword(toks, "not");
        devour_whitespace(toks);
        let v = parse_unary(toks, scope, super_selector)?;
        let _ = span;
        return Ok(Value::Bool(!v.is_truthy()));
    }
    match toks.peek().map(|t| t.kind) {
        Some('-') => {
            let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
            toks.next();
            if toks.peek().map(|t| t.kind.is_whitespace()) == Some(true) {
                devour_whitespace(toks);
                let v = parse_unary(toks, scope, super_selector)?;
                return negate(v, span);
            }
            // No space after `-`: either a negative literal or a
            // hyphenated identifier (`-moz-foo`); `parse_primary` decides.
            let v = parse_unary_no_minus(toks, scope, super_selector, true)?;
            Ok(v)
        }
        Some('+') if toks.peek_nth(1).map(|t| t.kind.is_whitespace()) == Some(true) => {
            toks.next();
            devour_whitespace(toks);
            parse_unary(toks, scope, super_selector)
        }
        _ => parse_primary(toks, scope, super_selector),
    }
}

fn parse_unary_no_minus<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
    negated: bool,
) -> SassResult<Value> {
    let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
    if matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_ascii_digit() || c == '.') {
        let n = parse_number(toks)?;
        return Ok(Value::Number(if negated { n.neg() } else { n }));
    }
    let v = parse_primary(toks, scope, super_selector)?;
    if negated {
        negate(v, span)
    } else {
        Ok(v)
    }
}

fn negate(v: Value, span: Span) -> SassResult<Value> {
    match v {
        Value::Number(n) => Ok(Value::Number(n.neg())),
        other => Ok(Value::string(
            format!("-{}", other.to_css_string(span)?),
            QuoteKind::None,
        )),
    }
}

fn apply_binary(lhs: Value, op: Op, rhs: Value, span: Span) -> SassResult<Value> {
    match (&lhs, &rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
            Op::Plus => a.add(b, span)?,
            Op::Minus => a.sub(b, span)?,
            Op::Mul => a.mul(b, span)?,
            Op::Div => a.div(b, span)?,
            Op::Rem => a.rem(b, span)?,
            _ => unreachable!(),
        })),
        (Value::Color(c), Value::Number(n)) if matches!(op, Op::Plus | Op::Minus | Op::Mul | Op::Div) => {
            Ok(Value::Color(Box::new(color_channel_op(c, n.value, op))))
        }
        (Value::Color(a), Value::Color(b)) if matches!(op, Op::Plus | Op::Minus | Op::Mul | Op::Div) => {
            Ok(Value::Color(Box::new(color_color_op(a, b, op))))
        }
        _ if op == Op::Plus => concat(lhs, rhs, span, true),
        _ if op == Op::Minus => {
            let joined = format!(
                "{}-{}",
                lhs.to_css_string(span)?,
                rhs.to_css_string(span)?
            );
            Ok(Value::string(joined, QuoteKind::None))
        }
        _ => Err(SassError::new(
            SassErrorKind::UndefinedOperation(format!(
                "Undefined operation \"{} {} {}\".",
                lhs.inspect(),
                op,
                rhs.inspect()
            )),
            span,
        )),
    }
}

/// String/mixed-type `+`: quoted if the left operand was quoted, else
/// unquoted (spec §4.4.1 "non-numeric `+` concatenates").
fn concat(lhs: Value, rhs: Value, span: Span, plus: bool) -> SassResult<Value> {
    let sep = if plus { "" } else { " " };
    let text = format!(
        "{}{sep}{}",
        lhs.to_css_string(span)?,
        rhs.to_css_string(span)?
    );
    let quote = match &lhs {
        Value::String(SassString::Quoted { .. }) => QuoteKind::Double,
        _ => QuoteKind::None,
    };
    Ok(Value::string(text, quote))
}

fn color_channel_op(c: &SassColor, n: f64, op: Op) -> SassColor {
    let f = |ch: u8| -> u8 {
        let v = match op {
            Op::Plus => f64::from(ch) + n,
            Op::Minus => f64::from(ch) - n,
            Op::Mul => f64::from(ch) * n,
            Op::Div => f64::from(ch) / n,
            _ => f64::from(ch),
        };
        v.clamp(0.0, 255.0).round() as u8
    };
    SassColor::from_rgba(f(c.red()), f(c.green()), f(c.blue()), c.alpha())
}

fn color_color_op(a: &SassColor, b: &SassColor, op: Op) -> SassColor {
    let f = |x: u8, y: u8| -> u8 {
        let v = match op {
            Op::Plus => f64::from(x) + f64::from(y),
            Op::Minus => f64::from(x) - f64::from(y),
            Op::Mul => f64::from(x) * f64::from(y),
            Op::Div => f64::from(x) / f64::from(y),
            _ => f64::from(x),
        };
        v.clamp(0.0, 255.0).round() as u8
    };
    SassColor::from_rgba(
        f(a.red(), b.red()),
        f(a.green(), b.green()),
        f(a.blue(), b.blue()),
        a.alpha(),
    )
}

fn parse_primary<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Value> {
    devour_whitespace(toks);
    let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
    match toks.peek().map(|t| t.kind) {
        None => Ok(Value::Null),
        Some(c) if c.is_ascii_digit() || c == '.' => Ok(Value::Number(parse_number(toks)?)),
        Some('"') | Some('\'') => {
            let quote = toks.next().unwrap().kind;
            Ok(parse_quoted_string(toks, scope, quote, super_selector)?.node)
        }
        Some('$') => {
            toks.next();
            let name = eat_ident_no_interpolation(toks)?;
            scope
                .get_var(&name)
                .ok_or_else(|| SassError::new(SassErrorKind::UndefinedVariable(name.clone()), span))
        }
        Some('#') if toks.peek_nth(1).map(|t| t.kind) != Some('{') => {
            toks.next();
            parse_hex_color(toks, span)
        }
        Some('(') => {
            toks.next();
            parse_paren(toks, scope, super_selector, span)
        }
        Some('[') => {
            toks.next();
            devour_whitespace(toks);
            let mut elems = Vec::new();
            if toks.peek().map(|t| t.kind) != Some(']') {
                elems.push(parse_space_list(toks, scope, super_selector)?);
                devour_whitespace(toks);
                while toks.peek().map(|t| t.kind) == Some(',') {
                    toks.next();
                    devour_whitespace(toks);
                    elems.push(parse_space_list(toks, scope, super_selector)?);
                    devour_whitespace(toks);
                }
            }
            expect_char(toks, ']', span)?;
            let sep = if elems.len() > 1 {
                ListSeparator::Comma
            } else {
                ListSeparator::Undecided
            };
            Ok(Value::list(elems, sep, Brackets::Bracketed))
        }
        Some(c) if c.is_alphabetic() || c == '_' || c == '-' || c == '\\' => {
            parse_ident_or_call(toks, scope, super_selector, span)
        }
        Some(c) => Err(SassError::new(
            SassErrorKind::SyntaxError(format!("Unexpected character {c:?} in expression.")),
            span,
        )),
    }
}

fn parse_paren<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Value> {
    devour_whitespace(toks);
    if toks.peek().map(|t| t.kind) == Some(')') {
        toks.next();
        return Ok(Value::Map(crate::value::SassMap::default()));
    }
    let first = parse_space_list(toks, scope, super_selector)?;
    devour_whitespace(toks);
    if toks.peek().map(|t| t.kind) == Some(':') {
        toks.next();
        devour_whitespace(toks);
        let first_val = parse_space_list(toks, scope, super_selector)?;
        let mut map = crate::value::SassMap::default();
        insert_literal_entry(&mut map, first, first_val, span)?;
        devour_whitespace(toks);
        while toks.peek().map(|t| t.kind) == Some(',') {
            toks.next();
            devour_whitespace(toks);
            if toks.peek().map(|t| t.kind) == Some(')') {
                break;
            }
            let k = parse_space_list(toks, scope, super_selector)?;
            devour_whitespace(toks);
            expect_char(toks, ':', span)?;
            devour_whitespace(toks);
            let v = parse_space_list(toks, scope, super_selector)?;
            insert_literal_entry(&mut map, k, v, span)?;
            devour_whitespace(toks);
        }
        expect_char(toks, ')', span)?;
        return Ok(Value::Map(map));
    }
    let mut elems = vec![first];
    devour_whitespace(toks);
    while toks.peek().map(|t| t.kind) == Some(',') {
        toks.next();
        devour_whitespace(toks);
        if toks.peek().map(|t| t.kind) == Some(')') {
            break;
        }
        elems.push(parse_space_list(toks, scope, super_selector)?);
        devour_whitespace(toks);
    }
    expect_char(toks, ')', span)?;
    Ok(if elems.len() == 1 {
        elems.pop().unwrap()
    } else {
        Value::list(elems, ListSeparator::Comma, Brackets::None)
    })
}

/// A map literal may not repeat a key (spec §3.2 Map invariant); `map-merge`
/// and friends go through `SassMap::insert` directly, which overwrites.
fn insert_literal_entry(
    map: &mut crate::value::SassMap,
    key: Value,
    value: Value,
    span: Span,
) -> SassResult<()> {
    if map.insert(key.clone(), value, span)? {
        return Err(SassError::new(
            SassErrorKind::DuplicateKey(format!("Duplicate key \"{}\" in map.", key.inspect())),
            span,
        ));
    }
    Ok(())
}

fn parse_ident_or_call<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Value> {
    let ident = crate::utils::eat_ident(toks, scope, super_selector)?.node;
    if toks.peek().map(|t| t.kind) == Some('(') {
        toks.next();
        return eval_call(&ident, toks, scope, super_selector, span);
    }
    match ident.to_ascii_lowercase().as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "null" => Ok(Value::Null),
        _ => Ok(crate::value::color::from_name(&ident)
            .map(|c| Value::Color(Box::new(c)))
            .unwrap_or_else(|| Value::string(ident, QuoteKind::None))),
    }
}

fn eval_call<I: Iterator<Item = Token> + Clone>(
    name: &str,
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Value> {
    let call_args = parse_call_args(toks, scope, super_selector)?;

    if let Some(func) = scope.get_fn(name) {
        return func.call(call_args, scope, super_selector, span);
    }

    if let Some(result) = crate::builtin::call(name, &call_args, scope, super_selector, span)? {
        return Ok(result);
    }

    // Not a known function: a plain CSS function call (`calc()`, `var()`,
    // `url()`, vendor functions) passes through verbatim.
    let rendered = call_args
        .0
        .iter()
        .map(|a| match a {
            CallArg::Positional(v) => v.node.to_css_string(span),
            CallArg::Named(n, v) => Ok(format!("${n}: {}", v.node.to_css_string(span)?)),
            CallArg::Rest(v) => Ok(format!("{}...", v.node.to_css_string(span)?)),
        })
        .collect::<SassResult<Vec<_>>>()?
        .join(", ");
    Ok(Value::string(format!("{name}({rendered})"), QuoteKind::None))
}

pub(crate) fn parse_call_args<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<CallArgs> {
    let mut out = Vec::new();
    devour_whitespace(toks);
    if toks.peek().map(|t| t.kind) == Some(')') {
        toks.next();
        return Ok(CallArgs(out));
    }
    loop {
        devour_whitespace(toks);
        let named = if toks.peek().map(|t| t.kind) == Some('$') {
            let mut ahead = toks.clone();
            ahead.next();
            let save = ahead.clone();
            if let Ok(name) = eat_ident_no_interpolation(&mut ahead) {
                let mut probe = ahead.clone();
                devour_whitespace(&mut probe);
                if probe.peek().map(|t| t.kind) == Some(':') {
                    toks.next();
                    let _ = eat_ident_no_interpolation(toks)?;
                    devour_whitespace(toks);
                    toks.next(); // ':'
                    devour_whitespace(toks);
                    Some(name)
                } else {
                    let _ = save;
                    None
                }
            } else {
                None
            }
        } else {
            None
        };

        let value_span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
        let value = parse_or(toks, scope, super_selector)?;
        devour_whitespace(toks);

        let is_rest = toks.peek().map(|t| t.kind) == Some('.')
            && toks.peek_nth(1).map(|t| t.kind) == Some('.')
            && toks.peek_nth(2).map(|t| t.kind) == Some('.');
        if is_rest {
            toks.next();
            toks.next();
            toks.next();
            out.push(CallArg::Rest(Spanned {
                node: value,
                span: value_span,
            }));
        } else if let Some(name) = named {
            out.push(CallArg::Named(
                name,
                Spanned {
                    node: value,
                    span: value_span,
                },
            ));
        } else {
            out.push(CallArg::Positional(Spanned {
                node: value,
                span: value_span,
            }));
        }

        devour_whitespace(toks);
        match toks.peek().map(|t| t.kind) {
            Some(',') => {
                toks.next();
                devour_whitespace(toks);
                if toks.peek().map(|t| t.kind) == Some(')') {
                    toks.next();
                    break;
                }
            }
            Some(')') => {
                toks.next();
                break;
            }
            _ => break,
        }
    }
    Ok(CallArgs(out))
}

fn parse_number<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<SassNumber> {
    let mut s = String::new();
    let has_leading_zero = toks.peek().map(|t| t.kind) != Some('.');
    while matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_ascii_digit()) {
        s.push(toks.next().unwrap().kind);
    }
    if toks.peek().map(|t| t.kind) == Some('.')
        && matches!(toks.peek_nth(1).map(|t| t.kind), Some(c) if c.is_ascii_digit())
    {
        s.push(toks.next().unwrap().kind);
        while matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_ascii_digit()) {
            s.push(toks.next().unwrap().kind);
        }
    }
    if matches!(toks.peek().map(|t| t.kind), Some('e') | Some('E'))
        && matches!(
            toks.peek_nth(1).map(|t| t.kind),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-'
        )
    {
        s.push(toks.next().unwrap().kind);
        if matches!(toks.peek().map(|t| t.kind), Some('+') | Some('-')) {
            s.push(toks.next().unwrap().kind);
        }
        while matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_ascii_digit()) {
            s.push(toks.next().unwrap().kind);
        }
    }
    let value: f64 = s.parse().unwrap_or(0.0);

    let mut unit_str = String::new();
    if toks.peek().map(|t| t.kind) == Some('%') {
        toks.next();
        unit_str.push('%');
    } else {
        while matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_alphabetic()) {
            unit_str.push(toks.next().unwrap().kind);
        }
    }

    Ok(if unit_str.is_empty() {
        SassNumber {
            value,
            numer_units: Vec::new(),
            denom_units: Vec::new(),
            has_leading_zero,
        }
    } else {
        SassNumber {
            value,
            numer_units: vec![Unit::new(unit_str)],
            denom_units: Vec::new(),
            has_leading_zero,
        }
    })
}

fn parse_hex_color<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    span: Span,
) -> SassResult<Value> {
    let mut hex = String::new();
    while matches!(toks.peek().map(|t| t.kind), Some(c) if c.is_ascii_hexdigit()) && hex.len() < 8 {
        hex.push(toks.next().unwrap().kind);
    }
    let digit = |c: char| c.to_digit(16).unwrap_or(0) as u8;
    let expand = |c: char| digit(c) * 16 + digit(c);
    let (r, g, b, a) = match hex.len() {
        3 => {
            let c: Vec<char> = hex.chars().collect();
            (expand(c[0]), expand(c[1]), expand(c[2]), 1.0)
        }
        4 => {
            let c: Vec<char> = hex.chars().collect();
            (
                expand(c[0]),
                expand(c[1]),
                expand(c[2]),
                f64::from(expand(c[3])) / 255.0,
            )
        }
        6 => {
            let c: Vec<char> = hex.chars().collect();
            (
                digit(c[0]) * 16 + digit(c[1]),
                digit(c[2]) * 16 + digit(c[3]),
                digit(c[4]) * 16 + digit(c[5]),
                1.0,
            )
        }
        8 => {
            let c: Vec<char> = hex.chars().collect();
            (
                digit(c[0]) * 16 + digit(c[1]),
                digit(c[2]) * 16 + digit(c[3]),
                digit(c[4]) * 16 + digit(c[5]),
                f64::from(digit(c[6]) * 16 + digit(c[7])) / 255.0,
            )
        }
        _ => {
            return Err(SassError::new(
                SassErrorKind::SyntaxError(format!("Invalid hex color #{hex}.")),
                span,
            ))
        }
    };
    Ok(Value::Color(Box::new(SassColor::from_rgba(r, g, b, a))))
}

fn peek_keyword<I: Iterator<Item = Token> + Clone>(
    toks: &PeekMoreIterator<I>,
    kw: &str,
) -> bool {
    let mut peeked = toks.clone();
    for expected in kw.chars() {
        match peeked.peek_nth(0) {
            Some(t) if t.kind.eq_ignore_ascii_case(&expected) => {
                peeked.advance_cursor();
            }
            _ => return false,
        }
    }
    !matches!(peeked.peek_nth(0).map(|t| t.kind), Some(c) if c.is_alphanumeric() || c == '_' || c == '-')
}

fn eat_keyword<I: Iterator<Item = Token> + Clone>(toks: &mut PeekMoreIterator<I>, kw: &str) {
    for _ in kw.chars() {
        toks.next();
    }
}

fn expect_char<I: Iterator<Item = Token> + Clone>(
    toks: &mut PeekMoreIterator<I>,
    expected: char,
    span: Span,
) -> SassResult<()> {
    match toks.next() {
        Some(t) if t.kind == expected => Ok(()),
        _ => Err(SassError::new(
            SassErrorKind::SyntaxError(format!("Expected {expected:?}.")),
            span,
        )),
    }
}
