//! Shared token-stream helpers used by the (intentionally light) parser
//! layer — whitespace skipping, identifier/string/comment scanning, and
//! interpolation splicing. Grounded in the teacher's `utils` module
//! (referenced throughout `grass`'s `lib.rs`).

use codemap::Spanned;
use peekmore::PeekMoreIterator;

use crate::error::{SassError, SassErrorKind, SassResult};
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::token::Token;
use crate::value::{SassString, Value};

/// Skip whitespace, return whether any was consumed.
pub(crate) fn devour_whitespace<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> bool {
    let mut found = false;
    while let Some(tok) = toks.peek() {
        if tok.kind.is_whitespace() {
            toks.next();
            found = true;
        } else {
            break;
        }
    }
    found
}

/// Skip whitespace and `//`/`/* */` comments.
pub(crate) fn devour_whitespace_or_comment<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<bool> {
    let mut found = devour_whitespace(toks);
    loop {
        if toks.peek().map(|t| t.kind) == Some('/') {
            match toks.peek_nth(1).map(|t| t.kind) {
                Some('/') => {
                    toks.next();
                    toks.next();
                    read_until_newline(toks);
                    found = true;
                }
                Some('*') => {
                    toks.next();
                    toks.next();
                    eat_comment_body(toks);
                    found = true;
                }
                _ => break,
            }
        } else {
            break;
        }
        found |= devour_whitespace(toks);
    }
    Ok(found)
}

pub(crate) fn read_until_newline<I: Iterator<Item = Token>>(toks: &mut PeekMoreIterator<I>) {
    for tok in toks {
        if tok.kind == '\n' {
            break;
        }
    }
}

fn eat_comment_body<I: Iterator<Item = Token>>(toks: &mut PeekMoreIterator<I>) -> String {
    let mut s = String::new();
    let mut prev_star = false;
    for tok in toks {
        if prev_star && tok.kind == '/' {
            break;
        }
        prev_star = tok.kind == '*';
        s.push(tok.kind);
    }
    s
}

/// `/* ... */`, kept verbatim if loud (`/*!`), matching spec §3.3 Comment.
pub(crate) fn eat_comment<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    _scope: &Scope,
    _super_selector: &SelectorList,
) -> SassResult<String> {
    Ok(format!("/*{}*/", eat_comment_body(toks)))
}

pub(crate) fn read_until_open_curly_brace<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> Vec<Token> {
    let mut toks_out = Vec::new();
    let mut depth = 0i32;
    while let Some(tok) = toks.peek() {
        match tok.kind {
            '{' if depth == 0 => break,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
        toks_out.push(toks.next().unwrap());
    }
    toks_out
}

pub(crate) fn read_until_closing_curly_brace<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> Vec<Token> {
    let mut toks_out = Vec::new();
    let mut nesting = 0u32;
    while let Some(tok) = toks.peek() {
        match tok.kind {
            '{' => nesting += 1,
            '}' => {
                if nesting == 0 {
                    break;
                }
                nesting -= 1;
            }
            _ => {}
        }
        toks_out.push(toks.next().unwrap());
    }
    toks_out
}

pub(crate) fn read_until_semicolon_or_closing_curly_brace<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> Vec<Token> {
    let mut toks_out = Vec::new();
    let mut nesting = 0u32;
    while let Some(tok) = toks.peek() {
        match tok.kind {
            '{' => nesting += 1,
            '}' if nesting == 0 => break,
            '}' => nesting -= 1,
            ';' if nesting == 0 => break,
            _ => {}
        }
        toks_out.push(toks.next().unwrap());
    }
    toks_out
}

/// An identifier, splicing any `#{...}` interpolants it contains.
pub(crate) fn eat_ident<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Spanned<String>> {
    let mut s = String::new();
    let start = toks.peek().map(|t| t.pos());
    while let Some(tok) = toks.peek().copied() {
        match tok.kind {
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' => {
                s.push(c);
                toks.next();
            }
            '#' => {
                if toks.peek_nth(1).map(|t| t.kind) == Some('{') {
                    toks.next();
                    toks.next();
                    let interpolation = parse_interpolation(toks, scope, super_selector)?;
                    s.push_str(&interpolation.node.to_css_string(interpolation.span)?);
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    let span = start.unwrap_or_else(codemap::Span::dummy);
    Ok(Spanned { node: s, span })
}

/// An identifier with no interpolation permitted (e.g. immediately after
/// `$` in a variable name).
pub(crate) fn eat_ident_no_interpolation<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<String> {
    let mut s = String::new();
    while let Some(tok) = toks.peek().copied() {
        if tok.kind.is_alphanumeric() || tok.kind == '-' || tok.kind == '_' {
            s.push(tok.kind);
            toks.next();
        } else {
            break;
        }
    }
    Ok(s)
}

/// `#{ ... }`: evaluate the contained expression and splice its
/// stringification (spec §4.4.2, GLOSSARY "Interpolation").
pub(crate) fn parse_interpolation<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Spanned<Value>> {
    let inner = read_until_closing_curly_brace(toks);
    toks.next(); // consume '}'
    crate::eval::from_vec(inner, scope, super_selector)
}

#[derive(Debug, Clone)]
pub(crate) struct VariableDecl {
    pub val: Value,
    pub default: bool,
    pub global: bool,
}

/// Parse the right-hand side of `$x: ...`, stopping at `;`/`}` and
/// stripping any trailing `!default`/`!global` flags.
pub(crate) fn eat_variable_value<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<VariableDecl> {
    let raw = read_until_semicolon_or_closing_curly_brace(toks);
    if toks.peek().map(|t| t.kind) == Some(';') {
        toks.next();
    }
    let (value_toks, default, global) = strip_flags(raw);
    let val = crate::eval::from_vec(value_toks, scope, super_selector)?.node;
    Ok(VariableDecl { val, default, global })
}

fn strip_flags(mut toks: Vec<Token>) -> (Vec<Token>, bool, bool) {
    let mut default = false;
    let mut global = false;
    loop {
        let text: String = {
            let trimmed_len = toks
                .iter()
                .rev()
                .take_while(|t| t.kind.is_whitespace())
                .count();
            toks.truncate(toks.len() - trimmed_len);
            String::new()
        };
        let _ = text;
        let word = trailing_word(&toks);
        match word.to_ascii_lowercase().as_str() {
            "default" if has_bang_before(&toks, word.len()) => {
                default = true;
                remove_bang_word(&mut toks, word.len());
            }
            "global" if has_bang_before(&toks, word.len()) => {
                global = true;
                remove_bang_word(&mut toks, word.len());
            }
            _ => break,
        }
    }
    (toks, default, global)
}

fn trailing_word(toks: &[Token]) -> String {
    toks.iter()
        .rev()
        .take_while(|t| t.kind.is_alphanumeric())
        .map(|t| t.kind)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

fn has_bang_before(toks: &[Token], word_len: usize) -> bool {
    let mut idx = toks.len().saturating_sub(word_len);
    while idx > 0 && toks[idx - 1].kind.is_whitespace() {
        idx -= 1;
    }
    idx > 0 && toks[idx - 1].kind == '!'
}

fn remove_bang_word(toks: &mut Vec<Token>, word_len: usize) {
    toks.truncate(toks.len() - word_len);
    while toks.last().map(|t| t.kind.is_whitespace()) == Some(true) {
        toks.pop();
    }
    if toks.last().map(|t| t.kind) == Some('!') {
        toks.pop();
    }
    while toks.last().map(|t| t.kind.is_whitespace()) == Some(true) {
        toks.pop();
    }
}

/// `"..."`/`'...'`, splicing interpolants, matching spec §3.2 Quoted
/// String.
pub(crate) fn parse_quoted_string<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    quote: char,
    super_selector: &SelectorList,
) -> SassResult<Spanned<Value>> {
    let mut text = String::new();
    let start = toks.peek().map(|t| t.pos());
    loop {
        match toks.next() {
            Some(tok) if tok.kind == quote => break,
            Some(tok) if tok.kind == '\\' => {
                if let Some(escaped) = toks.next() {
                    text.push(escaped.kind);
                }
            }
            Some(tok) if tok.kind == '#' => {
                if toks.peek().map(|t| t.kind) == Some('{') {
                    toks.next();
                    let interpolation = parse_interpolation(toks, scope, super_selector)?;
                    text.push_str(&interpolation.node.to_css_string(interpolation.span)?);
                } else {
                    text.push('#');
                }
            }
            Some(tok) => text.push(tok.kind),
            None => {
                return Err(SassError::new(
                    SassErrorKind::SyntaxError("Expected closing quote.".to_string()),
                    start.unwrap_or_else(codemap::Span::dummy),
                ))
            }
        }
    }
    let span = start.unwrap_or_else(codemap::Span::dummy);
    let kind = if quote == '\'' {
        crate::common::QuoteKind::Single
    } else {
        crate::common::QuoteKind::Double
    };
    Ok(Spanned {
        node: Value::String(SassString::Quoted { text, quote: kind }),
        span,
    })
}
