//! Any `@`-rule this crate doesn't special-case (`@font-face`,
//! `@keyframes`, `@page`, vendor at-rules, ...) round-trips as an opaque
//! name plus parameter text, with `#{}` interpolation spliced into the
//! parameters the way a property name splices it (spec §4.7).

use peekmore::PeekMoreIterator;

use crate::error::SassResult;
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::token::Token;
use crate::utils::{devour_whitespace, parse_interpolation};

/// Reads up to (not including) the terminating `{` or `;`, returning the
/// trimmed parameter text and whether a block follows.
pub(crate) fn parse_unknown_params<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<(String, bool)> {
    let mut params = String::new();
    let has_block = loop {
        match toks.peek().map(|t| t.kind) {
            None | Some(';') => {
                toks.next();
                break false;
            }
            Some('{') => {
                toks.next();
                break true;
            }
            Some('#') if toks.peek_nth(1).map(|t| t.kind) == Some('{') => {
                toks.next();
                toks.next();
                let interpolation = parse_interpolation(toks, scope, super_selector)?;
                params.push_str(&interpolation.node.to_css_string(interpolation.span)?);
            }
            Some(c) if c.is_whitespace() => {
                devour_whitespace(toks);
                if !params.is_empty() {
                    params.push(' ');
                }
            }
            Some(c) => {
                params.push(c);
                toks.next();
            }
        }
    };
    Ok((params.trim().to_string(), has_block))
}
