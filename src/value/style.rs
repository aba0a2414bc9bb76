//! A single CSS declaration: `property: value;` (spec §3.3).

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::SassResult;
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::token::Token;
use crate::utils::{devour_whitespace, eat_ident, parse_interpolation};
use crate::value::Value;

#[derive(Debug, Clone)]
pub(crate) struct Style {
    pub property: String,
    pub value: Value,
}

impl Style {
    /// `property` has already been split off by the caller; `toks` holds
    /// everything up to (but not including) the terminating `;`/`}`.
    pub fn from_tokens(
        property: String,
        toks: Vec<Token>,
        scope: &Scope,
        super_selector: &SelectorList,
    ) -> SassResult<Style> {
        let spanned = crate::eval::from_vec(toks, scope, super_selector)?;
        Ok(Style {
            property,
            value: spanned.node,
        })
    }

    /// Splice interpolation into a property name the way the rest of the
    /// declaration grammar does (`#{$prop}: red;`).
    pub fn eat_property<I: Iterator<Item = Token>>(
        toks: &mut PeekMoreIterator<I>,
        scope: &Scope,
        super_selector: &SelectorList,
    ) -> SassResult<String> {
        let mut property = String::new();
        loop {
            match toks.peek().map(|t| t.kind) {
                None => break,
                Some(':') => break,
                Some('#') if toks.peek_nth(1).map(|t| t.kind) == Some('{') => {
                    toks.next();
                    toks.next();
                    let interpolation = parse_interpolation(toks, scope, super_selector)?;
                    property.push_str(&interpolation.node.to_css_string(interpolation.span)?);
                }
                Some(c) if c.is_whitespace() => {
                    devour_whitespace(toks);
                    if !property.is_empty() && toks.peek().map(|t| t.kind) != Some(':') {
                        property.push(' ');
                    }
                }
                _ => {
                    let ident = eat_ident(toks, scope, super_selector)?;
                    property.push_str(&ident.node);
                }
            }
        }
        Ok(property)
    }

    pub fn to_css_string(&self, span: codemap::Span) -> SassResult<Option<String>> {
        if self.value.is_null() {
            return Ok(None);
        }
        Ok(Some(format!(
            "{}: {};",
            self.property,
            self.value.to_css_string(span)?
        )))
    }
}
