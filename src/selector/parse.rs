//! Selector literal parsing: turns the raw token text written after a
//! rule (or an `@extend`/`@at-root` argument) into a [`SelectorList`],
//! splicing interpolation before the simple-selector grammar runs.

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{SassError, SassErrorKind, SassResult};
use crate::scope::Scope;
use crate::selector::{
    AttributeMatcher, Combinator, CompoundSelector, ComplexItem, ComplexSelector, Namespace,
    Simple, SelectorList,
};
use crate::token::Token;
use crate::utils::{devour_whitespace, eat_ident, eat_ident_no_interpolation};

/// Parse a selector list, with `#{}` interpolation already spliced by
/// flattening through [`crate::utils::parse_interpolation`] (spec §3.4
/// "selectors may contain interpolation").
pub(crate) fn parse_selector_list(
    toks: Vec<Token>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<SelectorList> {
    let spliced = splice_interpolation(toks, scope, super_selector)?;
    let mut iter = spliced.into_iter().peekmore();
    let mut components = Vec::new();
    loop {
        devour_whitespace(&mut iter);
        if iter.peek().is_none() {
            break;
        }
        components.push(parse_complex(&mut iter)?);
        devour_whitespace(&mut iter);
        match iter.peek().map(|t| t.kind) {
            Some(',') => {
                iter.next();
            }
            _ => break,
        }
    }
    Ok(SelectorList {
        components,
        is_optional: false,
    })
}

fn splice_interpolation(
    toks: Vec<Token>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<Vec<Token>> {
    if !toks.iter().any(|t| t.kind == '#') {
        return Ok(toks);
    }
    let mut iter = toks.into_iter().peekmore();
    let mut out = Vec::new();
    while let Some(tok) = iter.next() {
        if tok.kind == '#' && iter.peek().map(|t| t.kind) == Some('{') {
            iter.next();
            let interpolation = crate::utils::parse_interpolation(&mut iter, scope, super_selector)?;
            let text = interpolation.node.to_css_string(interpolation.span)?;
            for c in text.chars() {
                out.push(Token::new(c, interpolation.span));
            }
        } else {
            out.push(tok);
        }
    }
    Ok(out)
}

fn parse_complex<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<ComplexSelector> {
    let mut items = Vec::new();
    loop {
        devour_whitespace(toks);
        match toks.peek().map(|t| t.kind) {
            None | Some(',') => break,
            Some('>') => {
                toks.next();
                devour_whitespace(toks);
                items.push(ComplexItem::Combinator(Combinator::Child));
            }
            Some('+') => {
                toks.next();
                devour_whitespace(toks);
                items.push(ComplexItem::Combinator(Combinator::NextSibling));
            }
            Some('~') => {
                toks.next();
                devour_whitespace(toks);
                items.push(ComplexItem::Combinator(Combinator::SubsequentSibling));
            }
            _ => {
                let had_descendant_space = matches!(
                    items.last(),
                    Some(ComplexItem::Compound(..))
                );
                if had_descendant_space {
                    items.push(ComplexItem::Combinator(Combinator::Descendant));
                }
                items.push(ComplexItem::Compound(parse_compound(toks)?));
            }
        }
    }
    Ok(ComplexSelector::new(items))
}

fn parse_compound<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<CompoundSelector> {
    let mut simples = Vec::new();
    loop {
        match toks.peek().map(|t| t.kind) {
            Some('&') => {
                toks.next();
                simples.push(Simple::Parent);
            }
            Some('*') => {
                toks.next();
                simples.push(Simple::Type {
                    name: "*".to_string(),
                    namespace: Namespace::None,
                });
            }
            Some('.') => {
                toks.next();
                let name = eat_ident_no_interpolation(toks)?;
                simples.push(Simple::Class(name));
            }
            Some('#') => {
                toks.next();
                let name = eat_ident_no_interpolation(toks)?;
                simples.push(Simple::Id(name));
            }
            Some('%') => {
                toks.next();
                let name = eat_ident_no_interpolation(toks)?;
                simples.push(Simple::Placeholder(name));
            }
            Some('[') => {
                toks.next();
                simples.push(parse_attribute(toks)?);
            }
            Some(':') => {
                simples.push(parse_pseudo(toks)?);
            }
            Some(c) if c.is_alphabetic() || c == '_' || c == '-' || c == '\\' => {
                let name = eat_ident_no_interpolation(toks)?;
                simples.push(Simple::Type {
                    name,
                    namespace: Namespace::None,
                });
            }
            _ => break,
        }
        if matches!(toks.peek().map(|t| t.kind), None | Some(' ') | Some('\t') | Some('\n') | Some(',') | Some('>') | Some('+') | Some('~')) {
            break;
        }
    }
    if simples.is_empty() {
        return Err(no_selector_error(toks));
    }
    Ok(CompoundSelector::new(simples))
}

fn no_selector_error<I: Iterator<Item = Token>>(toks: &mut PeekMoreIterator<I>) -> SassError {
    let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
    SassError::new(
        SassErrorKind::SyntaxError("Expected selector.".to_string()),
        span,
    )
}

fn parse_attribute<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
) -> SassResult<Simple> {
    devour_whitespace(toks);
    let name = eat_ident_no_interpolation(toks)?;
    devour_whitespace(toks);
    let matcher = match toks.peek().map(|t| t.kind) {
        Some(']') => None,
        Some(c) => {
            let op = match c {
                '=' => {
                    toks.next();
                    AttributeMatcher::Equal
                }
                '~' => {
                    toks.next();
                    toks.next();
                    AttributeMatcher::Includes
                }
                '|' => {
                    toks.next();
                    toks.next();
                    AttributeMatcher::DashMatch
                }
                '^' => {
                    toks.next();
                    toks.next();
                    AttributeMatcher::Prefix
                }
                '$' => {
                    toks.next();
                    toks.next();
                    AttributeMatcher::Suffix
                }
                '*' => {
                    toks.next();
                    toks.next();
                    AttributeMatcher::Contains
                }
                _ => return Err(no_selector_error(toks)),
            };
            devour_whitespace(toks);
            let value = match toks.peek().map(|t| t.kind) {
                Some(q @ '"') | Some(q @ '\'') => {
                    toks.next();
                    let mut s = String::new();
                    while let Some(t) = toks.next() {
                        if t.kind == q {
                            break;
                        }
                        s.push(t.kind);
                    }
                    s
                }
                _ => eat_ident_no_interpolation(toks)?,
            };
            Some((op, value))
        }
        None => None,
    };
    devour_whitespace(toks);
    let case_insensitive = matches!(toks.peek().map(|t| t.kind), Some('i') | Some('I'))
        && matcher.is_some();
    if case_insensitive {
        toks.next();
        devour_whitespace(toks);
    }
    if toks.peek().map(|t| t.kind) == Some(']') {
        toks.next();
    }
    Ok(Simple::Attribute {
        name,
        namespace: Namespace::None,
        matcher,
        case_insensitive,
    })
}

fn parse_pseudo<I: Iterator<Item = Token>>(toks: &mut PeekMoreIterator<I>) -> SassResult<Simple> {
    toks.next(); // first ':'
    let is_element = if toks.peek().map(|t| t.kind) == Some(':') {
        toks.next();
        true
    } else {
        false
    };
    let name = eat_ident_no_interpolation(toks)?;
    if toks.peek().map(|t| t.kind) != Some('(') {
        return Ok(Simple::Pseudo {
            name,
            is_element,
            argument: None,
            selector: None,
        });
    }
    toks.next();
    let mut depth = 1u32;
    let mut inner = Vec::new();
    while let Some(tok) = toks.next() {
        match tok.kind {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        inner.push(tok);
    }
    if is_selector_argument(&name) {
        let mut iter = inner.into_iter().peekmore();
        let mut components = Vec::new();
        loop {
            devour_whitespace(&mut iter);
            if iter.peek().is_none() {
                break;
            }
            components.push(parse_complex(&mut iter)?);
            devour_whitespace(&mut iter);
            if iter.peek().map(|t| t.kind) == Some(',') {
                iter.next();
            } else {
                break;
            }
        }
        Ok(Simple::Pseudo {
            name,
            is_element,
            argument: None,
            selector: Some(Box::new(SelectorList {
                components,
                is_optional: false,
            })),
        })
    } else {
        let argument: String = inner.iter().map(|t| t.kind).collect();
        Ok(Simple::Pseudo {
            name,
            is_element,
            argument: Some(argument),
            selector: None,
        })
    }
}

/// Pseudo-classes whose argument is itself a selector list (spec §3.4).
fn is_selector_argument(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "not" | "matches" | "is" | "where" | "has" | "current" | "host-context" | "-moz-any" | "slotted"
    )
}

pub(crate) fn eat_ident_interpolated<I: Iterator<Item = Token>>(
    toks: &mut PeekMoreIterator<I>,
    scope: &Scope,
    super_selector: &SelectorList,
) -> SassResult<String> {
    Ok(eat_ident(toks, scope, super_selector)?.node)
}
