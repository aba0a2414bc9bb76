//! The CSS-tree node produced by evaluation (spec §3.3). Unlike the
//! SassScript expression grammar, statements are not re-evaluated once
//! built: by the time a [`Stmt`] exists its selector has been resolved
//! and its declaration values have been computed.

use crate::selector::SelectorList;
use crate::value::style::Style;

#[derive(Debug, Clone)]
pub(crate) enum Stmt {
    RuleSet {
        selector: SelectorList,
        body: Vec<Stmt>,
    },
    Style(Style),
    Comment(String),
    Media {
        query: String,
        body: Vec<Stmt>,
    },
    Supports {
        query: String,
        body: Vec<Stmt>,
    },
    UnknownAtRule {
        name: String,
        params: String,
        body: Vec<Stmt>,
    },
}
