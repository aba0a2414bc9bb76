//! `@function`/`@return` (spec §4.5): a named expression-producing block,
//! closed over its defining scope like [`crate::atrule::mixin::Mixin`].

use codemap::Span;
use peekmore::PeekMore;

use crate::args::{CallArgs, FuncArgs};
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::exec::{self, Flow};
use crate::extend::{SubsetMap, EXTEND_ITERATION_LIMIT};
use crate::scope::{Scope, ScopeKind};
use crate::selector::SelectorList;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, Clone)]
pub(crate) struct Function {
    name: String,
    defining_scope: Scope,
    args: FuncArgs,
    body: Vec<Token>,
    span: Span,
}

impl Function {
    pub fn new(
        name: String,
        defining_scope: Scope,
        args: FuncArgs,
        body: Vec<Token>,
        span: Span,
    ) -> Self {
        Function {
            name,
            defining_scope,
            args,
            body,
            span,
        }
    }

    /// `_scope`/`super_selector` are the call site's; a user function body
    /// may not nest style rules (spec §4.5), so only `super_selector` ever
    /// matters, and only to the extent a default-argument expression reads
    /// `&`. Kept for symmetry with [`crate::atrule::mixin::Mixin::call`].
    pub fn call(
        &self,
        call_args: CallArgs,
        _scope: &Scope,
        super_selector: &SelectorList,
        span: Span,
    ) -> SassResult<Value> {
        let mut call_scope = self.defining_scope.child(ScopeKind::Lexical);
        let bound = crate::args::bind(
            &self.args,
            call_args,
            |default| {
                crate::eval::from_vec(default.to_vec(), &call_scope, super_selector).map(|v| v.node)
            },
            span,
        )?;
        for (name, value) in bound {
            call_scope.assign(&name, value);
        }

        let mut toks = self.body.clone().into_iter().peekmore();
        let mut discard = Vec::new();
        let mut discard_root = Vec::new();
        // A function body can't nest style rules, so any `@extend` inside
        // one is meaningless; give it a throwaway map rather than thread
        // the caller's through.
        let mut local_extends = SubsetMap::new(EXTEND_ITERATION_LIMIT);
        match exec::exec_stmts(
            &mut toks,
            &mut call_scope,
            super_selector,
            &mut local_extends,
            None,
            true,
            0,
            &mut discard,
            &mut discard_root,
        )? {
            Flow::Return(v) => Ok(v),
            Flow::Continue => Err(SassError::new(
                SassErrorKind::InvalidSass(format!(
                    "Function \"{}\" finished without @return.",
                    self.name
                )),
                self.span,
            )),
        }
    }
}
