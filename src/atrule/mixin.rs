//! `@mixin`/`@include` (spec §4.5): a named, re-usable block of statements
//! closed over its defining scope, with an optional `@content` slot.

use codemap::Span;
use peekmore::PeekMore;

use crate::args::{CallArgs, FuncArgs};
use crate::error::SassResult;
use crate::exec::{self, ContentBlock};
use crate::extend::SubsetMap;
use crate::scope::{Scope, ScopeKind};
use crate::selector::SelectorList;
use crate::stmt::Stmt;
use crate::token::Token;

#[derive(Debug, Clone)]
pub(crate) struct Mixin {
    defining_scope: Scope,
    args: FuncArgs,
    body: Vec<Token>,
    span: Span,
}

impl Mixin {
    pub fn new(defining_scope: Scope, args: FuncArgs, body: Vec<Token>, span: Span) -> Self {
        Mixin {
            defining_scope,
            args,
            body,
            span,
        }
    }

    /// Bind `call_args` and run the body, appending resulting statements
    /// to `out`. `content` is the (body, capturing scope) of an
    /// `@include ... { ... }` block, threaded through for `@content`.
    #[allow(clippy::too_many_arguments)]
    pub fn call(
        &self,
        call_args: CallArgs,
        content: Option<ContentBlock>,
        super_selector: &SelectorList,
        extends: &mut SubsetMap,
        depth: u32,
        out: &mut Vec<Stmt>,
        root_out: &mut Vec<Stmt>,
        span: Span,
    ) -> SassResult<()> {
        let mut call_scope = self.defining_scope.child(ScopeKind::Lexical);
        let bound = crate::args::bind(
            &self.args,
            call_args,
            |default| crate::eval::from_vec(default.to_vec(), &call_scope, super_selector).map(|v| v.node),
            span,
        )?;
        for (name, value) in bound {
            call_scope.assign(&name, value);
        }
        call_scope.assign(
            crate::builtin::introspection::CONTENT_EXISTS_VAR,
            crate::value::Value::Bool(content.is_some()),
        );

        let mut toks = self.body.clone().into_iter().peekmore();
        let flow = exec::exec_stmts(
            &mut toks,
            &mut call_scope,
            super_selector,
            extends,
            content.as_ref(),
            false,
            depth,
            out,
            root_out,
        )?;
        debug_assert!(matches!(flow, exec::Flow::Continue), "@return outside function");
        let _ = self.span;
        Ok(())
    }
}
