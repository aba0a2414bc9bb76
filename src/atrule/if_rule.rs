//! `@if`/`@else if`/`@else` (spec §4.6): conditions and bodies are kept as
//! raw tokens and only evaluated once the branch is actually taken, since
//! they may reference a mixin/function's bound arguments.

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::SassResult;
use crate::exec::{self, ContentBlock, Flow};
use crate::extend::SubsetMap;
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::utils::{
    devour_whitespace, devour_whitespace_or_comment, eat_ident, read_until_closing_curly_brace,
    read_until_open_curly_brace,
};

#[derive(Debug, Clone)]
pub(crate) struct Branch {
    pub cond: Vec<Token>,
    pub toks: Vec<Token>,
}

impl Branch {
    pub fn new(cond: Vec<Token>, toks: Vec<Token>) -> Branch {
        Branch { cond, toks }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct If {
    pub branches: Vec<Branch>,
    pub else_: Vec<Token>,
}

impl If {
    /// Parses starting just after `@if`; consumes every trailing
    /// `@else`/`@else if` clause greedily.
    pub fn from_tokens<I: Iterator<Item = Token>>(
        toks: &mut PeekMoreIterator<I>,
    ) -> SassResult<If> {
        devour_whitespace_or_comment(toks)?;
        let mut branches = Vec::new();
        let init_cond = read_until_open_curly_brace(toks);
        toks.next();
        devour_whitespace_or_comment(toks)?;
        let init_toks = read_until_closing_curly_brace(toks);
        toks.next();
        devour_whitespace(toks);

        branches.push(Branch::new(init_cond, init_toks));

        let mut else_ = Vec::new();

        loop {
            let Some(at) = toks.peek().copied() else {
                break;
            };
            if at.kind != '@' {
                break;
            }
            let next_is_else = matches!(toks.peek_nth(1).map(|t| t.kind), Some('e') | Some('E'));
            if !next_is_else {
                break;
            }
            toks.next();
            let kw = eat_ident(toks, &Scope::new_global(), &SelectorList::new())?;
            if kw.node.to_ascii_lowercase() != "else" {
                break;
            }
            devour_whitespace(toks);
            let is_if = {
                let save0 = toks.peek().map(|t| t.kind.to_ascii_lowercase());
                let save1 = toks.peek_nth(1).map(|t| t.kind.to_ascii_lowercase());
                save0 == Some('i') && save1 == Some('f')
            };
            if is_if {
                toks.next();
                toks.next();
                devour_whitespace(toks);
                let cond = read_until_open_curly_brace(toks);
                toks.next();
                devour_whitespace(toks);
                let body = read_until_closing_curly_brace(toks);
                toks.next();
                devour_whitespace(toks);
                branches.push(Branch::new(cond, body));
            } else if toks.peek().map(|t| t.kind) == Some('{') {
                toks.next();
                else_ = read_until_closing_curly_brace(toks);
                toks.next();
                break;
            } else {
                let span = toks.peek().map(|t| t.pos()).unwrap_or_else(codemap::Span::dummy);
                return Err(("expected \"{\".", span).into());
            }
        }
        devour_whitespace(toks);

        Ok(If { branches, else_ })
    }

    /// Evaluates conditions in order against `scope`/`super_selector`,
    /// executing the first truthy branch's body (or the trailing `@else`)
    /// and appending the results to `out`.
    #[allow(clippy::too_many_arguments)]
    pub fn eval(
        self,
        scope: &mut Scope,
        super_selector: &SelectorList,
        extends: &mut SubsetMap,
        content: Option<&ContentBlock>,
        in_function: bool,
        depth: u32,
        out: &mut Vec<Stmt>,
        root_out: &mut Vec<Stmt>,
    ) -> SassResult<Flow> {
        let mut taken: Option<Vec<Token>> = None;
        for branch in self.branches {
            let val = crate::eval::from_vec(branch.cond, scope, super_selector)?;
            if val.node.is_truthy() {
                taken = Some(branch.toks);
                break;
            }
        }
        let body = taken.unwrap_or(self.else_);
        let mut iter = body.into_iter().peekmore();
        exec::exec_stmts(
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
}
