//! The environment (spec §3.5): a stack of lexically nested scopes
//! mapping names to variables, mixins and functions.
//!
//! A [`Scope`] is a cheap handle (`Rc`-backed) onto its own bindings plus
//! an owning reference to its lexical parent. Cloning a `Scope` handle
//! shares the same bindings (so a mixin/function closure that captures its
//! defining scope still observes later writes to it, matching Sass's
//! lookup-at-call-time semantics); [`Scope::child`] creates a genuinely
//! new, empty scope one level deeper.

use std::cell::RefCell;
use std::rc::Rc;

use crate::atrule::function::Function;
use crate::atrule::mixin::Mixin;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root scope of a compilation.
    Global,
    /// A mixin or function body: only visible to lexical lookup as an
    /// ordinary link in the chain.
    Lexical,
    /// `@if`/`@each`/`@for`/`@while` bodies: transparent to `!default` and
    /// to plain assignment (spec §3.5) — writes to an already-declared
    /// outer variable pass through it rather than shadowing.
    Block,
}

#[derive(Debug, Default)]
struct ScopeData {
    vars: Vec<(String, Value)>,
    mixins: Vec<(String, Rc<Mixin>)>,
    functions: Vec<(String, Rc<Function>)>,
}

#[derive(Debug, Clone)]
pub struct Scope {
    data: Rc<RefCell<ScopeData>>,
    parent: Option<Rc<Scope>>,
    pub kind: ScopeKind,
}

impl Scope {
    pub fn new_global() -> Self {
        Scope {
            data: Rc::new(RefCell::new(ScopeData::default())),
            parent: None,
            kind: ScopeKind::Global,
        }
    }

    #[must_use]
    pub fn child(&self, kind: ScopeKind) -> Self {
        Scope {
            data: Rc::new(RefCell::new(ScopeData::default())),
            parent: Some(Rc::new(self.clone())),
            kind,
        }
    }

    /// A new lexical scope whose parent is `defining`, used to evaluate a
    /// mixin/function body against the environment it closed over rather
    /// than the caller's (spec §4.5 `@include`/`@content` note).
    #[must_use]
    pub fn call_scope(defining: &Scope) -> Self {
        defining.child(ScopeKind::Lexical)
    }

    fn root(&self) -> Scope {
        let mut cur = self.clone();
        while let Some(p) = cur.parent.clone() {
            cur = (*p).clone();
        }
        cur
    }

    fn nearest_non_block(&self) -> Scope {
        let mut cur = self.clone();
        while cur.kind == ScopeKind::Block {
            match cur.parent.clone() {
                Some(p) => cur = (*p).clone(),
                None => break,
            }
        }
        cur
    }

    // -- variables ------------------------------------------------------

    /// Local lookup: this scope only.
    pub fn get_var_local(&self, name: &str) -> Option<Value> {
        self.data
            .borrow()
            .vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Lexical lookup: walk this scope and every parent (spec §3.5).
    pub fn get_var(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.get_var_local(name) {
            return Some(v);
        }
        self.parent.as_ref().and_then(|p| p.get_var(name))
    }

    /// Global lookup: root scope only.
    pub fn get_var_global(&self, name: &str) -> Option<Value> {
        self.root().get_var_local(name)
    }

    pub fn var_exists(&self, name: &str) -> bool {
        self.get_var(name).is_some()
    }

    pub fn global_var_exists(&self, name: &str) -> bool {
        self.get_var_global(name).is_some()
    }

    fn set_local(&self, name: &str, value: Value) -> bool {
        let mut data = self.data.borrow_mut();
        for (n, v) in &mut data.vars {
            if n == name {
                *v = value;
                return true;
            }
        }
        false
    }

    fn set_existing(&self, name: &str, value: Value) -> bool {
        let mut cur = self.clone();
        loop {
            if cur.set_local(name, value.clone()) {
                return true;
            }
            match cur.parent.clone() {
                Some(p) => cur = (*p).clone(),
                None => return false,
            }
        }
    }

    /// Plain `$x: value` assignment: overwrite wherever the variable is
    /// already bound in the chain, else declare in the nearest non-`Block`
    /// scope (spec §3.5).
    pub fn assign(&self, name: &str, value: Value) {
        if self.set_existing(name, value.clone()) {
            return;
        }
        let target = self.nearest_non_block();
        target.data.borrow_mut().vars.push((name.to_string(), value));
    }

    /// `$x: value !global`: assigns to the root scope.
    pub fn assign_global(&self, name: &str, value: Value) {
        let root = self.root();
        if !root.set_local(name, value.clone()) {
            root.data.borrow_mut().vars.push((name.to_string(), value));
        }
    }

    /// `$x: value !default`: assigns only if the variable is currently
    /// undefined or null in the chosen scope (spec §3.5). `global` mirrors
    /// a simultaneous `!global` flag.
    pub fn assign_default(&self, name: &str, value: Value, global: bool) {
        let current = if global {
            self.get_var_global(name)
        } else {
            self.get_var(name)
        };
        let should_assign = matches!(current, None | Some(Value::Null));
        if !should_assign {
            return;
        }
        if global {
            self.assign_global(name, value);
        } else {
            self.assign(name, value);
        }
    }

    // -- mixins -----------------------------------------------------------

    pub fn insert_mixin(&self, name: &str, mixin: Mixin) {
        self.data
            .borrow_mut()
            .mixins
            .push((name.to_string(), Rc::new(mixin)));
    }

    pub fn get_mixin(&self, name: &str) -> Option<Rc<Mixin>> {
        if let Some(m) = self
            .data
            .borrow()
            .mixins
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, m)| Rc::clone(m))
        {
            return Some(m);
        }
        self.parent.as_ref().and_then(|p| p.get_mixin(name))
    }

    pub fn mixin_exists(&self, name: &str) -> bool {
        self.get_mixin(name).is_some()
    }

    // -- functions --------------------------------------------------------

    pub fn insert_fn(&self, name: &str, func: Function) {
        self.data
            .borrow_mut()
            .functions
            .push((name.to_string(), Rc::new(func)));
    }

    pub fn get_fn(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(f) = self
            .data
            .borrow()
            .functions
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, f)| Rc::clone(f))
        {
            return Some(f);
        }
        self.parent.as_ref().and_then(|p| p.get_fn(name))
    }

    pub fn function_exists(&self, name: &str) -> bool {
        self.get_fn(name).is_some()
    }
}
