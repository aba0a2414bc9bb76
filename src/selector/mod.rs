//! Selector data model (spec §3.4): simple, compound, complex, selector
//! list. The selector algebra (parent resolution, unification, weaving,
//! superselector) lives in [`algebra`]; the extend engine in
//! [`crate::extend`].

pub(crate) mod algebra;

use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace on a `Type`/`Attribute` simple selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// No namespace written.
    None,
    /// `*|foo`.
    Any,
    /// `ns|foo`.
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeMatcher {
    Equal,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Contains,
}

impl fmt::Display for AttributeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeMatcher::Equal => "=",
            AttributeMatcher::Includes => "~=",
            AttributeMatcher::DashMatch => "|=",
            AttributeMatcher::Prefix => "^=",
            AttributeMatcher::Suffix => "$=",
            AttributeMatcher::Contains => "*=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Simple {
    Type {
        name: String,
        namespace: Namespace,
    },
    Id(String),
    Class(String),
    Attribute {
        name: String,
        namespace: Namespace,
        matcher: Option<(AttributeMatcher, String)>,
        case_insensitive: bool,
    },
    /// `%name` — never produces output on its own (GLOSSARY "Placeholder
    /// selector").
    Placeholder(String),
    /// `&`.
    Parent,
    Pseudo {
        name: String,
        is_element: bool,
        /// Raw textual argument, e.g. the `2n+1` in `:nth-child(2n+1)`.
        argument: Option<String>,
        /// A selector argument, e.g. the `.foo` in `:not(.foo)`.
        selector: Option<Box<SelectorList>>,
    },
}

impl Simple {
    /// Canonical unification order (spec §4.2.2): types/universals first,
    /// then ids, classes, attributes, pseudo-classes, pseudo-elements last.
    fn order_rank(&self) -> u8 {
        match self {
            Simple::Type { .. } => 0,
            Simple::Id(..) => 1,
            Simple::Class(..) | Simple::Placeholder(..) => 2,
            Simple::Attribute { .. } => 3,
            Simple::Pseudo { is_element, .. } => {
                if *is_element {
                    5
                } else {
                    4
                }
            }
            Simple::Parent => 0,
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Simple::Type { name, .. } if name == "*")
    }

    /// Specificity contribution (spec §3.4): ids 256^2, classes/attrs/
    /// pseudo-classes 256, types/pseudo-elements 1. `:not`/`:matches` take
    /// the max specificity of their argument.
    pub fn specificity(&self) -> u32 {
        match self {
            Simple::Id(..) => 256 * 256,
            Simple::Class(..) | Simple::Placeholder(..) | Simple::Attribute { .. } => 256,
            Simple::Pseudo {
                is_element: true, ..
            } => 1,
            Simple::Pseudo {
                name,
                selector: Some(sel),
                ..
            } if name.eq_ignore_ascii_case("not") || name.eq_ignore_ascii_case("matches") => sel
                .components
                .iter()
                .map(ComplexSelector::specificity)
                .max()
                .unwrap_or(0),
            Simple::Pseudo { .. } => 256,
            Simple::Type { .. } | Simple::Parent => 1,
        }
    }
}

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Simple::Type { name, namespace } => write_ns(f, namespace, name),
            Simple::Id(name) => write!(f, "#{name}"),
            Simple::Class(name) => write!(f, ".{name}"),
            Simple::Placeholder(name) => write!(f, "%{name}"),
            Simple::Parent => write!(f, "&"),
            Simple::Attribute {
                name,
                namespace,
                matcher,
                case_insensitive,
            } => {
                f.write_str("[")?;
                write_ns(f, namespace, name)?;
                if let Some((op, val)) = matcher {
                    write!(f, "{op}\"{val}\"")?;
                    if *case_insensitive {
                        f.write_str(" i")?;
                    }
                }
                f.write_str("]")
            }
            Simple::Pseudo {
                name,
                is_element,
                argument,
                selector,
            } => {
                f.write_str(if *is_element { "::" } else { ":" })?;
                f.write_str(name)?;
                if let Some(sel) = selector {
                    write!(f, "({sel})")?;
                } else if let Some(arg) = argument {
                    write!(f, "({arg})")?;
                }
                Ok(())
            }
        }
    }
}

fn write_ns(f: &mut fmt::Formatter<'_>, namespace: &Namespace, name: &str) -> fmt::Result {
    match namespace {
        Namespace::None => {}
        Namespace::Any => f.write_str("*|")?,
        Namespace::Named(n) => write!(f, "{n}|")?,
    }
    f.write_str(name)
}

/// One or more simple selectors applying to the same element (spec §3.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<Simple>,
    /// Distinguishes `&.foo` from `.foo` (spec §3.4).
    pub has_real_parent: bool,
}

impl CompoundSelector {
    pub fn new(simples: Vec<Simple>) -> Self {
        let has_real_parent = simples.iter().any(|s| matches!(s, Simple::Parent));
        CompoundSelector {
            simples,
            has_real_parent,
        }
    }

    pub fn specificity(&self) -> u32 {
        self.simples.iter().map(Simple::specificity).sum()
    }

    pub fn is_placeholder_only(&self) -> bool {
        !self.simples.is_empty()
            && self.simples.iter().all(|s| matches!(s, Simple::Placeholder(..)))
    }

    /// Canonicalized copy (sorted by unification order) used as a
    /// deduplication key; two compounds that unify to the same set are
    /// equal under this ordering regardless of source order.
    pub fn canonical_sort(&mut self) {
        self.simples.sort_by_key(Simple::order_rank);
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.simples {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// Hash ignores order so two compounds built from the same simples in
/// different order probe the same subset-map bucket.
impl Hash for CompoundSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted = self.simples.clone();
        sorted.sort_by_key(Simple::order_rank);
        sorted.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

impl From<Combinator> for crate::common::Combinator {
    fn from(c: Combinator) -> Self {
        match c {
            Combinator::Descendant => crate::common::Combinator::Descendant,
            Combinator::Child => crate::common::Combinator::Child,
            Combinator::NextSibling => crate::common::Combinator::NextSibling,
            Combinator::SubsequentSibling => crate::common::Combinator::SubsequentSibling,
        }
    }
}

/// An item of a [`ComplexSelector`]'s alternating sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexItem {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// Compound selectors joined by combinators (spec §3.4). A leading
/// combinator is permitted in the model (e.g. produced mid-resolution),
/// though a fully resolved selector never emits one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub items: Vec<ComplexItem>,
}

impl ComplexSelector {
    pub fn new(items: Vec<ComplexItem>) -> Self {
        ComplexSelector { items }
    }

    pub fn single(compound: CompoundSelector) -> Self {
        ComplexSelector {
            items: vec![ComplexItem::Compound(compound)],
        }
    }

    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        self.items.iter().filter_map(|i| match i {
            ComplexItem::Compound(c) => Some(c),
            ComplexItem::Combinator(..) => None,
        })
    }

    pub fn last_compound(&self) -> Option<&CompoundSelector> {
        self.compounds().last()
    }

    pub fn contains_parent_ref(&self) -> bool {
        self.compounds().any(|c| c.has_real_parent)
    }

    pub fn specificity(&self) -> u32 {
        self.compounds().map(CompoundSelector::specificity).sum()
    }

    pub fn is_invisible(&self) -> bool {
        self.compounds().all(CompoundSelector::is_placeholder_only)
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            match item {
                ComplexItem::Compound(c) => {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{c}")?;
                }
                ComplexItem::Combinator(comb) => {
                    let s: crate::common::Combinator = (*comb).into();
                    write!(f, "{s}")?;
                }
            }
            first = false;
        }
        Ok(())
    }
}

/// Comma-separated complex selectors (spec §3.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub components: Vec<ComplexSelector>,
    /// `!optional` on `@extend` (spec §3.4).
    pub is_optional: bool,
}

impl SelectorList {
    pub fn new() -> Self {
        SelectorList::default()
    }

    pub fn single(complex: ComplexSelector) -> Self {
        SelectorList {
            components: vec![complex],
            is_optional: false,
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.components.iter().all(ComplexSelector::is_invisible)
    }

    /// Drop any complex selector that is entirely placeholders (spec §4.5.1
    /// output invariant: selectors consisting solely of placeholders are
    /// dropped from output entirely).
    #[must_use]
    pub fn without_placeholders(&self) -> SelectorList {
        SelectorList {
            components: self
                .components
                .iter()
                .filter(|c| !c.is_invisible())
                .cloned()
                .collect(),
            is_optional: self.is_optional,
        }
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strs: Vec<String> = self.components.iter().map(ToString::to_string).collect();
        f.write_str(&strs.join(", "))
    }
}
