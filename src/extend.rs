//! The `@extend` engine (spec §3.6, §4.3): a subset-map from target
//! compound selectors to the complex selectors that extend them, plus the
//! fixed-point rewrite driver.

use std::collections::HashMap;

use codemap::Span;

use crate::error::{SassError, SassErrorKind, SassResult};
use crate::selector::algebra::{is_superselector_complex, unify_compound};
use crate::selector::{CompoundSelector, ComplexItem, ComplexSelector, Simple, SelectorList};

/// One `@extend X` registration: `extender` is the complex selector that
/// should be grafted wherever `target` appears, `is_optional` mirrors
/// `!optional` (spec §3.6).
#[derive(Debug, Clone)]
struct Edge {
    extender: ComplexSelector,
    target: CompoundSelector,
    is_optional: bool,
    satisfied: bool,
}

/// Default fixed-point cap for [`SubsetMap::rewrite`]/[`SubsetMap::rewrite_all`],
/// overridable via `Options::extend_iteration_limit`. Hitting it logs a
/// warning rather than erroring (spec §9 Open Question).
pub(crate) const EXTEND_ITERATION_LIMIT: usize = 1024;

/// Index: every simple selector of a target maps to the edges whose
/// target compound contains it (spec §3.6: "implementation may index by
/// each simple selector instead and filter at query time").
#[derive(Debug, Clone, Default)]
pub struct SubsetMap {
    by_simple: HashMap<Simple, Vec<usize>>,
    edges: Vec<Edge>,
    iteration_limit: usize,
}

impl SubsetMap {
    pub fn new(iteration_limit: usize) -> Self {
        SubsetMap {
            by_simple: HashMap::new(),
            edges: Vec::new(),
            iteration_limit,
        }
    }

    /// Build phase (spec §4.3): register `extender` as extending `target`.
    pub fn add_extend(&mut self, extender: ComplexSelector, target: CompoundSelector, is_optional: bool) {
        let idx = self.edges.len();
        self.edges.push(Edge {
            extender,
            target: target.clone(),
            is_optional,
            satisfied: false,
        });
        for simple in &target.simples {
            self.by_simple.entry(simple.clone()).or_default().push(idx);
        }
    }

    fn edges_matching(&self, compound: &CompoundSelector) -> Vec<&Edge> {
        let mut seen = Vec::new();
        for simple in &compound.simples {
            if let Some(indices) = self.by_simple.get(simple) {
                for &i in indices {
                    if !seen.contains(&i) && is_target_subset(&self.edges[i].target, compound) {
                        seen.push(i);
                    }
                }
            }
        }
        seen.into_iter().map(|i| &self.edges[i]).collect()
    }

    /// Apply phase (spec §4.3): rewrite `list` so every selector extending
    /// a target is grafted onto every selector of that target, iterating
    /// to a fixed point.
    pub fn rewrite(&mut self, list: &SelectorList, span: Span) -> SassResult<SelectorList> {
        let result = self.rewrite_unchecked(list);
        self.mark_satisfied(&result);
        self.check_unsatisfied(span)?;
        Ok(result)
    }

    /// Rewrite every selector list in a document against this map, then
    /// check satisfaction once the whole document has had a chance to
    /// match (spec §4.3: a target may appear in a rule seen later than
    /// its `@extend`).
    pub fn rewrite_all(&mut self, lists: Vec<SelectorList>, span: Span) -> SassResult<Vec<SelectorList>> {
        let rewritten: Vec<SelectorList> = lists.iter().map(|l| self.rewrite_unchecked(l)).collect();
        for r in &rewritten {
            self.mark_satisfied(r);
        }
        self.check_unsatisfied(span)?;
        Ok(rewritten)
    }

    fn rewrite_unchecked(&mut self, list: &SelectorList) -> SelectorList {
        let mut result = list.clone();
        let mut applied: Vec<(String, String)> = Vec::new();
        let mut exhausted = true;

        for _ in 0..self.iteration_limit {
            let mut changed = false;
            let mut next_components = Vec::new();

            for complex in &result.components {
                let mut seed = vec![complex.clone()];
                for (pos, item) in complex.items.iter().enumerate() {
                    let ComplexItem::Compound(compound) = item else {
                        continue;
                    };
                    for edge in self.edges_matching(compound) {
                        let key = (edge.extender.to_string(), compound.to_string());
                        if applied.contains(&key) {
                            continue;
                        }
                        let remainder = subtract(compound, &edge.target);
                        let extender_last = edge.extender.last_compound().cloned().unwrap_or_else(|| remainder.clone());
                        let Some(unified) = unify_compound(&remainder, &extender_last) else {
                            continue;
                        };
                        let mut grafted_items = complex.items.clone();
                        if edge.extender.items.len() <= 1 {
                            grafted_items[pos] = ComplexItem::Compound(unified);
                        } else {
                            // Splice the extender's ancestor chain in ahead of the
                            // matched compound (spec §4.3: "weave into S's position").
                            let prefix = edge.extender.items[..edge.extender.items.len() - 1].to_vec();
                            grafted_items.splice(
                                pos..=pos,
                                prefix.into_iter().chain(std::iter::once(ComplexItem::Compound(unified))),
                            );
                        }
                        let grafted = ComplexSelector::new(grafted_items);
                        if !seed.contains(&grafted) {
                            seed.push(grafted);
                            applied.push(key);
                            changed = true;
                        }
                    }
                }
                next_components.extend(seed);
            }

            dedupe_dominated(&mut next_components);
            result.components = next_components;

            if !changed {
                exhausted = false;
                break;
            }
        }

        if exhausted {
            log::warn!(
                "@extend fixed-point rewrite did not converge within {} iterations; \
                 result may be incomplete for \"{}\"",
                self.iteration_limit,
                list,
            );
        }

        result
    }

    fn mark_satisfied(&mut self, result: &SelectorList) {
        for edge in &mut self.edges {
            if edge.satisfied {
                continue;
            }
            edge.satisfied = result
                .components
                .iter()
                .any(|c| c.compounds().any(|c2| is_superselector_complex(&edge.extender, &ComplexSelector::single(c2.clone()))));
        }
    }

    /// Optional (`!optional`) extends that match nothing do not error;
    /// non-optional extends that match nothing fail with
    /// `UnsatisfiedExtend` (spec §4.3).
    fn check_unsatisfied(&self, span: Span) -> SassResult<()> {
        for edge in &self.edges {
            if !edge.is_optional && !edge.satisfied {
                return Err(SassError::new(
                    SassErrorKind::UnsatisfiedExtend(format!(
                        "The target selector was not found in the document: {}",
                        edge.target
                    )),
                    span,
                ));
            }
        }
        Ok(())
    }
}

/// Whether every simple selector of `target` appears in `compound` (the
/// "subset" query of spec §3.6).
fn is_target_subset(target: &CompoundSelector, compound: &CompoundSelector) -> bool {
    target.simples.iter().all(|s| compound.simples.contains(s))
}

/// `K \ T`: the simples of `compound` with `target`'s simples removed,
/// ready to be unified with the extender's trailing compound (spec §4.3
/// pseudocode `K \ T`).
fn subtract(compound: &CompoundSelector, target: &CompoundSelector) -> CompoundSelector {
    let simples = compound
        .simples
        .iter()
        .filter(|s| !target.simples.contains(s))
        .cloned()
        .collect();
    CompoundSelector::new(simples)
}

/// Remove complex selectors that are superselectors of (dominated by) a
/// different selector already in the list — de-duplication is both an
/// equality filter and a domination filter, which is how the fixed point
/// in spec §4.3 terminates despite extenders matching other targets.
fn dedupe_dominated(components: &mut Vec<ComplexSelector>) {
    let mut kept: Vec<ComplexSelector> = Vec::with_capacity(components.len());
    'outer: for candidate in components.drain(..) {
        for existing in &kept {
            if existing == &candidate {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }
    *components = kept;
}
