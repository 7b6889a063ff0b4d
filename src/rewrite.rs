//! The rewriting system: rule insertion with right-simplification,
//! reduction to normal form, and critical-pair machinery.
//!
//! Rules live in an append-only store; a trie indexed by source term maps
//! each active source to its rule id. The trie is what keeps "no two active
//! rules share a source" cheap to maintain and what makes reduction and
//! overlap enumeration prefix walks instead of store scans.

use crate::error::RewriteError;
use crate::order::compare_terms;
use crate::rule::{Rule, RuleId, RuleStore};
use crate::term::{format_rule, Term};
use crate::trie::Trie;
use crate::types::TypeProperties;
use smallvec::SmallVec;
use std::cmp::Ordering;

#[cfg(feature = "tracing")]
use crate::trace::{debug_span, trace};

/// Two one-step rewritings of the same term, produced by an overlap
/// between two rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPair {
    pub first: Term,
    pub second: Term,
}

impl CriticalPair {
    pub fn new(first: Term, second: Term) -> Self {
        Self { first, second }
    }

    /// A trivial pair rewrites both ways to the same term outright.
    pub fn is_trivial(&self) -> bool {
        self.first == self.second
    }
}

/// A set of oriented rewrite rules with a prefix index over their sources.
#[derive(Debug)]
pub struct RewritingSystem {
    rules: RuleStore,
    index: Trie<RuleId>,
}

impl RewritingSystem {
    /// Create an empty system.
    pub fn new() -> Self {
        Self {
            rules: RuleStore::new(),
            index: Trie::new(),
        }
    }

    /// The underlying rule store.
    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Iterate over `(source, target)` of every active rule.
    pub fn active_rules(&self) -> impl Iterator<Item = (&Term, &Term)> + '_ {
        self.rules.active_ids().map(move |id| {
            let rule = &self.rules[id];
            (rule.source(), rule.target())
        })
    }

    /// Insert a rule, keeping the active set canonical.
    ///
    /// Returns `(true, id)` if a new rule was placed under its source,
    /// `(false, id)` if an equivalent or dominating rule already owned the
    /// source (derived rules may still have been appended to reconcile the
    /// two targets). Fails with `InvalidRule` if the source is not strictly
    /// greater than the target.
    pub fn insert(
        &mut self,
        rule: Rule,
        props: &TypeProperties,
    ) -> Result<(bool, RuleId), RewriteError> {
        // Reconciliation rules discovered along the way are processed with
        // an explicit stack; their outcomes are side effects only.
        let mut pending: SmallVec<[Rule; 4]> = SmallVec::new();
        let outcome = self.insert_step(rule, props, &mut pending)?;
        while let Some(derived) = pending.pop() {
            self.insert_step(derived, props, &mut pending)?;
        }
        Ok(outcome)
    }

    fn insert_step(
        &mut self,
        rule: Rule,
        props: &TypeProperties,
        pending: &mut SmallVec<[Rule; 4]>,
    ) -> Result<(bool, RuleId), RewriteError> {
        if compare_terms(rule.source(), rule.target(), props) != Ordering::Greater {
            return Err(RewriteError::InvalidRule {
                rule: format_rule(rule.source(), rule.target(), props.symbols()),
            });
        }

        let existing = self.index.get(rule.source().symbols());
        let old_id = match existing {
            None => {
                let key = rule.source().clone();
                let id = self.rules.push(rule);
                self.index.insert(key.symbols(), id);
                #[cfg(feature = "tracing")]
                trace!(id = id.raw(), "rule_inserted");
                return Ok((true, id));
            }
            Some(old_id) => old_id,
        };

        let old_target = self.rules[old_id].target().clone();
        match compare_terms(rule.target(), &old_target, props) {
            Ordering::Equal => {
                // Already notionally present.
                Ok((false, old_id))
            }
            Ordering::Greater => {
                // The resident rule is the more reductive one; record how to
                // get from the new target down to the resident target so the
                // new rule stays derivable.
                let (_, target) = rule.into_parts();
                pending.push(Rule::new(target, old_target));
                Ok((false, old_id))
            }
            Ordering::Less => {
                // The new rule is more reductive: retire the resident rule,
                // keep its rewriting recoverable, and take over the source.
                self.rules.get_mut(old_id).mark_right_simplified();
                #[cfg(feature = "tracing")]
                trace!(old = old_id.raw(), "rule_right_simplified");

                let (source, target) = rule.into_parts();
                pending.push(Rule::new(old_target, target.clone()));
                let id = self.rules.push(Rule::new(source.clone(), target));
                self.index.insert(source.symbols(), id);
                #[cfg(feature = "tracing")]
                trace!(id = id.raw(), "rule_inserted");
                Ok((true, id))
            }
        }
    }

    /// Rewrite `term` to its normal form: repeatedly apply the rule whose
    /// source matches at the leftmost position, restarting after each step.
    ///
    /// Terminates because every applied rule strictly shrinks the term
    /// under the shortlex order.
    pub fn reduce(&self, term: &Term) -> Term {
        #[cfg(feature = "tracing")]
        let _span = debug_span!("reduce", ?term).entered();

        let mut current = term.clone();
        'rewrite: loop {
            for at in 0..current.len() {
                if let Some((matched, id)) =
                    self.index.longest_match(&current.symbols()[at..])
                {
                    let target = self.rules[id].target();
                    #[cfg(feature = "tracing")]
                    trace!(rule = id.raw(), position = at, "rewrite_step");
                    current = current.splice(at, matched, target);
                    continue 'rewrite;
                }
            }
            return current;
        }
    }

    /// Enumerate the overlaps involving rule `id` on the left.
    ///
    /// For each position `p` of `id`'s source, walks the index along the
    /// source's suffix. Every payload met on the way is a rule whose source
    /// sits inside `id`'s source at `p` (or shares a boundary with it); if
    /// the whole suffix is consumed, every payload in the subtree below is
    /// a rule whose source extends the suffix. The trivial whole-source
    /// self-overlap `(id, id, 0)` is skipped.
    pub fn for_each_overlap<F>(&self, id: RuleId, mut action: F)
    where
        F: FnMut(RuleId, usize),
    {
        let source = self.rules[id].source();
        for from in 0..source.len() {
            let suffix = &source.symbols()[from..];
            let mut node = self.index.root();
            let mut matched = 0;
            for sym in suffix {
                match self.index.child(node, sym) {
                    Some(next) => node = next,
                    None => break,
                }
                matched += 1;
                if let Some(other) = self.index.payload(node) {
                    if !(other == id && from == 0) {
                        action(other, from);
                    }
                }
            }
            if matched == suffix.len() {
                // Rules whose sources properly extend the suffix; the exact
                // match was already reported by the walk above.
                self.index.subtree_at(node).for_each_payload(|path, other| {
                    if !path.is_empty() {
                        action(other, from);
                    }
                });
            }
        }
    }

    /// Build the critical pair for rules `lhs` and `rhs` overlapping at
    /// `position` within `lhs`'s source.
    pub fn form_critical_pair(&self, lhs: RuleId, rhs: RuleId, position: usize) -> CriticalPair {
        let u1 = self.rules[lhs].source();
        let v1 = self.rules[lhs].target();
        let u2 = self.rules[rhs].source();
        let v2 = self.rules[rhs].target();

        if position + u2.len() <= u1.len() {
            // u1 = x · u2 · z: rewrite the whole of u1, or just the u2 slice.
            let second = u1.splice(position, u2.len(), v2);
            CriticalPair::new(v1.clone(), second)
        } else {
            // u1 = x · y and u2 = y · z share the boundary y = u1[position..].
            let overhang = &u2.symbols()[u1.len() - position..];
            let first = v1.concat_slice(overhang);
            let second = Term::from(&u1.symbols()[..position]).concat(v2);
            CriticalPair::new(first, second)
        }
    }

    /// Resolve a critical pair: reduce both sides and, if their normal
    /// forms differ, insert the rule orienting the larger toward the
    /// smaller. Returns the id of the newly placed rule, if any.
    pub fn resolve_critical_pair(
        &mut self,
        pair: &CriticalPair,
        props: &TypeProperties,
    ) -> Result<Option<RuleId>, RewriteError> {
        if pair.is_trivial() {
            return Ok(None);
        }
        let first = self.reduce(&pair.first);
        let second = self.reduce(&pair.second);
        let (source, target) = match compare_terms(&first, &second, props) {
            Ordering::Equal => return Ok(None),
            Ordering::Less => (second, first),
            Ordering::Greater => (first, second),
        };
        let (inserted, id) = self.insert(Rule::new(source, target), props)?;
        Ok(if inserted { Some(id) } else { None })
    }
}

impl Default for RewritingSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/rewrite.rs"]
mod tests;
