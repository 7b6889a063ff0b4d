//! Driver-facing surface: constraint lowering, completion, reduction.
//!
//! The Engine owns the type properties (name interner + trait-refinement
//! map) and the rewriting system, and translates surface constraints into
//! initial rules:
//! - `Bound(lhs, rhs)` becomes `term(lhs) · term(rhs) => term(lhs)`.
//! - `Equality(lhs, rhs)` requires an abstract lhs; the two sides are
//!   lowered, oriented by the term order, and inserted.

use crate::complete::{complete, CompletionBudget, CompletionStats};
use crate::error::RewriteError;
use crate::order::compare_terms;
use crate::rewrite::RewritingSystem;
use crate::rule::{Rule, RuleId};
use crate::symbol::Name;
use crate::term::{format_rule, format_term, Term};
use crate::types::{Constraint, Type, TypeProperties};
use std::cmp::Ordering;

/// The requirement-checking engine: type properties plus the rewriting
/// system built from the signature's constraints.
pub struct Engine {
    props: TypeProperties,
    system: RewritingSystem,
}

impl Engine {
    /// Create an engine with no traits and no rules.
    pub fn new() -> Self {
        Self {
            props: TypeProperties::new(),
            system: RewritingSystem::new(),
        }
    }

    /// The type properties consulted by the term order.
    pub fn props(&self) -> &TypeProperties {
        &self.props
    }

    /// The underlying rewriting system.
    pub fn system(&self) -> &RewritingSystem {
        &self.system
    }

    /// Intern a name.
    pub fn intern(&self, name: &str) -> Name {
        self.props.intern(name)
    }

    /// Declare `base` as an immediate base of `trait_name`.
    pub fn add_trait_base(&mut self, trait_name: &str, base: &str) {
        let t = self.props.intern(trait_name);
        let b = self.props.intern(base);
        self.props.add_trait_base(t, b);
    }

    /// Lower a constraint into a rule and insert it.
    ///
    /// Returns what `RewritingSystem::insert` returns. Fails with
    /// `InvalidEqualityLhs` when an equality's left-hand side is not an
    /// abstract parameter.
    pub fn add_constraint(
        &mut self,
        constraint: &Constraint,
    ) -> Result<(bool, RuleId), RewriteError> {
        match constraint {
            Constraint::Bound { lhs, rhs } => {
                let subject = lhs.to_term();
                let source = subject.concat(&rhs.to_term());
                self.system.insert(Rule::new(source, subject), &self.props)
            }
            Constraint::Equality { lhs, rhs } => {
                if !lhs.is_abstract() {
                    return Err(RewriteError::InvalidEqualityLhs {
                        lhs: format_term(&lhs.to_term(), self.props.symbols()),
                    });
                }
                let v = lhs.to_term();
                let u = if rhs.is_abstract() {
                    rhs.to_term()
                } else {
                    v.concat(&rhs.to_term())
                };
                let (source, target) = match compare_terms(&u, &v, &self.props) {
                    Ordering::Less => (v, u),
                    _ => (u, v),
                };
                self.system.insert(Rule::new(source, target), &self.props)
            }
        }
    }

    /// Saturate the system. See [`crate::complete::complete`].
    pub fn complete(&mut self, budget: &CompletionBudget) -> Result<CompletionStats, RewriteError> {
        complete(&mut self.system, &self.props, budget)
    }

    /// Reduce a term to its normal form.
    pub fn reduce(&self, term: &Term) -> Term {
        self.system.reduce(term)
    }

    /// Lower a surface type and reduce it.
    pub fn reduce_type(&self, ty: &Type) -> Term {
        self.reduce(&ty.to_term())
    }

    /// Iterate over `(source, target)` of every active rule.
    pub fn active_rules(&self) -> impl Iterator<Item = (&Term, &Term)> + '_ {
        self.system.active_rules()
    }

    /// Debug listing of the active rules, one `source => target` per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (source, target) in self.system.active_rules() {
            out.push_str(&format_rule(source, target, self.props.symbols()));
            out.push('\n');
        }
        out
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/api.rs"]
mod tests;
