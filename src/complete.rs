//! Knuth-Bendix completion driver.
//!
//! Saturates a rewriting system: every overlap between active rules is
//! turned into a critical pair, each pair is resolved (possibly inserting a
//! new rule), and newly created rules have their overlaps enumerated in
//! turn. When the worklist drains the system is confluent with respect to
//! its order and `reduce` yields unique normal forms.

use crate::error::RewriteError;
use crate::rewrite::{CriticalPair, RewritingSystem};
use crate::rule::RuleId;
use crate::types::TypeProperties;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

#[cfg(feature = "tracing")]
use crate::trace::debug;

const FIELD_BITS: u32 = 16;
const FIELD_MAX: u64 = (1 << FIELD_BITS) - 1;

/// An overlap `(lhs, rhs, position)` packed into one integer, 16 bits per
/// field. Used as the visited-set key so each overlap is enumerated at
/// most once across completion rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapId(u64);

impl OverlapId {
    /// Pack an overlap, failing if any component exceeds its field.
    pub fn pack(lhs: RuleId, rhs: RuleId, position: usize) -> Result<OverlapId, RewriteError> {
        let l = lhs.raw() as u64;
        let r = rhs.raw() as u64;
        let p = position as u64;
        if l > FIELD_MAX || r > FIELD_MAX || p > FIELD_MAX {
            return Err(RewriteError::OverlapIdOverflow {
                lhs: lhs.raw(),
                rhs: rhs.raw(),
                position,
            });
        }
        Ok(OverlapId((l << (2 * FIELD_BITS)) | (r << FIELD_BITS) | p))
    }

    /// Get the raw packed value (for debugging/display).
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Bounds on a completion run. Knuth-Bendix completion is semi-decidable,
/// so divergence is cut off by counting worklist pops and stored rules.
#[derive(Debug, Clone, Copy)]
pub struct CompletionBudget {
    /// Maximum number of rules the store may grow to.
    pub max_rules: usize,
    /// Maximum number of critical pairs popped off the worklist.
    pub max_steps: usize,
}

impl Default for CompletionBudget {
    fn default() -> Self {
        Self {
            max_rules: 4096,
            max_steps: 1 << 16,
        }
    }
}

/// Aggregate counters from a completion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    /// Critical pairs popped off the worklist.
    pub steps: usize,
    /// Pairs that were trivial or already joinable.
    pub discarded_pairs: usize,
    /// Rules appended during completion.
    pub rules_added: usize,
}

fn check_budget(
    system: &RewritingSystem,
    stats: &CompletionStats,
    budget: &CompletionBudget,
) -> Result<(), RewriteError> {
    if stats.steps > budget.max_steps || system.rules().len() > budget.max_rules {
        return Err(RewriteError::BudgetExceeded {
            steps: stats.steps,
            rules: system.rules().len(),
        });
    }
    Ok(())
}

/// Enumerate the overlaps of every active rule into a buffer, then push the
/// critical pairs of the ones not yet visited. The index is only read while
/// overlaps are walked; insertion happens later, when pairs are popped.
fn push_new_overlaps(
    system: &RewritingSystem,
    visited: &mut FxHashSet<OverlapId>,
    pairs: &mut Vec<CriticalPair>,
) -> Result<(), RewriteError> {
    let mut found: SmallVec<[(RuleId, RuleId, usize); 16]> = SmallVec::new();
    for id in system.rules().active_ids() {
        system.for_each_overlap(id, |other, position| found.push((id, other, position)));
    }
    for (lhs, rhs, position) in found {
        let key = OverlapId::pack(lhs, rhs, position)?;
        if visited.insert(key) {
            pairs.push(system.form_critical_pair(lhs, rhs, position));
        }
    }
    Ok(())
}

/// Run completion until no critical pair produces a new rule, or the
/// budget runs out.
///
/// On `BudgetExceeded` the partial system is left in place; it still
/// satisfies the store invariants but is not guaranteed confluent.
pub fn complete(
    system: &mut RewritingSystem,
    props: &TypeProperties,
    budget: &CompletionBudget,
) -> Result<CompletionStats, RewriteError> {
    let mut visited: FxHashSet<OverlapId> = FxHashSet::default();
    let mut pairs: Vec<CriticalPair> = Vec::new();
    let mut stats = CompletionStats::default();

    push_new_overlaps(system, &mut visited, &mut pairs)?;

    while let Some(pair) = pairs.pop() {
        stats.steps += 1;
        check_budget(system, &stats, budget)?;

        let before = system.rules().len();
        system.resolve_critical_pair(&pair, props)?;
        if system.rules().len() > before {
            stats.rules_added += system.rules().len() - before;
            // New rules mean new overlaps; sweep the current active set.
            check_budget(system, &stats, budget)?;
            push_new_overlaps(system, &mut visited, &mut pairs)?;
        } else {
            stats.discarded_pairs += 1;
        }
    }

    #[cfg(feature = "tracing")]
    debug!(
        steps = stats.steps,
        rules = system.rules().len(),
        "completion_converged"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "tests/complete.rs"]
mod tests;
