use crate::term::Term;
use std::ops::Index;

/// Identifier of a rule: its position in the store. Stable once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    /// Get the raw u32 value (for debugging/display).
    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Flag bit: the rule was made redundant by a newer rule with the same
/// source and a smaller target.
const RIGHT_SIMPLIFIED: u8 = 1 << 0;

/// A rewrite rule `source => target` plus a flag word.
///
/// Invariant on insertion: the source is strictly greater than the target
/// under the term order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    source: Term,
    target: Term,
    flags: u8,
}

impl Rule {
    /// Create a rule. Orientation is checked at insertion, not here.
    pub fn new(source: Term, target: Term) -> Self {
        Self {
            source,
            target,
            flags: 0,
        }
    }

    /// The term this rule rewrites.
    pub fn source(&self) -> &Term {
        &self.source
    }

    /// The term this rule rewrites to.
    pub fn target(&self) -> &Term {
        &self.target
    }

    /// Take the rule apart.
    pub fn into_parts(self) -> (Term, Term) {
        (self.source, self.target)
    }

    /// True if a newer rule with the same source superseded this one.
    pub fn is_right_simplified(&self) -> bool {
        self.flags & RIGHT_SIMPLIFIED != 0
    }

    pub(crate) fn mark_right_simplified(&mut self) {
        self.flags |= RIGHT_SIMPLIFIED;
    }
}

/// Append-only store of rules. Rules are never deleted; superseded rules
/// stay in storage with the right-simplified flag set and drop out of
/// `active_ids`.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, returning its dense identifier.
    pub fn push(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.rules.push(rule);
        id
    }

    /// Number of rules ever stored, active or not.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if nothing was ever stored.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: RuleId) -> &mut Rule {
        &mut self.rules[id.index()]
    }

    /// Ids of rules whose right-simplified flag is clear.
    pub fn active_ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !rule.is_right_simplified())
            .map(|(index, _)| RuleId(index as u32))
    }

    /// Iterate over every stored rule with its id.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (RuleId(index as u32), rule))
    }
}

impl Index<RuleId> for RuleStore {
    type Output = Rule;

    fn index(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }
}
