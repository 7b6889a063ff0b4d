use super::*;
use crate::error::RewriteError;
use crate::test_utils::{concrete, term};
use crate::types::TypeProperties;

fn insert_ok(
    system: &mut RewritingSystem,
    props: &TypeProperties,
    source: Term,
    target: Term,
) -> (bool, RuleId) {
    system
        .insert(Rule::new(source, target), props)
        .expect("rule should be oriented")
}

#[test]
fn insert_fresh_rule_is_reported_new() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let mut system = RewritingSystem::new();

    let (inserted, id) = insert_ok(&mut system, &props, term(&[b]), term(&[a]));
    assert!(inserted);
    assert_eq!(id.raw(), 0);
    assert_eq!(system.rules().active_ids().count(), 1);
    assert_eq!(system.reduce(&term(&[b])), term(&[a]));
}

#[test]
fn insert_duplicate_returns_the_existing_rule() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let mut system = RewritingSystem::new();

    let (_, first) = insert_ok(&mut system, &props, term(&[b]), term(&[a]));
    let (inserted, id) = insert_ok(&mut system, &props, term(&[b]), term(&[a]));
    assert!(!inserted, "equal rule must not be inserted twice");
    assert_eq!(id, first);
    assert_eq!(system.rules().active_ids().count(), 1);
}

#[test]
fn insert_with_larger_target_keeps_the_resident_rule() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let e = concrete(&props, "e");
    let mut system = RewritingSystem::new();

    let (_, first) = insert_ok(
        &mut system,
        &props,
        term(&[a, b, e]),
        term(&[a, b, c]),
    );
    // same source, larger target: the resident rule wins, and a rule from
    // the new target down to the resident target appears instead
    let (inserted, id) = insert_ok(
        &mut system,
        &props,
        term(&[a, b, e]),
        term(&[a, b, d]),
    );
    assert!(!inserted);
    assert_eq!(id, first);
    assert!(!system.rules()[first].is_right_simplified());
    assert_eq!(system.reduce(&term(&[a, b, d])), term(&[a, b, c]));
    assert_eq!(system.reduce(&term(&[a, b, e])), term(&[a, b, c]));
}

#[test]
fn insert_with_smaller_target_right_simplifies_the_resident_rule() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let e = concrete(&props, "e");
    let mut system = RewritingSystem::new();

    let (_, first) = insert_ok(
        &mut system,
        &props,
        term(&[a, b, e]),
        term(&[a, b, d]),
    );
    let (inserted, second) = insert_ok(
        &mut system,
        &props,
        term(&[a, b, e]),
        term(&[a, b, c]),
    );
    assert!(inserted, "the more reductive rule takes over the source");
    assert_ne!(second, first);
    assert!(system.rules()[first].is_right_simplified());

    // the old rewriting is recovered through a target-to-target rule
    assert_eq!(system.reduce(&term(&[a, b, e])), term(&[a, b, c]));
    assert_eq!(system.reduce(&term(&[a, b, d])), term(&[a, b, c]));

    // exactly one active rule owns the shared source
    let owners: Vec<_> = system
        .active_rules()
        .filter(|(source, _)| **source == term(&[a, b, e]))
        .collect();
    assert_eq!(owners.len(), 1);
}

#[test]
fn insert_rejects_an_unoriented_rule() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let mut system = RewritingSystem::new();

    let ascending = system.insert(Rule::new(term(&[a]), term(&[b])), &props);
    assert!(matches!(ascending, Err(RewriteError::InvalidRule { .. })));
    let reflexive = system.insert(Rule::new(term(&[a]), term(&[a])), &props);
    assert!(matches!(reflexive, Err(RewriteError::InvalidRule { .. })));
    assert!(system.rules().is_empty());
}

#[test]
fn reduce_without_rules_is_the_identity() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let system = RewritingSystem::new();
    assert_eq!(system.reduce(&term(&[a, b])), term(&[a, b]));
}

#[test]
fn reduce_finds_a_short_source_under_a_longer_path() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let x = concrete(&props, "x");
    let mut system = RewritingSystem::new();

    insert_ok(&mut system, &props, term(&[b]), term(&[a]));
    insert_ok(&mut system, &props, term(&[b, c, d]), term(&[a, a, a]));

    // the walk passes through the payload-free "b.c" node; the one-symbol
    // rule must still fire
    assert_eq!(system.reduce(&term(&[b, c, x])), term(&[a, c, x]));
    // when the longer source matches fully, it is preferred
    assert_eq!(system.reduce(&term(&[b, c, d])), term(&[a, a, a]));
}

#[test]
fn reduce_descends_under_the_term_order() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let mut system = RewritingSystem::new();
    insert_ok(&mut system, &props, term(&[a, b]), term(&[a]));

    let start = term(&[a, b, a, b]);
    let normal = system.reduce(&start);
    assert_eq!(normal, term(&[a, a]));
    assert_eq!(
        compare_terms(&normal, &start, &props),
        Ordering::Less,
        "reduction never grows a term"
    );
    assert_eq!(system.reduce(&normal), normal, "normal forms are fixed points");
}

#[test]
fn overlaps_cover_inner_and_boundary_cases() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let mut system = RewritingSystem::new();

    let (_, abc) = insert_ok(&mut system, &props, term(&[a, b, c]), term(&[a]));
    let (_, bc) = insert_ok(&mut system, &props, term(&[b, c]), term(&[a]));
    let (_, cd) = insert_ok(&mut system, &props, term(&[c, d]), term(&[a]));

    let mut overlaps = Vec::new();
    system.for_each_overlap(abc, |other, position| overlaps.push((other, position)));
    overlaps.sort_unstable();
    // "b.c" sits inside "a.b.c" at 1; "c.d" extends the suffix at 2
    assert_eq!(overlaps, vec![(bc, 1), (cd, 2)]);

    let mut overlaps = Vec::new();
    system.for_each_overlap(bc, |other, position| overlaps.push((other, position)));
    assert_eq!(overlaps, vec![(cd, 1)]);
}

#[test]
fn whole_source_self_overlap_is_skipped() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let mut system = RewritingSystem::new();

    let (_, id) = insert_ok(&mut system, &props, term(&[a, b, a]), term(&[a, b]));
    let mut overlaps = Vec::new();
    system.for_each_overlap(id, |other, position| overlaps.push((other, position)));
    // the source overlaps itself at 2 (shared boundary "a"), but not at 0
    assert_eq!(overlaps, vec![(id, 2)]);
}

#[test]
fn critical_pair_for_an_inner_overlap() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let e = concrete(&props, "e");
    let mut system = RewritingSystem::new();

    let (_, outer) = insert_ok(&mut system, &props, term(&[a, b, c]), term(&[d]));
    let (_, inner) = insert_ok(&mut system, &props, term(&[b, c]), term(&[e]));

    let pair = system.form_critical_pair(outer, inner, 1);
    assert_eq!(pair.first, term(&[d]));
    assert_eq!(pair.second, term(&[a, e]));
    assert!(!pair.is_trivial());
}

#[test]
fn critical_pair_for_a_boundary_overlap() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let b = concrete(&props, "b");
    let c = concrete(&props, "c");
    let d = concrete(&props, "d");
    let e = concrete(&props, "e");
    let mut system = RewritingSystem::new();

    let (_, left) = insert_ok(&mut system, &props, term(&[a, b]), term(&[d]));
    let (_, right) = insert_ok(&mut system, &props, term(&[b, c]), term(&[e]));

    let pair = system.form_critical_pair(left, right, 1);
    assert_eq!(pair.first, term(&[d, c]));
    assert_eq!(pair.second, term(&[a, e]));
}

#[test]
fn resolving_a_trivial_pair_inserts_nothing() {
    let props = TypeProperties::new();
    let a = concrete(&props, "a");
    let mut system = RewritingSystem::new();

    let pair = CriticalPair::new(term(&[a]), term(&[a]));
    let outcome = system
        .resolve_critical_pair(&pair, &props)
        .expect("resolution is total here");
    assert_eq!(outcome, None);
    assert!(system.rules().is_empty());
}

#[test]
fn resolving_a_joinable_pair_inserts_nothing() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let mut system = RewritingSystem::new();
    insert_ok(&mut system, &props, term(&[b]), term(&[a]));

    let pair = CriticalPair::new(term(&[b]), term(&[a]));
    let outcome = system
        .resolve_critical_pair(&pair, &props)
        .expect("resolution is total here");
    assert_eq!(outcome, None);
    assert_eq!(system.rules().len(), 1);
}

#[test]
fn resolving_a_divergent_pair_inserts_the_oriented_rule() {
    let props = TypeProperties::new();
    let (a, b) = (concrete(&props, "a"), concrete(&props, "b"));
    let mut system = RewritingSystem::new();

    // pair given smaller-first: resolution must orient it the other way
    let pair = CriticalPair::new(term(&[a]), term(&[b]));
    let id = system
        .resolve_critical_pair(&pair, &props)
        .expect("resolution is total here")
        .expect("distinct normal forms force a new rule");
    assert_eq!(system.rules()[id].source(), &term(&[b]));
    assert_eq!(system.reduce(&term(&[b])), term(&[a]));
}
