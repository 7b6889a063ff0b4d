//! The shortlex term order.
//!
//! A total strict order on terms derived from a total strict order on
//! symbols: compare lengths first (longer terms order after), then symbols
//! left to right. Every rule keeps its source strictly above its target
//! under this order, so each rewrite step descends and reduction
//! terminates.

use crate::symbol::{Name, Symbol};
use crate::term::Term;
use crate::types::TypeProperties;
use std::cmp::Ordering;

fn compare_names(a: Name, b: Name, props: &TypeProperties) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    props
        .resolve(a)
        .unwrap_or("")
        .cmp(props.resolve(b).unwrap_or(""))
}

/// Traits with more transitive bases order first; ties fall back to the
/// lexical name order. This is what lets a refined trait's selector win as
/// the normal form over its base trait's.
fn compare_traits(a: Name, b: Name, props: &TypeProperties) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    props
        .base_count(b)
        .cmp(&props.base_count(a))
        .then_with(|| compare_names(a, b, props))
}

/// Total strict order on symbols.
///
/// Same-case symbols compare within the case; different cases compare by
/// the coarse kind integer.
pub fn compare_symbols(a: &Symbol, b: &Symbol, props: &TypeProperties) -> Ordering {
    match (a, b) {
        (Symbol::Concrete(x), Symbol::Concrete(y)) => compare_names(*x, *y, props),
        (Symbol::Trait(x), Symbol::Trait(y)) => compare_traits(*x, *y, props),
        (
            Symbol::AssociatedType { trait_name: t1, name: n1 },
            Symbol::AssociatedType { trait_name: t2, name: n2 },
        ) => {
            if n1 == n2 {
                compare_traits(*t1, *t2, props)
            } else {
                compare_names(*n1, *n2, props)
            }
        }
        (Symbol::Generic(x), Symbol::Generic(y)) => compare_names(*x, *y, props),
        _ => a.kind().cmp(&b.kind()),
    }
}

/// Total strict order on terms: shortlex over the symbol order.
pub fn compare_terms(u: &Term, v: &Term, props: &TypeProperties) -> Ordering {
    match u.len().cmp(&v.len()) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    // Equal lengths: first unequal symbol pair decides, cursors advance in
    // lockstep.
    for (x, y) in u.iter().zip(v.iter()) {
        match compare_symbols(x, y, props) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}
