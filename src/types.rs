//! Surface types, constraints, and the trait-refinement context.
//!
//! `Type` is the tree shape the surrounding driver hands in; `Type::to_term`
//! flattens it into the symbol sequences the rewriting engine works on.
//! `TypeProperties` owns the name interner and the trait-refinement map the
//! term order consults.

use crate::symbol::{Name, Symbol, SymbolStore};
use crate::term::Term;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// A surface type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A nominal type.
    Concrete(Name),
    /// A trait used as a type (the right-hand side of a bound).
    Trait(Name),
    /// A generic type parameter.
    Generic(Name),
    /// An associated type of `base`, declared by `trait_name`.
    AssociatedType {
        base: Box<Type>,
        trait_name: Name,
        name: Name,
    },
}

impl Type {
    /// Shorthand for an associated-type selection.
    pub fn assoc(base: Type, trait_name: Name, name: Name) -> Type {
        Type::AssociatedType {
            base: Box::new(base),
            trait_name,
            name,
        }
    }

    /// An abstract parameter is a generic parameter or an associated-type
    /// path rooted at one. Only abstract parameters may appear on the left
    /// of an equality constraint.
    pub fn is_abstract(&self) -> bool {
        match self {
            Type::Generic(_) => true,
            Type::AssociatedType { base, .. } => base.is_abstract(),
            Type::Concrete(_) | Type::Trait(_) => false,
        }
    }

    /// Flatten into a term: the base type becomes the head symbol, each
    /// associated-type selection appends a selector.
    pub fn to_term(&self) -> Term {
        match self {
            Type::Concrete(name) => Term::from_symbol(Symbol::Concrete(*name)),
            Type::Trait(name) => Term::from_symbol(Symbol::Trait(*name)),
            Type::Generic(name) => Term::from_symbol(Symbol::Generic(*name)),
            Type::AssociatedType {
                base,
                trait_name,
                name,
            } => base.to_term().concat_slice(&[Symbol::AssociatedType {
                trait_name: *trait_name,
                name: *name,
            }]),
        }
    }
}

/// A generic-signature constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `lhs: rhs` — lhs conforms to the trait rhs.
    Bound { lhs: Type, rhs: Type },
    /// `lhs == rhs` — lhs and rhs denote the same type. The lhs must be an
    /// abstract parameter.
    Equality { lhs: Type, rhs: Type },
}

/// Name interner plus the static trait-refinement map.
///
/// The term order consults this to spell names back out for lexical
/// comparison and to count transitive trait bases for the refinement
/// tie-break.
pub struct TypeProperties {
    symbols: SymbolStore,
    trait_bases: FxHashMap<Name, SmallVec<[Name; 2]>>,
}

impl TypeProperties {
    /// Create empty properties: no traits, no refinements.
    pub fn new() -> Self {
        Self {
            symbols: SymbolStore::new(),
            trait_bases: FxHashMap::default(),
        }
    }

    /// The underlying name store.
    pub fn symbols(&self) -> &SymbolStore {
        &self.symbols
    }

    /// Intern a name.
    pub fn intern(&self, name: &str) -> Name {
        self.symbols.intern(name)
    }

    /// Resolve an interned name.
    pub fn resolve(&self, name: Name) -> Option<&str> {
        self.symbols.resolve(name)
    }

    /// Declare `base` as an immediate base of `trait_name`.
    pub fn add_trait_base(&mut self, trait_name: Name, base: Name) {
        let bases = self.trait_bases.entry(trait_name).or_default();
        if !bases.contains(&base) {
            bases.push(base);
        }
    }

    /// Immediate bases of a trait, empty if none were declared.
    pub fn immediate_bases(&self, trait_name: Name) -> &[Name] {
        self.trait_bases
            .get(&trait_name)
            .map(|bases| bases.as_slice())
            .unwrap_or(&[])
    }

    /// Transitive bases of a trait by fixed-point union over the immediate
    /// bases. Cyclic declarations are deduplicated by the visited set, so
    /// the result is always the finite closure.
    pub fn transitive_bases(&self, trait_name: Name) -> FxHashSet<Name> {
        let mut closure = FxHashSet::default();
        let mut stack: SmallVec<[Name; 8]> = SmallVec::from_slice(self.immediate_bases(trait_name));
        while let Some(base) = stack.pop() {
            if closure.insert(base) {
                stack.extend_from_slice(self.immediate_bases(base));
            }
        }
        closure
    }

    /// Size of the transitive base set.
    pub fn base_count(&self, trait_name: Name) -> usize {
        self.transitive_bases(trait_name).len()
    }
}

impl Default for TypeProperties {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_term_flattens_nested_associated_types() {
        let props = TypeProperties::new();
        let self_name = props.intern("Self");
        let coll = props.intern("Collection");
        let slice = props.intern("Slice");
        let elem = props.intern("Element");

        let ty = Type::assoc(
            Type::assoc(Type::Generic(self_name), coll, slice),
            coll,
            elem,
        );
        let term = ty.to_term();
        assert_eq!(
            term.symbols(),
            &[
                Symbol::Generic(self_name),
                Symbol::AssociatedType { trait_name: coll, name: slice },
                Symbol::AssociatedType { trait_name: coll, name: elem },
            ]
        );
    }

    #[test]
    fn abstractness_follows_the_base_chain() {
        let props = TypeProperties::new();
        let t = props.intern("T");
        let n = props.intern("N");

        assert!(Type::Generic(t).is_abstract());
        assert!(Type::assoc(Type::Generic(t), t, n).is_abstract());
        assert!(!Type::Concrete(t).is_abstract());
        assert!(!Type::Trait(t).is_abstract());
        assert!(!Type::assoc(Type::Concrete(t), t, n).is_abstract());
    }

    #[test]
    fn transitive_bases_take_the_fixed_point() {
        let mut props = TypeProperties::new();
        let a = props.intern("A");
        let b = props.intern("B");
        let c = props.intern("C");
        props.add_trait_base(c, b);
        props.add_trait_base(b, a);

        let bases = props.transitive_bases(c);
        assert!(bases.contains(&b));
        assert!(bases.contains(&a));
        assert_eq!(props.base_count(c), 2);
        assert_eq!(props.base_count(b), 1);
        assert_eq!(props.base_count(a), 0);
    }

    #[test]
    fn cyclic_refinement_yields_a_finite_closure() {
        let mut props = TypeProperties::new();
        let a = props.intern("A");
        let b = props.intern("B");
        props.add_trait_base(a, b);
        props.add_trait_base(b, a);

        let bases = props.transitive_bases(a);
        assert_eq!(bases.len(), 2, "cycle must collapse into a finite set");
        assert!(bases.contains(&a));
        assert!(bases.contains(&b));
    }

    #[test]
    fn duplicate_base_declarations_are_ignored() {
        let mut props = TypeProperties::new();
        let a = props.intern("A");
        let b = props.intern("B");
        props.add_trait_base(b, a);
        props.add_trait_base(b, a);
        assert_eq!(props.immediate_bases(b), &[a]);
    }
}
