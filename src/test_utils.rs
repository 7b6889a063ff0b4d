use crate::symbol::Symbol;
use crate::term::Term;
use crate::types::TypeProperties;

pub(crate) fn concrete(props: &TypeProperties, name: &str) -> Symbol {
    Symbol::Concrete(props.intern(name))
}

pub(crate) fn trait_sym(props: &TypeProperties, name: &str) -> Symbol {
    Symbol::Trait(props.intern(name))
}

pub(crate) fn assoc(props: &TypeProperties, trait_name: &str, name: &str) -> Symbol {
    Symbol::AssociatedType {
        trait_name: props.intern(trait_name),
        name: props.intern(name),
    }
}

pub(crate) fn generic(props: &TypeProperties, name: &str) -> Symbol {
    Symbol::Generic(props.intern(name))
}

pub(crate) fn term(syms: &[Symbol]) -> Term {
    Term::from(syms)
}
