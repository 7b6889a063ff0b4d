use lasso::{Spur, ThreadedRodeo};

/// An interned name: type, trait, associated-type, or generic-parameter
/// identifier. Interned string ID for fast equality comparison.
pub type Name = Spur;

/// Symbol store for interning names.
///
/// Guarantees:
/// - Same string always produces the same Name
/// - Different strings always produce different Names
/// - A Name can be resolved back to the original string
pub struct SymbolStore {
    rodeo: ThreadedRodeo,
}

impl SymbolStore {
    /// Create a new empty symbol store.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Intern a name, returning its unique Name id.
    /// If the name was already interned, returns the existing id.
    pub fn intern(&self, name: &str) -> Name {
        self.rodeo.get_or_intern(name)
    }

    /// Resolve a Name back to its string representation.
    /// Returns None if the Name was not created by this store.
    pub fn resolve(&self, name: Name) -> Option<&str> {
        self.rodeo.try_resolve(&name)
    }

    /// Get the Name for a string if it exists, without interning.
    pub fn get(&self, name: &str) -> Option<Name> {
        self.rodeo.get(name)
    }

    /// Check if a string has already been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.rodeo.contains(name)
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One element of a term: a nominal type, a trait, an associated-type
/// selector qualified by the trait declaring it, or a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A nominal type.
    Concrete(Name),
    /// A trait name.
    Trait(Name),
    /// An associated-type selector, qualified by its declaring trait.
    AssociatedType { trait_name: Name, name: Name },
    /// A generic type parameter.
    Generic(Name),
}

impl Symbol {
    /// Coarse discriminator used by the symbol order when the cases differ.
    pub fn kind(&self) -> u8 {
        match self {
            Symbol::Concrete(_) => 0,
            Symbol::Trait(_) => 1,
            Symbol::AssociatedType { .. } => 2,
            Symbol::Generic(_) => 3,
        }
    }
}
