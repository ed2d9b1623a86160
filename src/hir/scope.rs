//! Scopes: ordered name → symbol maps chained to an enclosing scope.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::base::Name;

use super::{ScopeId, SymbolId};

/// A mapping from names to symbols, owned by exactly one container symbol.
///
/// Entries keep insertion order so iteration (and everything derived from
/// it) is deterministic. The parent chain of every scope ends at a package
/// scope.
#[derive(Clone, Debug)]
pub struct Scope {
    pub owner: SymbolId,
    pub parent: Option<ScopeId>,
    entries: IndexMap<Name, SymbolId, FxBuildHasher>,
}

impl Scope {
    pub fn new(owner: SymbolId, parent: Option<ScopeId>) -> Self {
        Self {
            owner,
            parent,
            entries: IndexMap::default(),
        }
    }

    /// Bind `name` to `symbol`.
    ///
    /// Never overwrites: if `name` is already bound the scope is left as is
    /// and the existing binding is returned as the error.
    pub fn define(&mut self, name: Name, symbol: SymbolId) -> Result<(), SymbolId> {
        match self.entries.get(&name) {
            Some(&existing) => Err(existing),
            None => {
                self.entries.insert(name, symbol);
                Ok(())
            }
        }
    }

    /// Lookup in this scope only.
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.entries.get(&name).copied()
    }

    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    /// Bindings in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.entries.iter().map(|(&name, &symbol)| (name, symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
