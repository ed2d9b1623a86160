//! Arena handles for symbols, scopes, types and package names.
//!
//! Every semantic object created by the symbol-entry pass lives in an arena
//! owned by [`SymbolTable`](super::SymbolTable). Cross references (a scope's
//! owner, a symbol's scope, a struct type's symbol) are stored as these
//! handles, so the Scope ↔ Symbol relationship never forms a reference cycle.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to a [`Symbol`](super::Symbol).
    SymbolId,
    "SymbolId"
);

arena_id!(
    /// Handle to a [`Scope`](super::Scope).
    ScopeId,
    "ScopeId"
);

arena_id!(
    /// Handle to a [`Type`](super::Type).
    TypeId,
    "TypeId"
);

arena_id!(
    /// Handle to an interned [`PackageName`](super::PackageName).
    ///
    /// Used as the "declaring package" of a symbol; two symbols come from the
    /// same package iff their `PackageId`s are equal.
    PackageId,
    "PackageId"
);
