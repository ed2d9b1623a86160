//! Type resolution and scope lookups used while entering symbols.
//!
//! [`SymbolResolver`] is a short-lived view over the session's
//! [`SymbolTable`] and [`DiagnosticLog`]. It never panics on bad input:
//! unresolvable references are reported and answered with the error type.

use tracing::trace;

use crate::ast::{Ident, TypeNode, TypeNodeKind};
use crate::base::{Interner, Name, Pos};

use super::diagnostics::DiagnosticLog;
use super::{Env, ScopeId, SymbolId, SymbolKind, SymbolTable, SymbolTag, TypeId};

// ============================================================================
// RESOLVER
// ============================================================================

pub struct SymbolResolver<'a> {
    table: &'a mut SymbolTable,
    interner: &'a Interner,
    diagnostics: &'a mut DiagnosticLog,
}

impl<'a> SymbolResolver<'a> {
    pub fn new(
        table: &'a mut SymbolTable,
        interner: &'a Interner,
        diagnostics: &'a mut DiagnosticLog,
    ) -> Self {
        Self {
            table,
            interner,
            diagnostics,
        }
    }

    /// Lexical lookup: `scope`, then each enclosing scope.
    pub fn lookup(&self, scope: ScopeId, name: Name, tag: SymbolTag) -> Option<SymbolId> {
        self.table
            .scope_chain(scope)
            .find_map(|s| self.lookup_member(s, name, tag))
    }

    /// Member lookup: `scope` only, never its ancestors.
    pub fn lookup_member(&self, scope: ScopeId, name: Name, tag: SymbolTag) -> Option<SymbolId> {
        self.table
            .scope(scope)
            .get(name)
            .filter(|&id| self.table.symbol(id).kind.tag().intersects(tag))
    }

    /// Whether `name` is still free in exactly `scope`.
    ///
    /// On conflict a duplicate-definition diagnostic naming `kind` is
    /// reported against `pos`.
    pub fn check_unique(&mut self, pos: Pos, scope: ScopeId, name: Name, kind: SymbolKind) -> bool {
        let Some(existing) = self.table.scope(scope).get(name) else {
            return true;
        };
        let previous = self.table.symbol(existing).pos;
        let text = self.interner.resolve(name);
        trace!(name = %text, kind = kind.display(), "rejecting duplicate symbol");
        self.diagnostics
            .duplicate_definition(pos, kind.display(), &text, previous);
        false
    }

    /// Enter `symbol` into `scope` under `name` unless the name is taken.
    ///
    /// Returns whether the symbol was inserted. A rejected symbol stays in the
    /// arena so its declaration can still point at it.
    pub fn define(&mut self, pos: Pos, scope: ScopeId, name: Name, symbol: SymbolId) -> bool {
        let kind = self.table.symbol(symbol).kind;
        if !self.check_unique(pos, scope, name, kind) {
            return false;
        }
        trace!(name = %self.interner.resolve(name), kind = kind.display(), ?scope, "defined symbol");
        self.table.scope_mut(scope).define(name, symbol).is_ok()
    }

    /// Resolve a syntactic type and record the result on the node.
    pub fn resolve_type(&mut self, node: &mut TypeNode, env: &Env) -> TypeId {
        let ty = match &mut node.kind {
            TypeNodeKind::Value(primitive) => self.table.types.primitive(*primitive),
            TypeNodeKind::UserDefined { pkg_alias, name } => {
                self.resolve_user_defined(pkg_alias.as_ref(), name, env)
            }
            TypeNodeKind::Array(element) => {
                let element = self.resolve_type(element, env);
                if self.table.types.is_error(element) {
                    element
                } else {
                    self.table.types.array_of(element)
                }
            }
        };
        node.ty = Some(ty);
        ty
    }

    fn resolve_user_defined(&mut self, pkg_alias: Option<&Ident>, name: &Ident, env: &Env) -> TypeId {
        let type_name = self.interner.intern(&name.value);

        let found = match pkg_alias {
            None => self.lookup(env.scope, type_name, SymbolTag::TYPE),
            Some(alias) => {
                let alias_name = self.interner.intern(&alias.value);
                let package_scope = self
                    .lookup(env.scope, alias_name, SymbolTag::PACKAGE)
                    .and_then(|pkg| self.table.symbol(pkg).scope);
                let Some(package_scope) = package_scope else {
                    self.diagnostics.unknown_package(alias.pos, &alias.value);
                    return self.table.types.error();
                };
                self.lookup_member(package_scope, type_name, SymbolTag::TYPE)
            }
        };

        match found {
            Some(symbol) => self.table.type_of(symbol),
            None => {
                let display = match pkg_alias {
                    Some(alias) => format!("{}:{}", alias.value, name.value),
                    None => name.value.to_string(),
                };
                self.diagnostics.unknown_type(name.pos, &display);
                self.table.types.error()
            }
        }
    }
}
