//! Traversal environment threaded through the symbol-entry pass.

use super::{PackageId, ScopeId, SymbolId};

/// What kind of node opened an [`Env`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnvNode {
    Package,
    Struct,
    Connector,
    Service,
    Invokable,
}

/// Where a declaration is being entered.
///
/// Passed by value into every definition routine; a nested environment is a
/// new value, so nothing needs restoring after recursion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Env {
    pub node: EnvNode,
    /// Scope new symbols are defined into.
    pub scope: ScopeId,
    /// The enclosing package symbol.
    pub package: SymbolId,
    /// The enclosing package's identity, for declaring-package checks.
    pub pkg: PackageId,
    /// The enclosing invokable, if any (parameters, receivers, workers).
    pub invokable: Option<SymbolId>,
}

impl Env {
    pub fn package(package: SymbolId, pkg: PackageId, scope: ScopeId) -> Self {
        Self {
            node: EnvNode::Package,
            scope,
            package,
            pkg,
            invokable: None,
        }
    }

    /// An environment for a container nested in this one.
    pub fn nested(self, node: EnvNode, scope: ScopeId) -> Self {
        Self {
            node,
            scope,
            ..self
        }
    }

    /// An environment for the body of `invokable`.
    pub fn invokable(self, invokable: SymbolId, scope: ScopeId) -> Self {
        Self {
            node: EnvNode::Invokable,
            scope,
            invokable: Some(invokable),
            ..self
        }
    }
}
