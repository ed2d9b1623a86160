//! Declaration nodes.

use bitflags::bitflags;
use smol_str::SmolStr;

use crate::base::Pos;
use crate::hir::{SymbolId, TypeId};

use super::{Block, TypeNode, VariableDef};

/// An identifier as written in source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub value: SmolStr,
    pub pos: Pos,
}

impl Ident {
    pub fn new(value: impl Into<SmolStr>, pos: Pos) -> Self {
        Self {
            value: value.into(),
            pos,
        }
    }

    /// The identifier of an unnamed return binding, e.g. `function f() (int)`.
    pub fn empty(pos: Pos) -> Self {
        Self::new(SmolStr::default(), pos)
    }
}

bitflags! {
    /// Declaration modifiers.
    ///
    /// Written by the parser from source keywords and extended by the
    /// symbol-entry pass (struct fields, actions and resources are implicitly
    /// public). Copied verbatim onto the declared symbol.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Flags: u16 {
        const PUBLIC = 1 << 0;
        const NATIVE = 1 << 1;
        const CONST = 1 << 2;
        /// Method attached to a receiver struct.
        const ATTACHED = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageDecl {
    pub pos: Pos,
    pub name: Vec<Ident>,
    pub version: Option<Ident>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    pub pos: Pos,
    pub path: Vec<Ident>,
    pub version: Option<Ident>,
    pub alias: Option<Ident>,
    pub symbol: Option<SymbolId>,
}

impl ImportDecl {
    /// The name the import is bound under: the explicit alias, else the last
    /// path component.
    pub fn alias_text(&self) -> &str {
        self.alias
            .as_ref()
            .or_else(|| self.path.last())
            .map(|ident| ident.value.as_str())
            .unwrap_or_default()
    }

    /// Structural equality: same path, version and alias, wherever the two
    /// declarations are written.
    pub fn same_import(&self, other: &ImportDecl) -> bool {
        fn text(ident: &Option<Ident>) -> Option<&str> {
            ident.as_ref().map(|i| i.value.as_str())
        }

        self.path.len() == other.path.len()
            && self
                .path
                .iter()
                .zip(&other.path)
                .all(|(a, b)| a.value == b.value)
            && text(&self.version) == text(&other.version)
            && text(&self.alias) == text(&other.alias)
    }
}

/// A parameter, return binding, receiver, struct field or module variable.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub pos: Pos,
    pub name: Ident,
    pub flags: Flags,
    pub type_node: TypeNode,
    pub init: Option<super::Expr>,
    pub symbol: Option<SymbolId>,
    pub ty: Option<TypeId>,
}

impl VariableDecl {
    pub fn new(name: Ident, type_node: TypeNode) -> Self {
        Self {
            pos: name.pos,
            name,
            flags: Flags::empty(),
            type_node,
            init: None,
            symbol: None,
            ty: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDecl {
    pub pos: Pos,
    pub name: Ident,
    pub flags: Flags,
    pub fields: Vec<VariableDecl>,
    pub symbol: Option<SymbolId>,
}

/// Shared shape of functions, methods, actions, resources and workers.
///
/// Only top-level functions carry a `receiver`; only callables with a body
/// can declare `workers`.
#[derive(Clone, Debug, PartialEq)]
pub struct InvokableDecl {
    pub pos: Pos,
    pub name: Ident,
    pub flags: Flags,
    pub receiver: Option<VariableDecl>,
    pub params: Vec<VariableDecl>,
    pub ret_params: Vec<VariableDecl>,
    /// `None` for native declarations.
    pub body: Option<Block>,
    pub workers: Vec<InvokableDecl>,
    pub symbol: Option<SymbolId>,
}

impl InvokableDecl {
    pub fn new(name: Ident) -> Self {
        Self {
            pos: name.pos,
            name,
            flags: Flags::empty(),
            receiver: None,
            params: Vec::new(),
            ret_params: Vec::new(),
            body: None,
            workers: Vec::new(),
            symbol: None,
        }
    }
}

pub type FunctionDecl = InvokableDecl;
pub type ActionDecl = InvokableDecl;
pub type ResourceDecl = InvokableDecl;
pub type WorkerDecl = InvokableDecl;

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorDecl {
    pub pos: Pos,
    pub name: Ident,
    pub flags: Flags,
    pub variables: Vec<VariableDef>,
    pub actions: Vec<ActionDecl>,
    pub init_function: Option<FunctionDecl>,
    pub symbol: Option<SymbolId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceDecl {
    pub pos: Pos,
    pub name: Ident,
    pub flags: Flags,
    pub variables: Vec<VariableDef>,
    pub resources: Vec<ResourceDecl>,
    pub init_function: Option<FunctionDecl>,
    pub symbol: Option<SymbolId>,
}
