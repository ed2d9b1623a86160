//! Syntactic type references.

use std::fmt;

use crate::base::Pos;
use crate::hir::TypeId;

use super::Ident;

/// Builtin value types that are spelled as keywords.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    String,
    Boolean,
    Blob,
    Json,
    Xml,
    Any,
    Nil,
}

impl Primitive {
    pub const COUNT: usize = 9;

    pub const ALL: [Primitive; Self::COUNT] = [
        Primitive::Int,
        Primitive::Float,
        Primitive::String,
        Primitive::Boolean,
        Primitive::Blob,
        Primitive::Json,
        Primitive::Xml,
        Primitive::Any,
        Primitive::Nil,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Blob => "blob",
            Primitive::Json => "json",
            Primitive::Xml => "xml",
            Primitive::Any => "any",
            Primitive::Nil => "nil",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeNodeKind {
    /// `int`, `string`, ...
    Value(Primitive),
    /// `Point` or `alias:Point`.
    UserDefined {
        pkg_alias: Option<Ident>,
        name: Ident,
    },
    /// `T[]`
    Array(Box<TypeNode>),
}

/// A type as written in source. `ty` is filled in by the symbol-entry pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeNode {
    pub pos: Pos,
    pub kind: TypeNodeKind,
    pub ty: Option<TypeId>,
}

impl TypeNode {
    pub fn new(pos: Pos, kind: TypeNodeKind) -> Self {
        Self { pos, kind, ty: None }
    }

    pub fn value(pos: Pos, primitive: Primitive) -> Self {
        Self::new(pos, TypeNodeKind::Value(primitive))
    }

    pub fn user_defined(name: Ident) -> Self {
        Self::new(
            name.pos,
            TypeNodeKind::UserDefined {
                pkg_alias: None,
                name,
            },
        )
    }

    pub fn qualified(pkg_alias: Ident, name: Ident) -> Self {
        Self::new(
            name.pos,
            TypeNodeKind::UserDefined {
                pkg_alias: Some(pkg_alias),
                name,
            },
        )
    }

    pub fn array(element: TypeNode) -> Self {
        Self::new(element.pos, TypeNodeKind::Array(Box::new(element)))
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeNodeKind::Value(primitive) => f.write_str(primitive.keyword()),
            TypeNodeKind::UserDefined {
                pkg_alias: Some(alias),
                name,
            } => write!(f, "{}:{}", alias.value, name.value),
            TypeNodeKind::UserDefined {
                pkg_alias: None,
                name,
            } => f.write_str(&name.value),
            TypeNodeKind::Array(element) => write!(f, "{}[]", element),
        }
    }
}
