//! Semantic types produced by the symbol-entry pass.

use rustc_hash::FxHashMap;

use crate::ast::Primitive;
use crate::base::Name;

use super::{SymbolId, TypeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive),
    Struct(StructType),
    Invokable(InvokableType),
    Connector { symbol: SymbolId },
    Service { symbol: SymbolId },
    Array(TypeId),
    Package,
    /// Declarations that have no value type.
    NoType,
    /// Sentinel for anything that failed to resolve. Never absent, so later
    /// phases can always read a type.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub symbol: SymbolId,
    fields: Vec<StructField>,
    sealed: bool,
}

impl StructType {
    /// Fields in declaration order. Empty until the struct is sealed.
    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: Name,
    pub ty: TypeId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokableType {
    pub params: Vec<TypeId>,
    pub returns: Vec<TypeId>,
    /// Present exactly for methods.
    pub receiver: Option<TypeId>,
}

/// Handles of the types every table starts with.
#[derive(Clone, Debug)]
pub struct BuiltinTypes {
    primitives: [TypeId; Primitive::COUNT],
    pub package: TypeId,
    pub no_type: TypeId,
    pub error: TypeId,
}

/// Arena of [`Type`]s.
#[derive(Clone, Debug)]
pub struct TypeTable {
    types: Vec<Type>,
    builtins: BuiltinTypes,
    arrays: FxHashMap<TypeId, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut types = Vec::new();
        let mut push = |ty: Type| {
            types.push(ty);
            TypeId::from_index(types.len() - 1)
        };

        let primitives = Primitive::ALL.map(|p| push(Type::Primitive(p)));
        let package = push(Type::Package);
        let no_type = push(Type::NoType);
        let error = push(Type::Error);

        Self {
            types,
            builtins: BuiltinTypes {
                primitives,
                package,
                no_type,
                error,
            },
            arrays: FxHashMap::default(),
        }
    }

    pub fn alloc(&mut self, ty: Type) -> TypeId {
        self.types.push(ty);
        TypeId::from_index(self.types.len() - 1)
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn builtins(&self) -> &BuiltinTypes {
        &self.builtins
    }

    pub fn primitive(&self, primitive: Primitive) -> TypeId {
        let index = Primitive::ALL
            .iter()
            .position(|&p| p == primitive)
            .unwrap_or_default();
        self.builtins.primitives[index]
    }

    pub fn error(&self) -> TypeId {
        self.builtins.error
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        id == self.builtins.error
    }

    /// The (memoized) array type with element `element`.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.arrays.get(&element) {
            return id;
        }
        let id = self.alloc(Type::Array(element));
        self.arrays.insert(element, id);
        id
    }

    /// A fresh, unsealed struct type with no fields.
    pub fn new_struct(&mut self, symbol: SymbolId) -> TypeId {
        self.alloc(Type::Struct(StructType {
            symbol,
            fields: Vec::new(),
            sealed: false,
        }))
    }

    /// Publish a struct's complete field list.
    ///
    /// Returns `false` (and changes nothing) when `id` is not an unsealed
    /// struct.
    pub fn seal_struct(&mut self, id: TypeId, fields: Vec<StructField>) -> bool {
        match self.types.get_mut(id.index()) {
            Some(Type::Struct(st)) if !st.sealed => {
                st.fields = fields;
                st.sealed = true;
                true
            }
            _ => false,
        }
    }

    pub fn as_struct(&self, id: TypeId) -> Option<&StructType> {
        match self.get(id) {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    pub fn as_invokable(&self, id: TypeId) -> Option<&InvokableType> {
        match self.get(id) {
            Type::Invokable(inv) => Some(inv),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
