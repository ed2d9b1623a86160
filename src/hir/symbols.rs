//! Symbols and the arena that owns every symbol, scope and type.

use std::fmt;

use bitflags::bitflags;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::ast::Flags;
use crate::base::{Interner, Name, Pos};

use super::types::{Type, TypeTable};
use super::{PackageId, Scope, ScopeId, SymbolId, TypeId};

/// Classification of a symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Package,
    Type,
    Function,
    Method,
    Variable,
    Worker,
    Connector,
    Action,
    Service,
    Resource,
}

impl SymbolKind {
    /// Human-readable description used in diagnostics.
    pub fn display(self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Type => "struct",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Variable => "variable",
            SymbolKind::Worker => "worker",
            SymbolKind::Connector => "connector",
            SymbolKind::Action => "action",
            SymbolKind::Service => "service",
            SymbolKind::Resource => "resource",
        }
    }

    /// The lookup categories this kind answers to.
    pub fn tag(self) -> SymbolTag {
        match self {
            SymbolKind::Package => SymbolTag::PACKAGE,
            SymbolKind::Type => SymbolTag::TYPE,
            SymbolKind::Variable => SymbolTag::VARIABLE,
            SymbolKind::Connector => SymbolTag::TYPE | SymbolTag::CONNECTOR,
            SymbolKind::Service => SymbolTag::TYPE | SymbolTag::SERVICE,
            SymbolKind::Function
            | SymbolKind::Method
            | SymbolKind::Worker
            | SymbolKind::Action
            | SymbolKind::Resource => SymbolTag::INVOKABLE,
        }
    }

    /// Kinds that own a nested scope.
    pub fn is_container(self) -> bool {
        !matches!(self, SymbolKind::Variable)
    }
}

bitflags! {
    /// Kind mask used to filter lookups.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SymbolTag: u8 {
        const PACKAGE = 1 << 0;
        const TYPE = 1 << 1;
        const VARIABLE = 1 << 2;
        const INVOKABLE = 1 << 3;
        const CONNECTOR = 1 << 4;
        const SERVICE = 1 << 5;
    }
}

/// Parameter, return and receiver symbols of an invokable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokableInfo {
    pub params: Vec<SymbolId>,
    /// Named return bindings only; unnamed ones have no symbol.
    pub ret_params: Vec<SymbolId>,
    pub receiver: Option<SymbolId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SymbolDetail {
    #[default]
    None,
    Invokable(InvokableInfo),
}

/// A semantic record for one declared entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: Name,
    pub flags: Flags,
    /// The package that lexically contains the declaration.
    pub pkg: PackageId,
    /// Enclosing symbol; `None` only for the table's root.
    pub owner: Option<SymbolId>,
    pub ty: Option<TypeId>,
    pub scope: Option<ScopeId>,
    pub pos: Pos,
    pub detail: SymbolDetail,
}

impl Symbol {
    pub fn new(kind: SymbolKind, name: Name, pkg: PackageId, pos: Pos) -> Self {
        Self {
            kind,
            name,
            flags: Flags::empty(),
            pkg,
            owner: None,
            ty: None,
            scope: None,
            pos,
            detail: SymbolDetail::None,
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_owner(mut self, owner: SymbolId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_type(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn is_public(&self) -> bool {
        self.flags.contains(Flags::PUBLIC)
    }

    pub fn invokable(&self) -> Option<&InvokableInfo> {
        match &self.detail {
            SymbolDetail::Invokable(info) => Some(info),
            SymbolDetail::None => None,
        }
    }
}

/// Identity of a package: name components plus optional version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageName {
    pub components: Vec<Name>,
    pub version: Option<Name>,
}

impl PackageName {
    pub fn new(components: Vec<Name>, version: Option<Name>) -> Self {
        Self {
            components,
            version,
        }
    }

    /// `a.b.c` or `a.b.c:1.0.0`.
    pub fn render(&self, interner: &Interner) -> String {
        let mut out = self
            .components
            .iter()
            .map(|&c| interner.resolve(c))
            .collect::<Vec<_>>()
            .join(".");
        if let Some(version) = self.version {
            out.push(':');
            out.push_str(&interner.resolve(version));
        }
        out
    }
}

/// Arena for every symbol, scope and type created during compilation.
///
/// Symbols are never removed. Index 0 is the root package symbol that owns
/// every package symbol entered into the table.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    pub types: TypeTable,
    packages: IndexSet<PackageName, FxBuildHasher>,
    root: SymbolId,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut packages = IndexSet::default();
        packages.insert(PackageName::new(Vec::new(), None));
        let types = TypeTable::new();

        let root = Symbol::new(
            SymbolKind::Package,
            Name::EMPTY,
            PackageId::from_index(0),
            Pos::default(),
        )
        .with_type(types.builtins().package);

        let mut table = Self {
            symbols: vec![root],
            scopes: Vec::new(),
            types,
            packages,
            root: SymbolId::from_index(0),
        };
        table.alloc_scope(table.root, None);
        table
    }

    /// The root package symbol.
    pub fn root(&self) -> SymbolId {
        self.root
    }

    pub fn alloc_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId::from_index(self.symbols.len() - 1)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Create a scope owned by `owner` and record it on the owner.
    pub fn alloc_scope(&mut self, owner: SymbolId, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(Scope::new(owner, parent));
        let id = ScopeId::from_index(self.scopes.len() - 1);
        self.symbols[owner.index()].scope = Some(id);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// `scope` followed by each of its ancestors.
    pub fn scope_chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&s| self.scope(s).parent)
    }

    pub fn intern_package(&mut self, name: PackageName) -> PackageId {
        let (index, _) = self.packages.insert_full(name);
        PackageId::from_index(index)
    }

    pub fn package_name(&self, id: PackageId) -> Option<&PackageName> {
        self.packages.get_index(id.index())
    }

    /// Type of `id`, or the error type when none was assigned.
    pub fn type_of(&self, id: SymbolId) -> TypeId {
        self.symbol(id).ty.unwrap_or_else(|| self.types.error())
    }

    /// Source-like rendering of a type for diagnostics and method names.
    pub fn type_name(&self, ty: TypeId, interner: &Interner) -> String {
        match self.types.get(ty) {
            Type::Primitive(p) => p.keyword().to_string(),
            Type::Struct(st) => interner.resolve(self.symbol(st.symbol).name).to_string(),
            Type::Connector { symbol } | Type::Service { symbol } => {
                interner.resolve(self.symbol(*symbol).name).to_string()
            }
            Type::Array(element) => format!("{}[]", self.type_name(*element, interner)),
            Type::Invokable(inv) => {
                let join = |tys: &[TypeId]| {
                    tys.iter()
                        .map(|&t| self.type_name(t, interner))
                        .collect::<Vec<_>>()
                        .join(",")
                };
                format!("function({}) ({})", join(&inv.params), join(&inv.returns))
            }
            Type::Package => "package".to_string(),
            Type::NoType => "void".to_string(),
            Type::Error => "<error>".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Primitive;

    #[test]
    fn test_new_table_has_root_package() {
        let table = SymbolTable::new();
        let root = table.symbol(table.root());

        assert_eq!(root.kind, SymbolKind::Package);
        assert!(root.scope.is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_alloc_scope_links_owner() {
        let mut table = SymbolTable::new();
        let pkg = PackageId::from_index(0);
        let root_scope = table.symbol(table.root()).scope;
        let sym = table.alloc_symbol(Symbol::new(SymbolKind::Type, Name::EMPTY, pkg, Pos::default()));

        let scope = table.alloc_scope(sym, root_scope);

        assert_eq!(table.symbol(sym).scope, Some(scope));
        assert_eq!(table.scope(scope).owner, sym);
        assert_eq!(table.scope_chain(scope).count(), 2);
    }

    #[test]
    fn test_intern_package_is_idempotent() {
        let interner = Interner::new();
        let mut table = SymbolTable::new();
        let name = PackageName::new(vec![interner.intern("lang"), interner.intern("net")], None);

        let a = table.intern_package(name.clone());
        let b = table.intern_package(name.clone());

        assert_eq!(a, b);
        assert_eq!(table.package_name(a), Some(&name));
        assert_eq!(name.render(&interner), "lang.net");
    }

    #[test]
    fn test_package_name_render_with_version() {
        let interner = Interner::new();
        let name = PackageName::new(vec![interner.intern("q")], Some(interner.intern("1.2.0")));
        assert_eq!(name.render(&interner), "q:1.2.0");
    }

    #[test]
    fn test_type_name_rendering() {
        let interner = Interner::new();
        let mut table = SymbolTable::new();
        let int = table.types.primitive(Primitive::Int);
        let ints = table.types.array_of(int);

        assert_eq!(table.type_name(ints, &interner), "int[]");
        assert_eq!(table.type_name(table.types.error(), &interner), "<error>");
    }

    #[test]
    fn test_kind_tags() {
        assert!(SymbolKind::Connector.tag().contains(SymbolTag::TYPE));
        assert!(SymbolKind::Method.tag().contains(SymbolTag::INVOKABLE));
        assert!(!SymbolKind::Variable.is_container());
    }
}
