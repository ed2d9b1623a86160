//! Packages and compilation units, and the populate-and-partition step.

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{FileId, Pos};
use crate::hir::SymbolId;

use super::{
    ConnectorDecl, FunctionDecl, ImportDecl, PackageDecl, ServiceDecl, StructDecl, VariableDecl,
};

/// A top-level declaration as produced by the parser for one file.
#[derive(Clone, Debug, PartialEq)]
pub enum TopLevelNode {
    PackageDecl(PackageDecl),
    Import(ImportDecl),
    Function(FunctionDecl),
    Struct(StructDecl),
    Connector(ConnectorDecl),
    Service(ServiceDecl),
    Variable(VariableDecl),
}

/// Which bucket a [`TopLevelRef`] points into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopLevelKind {
    Function,
    Struct,
    Connector,
    Service,
    Variable,
}

/// A source-ordered reference to a declaration stored in a package bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopLevelRef {
    pub kind: TopLevelKind,
    pub index: usize,
}

/// One source file.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilationUnit {
    pub file: FileId,
    pub name: SmolStr,
    pub top_level_nodes: Vec<TopLevelNode>,
}

impl CompilationUnit {
    pub fn new(file: FileId, name: impl Into<SmolStr>) -> Self {
        Self {
            file,
            name: name.into(),
            top_level_nodes: Vec::new(),
        }
    }
}

/// A package assembled from its compilation units.
///
/// The parser fills `compilation_units`; [`Package::populate`] moves every
/// top-level node into the per-kind buckets the symbol-entry pass walks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Package {
    pub pos: Pos,
    pub compilation_units: Vec<CompilationUnit>,
    pub pkg_decl: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    /// Every declaration except package declarations and imports, grouped by
    /// compilation unit and in source order within each unit.
    pub top_level_nodes: Vec<TopLevelRef>,
    pub structs: Vec<StructDecl>,
    pub connectors: Vec<ConnectorDecl>,
    pub services: Vec<ServiceDecl>,
    pub functions: Vec<FunctionDecl>,
    pub global_vars: Vec<VariableDecl>,
    pub init_function: Option<FunctionDecl>,
    pub symbol: Option<SymbolId>,
}

impl Package {
    pub fn new(compilation_units: Vec<CompilationUnit>) -> Self {
        Self {
            compilation_units,
            ..Self::default()
        }
    }

    /// Drain every compilation unit into the package buckets.
    ///
    /// Units are visited in order and nodes in source order, so
    /// `top_level_nodes` reflects file order for later diagnostics. Draining
    /// makes a second call a no-op.
    pub fn populate(&mut self) {
        let mut units = std::mem::take(&mut self.compilation_units);
        for unit in &mut units {
            trace!(unit = %unit.name, nodes = unit.top_level_nodes.len(), "populating compilation unit");
            for node in std::mem::take(&mut unit.top_level_nodes) {
                self.add_top_level_node(node);
            }
        }
        self.compilation_units = units;
    }

    fn add_top_level_node(&mut self, node: TopLevelNode) {
        match node {
            TopLevelNode::PackageDecl(decl) => {
                if self.pkg_decl.is_none() {
                    self.pkg_decl = Some(decl);
                }
            }
            TopLevelNode::Import(import) => {
                if !self.imports.iter().any(|i| i.same_import(&import)) {
                    self.imports.push(import);
                }
            }
            TopLevelNode::Function(func) => {
                self.record(TopLevelKind::Function, self.functions.len());
                self.functions.push(func);
            }
            TopLevelNode::Struct(decl) => {
                self.record(TopLevelKind::Struct, self.structs.len());
                self.structs.push(decl);
            }
            TopLevelNode::Connector(decl) => {
                self.record(TopLevelKind::Connector, self.connectors.len());
                self.connectors.push(decl);
            }
            TopLevelNode::Service(decl) => {
                self.record(TopLevelKind::Service, self.services.len());
                self.services.push(decl);
            }
            TopLevelNode::Variable(var) => {
                self.record(TopLevelKind::Variable, self.global_vars.len());
                self.global_vars.push(var);
            }
        }
    }

    fn record(&mut self, kind: TopLevelKind, index: usize) {
        self.top_level_nodes.push(TopLevelRef { kind, index });
    }

    /// Name of the top-level declaration a [`TopLevelRef`] points to.
    pub fn top_level_name(&self, node: TopLevelRef) -> Option<&str> {
        let name = match node.kind {
            TopLevelKind::Function => &self.functions.get(node.index)?.name,
            TopLevelKind::Struct => &self.structs.get(node.index)?.name,
            TopLevelKind::Connector => &self.connectors.get(node.index)?.name,
            TopLevelKind::Service => &self.services.get(node.index)?.name,
            TopLevelKind::Variable => &self.global_vars.get(node.index)?.name,
        };
        Some(name.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Flags, Ident, InvokableDecl, Primitive, TypeNode};

    fn pos(file: u32, at: u32) -> Pos {
        Pos::at(FileId::new(file), at, at + 1)
    }

    fn func(name: &str, file: u32, at: u32) -> TopLevelNode {
        TopLevelNode::Function(InvokableDecl::new(Ident::new(name, pos(file, at))))
    }

    fn global(name: &str, file: u32, at: u32) -> TopLevelNode {
        let p = pos(file, at);
        TopLevelNode::Variable(VariableDecl::new(
            Ident::new(name, p),
            TypeNode::value(p, Primitive::Int),
        ))
    }

    fn strukt(name: &str, file: u32, at: u32) -> TopLevelNode {
        TopLevelNode::Struct(StructDecl {
            pos: pos(file, at),
            name: Ident::new(name, pos(file, at)),
            flags: Flags::empty(),
            fields: Vec::new(),
            symbol: None,
        })
    }

    fn import(path: &str, file: u32, at: u32) -> TopLevelNode {
        TopLevelNode::Import(ImportDecl {
            pos: pos(file, at),
            path: vec![Ident::new(path, pos(file, at))],
            version: None,
            alias: None,
            symbol: None,
        })
    }

    fn two_file_package() -> Package {
        let mut a = CompilationUnit::new(FileId::new(0), "a.lm");
        a.top_level_nodes = vec![
            TopLevelNode::PackageDecl(PackageDecl {
                pos: pos(0, 0),
                name: vec![Ident::new("demo", pos(0, 0))],
                version: None,
            }),
            import("net", 0, 1),
            global("x", 0, 2),
            func("main", 0, 3),
        ];
        let mut b = CompilationUnit::new(FileId::new(1), "b.lm");
        b.top_level_nodes = vec![import("net", 1, 0), strukt("Point", 1, 1), global("y", 1, 2)];
        Package::new(vec![a, b])
    }

    #[test]
    fn test_populate_preserves_source_order() {
        let mut pkg = two_file_package();
        pkg.populate();

        let names: Vec<_> = pkg
            .top_level_nodes
            .iter()
            .filter_map(|&node| pkg.top_level_name(node))
            .collect();
        assert_eq!(names, ["x", "main", "Point", "y"]);
    }

    #[test]
    fn test_populate_partitions_buckets() {
        let mut pkg = two_file_package();
        pkg.populate();

        assert!(pkg.pkg_decl.is_some());
        assert_eq!(pkg.functions.len(), 1);
        assert_eq!(pkg.structs.len(), 1);
        assert_eq!(pkg.global_vars.len(), 2);
        assert!(pkg.compilation_units.iter().all(|u| u.top_level_nodes.is_empty()));
    }

    #[test]
    fn test_identical_imports_are_deduplicated() {
        let mut pkg = two_file_package();
        pkg.populate();

        assert_eq!(pkg.imports.len(), 1);
    }

    #[test]
    fn test_populate_twice_is_noop() {
        let mut pkg = two_file_package();
        pkg.populate();
        pkg.populate();

        assert_eq!(pkg.top_level_nodes.len(), 4);
        assert_eq!(pkg.global_vars.len(), 2);
    }
}
