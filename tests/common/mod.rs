//! Shared AST builders for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use lumen::ast::{
    CompilationUnit, ConnectorDecl, Flags, FunctionDecl, Ident, ImportDecl, InvokableDecl,
    Package, PackageDecl, Primitive, ServiceDecl, StructDecl, TopLevelNode, TypeNode,
    VariableDecl, VariableDef,
};
use lumen::base::{FileId, Pos};
use lumen::hir::{MemorySource, Type};
use lumen::{Session, SymbolId};

static OFFSET: AtomicU32 = AtomicU32::new(0);

/// A fresh position, distinct from every other one handed out.
pub fn pos() -> Pos {
    let start = OFFSET.fetch_add(2, Ordering::Relaxed);
    Pos::at(FileId::new(0), start, start + 1)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ident(name: &str) -> Ident {
    Ident::new(name, pos())
}

// ----------------------------------------------------------------------------
// Types
// ----------------------------------------------------------------------------

pub fn int() -> TypeNode {
    TypeNode::value(pos(), Primitive::Int)
}

pub fn string() -> TypeNode {
    TypeNode::value(pos(), Primitive::String)
}

pub fn named(name: &str) -> TypeNode {
    TypeNode::user_defined(ident(name))
}

pub fn qualified(alias: &str, name: &str) -> TypeNode {
    TypeNode::qualified(ident(alias), ident(name))
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

pub fn var(name: &str, ty: TypeNode) -> VariableDecl {
    VariableDecl::new(ident(name), ty)
}

pub fn unnamed(ty: TypeNode) -> VariableDecl {
    VariableDecl::new(Ident::empty(pos()), ty)
}

pub fn structure(name: &str, fields: Vec<VariableDecl>) -> StructDecl {
    StructDecl {
        pos: pos(),
        name: ident(name),
        flags: Flags::empty(),
        fields,
        symbol: None,
    }
}

pub fn function(name: &str, params: Vec<VariableDecl>, rets: Vec<VariableDecl>) -> FunctionDecl {
    let mut func = InvokableDecl::new(ident(name));
    func.params = params;
    func.ret_params = rets;
    func
}

pub fn method(receiver: VariableDecl, name: &str) -> FunctionDecl {
    let mut func = InvokableDecl::new(ident(name));
    func.receiver = Some(receiver);
    func
}

pub fn connector(name: &str, variables: Vec<VariableDecl>, actions: Vec<InvokableDecl>) -> ConnectorDecl {
    ConnectorDecl {
        pos: pos(),
        name: ident(name),
        flags: Flags::empty(),
        variables: variables.into_iter().map(VariableDef::new).collect(),
        actions,
        init_function: None,
        symbol: None,
    }
}

pub fn service(name: &str, variables: Vec<VariableDecl>, resources: Vec<InvokableDecl>) -> ServiceDecl {
    ServiceDecl {
        pos: pos(),
        name: ident(name),
        flags: Flags::empty(),
        variables: variables.into_iter().map(VariableDef::new).collect(),
        resources,
        init_function: None,
        symbol: None,
    }
}

pub fn import(path: &str, alias: Option<&str>) -> TopLevelNode {
    TopLevelNode::Import(ImportDecl {
        pos: pos(),
        path: path.split('.').map(ident).collect(),
        version: None,
        alias: alias.map(ident),
        symbol: None,
    })
}

pub fn package_decl(path: &str) -> TopLevelNode {
    TopLevelNode::PackageDecl(PackageDecl {
        pos: pos(),
        name: path.split('.').map(ident).collect(),
        version: None,
    })
}

// ----------------------------------------------------------------------------
// Packages
// ----------------------------------------------------------------------------

pub fn unit(file: u32, nodes: Vec<TopLevelNode>) -> CompilationUnit {
    let mut unit = CompilationUnit::new(FileId::new(file), format!("file{}.lm", file));
    unit.top_level_nodes = nodes;
    unit
}

pub fn package(nodes: Vec<TopLevelNode>) -> Package {
    Package::new(vec![unit(0, nodes)])
}

/// Enter `pkg` into a session with no importable packages.
pub fn enter(pkg: &mut Package) -> (Session, SymbolId) {
    enter_with(MemorySource::new(), pkg)
}

pub fn enter_with(source: MemorySource, pkg: &mut Package) -> (Session, SymbolId) {
    init_tracing();
    let mut session = Session::new(source);
    let symbol = session
        .define_package(pkg)
        .expect("package should enter without import failures");
    (session, symbol)
}

// ----------------------------------------------------------------------------
// Inspection
// ----------------------------------------------------------------------------

/// Member `name` of `container`, panicking with the scope contents if absent.
pub fn member(session: &Session, container: SymbolId, name: &str) -> SymbolId {
    session.member(container, name).unwrap_or_else(|| {
        panic!(
            "'{}' not found; scope has {:?}",
            name,
            session.scope_names(container)
        )
    })
}

/// Field names of the struct type of `symbol`, in order.
pub fn field_names(session: &Session, symbol: SymbolId) -> Vec<String> {
    let table = session.symbols();
    let ty = table.type_of(symbol);
    match table.types.get(ty) {
        Type::Struct(st) => st
            .fields()
            .iter()
            .map(|f| session.interner().resolve(f.name).to_string())
            .collect(),
        other => panic!("expected a struct type, found {:?}", other),
    }
}
