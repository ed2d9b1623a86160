//! Closed syntax tree consumed by the symbol-entry pass.
//!
//! One sum type per node category; passes dispatch with `match`. Nodes that
//! declare something carry `symbol`/`ty` slots which stay `None` until the
//! pass annotates them.

mod decl;
mod package;
mod stmt;
mod type_node;

pub use decl::{
    ActionDecl, ConnectorDecl, Flags, FunctionDecl, Ident, ImportDecl, InvokableDecl,
    PackageDecl, ResourceDecl, ServiceDecl, StructDecl, VariableDecl, WorkerDecl,
};
pub use package::{CompilationUnit, Package, TopLevelKind, TopLevelNode, TopLevelRef};
pub use stmt::{Block, Expr, ExprKind, Literal, ReturnStmt, Stmt, VariableDef};
pub use type_node::{Primitive, TypeNode, TypeNodeKind};
