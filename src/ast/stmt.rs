//! Statements and expressions.
//!
//! Bodies are carried through the symbol-entry pass untouched; only the
//! synthesized initializers are built here, from variable definitions and a
//! valueless return.

use smol_str::SmolStr;

use crate::base::Pos;

use super::{Ident, VariableDecl};

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub pos: Pos,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            stmts: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VariableDef(VariableDef),
    Return(ReturnStmt),
    Expr(Expr),
}

/// `T x = e;` inside a body, or a container-level variable.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDef {
    pub pos: Pos,
    pub var: VariableDecl,
}

impl VariableDef {
    pub fn new(var: VariableDecl) -> Self {
        Self { pos: var.pos, var }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub pos: Pos,
    pub exprs: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub pos: Pos,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    VarRef {
        pkg_alias: Option<Ident>,
        name: Ident,
    },
    Invocation {
        pkg_alias: Option<Ident>,
        name: Ident,
        args: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(SmolStr),
    Boolean(bool),
    Nil,
}

impl Expr {
    pub fn literal(pos: Pos, literal: Literal) -> Self {
        Self {
            pos,
            kind: ExprKind::Literal(literal),
        }
    }
}
