//! # lumen-sema
//!
//! Symbol-table construction for the Lumen service language: the first
//! semantic pass, which turns parsed packages into symbols, scopes and
//! types.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! session → Session: arenas, diagnostics, import loader
//!   ↓
//! hir     → Symbols, scopes, types and the SymbolEnter pass
//!   ↓
//! ast     → Parsed declarations, annotated in place by the pass
//!   ↓
//! base    → Primitives (FileId, Pos, Name interning)
//! ```
//!
//! ## Example
//!
//! ```
//! use lumen::ast::{CompilationUnit, Ident, Package, StructDecl, TopLevelNode};
//! use lumen::base::{FileId, Pos};
//! use lumen::hir::MemorySource;
//! use lumen::Session;
//!
//! let mut unit = CompilationUnit::new(FileId::new(0), "main.lm");
//! unit.top_level_nodes.push(TopLevelNode::Struct(StructDecl {
//!     pos: Pos::default(),
//!     name: Ident::new("Point", Pos::default()),
//!     flags: Default::default(),
//!     fields: Vec::new(),
//!     symbol: None,
//! }));
//! let mut package = Package::new(vec![unit]);
//!
//! let mut session = Session::new(MemorySource::new());
//! let pkg = session.define_package(&mut package).unwrap();
//! assert!(session.member(pkg, "Point").is_some());
//! ```

/// Foundation types: FileId, Pos, Name interning
pub mod base;

/// Parsed package trees
pub mod ast;

/// Settings for the symbol-entry pass
pub mod config;

/// Semantic model: symbols, scopes, types, SymbolEnter
pub mod hir;

/// Per-compilation state
pub mod session;

pub use base::{FileId, Interner, Name, Pos, TextRange, TextSize};
pub use config::EnterConfig;
pub use hir::{Diagnostic, DiagnosticLog, SymbolId, SymbolKind, SymbolTable};
pub use session::Session;
