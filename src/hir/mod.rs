//! High-level IR: symbols, scopes and types, and the pass that builds them.
//!
//! ## Module Structure
//!
//! ```text
//! enter       → SymbolEnter, the staged definition pass
//!   ↓
//! init        → synthesized initializer functions
//! resolve     → type resolution, lookups, uniqueness checks
//! loader      → import loading and cycle guard
//!   ↓
//! symbols     → Symbol, SymbolTable (the arena)
//! scope       → Scope
//! types       → Type, TypeTable
//! env         → traversal context
//! diagnostics → recoverable errors
//! ids         → arena handles
//! ```

mod diagnostics;
mod enter;
mod env;
mod ids;
pub mod init;
mod loader;
mod resolve;
mod scope;
mod symbols;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticLog, RelatedInfo, Severity, codes};
pub use enter::SymbolEnter;
pub use env::{Env, EnvNode};
pub use ids::{PackageId, ScopeId, SymbolId, TypeId};
pub use loader::{
    EnterError, LoadError, LoadState, MemorySource, PackageLoader, PackageSource,
};
pub use resolve::SymbolResolver;
pub use scope::Scope;
pub use symbols::{
    InvokableInfo, PackageName, Symbol, SymbolDetail, SymbolKind, SymbolTable, SymbolTag,
};
pub use types::{BuiltinTypes, InvokableType, StructField, StructType, Type, TypeTable};
