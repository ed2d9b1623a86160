//! Foundation types for the Lumen front end.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`FileId`] - Compilation unit identifiers
//! - [`Pos`], [`TextRange`], [`TextSize`] - Source positions
//! - [`Name`], [`Interner`] - String interning
//!
//! This module has NO dependencies on other lumen modules.

mod file_id;
mod intern;
mod span;

pub use file_id::FileId;
pub use intern::{Interner, Name};
pub use span::{Pos, TextRange, TextSize};
