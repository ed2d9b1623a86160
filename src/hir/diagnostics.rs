//! Semantic error reporting for the symbol-entry pass.
//!
//! Every recoverable problem the pass finds ends up here as a [`Diagnostic`].
//! The log is append-only and infallible; callers read it once the pass
//! returns to decide whether compilation proceeds.

use std::fmt;
use std::sync::Arc;

use crate::base::{FileId, Pos};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Pos,
    pub severity: Severity,
    /// Stable code from [`codes`].
    pub code: &'static str,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// A secondary location, e.g. the earlier of two duplicate declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub pos: Pos,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(pos: Pos, code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            pos,
            severity: Severity::Error,
            code,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn warning(pos: Pos, code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(pos, code, message)
        }
    }

    pub fn with_related(mut self, pos: Pos, message: impl Into<Arc<str>>) -> Self {
        self.related.push(RelatedInfo {
            pos,
            message: message.into(),
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}[{}] {}: {}", level, self.code, self.pos, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for symbol-entry errors.
pub mod codes {
    /// A type reference names nothing visible.
    pub const UNKNOWN_TYPE: &str = "E0001";
    /// Two declarations share a name in one scope.
    pub const DUPLICATE_DEFINITION: &str = "E0004";
    /// Import graph loops back to a package still being entered.
    pub const CIRCULAR_IMPORT: &str = "E0007";
    /// Method receiver is not a struct type.
    pub const RECEIVER_NOT_STRUCT: &str = "E0101";
    /// Method receiver is a struct from another package.
    pub const RECEIVER_NOT_LOCAL: &str = "E0102";
    /// A method has the same name as a field of its receiver struct.
    pub const FIELD_METHOD_CLASH: &str = "E0103";
    /// A qualified type uses an alias that is not an imported package.
    pub const UNKNOWN_PACKAGE: &str = "E0104";
    /// The package loader could not provide an imported package.
    pub const IMPORT_FAILED: &str = "E0105";
}

// ============================================================================
// DIAGNOSTIC LOG
// ============================================================================

/// Collects diagnostics during semantic analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = diagnostic.code, pos = %diagnostic.pos, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Report an error at `pos`.
    pub fn report(&mut self, pos: Pos, code: &'static str, message: impl Into<Arc<str>>) {
        self.add(Diagnostic::error(pos, code, message));
    }

    pub fn duplicate_definition(&mut self, pos: Pos, kind: &str, name: &str, previous: Pos) {
        self.add(
            Diagnostic::error(
                pos,
                codes::DUPLICATE_DEFINITION,
                format!("redeclared {} '{}'", kind, name),
            )
            .with_related(previous, format!("previous definition of '{}'", name)),
        );
    }

    pub fn unknown_type(&mut self, pos: Pos, name: &str) {
        self.report(pos, codes::UNKNOWN_TYPE, format!("unknown type '{}'", name));
    }

    pub fn unknown_package(&mut self, pos: Pos, alias: &str) {
        self.report(
            pos,
            codes::UNKNOWN_PACKAGE,
            format!("undefined package '{}'", alias),
        );
    }

    pub fn receiver_not_struct(&mut self, pos: Pos, func: &str, ty: &str) {
        self.report(
            pos,
            codes::RECEIVER_NOT_STRUCT,
            format!("cannot define function '{}' on non-struct type '{}'", func, ty),
        );
    }

    pub fn receiver_not_local(&mut self, pos: Pos, func: &str, ty: &str) {
        self.report(
            pos,
            codes::RECEIVER_NOT_LOCAL,
            format!(
                "cannot define function '{}' on struct '{}' declared in another package",
                func, ty
            ),
        );
    }

    pub fn field_method_clash(&mut self, pos: Pos, func: &str, ty: &str) {
        self.report(
            pos,
            codes::FIELD_METHOD_CLASH,
            format!("struct '{}' already has a field named '{}'", ty, func),
        );
    }

    pub fn circular_import(&mut self, pos: Pos, package: &str) {
        self.report(
            pos,
            codes::CIRCULAR_IMPORT,
            format!("cyclic import of package '{}'", package),
        );
    }

    pub fn import_failed(&mut self, pos: Pos, package: &str, reason: &str) {
        self.report(
            pos,
            codes::IMPORT_FAILED,
            format!("cannot import package '{}': {}", package, reason),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.pos.file == file).collect()
    }

    /// Diagnostics carrying `code`.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the log empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(file: u32) -> Pos {
        Pos::at(FileId::new(file), 0, 1)
    }

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error(pos(0), codes::UNKNOWN_TYPE, "test error");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, "E0001");
    }

    #[test]
    fn test_log_counts() {
        let mut log = DiagnosticLog::new();
        log.report(pos(0), codes::UNKNOWN_TYPE, "error 1");
        log.report(pos(0), codes::UNKNOWN_TYPE, "error 2");
        log.add(Diagnostic::warning(pos(0), codes::UNKNOWN_TYPE, "warning 1"));

        assert_eq!(log.error_count(), 2);
        assert_eq!(log.len(), 3);
        assert!(log.has_errors());
    }

    #[test]
    fn test_log_by_file() {
        let mut log = DiagnosticLog::new();
        log.report(pos(0), codes::UNKNOWN_TYPE, "file 0");
        log.report(pos(1), codes::UNKNOWN_TYPE, "file 1");
        log.report(pos(0), codes::UNKNOWN_TYPE, "file 0 again");

        assert_eq!(log.for_file(FileId::new(0)).len(), 2);
        assert_eq!(log.for_file(FileId::new(1)).len(), 1);
    }

    #[test]
    fn test_duplicate_points_at_previous_definition() {
        let mut log = DiagnosticLog::new();
        log.duplicate_definition(pos(1), "struct", "Point", pos(0));

        let diag = &log.diagnostics()[0];
        assert_eq!(diag.code, codes::DUPLICATE_DEFINITION);
        assert_eq!(diag.message.as_ref(), "redeclared struct 'Point'");
        assert_eq!(diag.related[0].pos, pos(0));
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::error(pos(2), codes::UNKNOWN_TYPE, "unknown type 'T'");
        assert_eq!(diag.to_string(), "error[E0001] file#2:0..1: unknown type 'T'");
    }

    #[test]
    fn test_take_empties_log() {
        let mut log = DiagnosticLog::new();
        log.report(pos(0), codes::UNKNOWN_TYPE, "x");
        assert_eq!(log.take().len(), 1);
        assert!(log.is_empty());
    }
}
