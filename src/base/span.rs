//! Source positions attached to declarations and diagnostics.

use std::fmt;

pub use text_size::TextRange;
pub use text_size::TextSize;

use super::FileId;

/// A byte range inside one compilation unit.
///
/// Synthesized nodes (init functions, their return statements) reuse the
/// position of the container they were generated for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Pos {
    pub file: FileId,
    pub range: TextRange,
}

impl Pos {
    #[inline]
    pub const fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// Position covering `start..end` in `file`.
    pub fn at(file: FileId, start: u32, end: u32) -> Self {
        Self::new(file, TextRange::new(start.into(), end.into()))
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}",
            self.file,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}
