//! Spans resolved to line/column form for display.

use std::fmt;
use std::path::PathBuf;

/// A span translated into 1-based line/column coordinates.
///
/// This is the display form of a [`Span`](crate::Span): the renderer prints
/// it as `path:line:col` at the head of each diagnostic. Produced by
/// [`SourceDb::resolve_span`](crate::SourceDb::resolve_span); the end
/// coordinates point at the last character covered, not one past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The filesystem path (or synthetic buffer name) of the source file.
    pub file_path: PathBuf,
    /// The starting line number (1-indexed).
    pub start_line: u32,
    /// The starting column number (1-indexed).
    pub start_col: u32,
    /// The ending line number (1-indexed).
    pub end_line: u32,
    /// The ending column number (1-indexed).
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(start_line: u32, end_line: u32) -> ResolvedSpan {
        ResolvedSpan {
            file_path: PathBuf::from("rtl/top.v"),
            start_line,
            start_col: 5,
            end_line,
            end_col: 9,
        }
    }

    #[test]
    fn displays_start_position_only() {
        assert_eq!(format!("{}", resolved(10, 10)), "rtl/top.v:10:5");
        // Multi-line spans still anchor the header at their start.
        assert_eq!(format!("{}", resolved(3, 12)), "rtl/top.v:3:5");
    }
}
