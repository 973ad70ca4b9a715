//! Byte-offset ranges within source files.
//!
//! Tokens, CST/AST nodes, and diagnostics all carry a `Span` pointing back
//! at the text they came from. Synthetic artifacts with no backing file
//! (FSM-model diagnostics, editor-built trees) use [`Span::DUMMY`]; span
//! arithmetic tolerates it so real and synthetic locations can mix.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in one source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The source file this span belongs to.
    pub file: FileId,
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// The span used when no source location exists.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// A span over `start..end` in `file`.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// A zero-length span at `offset`, e.g. the end-of-file position.
    pub fn point(file: FileId, offset: u32) -> Self {
        Self {
            file,
            start: offset,
            end: offset,
        }
    }

    /// The smallest span covering both `self` and `other`.
    ///
    /// A dummy operand drops out: merging with [`Span::DUMMY`] returns the
    /// real span unchanged, so nodes assembled from mixed real and
    /// synthetic parts keep whatever location information exists.
    ///
    /// # Panics
    ///
    /// Panics when both spans are real but point into different files.
    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        assert_eq!(
            self.file, other.file,
            "cannot merge spans from different files"
        );
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The number of bytes covered.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// `true` for zero-length spans (points and [`Span::DUMMY`]).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `true` when this span has no backing file.
    pub fn is_dummy(&self) -> bool {
        self.file.is_dummy()
    }
}
