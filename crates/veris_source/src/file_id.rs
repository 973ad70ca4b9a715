//! Handles for source files loaded into an analysis session.

use serde::{Deserialize, Serialize};

/// Identifies one file inside a [`SourceDb`](crate::SourceDb).
///
/// Spans embed a `FileId` rather than a path, keeping them `Copy` and
/// letting one diagnostic stream cover several buffers. The reserved
/// [`FileId::DUMMY`] marks synthetic locations with no backing file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// The id used for synthetic spans (FSM-model diagnostics, fabricated
    /// test trees).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Builds a `FileId` from its raw value. Real ids are handed out by the
    /// source database as files are loaded.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this id.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// `true` when this is the reserved synthetic id.
    pub fn is_dummy(self) -> bool {
        self == FileId::DUMMY
    }
}
