//! Formatter options.

use serde::{Deserialize, Serialize};

/// Indentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indent {
    /// The given number of spaces per level.
    Spaces(u8),
    /// One tab per level.
    Tabs,
}

impl Indent {
    /// Returns the text for `level` levels of indentation.
    pub fn at(self, level: usize) -> String {
        match self {
            Indent::Spaces(n) => " ".repeat(n as usize * level),
            Indent::Tabs => "\t".repeat(level),
        }
    }
}

/// Options controlling the generated layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenOptions {
    /// Indentation per level. Default: 2 spaces.
    pub indent: Indent,
    /// Soft line-width target. A header that fits is emitted on one line;
    /// otherwise the port list breaks on commas, one port per line.
    pub line_width: u16,
    /// Pad port names to a common column in the module header.
    pub align_ports: bool,
    /// Pad declared names to a common column in wire/reg declarations.
    pub align_decls: bool,
    /// Re-emit source comments above the nearest following item.
    pub preserve_comments: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            indent: Indent::Spaces(2),
            line_width: 100,
            align_ports: false,
            align_decls: false,
            preserve_comments: true,
        }
    }
}
