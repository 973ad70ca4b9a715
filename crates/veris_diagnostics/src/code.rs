//! Diagnostic codes with category prefixes for structured error identification.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category maps to a single-character prefix used in diagnostic code
/// display (e.g., `E101` for an error, `W003` for a warning).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Informational diagnostics, prefixed with `I`.
    Info,
    /// Hint diagnostics, prefixed with `H`.
    Hint,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Info => 'I',
            Category::Hint => 'H',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric
/// identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `E101`, `W003`, `I001`. Codes are stable across releases so the
/// embedding editor can key quick-fixes and documentation off them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// `E001`: general syntax error.
    pub const SYNTAX_ERROR: DiagnosticCode = DiagnosticCode {
        category: Category::Error,
        number: 1,
    };

    /// `E002`: unexpected token.
    pub const UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode {
        category: Category::Error,
        number: 2,
    };

    /// `E003`: missing token.
    pub const MISSING_TOKEN: DiagnosticCode = DiagnosticCode {
        category: Category::Error,
        number: 3,
    };

    /// Infers a diagnostic code from a message when the producer supplied
    /// none, falling back to a generic per-severity code.
    ///
    /// Keyword matching mirrors the codes of the parser: "syntax" maps to
    /// E001, "unexpected" to E002, "missing"/"expected" to E003.
    pub fn infer(severity: Severity, message: &str) -> DiagnosticCode {
        let lower = message.to_ascii_lowercase();
        if severity == Severity::Error {
            if lower.contains("syntax") {
                return Self::SYNTAX_ERROR;
            }
            if lower.contains("unexpected") {
                return Self::UNEXPECTED_TOKEN;
            }
            if lower.contains("missing") || lower.contains("expected") {
                return Self::MISSING_TOKEN;
            }
        }
        DiagnosticCode::new(severity.category(), 0)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Info.prefix(), 'I');
        assert_eq!(Category::Hint.prefix(), 'H');
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Error, 101)), "E101");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Warning, 3)), "W003");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Info, 1)), "I001");
    }

    #[test]
    fn infer_from_keywords() {
        assert_eq!(
            DiagnosticCode::infer(Severity::Error, "syntax error near 'endmodule'"),
            DiagnosticCode::SYNTAX_ERROR
        );
        assert_eq!(
            DiagnosticCode::infer(Severity::Error, "unexpected token ';'"),
            DiagnosticCode::UNEXPECTED_TOKEN
        );
        assert_eq!(
            DiagnosticCode::infer(Severity::Error, "expected identifier, found 'wire'"),
            DiagnosticCode::MISSING_TOKEN
        );
    }

    #[test]
    fn infer_generic_fallback() {
        assert_eq!(
            DiagnosticCode::infer(Severity::Warning, "something odd"),
            DiagnosticCode::new(Category::Warning, 0)
        );
        assert_eq!(
            DiagnosticCode::infer(Severity::Hint, "consider renaming"),
            DiagnosticCode::new(Category::Hint, 0)
        );
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Error, 101);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
