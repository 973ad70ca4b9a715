//! Diagnostic severity levels.

use crate::code::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
///
/// Declaration order runs from least to most severe, so the derived
/// ordering lets callers filter with comparisons (`>= Severity::Warning`).
/// Serialized lowercase; this is the editor's wire format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A stylistic nudge; nothing is wrong.
    Hint,
    /// Context the user may want, emitted alongside real findings.
    Info,
    /// Likely a problem, but analysis and generation continue.
    Warning,
    /// A definite problem in the source.
    Error,
}

impl Severity {
    /// `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// The lowercase name used in rendered diagnostics and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// The code category whose prefix matches this severity, used when a
    /// diagnostic arrives without a code and one must be inferred.
    pub fn category(self) -> Category {
        match self {
            Severity::Hint => Category::Hint,
            Severity::Info => Category::Info,
            Severity::Warning => Category::Warning,
            Severity::Error => Category::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_follow_declaration_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Hint);
        assert!(Severity::Warning >= Severity::Warning);
    }

    #[test]
    fn names() {
        for (severity, name) in [
            (Severity::Hint, "hint"),
            (Severity::Info, "info"),
            (Severity::Warning, "warning"),
            (Severity::Error, "error"),
        ] {
            assert_eq!(severity.as_str(), name);
            assert_eq!(format!("{severity}"), name);
        }
    }

    #[test]
    fn category_prefix_matches_severity() {
        assert_eq!(Severity::Error.category().prefix(), 'E');
        assert_eq!(Severity::Warning.category().prefix(), 'W');
        assert_eq!(Severity::Info.category().prefix(), 'I');
        assert_eq!(Severity::Hint.category().prefix(), 'H');
    }

    #[test]
    fn only_error_is_error() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Info.is_error());
        assert!(!Severity::Hint.is_error());
    }

    #[test]
    fn serde_wire_format() {
        assert_eq!(serde_json::to_string(&Severity::Hint).unwrap(), "\"hint\"");
        let back: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Severity::Error);
    }
}
