//! Aggregated analysis reports.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// An ordered aggregation of the diagnostics produced by one analysis run.
///
/// Errors and warnings are kept in separate lists, each preserving emission
/// order. Info and hint diagnostics are grouped with warnings for reporting
/// purposes; the full severity is retained on each entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// Error-severity diagnostics, in emission order.
    pub errors: Vec<Diagnostic>,
    /// All non-error diagnostics (warning, info, hint), in emission order.
    pub warnings: Vec<Diagnostic>,
}

impl Report {
    /// Builds a report from a diagnostic list, preserving order.
    pub fn from_diagnostics(diags: Vec<Diagnostic>) -> Self {
        let mut report = Report::default();
        for diag in diags {
            if diag.severity == Severity::Error {
                report.errors.push(diag);
            } else {
                report.warnings.push(diag);
            }
        }
        report
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings (including info and hints).
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Returns `true` if the report contains no diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Returns a one-line summary, e.g. `"2 errors, 1 warning"`.
    pub fn summary(&self) -> String {
        fn plural(n: usize, word: &str) -> String {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        }
        if self.is_clean() {
            return "no issues found".to_string();
        }
        match (self.errors.len(), self.warnings.len()) {
            (0, w) => plural(w, "warning"),
            (e, 0) => plural(e, "error"),
            (e, w) => format!("{}, {}", plural(e, "error"), plural(w, "warning")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use veris_source::Span;

    fn err() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::new(Category::Error, 101), "e", Span::DUMMY)
    }

    fn warn() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Warning, 1), "w", Span::DUMMY)
    }

    fn info() -> Diagnostic {
        Diagnostic::info(DiagnosticCode::new(Category::Info, 1), "i", Span::DUMMY)
    }

    #[test]
    fn partition_by_severity() {
        let report = Report::from_diagnostics(vec![err(), warn(), info(), err()]);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn order_preserved() {
        let mut a = err();
        a.message = "first".into();
        let mut b = err();
        b.message = "second".into();
        let report = Report::from_diagnostics(vec![a, b]);
        assert_eq!(report.errors[0].message, "first");
        assert_eq!(report.errors[1].message, "second");
    }

    #[test]
    fn summary_lines() {
        assert_eq!(Report::from_diagnostics(vec![]).summary(), "no issues found");
        assert_eq!(Report::from_diagnostics(vec![err()]).summary(), "1 error");
        assert_eq!(
            Report::from_diagnostics(vec![err(), err(), warn()]).summary(),
            "2 errors, 1 warning"
        );
        assert_eq!(Report::from_diagnostics(vec![warn(), warn()]).summary(), "2 warnings");
    }

    #[test]
    fn serde_roundtrip() {
        let report = Report::from_diagnostics(vec![err(), warn()]);
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error_count(), 1);
        assert_eq!(back.warning_count(), 1);
    }
}
