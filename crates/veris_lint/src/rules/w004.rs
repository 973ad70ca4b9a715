//! W004: explicit sensitivity list on a combinational always block.

use veris_ast::{AlwaysKind, Module, Sensitivity};
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::LintRule;

/// Detects non-clocked always blocks that spell out a sensitivity list
/// instead of using `@(*)`.
///
/// Hand-written lists go stale as the body changes; `@(*)` cannot.
pub struct IncompleteSensitivity;

impl LintRule for IncompleteSensitivity {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 4)
    }

    fn name(&self) -> &str {
        "incomplete-sensitivity"
    }

    fn description(&self) -> &str {
        "combinational always block with an explicit sensitivity list"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        for always in &module.always_blocks {
            if always.kind == AlwaysKind::Combinational
                && matches!(always.sensitivity, Sensitivity::List(_))
            {
                sink.emit(Diagnostic::info(
                    self.code(),
                    "combinational always block lists signals explicitly; prefer '@(*)'",
                    always.span.unwrap_or(Span::DUMMY),
                ));
            }
        }
    }
}
