//! W002: non-blocking assignment inside a combinational always block.

use veris_ast::{AlwaysKind, Module, Statement};
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::helpers::for_each_assignment;
use crate::LintRule;

/// Detects `<=` assignments inside `@(*)` or edge-free always blocks.
pub struct NonBlockingInCombinational;

impl LintRule for NonBlockingInCombinational {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 2)
    }

    fn name(&self) -> &str {
        "nonblocking-in-combinational"
    }

    fn description(&self) -> &str {
        "non-blocking assignment in a combinational always block"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        for always in &module.always_blocks {
            if always.kind != AlwaysKind::Combinational {
                continue;
            }
            for_each_assignment(&always.body, &mut |stmt| {
                if let Statement::NonBlocking { span, .. } = stmt {
                    sink.emit(Diagnostic::warning(
                        self.code(),
                        "non-blocking assignment in a combinational always block; use '='",
                        span.unwrap_or(Span::DUMMY),
                    ));
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_common::Interner;
    use veris_source::FileId;

    fn check(source: &str) -> Vec<Diagnostic> {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (modules, _) =
            veris_ast::parse_and_build(source, FileId::from_raw(0), &interner, &sink).unwrap();
        assert!(!sink.has_errors(), "parse errors: {:?}", sink.diagnostics());
        let rule_sink = DiagnosticSink::new();
        NonBlockingInCombinational.check_module(&modules[0], &rule_sink);
        rule_sink.take_all()
    }

    #[test]
    fn nonblocking_in_star_fires() {
        let diags = check(
            "module m(input d, output reg q);
                always @(*) q <= d;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(format!("{}", diags[0].effective_code()), "W002");
    }

    #[test]
    fn nonblocking_in_edge_free_list_fires() {
        let diags = check(
            "module m(input a, b, output reg y);
                always @(a or b) y <= a & b;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn blocking_in_combinational_ok() {
        let diags = check(
            "module m(input d, output reg q);
                always @(*) q = d;
            endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn nonblocking_in_clocked_ok() {
        let diags = check(
            "module m(input clk, d, output reg q);
                always @(posedge clk) q <= d;
            endmodule",
        );
        assert!(diags.is_empty());
    }
}
