//! W001: blocking assignment inside a clocked always block.

use veris_ast::{AlwaysKind, Module, Statement};
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::helpers::for_each_assignment;
use crate::LintRule;

/// Detects `=` assignments inside edge-sensitive always blocks.
///
/// Blocking assignments in sequential logic evaluate in statement order
/// rather than concurrently, which rarely matches the hardware intent.
pub struct BlockingInSequential;

impl LintRule for BlockingInSequential {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 1)
    }

    fn name(&self) -> &str {
        "blocking-in-sequential"
    }

    fn description(&self) -> &str {
        "blocking assignment in a clocked always block"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        for always in &module.always_blocks {
            if always.kind != AlwaysKind::Sequential {
                continue;
            }
            for_each_assignment(&always.body, &mut |stmt| {
                if let Statement::Blocking { span, .. } = stmt {
                    sink.emit(Diagnostic::warning(
                        self.code(),
                        "blocking assignment in a clocked always block; use '<='",
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
        BlockingInSequential.check_module(&modules[0], &rule_sink);
        rule_sink.take_all()
    }

    #[test]
    fn blocking_in_clocked_fires() {
        let diags = check(
            "module m(input clk, d, output reg q);
                always @(posedge clk) q = d;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(format!("{}", diags[0].effective_code()), "W001");
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
    fn nested_blocking_found() {
        let diags = check(
            "module m(input clk, rst, d, output reg q);
                always @(posedge clk) begin
                    if (rst)
                        q = 1'b0;
                    else
                        q <= d;
                end
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn negedge_counts_as_sequential() {
        let diags = check(
            "module m(input clk, d, output reg q);
                always @(negedge clk) q = d;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }
}
