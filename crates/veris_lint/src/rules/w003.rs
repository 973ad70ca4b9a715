//! W003: case statement without a default arm.

use veris_ast::Module;
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::helpers::for_each_case;
use crate::LintRule;

/// Detects `case`/`casex`/`casez` statements that have no `default` arm.
///
/// Without a default, unmatched selector values leave the targets
/// unassigned, which infers a latch in combinational logic.
pub struct MissingDefaultCase;

impl LintRule for MissingDefaultCase {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 3)
    }

    fn name(&self) -> &str {
        "missing-default-case"
    }

    fn description(&self) -> &str {
        "case statement has no default arm"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        let bodies = module
            .always_blocks
            .iter()
            .map(|a| &a.body)
            .chain(module.initial_blocks.iter().map(|i| &i.body));
        for body in bodies {
            for_each_case(body, &mut |case| {
                if !case.has_default() {
                    sink.emit(Diagnostic::warning(
                        self.code(),
                        format!("{} statement has no default arm", case.kind.keyword()),
                        case.span.unwrap_or(Span::DUMMY),
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
        MissingDefaultCase.check_module(&modules[0], &rule_sink);
        rule_sink.take_all()
    }

    #[test]
    fn case_without_default_fires() {
        let diags = check(
            "module m(input [1:0] s, output reg y);
                always @(*) begin
                    case (s)
                        2'b00: y = 1'b0;
                        2'b01: y = 1'b1;
                    endcase
                end
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(format!("{}", diags[0].effective_code()), "W003");
    }

    #[test]
    fn case_with_default_ok() {
        let diags = check(
            "module m(input [1:0] s, output reg y);
                always @(*) begin
                    case (s)
                        2'b00: y = 1'b0;
                        default: y = 1'b1;
                    endcase
                end
            endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn casez_checked_too() {
        let diags = check(
            "module m(input [1:0] s, output reg y);
                always @(*) begin
                    casez (s)
                        2'b0?: y = 1'b0;
                    endcase
                end
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("casez"));
    }

    #[test]
    fn nested_case_found() {
        let diags = check(
            "module m(input [1:0] s, t, output reg y);
                always @(*) begin
                    case (s)
                        2'b00:
                            case (t)
                                2'b00: y = 1'b0;
                            endcase
                        default: y = 1'b1;
                    endcase
                end
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }
}
