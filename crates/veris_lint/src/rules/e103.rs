//! E103: undefined signal: a select references an undeclared name.

use std::collections::HashSet;

use veris_ast::{Expression, Module, Statement};
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::helpers::declared_names;
use crate::LintRule;

/// Detects bit/range selects whose base name resolves to no port,
/// declaration, or parameter.
///
/// An unresolved select base is a warning, not a parse error: the module may
/// legitimately reference signals supplied by an enclosing context the
/// analyzer cannot see.
pub struct UndefinedSignal;

impl LintRule for UndefinedSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 103)
    }

    fn name(&self) -> &str {
        "undefined-signal"
    }

    fn description(&self) -> &str {
        "bit/range select references an undeclared signal"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        let declared = declared_names(module);
        let mut report = |name: &str, span: Option<Span>| {
            if !declared.contains(name) {
                sink.emit(Diagnostic::warning(
                    self.code(),
                    format!("signal '{name}' is not declared"),
                    span.unwrap_or(Span::DUMMY),
                ));
            }
        };

        for assign in &module.assigns {
            check_expr(&assign.target, assign.span, &mut report);
            check_expr(&assign.value, assign.span, &mut report);
        }
        for always in &module.always_blocks {
            check_stmt(&always.body, &mut report);
        }
        for initial in &module.initial_blocks {
            check_stmt(&initial.body, &mut report);
        }
    }
}

fn check_stmt(stmt: &Statement, report: &mut impl FnMut(&str, Option<Span>)) {
    match stmt {
        Statement::Blocking {
            target,
            value,
            span,
        }
        | Statement::NonBlocking {
            target,
            value,
            span,
        } => {
            check_expr(target, *span, report);
            check_expr(value, *span, report);
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
            span,
        } => {
            check_expr(condition, *span, report);
            check_stmt(then_branch, report);
            if let Some(e) = else_branch {
                check_stmt(e, report);
            }
        }
        Statement::Case(case) => {
            check_expr(&case.selector, case.span, report);
            for item in &case.items {
                for v in &item.values {
                    check_expr(v, item.span, report);
                }
                for s in &item.body {
                    check_stmt(s, report);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                check_stmt(s, report);
            }
        }
    }
}

/// Reports unresolved select bases, recursing into sub-expressions.
fn check_expr(expr: &Expression, span: Option<Span>, report: &mut impl FnMut(&str, Option<Span>)) {
    match expr {
        Expression::BitSelect { signal, index } => {
            report(signal, span);
            check_expr(index, span, report);
        }
        Expression::RangeSelect { signal, msb, lsb } => {
            report(signal, span);
            check_expr(msb, span, report);
            check_expr(lsb, span, report);
        }
        Expression::Binary { left, right, .. } => {
            check_expr(left, span, report);
            check_expr(right, span, report);
        }
        Expression::Unary { operand, .. } => check_expr(operand, span, report),
        Expression::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            check_expr(condition, span, report);
            check_expr(then_expr, span, report);
            check_expr(else_expr, span, report);
        }
        Expression::Concat { elements } => {
            for e in elements {
                check_expr(e, span, report);
            }
        }
        Expression::Replication { count, elements } => {
            check_expr(count, span, report);
            for e in elements {
                check_expr(e, span, report);
            }
        }
        Expression::Identifier { .. }
        | Expression::Number { .. }
        | Expression::StringLiteral { .. } => {}
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
        UndefinedSignal.check_module(&modules[0], &rule_sink);
        rule_sink.take_all()
    }

    #[test]
    fn undeclared_select_base_fires() {
        let diags = check("module m(output w); assign w = data[3]; endmodule");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(format!("{}", diags[0].effective_code()), "E103");
        assert!(diags[0].message.contains("'data'"));
    }

    #[test]
    fn declared_select_base_ok() {
        let diags = check(
            "module m(input [7:0] data, output w);
                assign w = data[3];
            endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn range_select_checked() {
        let diags = check("module m(output [3:0] v); assign v = bus[7:4]; endmodule");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'bus'"));
    }

    #[test]
    fn select_inside_always_checked() {
        let diags = check(
            "module m(input clk, output reg q);
                always @(posedge clk) q <= mem[0];
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'mem'"));
    }

    #[test]
    fn plain_identifier_not_flagged() {
        // Only select bases are checked; free identifiers may come from an
        // enclosing context.
        let diags = check("module m(output w); assign w = mystery; endmodule");
        assert!(diags.is_empty());
    }

    #[test]
    fn parameter_base_ok() {
        let diags = check(
            "module m(output w);
                localparam [3:0] MASK = 4'b1010;
                assign w = MASK[0];
            endmodule",
        );
        assert!(diags.is_empty());
    }
}
