//! E102: multi-driven signal: more than one driver for the same signal.

use std::collections::HashMap;

use veris_ast::Module;
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use veris_source::Span;

use crate::helpers::{collect_target_names, collect_written_names};
use crate::LintRule;

/// Detects signals driven by more than one source.
///
/// Each continuous assignment counts as one driver, and each always block
/// counts as one driver regardless of how many assignments it contains -
/// assigning the same reg on several paths inside one block is normal.
pub struct MultiDrivenSignal;

impl LintRule for MultiDrivenSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 102)
    }

    fn name(&self) -> &str {
        "multi-driven-signal"
    }

    fn description(&self) -> &str {
        "signal is driven by more than one source"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        // name -> (driver count, span of the last driver seen)
        let mut drivers: HashMap<String, (usize, Option<Span>)> = HashMap::new();

        for assign in &module.assigns {
            let mut targets = std::collections::HashSet::new();
            collect_target_names(&assign.target, &mut targets);
            for name in targets {
                let entry = drivers.entry(name).or_insert((0, None));
                entry.0 += 1;
                entry.1 = assign.span;
            }
        }

        for always in &module.always_blocks {
            let mut written = std::collections::HashSet::new();
            collect_written_names(&always.body, &mut written);
            for name in written {
                let entry = drivers.entry(name).or_insert((0, None));
                entry.0 += 1;
                entry.1 = always.span;
            }
        }

        let mut multi: Vec<(&String, &(usize, Option<Span>))> =
            drivers.iter().filter(|(_, (count, _))| *count > 1).collect();
        // HashMap order is arbitrary; report in name order for determinism.
        multi.sort_by_key(|(name, _)| name.as_str());

        for (name, (count, span)) in multi {
            sink.emit(Diagnostic::error(
                self.code(),
                format!("signal '{name}' is driven by {count} sources"),
                span.unwrap_or(Span::DUMMY),
            ));
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
        MultiDrivenSignal.check_module(&modules[0], &rule_sink);
        rule_sink.take_all()
    }

    #[test]
    fn two_assigns_fire() {
        let diags = check(
            "module m(input a, b, output w);
                assign w = a;
                assign w = b;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'w'"));
        assert!(diags[0].message.contains("2 sources"));
    }

    #[test]
    fn assign_plus_always_fires() {
        let diags = check(
            "module m(input clk, a);
                reg q;
                always @(posedge clk) q <= a;
                assign q = a;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn multiple_paths_in_one_block_ok() {
        let diags = check(
            "module m(input clk, s, a, b);
                reg q;
                always @(posedge clk) begin
                    if (s)
                        q <= a;
                    else
                        q <= b;
                end
            endmodule",
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn two_always_blocks_fire() {
        let diags = check(
            "module m(input clk, a);
                reg q;
                always @(posedge clk) q <= a;
                always @(posedge clk) q <= ~a;
            endmodule",
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn distinct_signals_ok() {
        let diags = check(
            "module m(input a, output x, y);
                assign x = a;
                assign y = ~a;
            endmodule",
        );
        assert!(diags.is_empty());
    }
}
