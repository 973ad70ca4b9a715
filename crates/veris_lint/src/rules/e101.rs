//! E101: undriven signal: a declared wire/reg is never assigned.

use std::collections::HashSet;

use veris_ast::{Declaration, Direction, Module};
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use veris_source::Span;

use crate::helpers::{collect_target_names, collect_written_names};
use crate::LintRule;

/// Detects declared wires/regs that never appear as an assignment target.
///
/// Input ports are exempt (externally driven); output ports are not. A
/// signal connected to a submodule instance is treated as driven, since the
/// instance's port directions are not known at this level.
pub struct UndrivenSignal;

impl LintRule for UndrivenSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 101)
    }

    fn name(&self) -> &str {
        "undriven-signal"
    }

    fn description(&self) -> &str {
        "declared signal is never driven"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &Module, sink: &DiagnosticSink) {
        let driven = driven_names(module);

        // Output ports must be driven from inside the module.
        for port in &module.ports {
            if port.direction == Direction::Output && !driven.contains(&port.name) {
                sink.emit(Diagnostic::error(
                    self.code(),
                    format!("output '{}' is never driven", port.name),
                    port.span.unwrap_or(Span::DUMMY),
                ));
            }
        }

        // Body wires and regs, unless they shadow a port name.
        let port_names: HashSet<&str> = module.ports.iter().map(|p| p.name.as_str()).collect();
        for decl in &module.declarations {
            let names = match decl {
                Declaration::Wire { names, .. } | Declaration::Reg { names, .. } => names,
                _ => continue,
            };
            for name in names {
                if !driven.contains(name) && !port_names.contains(name.as_str()) {
                    let span = decl.span().unwrap_or(Span::DUMMY);
                    sink.emit(
                        Diagnostic::error(
                            self.code(),
                            format!("signal '{name}' is never driven"),
                            span,
                        )
                        .with_label(Label::primary(span, "declared here, never assigned")),
                    );
                }
            }
        }
    }
}

/// Every name that appears as an assignment target or instance connection.
pub(crate) fn driven_names(module: &Module) -> HashSet<String> {
    let mut driven = HashSet::new();
    for assign in &module.assigns {
        collect_target_names(&assign.target, &mut driven);
    }
    for always in &module.always_blocks {
        collect_written_names(&always.body, &mut driven);
    }
    for initial in &module.initial_blocks {
        collect_written_names(&initial.body, &mut driven);
    }
    for inst in &module.instances {
        for conn in &inst.connections {
            if let Some(actual) = &conn.actual {
                collect_target_names(actual, &mut driven);
            }
        }
    }
    driven
}
