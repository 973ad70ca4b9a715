//! Lint rules and engine for static analysis of Verilog modules.
//!
//! Rules operate on the typed AST and emit structured diagnostics; none of
//! them ever aborts analysis. The engine honors allow/deny lists from the
//! project configuration.

#![warn(missing_docs)]

pub mod engine;
pub mod helpers;
pub mod rules;

pub use engine::LintEngine;

use veris_ast::Module;
use veris_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};

/// A single lint rule.
///
/// Rules are stateless objects registered with the [`LintEngine`]. Each rule
/// owns a stable diagnostic code and a default severity; the engine may
/// promote a denied rule to error severity.
pub trait LintRule {
    /// The stable diagnostic code this rule emits.
    fn code(&self) -> DiagnosticCode;

    /// The rule's name, used in allow/deny configuration.
    fn name(&self) -> &str;

    /// A one-line description of what the rule detects.
    fn description(&self) -> &str;

    /// The severity used when the rule is neither allowed nor denied.
    fn default_severity(&self) -> Severity;

    /// Checks one module, emitting zero or more diagnostics.
    fn check_module(&self, module: &Module, sink: &DiagnosticSink);
}
