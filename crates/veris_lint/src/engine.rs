//! Lint engine that manages rule registration, configuration, and execution.

use std::collections::HashSet;

use veris_ast::Module;
use veris_config::LintConfig;
use veris_diagnostics::{DiagnosticSink, Severity};

use crate::rules::register_builtin_rules;
use crate::LintRule;

/// The lint engine that orchestrates running lint rules on modules.
///
/// Rules are registered at construction time, in a fixed order; diagnostics
/// are emitted in rule-registration order, then traversal order, so
/// identical input always yields an identical diagnostic list. The engine
/// respects the `LintConfig` to suppress rules (allow) or promote them to
/// error severity (deny).
pub struct LintEngine {
    rules: Vec<Box<dyn LintRule>>,
    denied: HashSet<String>,
    allowed: HashSet<String>,
}

impl LintEngine {
    /// Creates a new lint engine configured by the given `LintConfig`.
    pub fn new(config: &LintConfig) -> Self {
        let denied: HashSet<String> = config.deny.iter().cloned().collect();
        let allowed: HashSet<String> = config.allow.iter().cloned().collect();

        let mut engine = Self {
            rules: Vec::new(),
            denied,
            allowed,
        };

        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates a new lint engine with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&LintConfig::default())
    }

    /// Registers a lint rule with the engine.
    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs all enabled lint rules on every module.
    ///
    /// Rules listed in `allow` are skipped. Diagnostics from rules listed in
    /// `deny` are promoted to error severity before reaching `sink`.
    pub fn run(&self, modules: &[Module], sink: &DiagnosticSink) {
        for module in modules {
            for rule in &self.rules {
                if self.allowed.contains(rule.name()) {
                    continue;
                }

                // Capture through a temporary sink so denied rules can be
                // promoted before the diagnostics reach the caller.
                let temp_sink = DiagnosticSink::new();
                rule.check_module(module, &temp_sink);

                let is_denied = self.denied.contains(rule.name());
                for mut diag in temp_sink.take_all() {
                    if is_denied {
                        diag.severity = Severity::Error;
                    }
                    sink.emit(diag);
                }
            }
        }
    }
}
