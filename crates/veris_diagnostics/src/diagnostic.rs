//! Structured diagnostic messages with severity, codes, labels, and suggestions.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use veris_source::Span;

/// A structured diagnostic message with source locations and suggestions.
///
/// Diagnostics are the only channel for reporting user-source problems:
/// lexer, parser, lint, FSM validator, and the external-tool adapter all
/// produce them. Each diagnostic includes:
/// - A severity level and (usually) a stable code
/// - A primary message and source span
/// - Optional secondary labels, notes, and an actionable suggestion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The stable code identifying the type of diagnostic. When a producer
    /// supplies none, the renderer infers one from the message.
    pub code: Option<DiagnosticCode>,
    /// The main diagnostic message.
    pub message: String,
    /// The primary source span where the issue was detected.
    pub primary_span: Span,
    /// Additional annotated source spans providing context.
    pub labels: Vec<Label>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// An actionable suggestion, rendered as `help: ...`.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            code: Some(code),
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
            suggestion: None,
        }
    }

    /// Creates a new error diagnostic with the given code, message, and span.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    /// Creates a new warning diagnostic with the given code, message, and span.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    /// Creates a new info diagnostic with the given code, message, and span.
    pub fn info(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Info, code, message, span)
    }

    /// Creates a new hint diagnostic with the given code, message, and span.
    pub fn hint(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Hint, code, message, span)
    }

    /// Creates a diagnostic without a code; the renderer will infer one.
    pub fn uncoded(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
            suggestion: None,
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the suggestion for this diagnostic.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns this diagnostic's code, inferring one from the severity and
    /// message when the producer supplied none.
    pub fn effective_code(&self) -> DiagnosticCode {
        self.code
            .unwrap_or_else(|| DiagnosticCode::infer(self.severity, &self.message))
    }
}
