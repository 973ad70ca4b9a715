//! Diagnostic creation, severity management, and rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels, stable error codes, source labels, and suggestions. The
//! thread-safe [`DiagnosticSink`] accumulates diagnostics during analysis,
//! [`Report`] aggregates them for callers, and [`SnippetRenderer`] formats
//! them with source excerpts and caret markers.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod report;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::SnippetRenderer;
pub use report::Report;
pub use severity::Severity;
pub use sink::DiagnosticSink;
