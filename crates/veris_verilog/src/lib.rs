//! Verilog-2005-subset lexer, concrete syntax tree, and parser.
//!
//! The supported subset covers modules with ANSI-style port lists, wire /
//! reg / integer / parameter / localparam declarations, continuous assigns,
//! always and initial blocks, if/else, case/casex/casez, blocking and
//! non-blocking assignments, and the conventional expression operators.
//! Constructs outside the subset (functions, tasks, generate blocks, UDPs)
//! are rejected with located parse errors; parsing always continues.

#![warn(missing_docs)]

pub mod cst;
pub mod lexer;
pub mod parser;
pub mod token;

mod decl;
mod expr;
mod stmt;

pub use lexer::{lex, Comment, CommentKind, LexOutput};
pub use parser::VerilogParser;

use veris_common::Interner;
use veris_diagnostics::DiagnosticSink;
use veris_source::FileId;

/// Lexes and parses a source string in one step.
///
/// Returns the concrete syntax tree together with the comment stream. All
/// lex and parse diagnostics are reported to `sink`; the tree is always
/// produced, possibly containing `Error` nodes after recovery.
pub fn parse_source(
    source: &str,
    file: FileId,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> (cst::SourceUnit, Vec<Comment>) {
    let output = lex(source, file, sink);
    let mut parser = VerilogParser::new(output.tokens, source, file, interner, sink);
    (parser.parse_source_unit(), output.comments)
}
