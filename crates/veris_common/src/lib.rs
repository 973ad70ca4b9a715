//! Shared foundational types for the Veris Verilog toolkit.
//!
//! This crate provides interned name handles, Verilog identifier
//! validation for names that arrive from outside the lexer, and the
//! internal-error result types used by every other crate in the workspace.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{is_valid_identifier, Ident, Interner};
pub use result::{InternalError, VerisResult};
