//! Typed abstract syntax tree for the Verilog subset, and its builder.
//!
//! The AST is the semantic model consumed by the generator, the lint
//! validator, and the FSM extractor. Unlike the CST it partitions module
//! items into typed lists (ports, declarations, always blocks, continuous
//! assignments, instances), resolves identifiers to plain strings, and drops
//! surface artifacts such as parentheses.
//!
//! [`build::build_modules`] lowers a parsed CST into this model. User-source
//! errors were already reported by the parser; the builder only fails: with
//! [`veris_common::InternalError`]: when it observes a tree shape the
//! parser cannot legally produce.

#![warn(missing_docs)]

pub mod build;
pub mod expr;
pub mod module;
pub mod stmt;

pub use build::{build_modules, parse_and_build};
pub use expr::{BinaryOp, Expression, Range, SizedLiteral, UnaryOp};
pub use module::{
    AlwaysBlock, AlwaysKind, Connection, ContinuousAssign, Declaration, Direction, Edge,
    InitialBlock, Instance, Module, NetKind, PortDeclaration, Sensitivity, SensitivityItem,
};
pub use stmt::{CaseItem, CaseKind, CaseStatement, Statement};
