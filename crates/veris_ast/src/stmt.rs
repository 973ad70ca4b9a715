//! Statement nodes of the typed AST.

use crate::expr::Expression;
use serde::{Deserialize, Serialize};
use veris_source::Span;

/// A procedural statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A blocking assignment (`a = b;`).
    Blocking {
        /// Target expression.
        target: Expression,
        /// Value expression.
        value: Expression,
        /// Source location.
        span: Option<Span>,
    },
    /// A non-blocking assignment (`q <= d;`).
    NonBlocking {
        /// Target expression.
        target: Expression,
        /// Value expression.
        value: Expression,
        /// Source location.
        span: Option<Span>,
    },
    /// An `if` statement.
    If {
        /// The condition.
        condition: Expression,
        /// The then branch.
        then_branch: Box<Statement>,
        /// The else branch, if any.
        else_branch: Option<Box<Statement>>,
        /// Source location.
        span: Option<Span>,
    },
    /// A case statement.
    Case(CaseStatement),
    /// A `begin ... end` block.
    BeginEnd {
        /// The contained statements.
        statements: Vec<Statement>,
        /// Source location.
        span: Option<Span>,
    },
}

impl Statement {
    /// Returns this statement's source location.
    pub fn span(&self) -> Option<Span> {
        match self {
            Statement::Blocking { span, .. }
            | Statement::NonBlocking { span, .. }
            | Statement::If { span, .. }
            | Statement::BeginEnd { span, .. } => *span,
            Statement::Case(case) => case.span,
        }
    }

    /// Clears source locations, recursively.
    pub fn strip_spans(&mut self) {
        match self {
            Statement::Blocking { span, .. } | Statement::NonBlocking { span, .. } => {
                *span = None;
            }
            Statement::If {
                then_branch,
                else_branch,
                span,
                ..
            } => {
                *span = None;
                then_branch.strip_spans();
                if let Some(e) = else_branch {
                    e.strip_spans();
                }
            }
            Statement::Case(case) => {
                case.span = None;
                for item in &mut case.items {
                    item.span = None;
                    for stmt in &mut item.body {
                        stmt.strip_spans();
                    }
                }
            }
            Statement::BeginEnd { statements, span } => {
                *span = None;
                for stmt in statements {
                    stmt.strip_spans();
                }
            }
        }
    }
}

/// The kind of a case statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// `case`
    Case,
    /// `casex`
    Casex,
    /// `casez`
    Casez,
}

impl CaseKind {
    /// Returns the keyword text.
    pub fn keyword(self) -> &'static str {
        match self {
            CaseKind::Case => "case",
            CaseKind::Casex => "casex",
            CaseKind::Casez => "casez",
        }
    }
}

/// A case statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStatement {
    /// `case`, `casex`, or `casez`.
    pub kind: CaseKind,
    /// The selector expression.
    pub selector: Expression,
    /// The arms, in source order.
    pub items: Vec<CaseItem>,
    /// Source location.
    pub span: Option<Span>,
}

impl CaseStatement {
    /// Returns `true` if any arm is the `default` arm.
    pub fn has_default(&self) -> bool {
        self.items.iter().any(|item| item.is_default)
    }
}

/// One arm of a case statement.
///
/// A `begin ... end` wrapper around the arm body is flattened into the
/// statement list; the generator re-wraps when the list has more than one
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseItem {
    /// The match values; empty for the `default` arm.
    pub values: Vec<Expression>,
    /// Whether this is the `default` arm.
    pub is_default: bool,
    /// The arm body.
    pub body: Vec<Statement>,
    /// Source location.
    pub span: Option<Span>,
}
