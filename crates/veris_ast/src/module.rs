//! Module-level nodes of the typed AST.

use crate::expr::{Expression, Range};
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use veris_source::Span;

/// A Verilog module in the typed AST.
///
/// Unlike the CST, items are partitioned into typed lists. Each list
/// preserves source order within itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: String,
    /// Ports, one entry per declared name.
    pub ports: Vec<PortDeclaration>,
    /// Header parameters (`#(...)`).
    pub parameters: Vec<Declaration>,
    /// Body declarations (wire/reg/integer/parameter/localparam).
    pub declarations: Vec<Declaration>,
    /// Always blocks.
    pub always_blocks: Vec<AlwaysBlock>,
    /// Initial blocks.
    pub initial_blocks: Vec<InitialBlock>,
    /// Continuous assignments.
    pub assigns: Vec<ContinuousAssign>,
    /// Submodule instances.
    pub instances: Vec<Instance>,
    /// Source location, when built from parsed text.
    pub span: Option<Span>,
}

impl Module {
    /// Creates an empty module with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            parameters: Vec::new(),
            declarations: Vec::new(),
            always_blocks: Vec::new(),
            initial_blocks: Vec::new(),
            assigns: Vec::new(),
            instances: Vec::new(),
            span: None,
        }
    }

    /// Clears all source locations, recursively.
    ///
    /// Structural equality between a module and its regenerated round-trip
    /// twin ignores where the text happened to sit in each file.
    pub fn strip_spans(&mut self) {
        self.span = None;
        for port in &mut self.ports {
            port.span = None;
        }
        for decl in self.parameters.iter_mut().chain(self.declarations.iter_mut()) {
            decl.set_span(None);
        }
        for always in &mut self.always_blocks {
            always.span = None;
            always.body.strip_spans();
        }
        for initial in &mut self.initial_blocks {
            initial.span = None;
            initial.body.strip_spans();
        }
        for assign in &mut self.assigns {
            assign.span = None;
        }
        for inst in &mut self.instances {
            inst.span = None;
        }
    }
}

/// A single port declaration (one per name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDeclaration {
    /// Port direction.
    pub direction: Direction,
    /// Optional storage class (`wire` or `reg`).
    pub net: Option<NetKind>,
    /// Optional bit range.
    pub range: Option<Range>,
    /// The port name.
    pub name: String,
    /// Source location.
    pub span: Option<Span>,
}

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

/// Storage class of a port or net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetKind {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
}

/// A declaration inside a module body (or a header parameter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    /// `wire [range] a, b, c;`
    Wire {
        /// Optional bit range.
        range: Option<Range>,
        /// Declared names.
        names: Vec<String>,
        /// Source location.
        span: Option<Span>,
    },
    /// `reg [range] q [array];`
    Reg {
        /// Optional bit range.
        range: Option<Range>,
        /// Declared names.
        names: Vec<String>,
        /// Optional array dimension (memory declaration).
        array: Option<Range>,
        /// Source location.
        span: Option<Span>,
    },
    /// `integer i, j;`
    Integer {
        /// Declared names.
        names: Vec<String>,
        /// Source location.
        span: Option<Span>,
    },
    /// `parameter [range] NAME = value;`
    Parameter {
        /// Optional bit range.
        range: Option<Range>,
        /// The parameter name.
        name: String,
        /// The value expression.
        value: Expression,
        /// Source location.
        span: Option<Span>,
    },
    /// `localparam [range] NAME = value;`
    Localparam {
        /// Optional bit range.
        range: Option<Range>,
        /// The parameter name.
        name: String,
        /// The value expression.
        value: Expression,
        /// Source location.
        span: Option<Span>,
    },
}

impl Declaration {
    /// Returns the names introduced by this declaration.
    pub fn declared_names(&self) -> Vec<&str> {
        match self {
            Declaration::Wire { names, .. }
            | Declaration::Reg { names, .. }
            | Declaration::Integer { names, .. } => names.iter().map(|s| s.as_str()).collect(),
            Declaration::Parameter { name, .. } | Declaration::Localparam { name, .. } => {
                vec![name.as_str()]
            }
        }
    }

    /// Returns this declaration's source location.
    pub fn span(&self) -> Option<Span> {
        match self {
            Declaration::Wire { span, .. }
            | Declaration::Reg { span, .. }
            | Declaration::Integer { span, .. }
            | Declaration::Parameter { span, .. }
            | Declaration::Localparam { span, .. } => *span,
        }
    }

    pub(crate) fn set_span(&mut self, value: Option<Span>) {
        match self {
            Declaration::Wire { span, .. }
            | Declaration::Reg { span, .. }
            | Declaration::Integer { span, .. }
            | Declaration::Parameter { span, .. }
            | Declaration::Localparam { span, .. } => *span = value,
        }
    }
}

/// The classification of an always block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlwaysKind {
    /// Sensitivity is `@(*)` or an edge-free list.
    Combinational,
    /// At least one sensitivity item carries an edge.
    Sequential,
}

/// A sensitivity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Sensitivity {
    /// `@(*)`: sensitive to every read signal.
    Star,
    /// An explicit, non-empty item list.
    List(Vec<SensitivityItem>),
}

/// One signal in a sensitivity list, with an optional edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityItem {
    /// The signal name.
    pub signal: String,
    /// The edge specifier, if any.
    pub edge: Option<Edge>,
}

/// A clock/reset edge specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// `posedge`
    Posedge,
    /// `negedge`
    Negedge,
}

/// An always block with its classification and sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlwaysBlock {
    /// Combinational or sequential, derived from the sensitivity list.
    pub kind: AlwaysKind,
    /// The sensitivity list.
    pub sensitivity: Sensitivity,
    /// The body statement (single statement or begin/end block).
    pub body: Statement,
    /// Source location.
    pub span: Option<Span>,
}

/// An initial block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialBlock {
    /// The body statement.
    pub body: Statement,
    /// Source location.
    pub span: Option<Span>,
}

/// A continuous assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAssign {
    /// The target expression.
    pub target: Expression,
    /// The value expression.
    pub value: Expression,
    /// Source location.
    pub span: Option<Span>,
}

/// A submodule instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// The instantiated module's name.
    pub module_name: String,
    /// The instance name.
    pub instance_name: String,
    /// Parameter overrides.
    pub param_overrides: Vec<Connection>,
    /// Port connections.
    pub connections: Vec<Connection>,
    /// Source location.
    pub span: Option<Span>,
}

/// A port or parameter connection in an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// The formal name, absent for positional connections.
    pub formal: Option<String>,
    /// The connected expression, absent for unconnected ports.
    pub actual: Option<Expression>,
}
