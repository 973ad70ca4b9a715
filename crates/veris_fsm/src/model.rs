//! The FSM data model shared with the embedding editor.
//!
//! All types serialize with camelCase field names: this is the editor's
//! wire format. States are referenced by stable string ids; transitions hold
//! ids rather than pointers, so the model is a plain value with no cycles
//! and can be snapshotted by deep copy for external undo/redo layers.

use serde::{Deserialize, Serialize};

/// The transition-condition string meaning "always taken".
pub const UNCONDITIONAL: &str = "1'b1";

/// A complete finite-state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fsm {
    /// The Verilog module name used when generating code.
    pub module_name: String,
    /// States, in authoring order.
    pub states: Vec<State>,
    /// Transitions, in authoring order.
    pub transitions: Vec<Transition>,
    /// Clock signal name.
    pub clock: String,
    /// Reset signal name.
    pub reset: String,
    /// Reset polarity.
    pub reset_polarity: ResetPolarity,
    /// State encoding scheme.
    pub encoding: Encoding,
    /// Machine style (where outputs are produced).
    pub fsm_type: FsmStyle,
    /// Input signals, in declaration order.
    pub inputs: Vec<FsmSignal>,
    /// Output signals, in declaration order.
    pub outputs: Vec<FsmSignal>,
}

impl Fsm {
    /// Creates an empty FSM with conventional defaults: `clk`/`rst`,
    /// active-high reset, binary encoding, Moore style.
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            clock: "clk".to_string(),
            reset: "rst".to_string(),
            reset_polarity: ResetPolarity::High,
            encoding: Encoding::Binary,
            fsm_type: FsmStyle::Moore,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// The initial state: the first state flagged `is_initial`.
    ///
    /// When several states carry the flag, the first in authoring order wins
    /// (the validator reports the extras).
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    /// Looks up a state by id.
    pub fn state_by_id(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// The transitions leaving a state, priority order.
    ///
    /// Smaller priority values come first; transitions without a priority
    /// keep authoring order after prioritized ones.
    pub fn transitions_from(&self, state_id: &str) -> Vec<&Transition> {
        let mut outgoing: Vec<&Transition> = self
            .transitions
            .iter()
            .filter(|t| t.from == state_id)
            .collect();
        outgoing.sort_by_key(|t| t.priority.unwrap_or(i32::MAX));
        outgoing
    }
}

/// One state of the machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Stable id unique within the FSM.
    pub id: String,
    /// The state's Verilog constant name (a valid identifier).
    pub name: String,
    /// Canvas position; pure UI metadata.
    pub position: Position,
    /// Whether this is the reset state.
    pub is_initial: bool,
    /// Moore output assignments active in this state, in authoring order.
    pub outputs: Vec<OutputAssignment>,
}

/// One transition between states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Stable id unique within the FSM.
    pub id: String,
    /// Source state id.
    pub from: String,
    /// Destination state id.
    pub to: String,
    /// Verilog condition expression; [`UNCONDITIONAL`] means always taken.
    pub condition: String,
    /// Mealy output assignments performed when the transition fires.
    pub actions: Vec<OutputAssignment>,
    /// Optional priority; smaller fires first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// A signal-to-value assignment (Moore on states, Mealy on transitions).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAssignment {
    /// The assigned output signal name.
    pub signal: String,
    /// The assigned value, as a Verilog expression string.
    pub value: String,
}

/// A 2-D canvas position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// An FSM input or output signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsmSignal {
    /// Signal name.
    pub name: String,
    /// Bit width, at least 1.
    pub width: u32,
    /// Direction relative to the FSM module.
    pub direction: SignalDirection,
    /// Default value for outputs, as a Verilog expression string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FsmSignal {
    /// A 1-bit input.
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 1,
            direction: SignalDirection::Input,
            default: None,
        }
    }

    /// A 1-bit output.
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 1,
            direction: SignalDirection::Output,
            default: None,
        }
    }
}

/// Direction of an FSM signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    /// Module input.
    Input,
    /// Module output.
    Output,
}

/// Reset polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolarity {
    /// Reset asserts at logic 1.
    High,
    /// Reset asserts at logic 0.
    Low,
}

/// State encoding scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Sequential binary values.
    Binary,
    /// One set bit per state.
    Onehot,
    /// Consecutive states differ by one bit.
    Gray,
}

/// Machine style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsmStyle {
    /// Outputs depend on the current state only.
    Moore,
    /// Outputs depend on state and inputs (transition actions).
    Mealy,
    /// Both state outputs and transition actions are present.
    Mixed,
}

/// An encoded state value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedState {
    /// The state's id.
    pub id: String,
    /// The state's name.
    pub name: String,
    /// The binary value string, MSB first.
    pub value: String,
    /// The value's bit width.
    pub width: u32,
}

/// Arranges `n` states on a circle centered at (300, 300) with radius
/// `max(150, 40·n)`, starting at the top and proceeding counter-clockwise.
pub fn circle_layout(n: usize) -> Vec<Position> {
    let radius = (40.0 * n as f64).max(150.0);
    let (cx, cy) = (300.0, 300.0);
    (0..n)
        .map(|i| {
            let angle =
                -std::f64::consts::FRAC_PI_2 + (i as f64 / n.max(1) as f64) * std::f64::consts::TAU;
            Position {
                x: cx + radius * angle.cos(),
                y: cy + radius * angle.sin(),
            }
        })
        .collect()
}
