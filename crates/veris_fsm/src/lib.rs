//! Finite-state-machine model, encodings, validation, templates, and the
//! two bridges to Verilog.
//!
//! The model ([`Fsm`], [`State`], [`Transition`]) is the interchange type of
//! the embedding editor: value-semantic, serde-serializable with camelCase
//! field names, and id-referenced (transitions point at state ids, never at
//! states). The bridges are the [`extract`] heuristic (typed AST → FSM, with
//! a confidence score) and the [`codegen`] generator (FSM → synthesizable
//! Verilog), together forming the round trip.

#![warn(missing_docs)]

pub mod codegen;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod model;
pub mod templates;
pub mod validate;

pub use codegen::{generate_verilog, FsmGenOptions};
pub use encoding::{binary_to_gray, binary_width, encode_states, gray_to_binary, validate_encoding};
pub use error::FsmError;
pub use extract::{extract_fsm, ExtractOutcome};
pub use model::{
    EncodedState, Encoding, Fsm, FsmSignal, FsmStyle, OutputAssignment, Position, ResetPolarity,
    SignalDirection, State, Transition, UNCONDITIONAL,
};
pub use validate::validate;
