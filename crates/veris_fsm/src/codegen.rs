//! FSM → synthesizable Verilog.
//!
//! Produces the conventional three-block form: a clocked state register
//! with polarity-aware reset, a combinational next-state case, and (when
//! the machine has outputs) a combinational output case with Moore defaults
//! and Mealy transition actions.

use std::fmt::Write;

use crate::encoding::encode_states;
use crate::error::FsmError;
use crate::model::{EncodedState, Fsm, ResetPolarity, SignalDirection, UNCONDITIONAL};

/// Options controlling the generated module.
#[derive(Clone, Debug)]
pub struct FsmGenOptions {
    /// Name of the state register. Default `current_state`.
    pub state_reg: String,
    /// Name of the next-state register. Default `next_state`.
    pub next_state: String,
    /// Use a synchronous reset (`always @(posedge clk)` with the reset
    /// checked inside) instead of an asynchronous one.
    pub sync_reset: bool,
    /// Emit a comment banner above the module.
    pub banner: bool,
}

impl Default for FsmGenOptions {
    fn default() -> Self {
        Self {
            state_reg: "current_state".to_string(),
            next_state: "next_state".to_string(),
            sync_reset: false,
            banner: true,
        }
    }
}

/// Generates a complete synthesizable Verilog module for the FSM.
///
/// Fails with a structured error when the FSM is empty or has no initial
/// state. Other structural defects (duplicate names, dangling transitions)
/// are the validator's concern and do not stop generation.
pub fn generate_verilog(fsm: &Fsm, opts: &FsmGenOptions) -> Result<String, FsmError> {
    if fsm.states.is_empty() {
        return Err(FsmError::EmptyFsm);
    }
    let initial = fsm.initial_state().ok_or(FsmError::NoInitialState)?;
    let encoded = encode_states(&fsm.states, fsm.encoding)?;
    let width = encoded[0].width;

    let mut out = String::new();

    if opts.banner {
        emit_banner(fsm, &mut out);
    }
    emit_header(fsm, &mut out);
    emit_state_params(&encoded, width, &mut out);
    emit_registers(opts, width, &mut out);
    emit_sequential_block(fsm, opts, &initial.name, &mut out);
    emit_next_state_block(fsm, opts, &initial.name, &mut out);
    if !fsm.outputs.is_empty() {
        emit_output_block(fsm, opts, &mut out);
    }
    out.push_str("endmodule\n");

    Ok(out)
}

fn emit_banner(fsm: &Fsm, out: &mut String) {
    let _ = writeln!(
        out,
        "//-----------------------------------------------------------------------------"
    );
    let _ = writeln!(
        out,
        "// {}: {} states, {:?} encoding, {:?} outputs",
        fsm.module_name,
        fsm.states.len(),
        fsm.encoding,
        fsm.fsm_type
    );
    let _ = writeln!(
        out,
        "//-----------------------------------------------------------------------------"
    );
}

fn emit_header(fsm: &Fsm, out: &mut String) {
    let _ = writeln!(out, "module {} (", fsm.module_name);
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("  input wire {}", fsm.clock));
    lines.push(format!("  input wire {}", fsm.reset));
    for input in fsm.inputs.iter().filter(|s| s.direction == SignalDirection::Input) {
        lines.push(format!("  input wire {}{}", width_text(input.width), input.name));
    }
    for output in fsm.outputs.iter().filter(|s| s.direction == SignalDirection::Output) {
        lines.push(format!("  output reg {}{}", width_text(output.width), output.name));
    }
    let _ = writeln!(out, "{}", lines.join(",\n"));
    let _ = writeln!(out, ");");
    out.push('\n');
}

fn width_text(width: u32) -> String {
    if width <= 1 {
        String::new()
    } else {
        format!("[{}:0] ", width - 1)
    }
}

fn emit_state_params(encoded: &[EncodedState], width: u32, out: &mut String) {
    for state in encoded {
        let _ = writeln!(
            out,
            "  localparam [{}:0] {} = {}'b{};",
            width - 1,
            state.name,
            width,
            state.value
        );
    }
    out.push('\n');
}

fn emit_registers(opts: &FsmGenOptions, width: u32, out: &mut String) {
    let _ = writeln!(out, "  reg [{}:0] {};", width - 1, opts.state_reg);
    let _ = writeln!(out, "  reg [{}:0] {};", width - 1, opts.next_state);
    out.push('\n');
}

fn emit_sequential_block(fsm: &Fsm, opts: &FsmGenOptions, initial_name: &str, out: &mut String) {
    let (edge, active) = match fsm.reset_polarity {
        ResetPolarity::High => ("posedge", fsm.reset.clone()),
        ResetPolarity::Low => ("negedge", format!("!{}", fsm.reset)),
    };

    if opts.sync_reset {
        let _ = writeln!(out, "  always @(posedge {}) begin", fsm.clock);
    } else {
        let _ = writeln!(
            out,
            "  always @(posedge {} or {edge} {}) begin",
            fsm.clock, fsm.reset
        );
    }
    let _ = writeln!(out, "    if ({active})");
    let _ = writeln!(out, "      {} <= {};", opts.state_reg, initial_name);
    let _ = writeln!(out, "    else");
    let _ = writeln!(out, "      {} <= {};", opts.state_reg, opts.next_state);
    let _ = writeln!(out, "  end");
    out.push('\n');
}

fn emit_next_state_block(fsm: &Fsm, opts: &FsmGenOptions, initial_name: &str, out: &mut String) {
    let _ = writeln!(out, "  always @(*) begin");
    let _ = writeln!(out, "    {} = {};", opts.next_state, opts.state_reg);
    let _ = writeln!(out, "    case ({})", opts.state_reg);

    for state in &fsm.states {
        let outgoing = fsm.transitions_from(&state.id);
        if outgoing.is_empty() {
            let _ = writeln!(out, "      {}: ;", state.name);
            continue;
        }
        let _ = writeln!(out, "      {}: begin", state.name);
        let mut first = true;
        for transition in &outgoing {
            let Some(target) = fsm.state_by_id(&transition.to) else {
                // Dangling destination; the validator reports it.
                continue;
            };
            if transition.condition == UNCONDITIONAL {
                // An unconditional transition ends the chain.
                if first {
                    let _ = writeln!(out, "        {} = {};", opts.next_state, target.name);
                } else {
                    let _ = writeln!(out, "        else");
                    let _ = writeln!(out, "          {} = {};", opts.next_state, target.name);
                }
                break;
            }
            if first {
                let _ = writeln!(out, "        if ({})", transition.condition);
            } else {
                let _ = writeln!(out, "        else if ({})", transition.condition);
            }
            let _ = writeln!(out, "          {} = {};", opts.next_state, target.name);
            first = false;
        }
        let _ = writeln!(out, "      end");
    }

    let _ = writeln!(out, "      default: {} = {};", opts.next_state, initial_name);
    let _ = writeln!(out, "    endcase");
    let _ = writeln!(out, "  end");
    out.push('\n');
}

fn emit_output_block(fsm: &Fsm, opts: &FsmGenOptions, out: &mut String) {
    let _ = writeln!(out, "  always @(*) begin");
    for output in &fsm.outputs {
        let default = output.default.clone().unwrap_or_else(|| {
            if output.width <= 1 {
                "1'b0".to_string()
            } else {
                format!("{}'b0", output.width)
            }
        });
        let _ = writeln!(out, "    {} = {};", output.name, default);
    }
    let _ = writeln!(out, "    case ({})", opts.state_reg);

    for state in &fsm.states {
        let mealy: Vec<_> = fsm
            .transitions_from(&state.id)
            .into_iter()
            .filter(|t| !t.actions.is_empty())
            .collect();

        if state.outputs.is_empty() && mealy.is_empty() {
            let _ = writeln!(out, "      {}: ;", state.name);
            continue;
        }

        let single_moore = state.outputs.len() == 1 && mealy.is_empty();
        if single_moore {
            let assign = &state.outputs[0];
            let _ = writeln!(out, "      {}: {} = {};", state.name, assign.signal, assign.value);
            continue;
        }

        let _ = writeln!(out, "      {}: begin", state.name);
        for assign in &state.outputs {
            let _ = writeln!(out, "        {} = {};", assign.signal, assign.value);
        }
        for transition in mealy {
            if transition.condition == UNCONDITIONAL {
                for action in &transition.actions {
                    let _ = writeln!(out, "        {} = {};", action.signal, action.value);
                }
            } else {
                let _ = writeln!(out, "        if ({}) begin", transition.condition);
                for action in &transition.actions {
                    let _ = writeln!(out, "          {} = {};", action.signal, action.value);
                }
                let _ = writeln!(out, "        end");
            }
        }
        let _ = writeln!(out, "      end");
    }

    let _ = writeln!(out, "      default: ;");
    let _ = writeln!(out, "    endcase");
    let _ = writeln!(out, "  end");
    out.push('\n');
}
