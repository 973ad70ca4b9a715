//! Heuristic recovery of an FSM from parsed Verilog.
//!
//! The extractor walks the typed AST looking for the conventional
//! three-block FSM shape: binary state constants in localparams, a clocked
//! state register, a combinational next-state case, and name-convention
//! clock/reset ports. Each recognized stage adds 0.2 to a confidence score;
//! a stage that fails stops the pipeline and reports why. Extraction never
//! panics on well-parsed input: it is a best-effort read of code the user
//! may have written by hand.

use std::collections::HashSet;

use log::debug;
use veris_ast::{
    AlwaysKind, CaseStatement, Declaration, Direction, Expression, Module, Statement,
};
use veris_codegen::expression_text;

use crate::model::{
    circle_layout, Encoding, Fsm, FsmSignal, FsmStyle, ResetPolarity, SignalDirection, State,
    Transition, UNCONDITIONAL,
};

/// The result of an extraction attempt.
#[derive(Debug)]
pub struct ExtractOutcome {
    /// The recovered FSM, present only on success.
    pub fsm: Option<Fsm>,
    /// Whether every pipeline stage succeeded.
    pub success: bool,
    /// Why extraction stopped, when it did.
    pub reasons: Vec<String>,
    /// Accumulated confidence in [0, 1]: 0.2 per successful stage
    /// (parameters, state register, next-state logic, transitions, build).
    pub confidence: f64,
}

impl ExtractOutcome {
    fn failure(reasons: Vec<String>, confidence: f64) -> Self {
        Self {
            fsm: None,
            success: false,
            reasons,
            confidence,
        }
    }
}

/// Attempts to recover an FSM from a module.
pub fn extract_fsm(module: &Module) -> ExtractOutcome {
    let mut confidence = 0.0;

    // Stage 1: binary state constants.
    let params = state_parameters(module);
    if params.is_empty() {
        return ExtractOutcome::failure(
            vec!["no localparam declarations with binary state values".to_string()],
            confidence,
        );
    }
    confidence += 0.2;
    let width = params[0].bits.len();
    let encoding = classify_encoding(&params);
    debug!(
        "extract: {} state constants of width {width}, {encoding:?} encoding",
        params.len()
    );

    // Stage 2: the clocked state register.
    let reg_candidates = regs_of_width(module, width);
    let Some(state_reg) = pick_state_register(module, &reg_candidates) else {
        return ExtractOutcome::failure(
            vec![format!(
                "no {width}-bit register is assigned in a clocked always block"
            )],
            confidence,
        );
    };
    confidence += 0.2;
    debug!("extract: state register '{state_reg}'");

    // The next-state register: any other register of the same width.
    let Some(next_reg) = pick_next_register(&reg_candidates, &state_reg) else {
        return ExtractOutcome::failure(
            vec![format!(
                "no {width}-bit next-state register besides '{state_reg}'"
            )],
            confidence,
        );
    };

    // Stage 3: the combinational next-state case.
    let Some(case) = find_next_state_case(module, &state_reg, &next_reg) else {
        return ExtractOutcome::failure(
            vec![format!(
                "no combinational case over '{state_reg}' assigning '{next_reg}'"
            )],
            confidence,
        );
    };
    confidence += 0.2;

    // Stage 4: transitions out of the case arms.
    let state_names: HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let transitions = collect_transitions(case, &state_names, &next_reg);
    if transitions.is_empty() {
        return ExtractOutcome::failure(
            vec!["the next-state case contains no recognizable transitions".to_string()],
            confidence,
        );
    }
    confidence += 0.2;
    debug!("extract: {} transitions", transitions.len());

    // Port partition by naming convention.
    let io = partition_ports(module);

    // The initial state: a reset-guarded assignment in the clocked block,
    // else the first state constant.
    let initial = find_initial_state(module, &state_reg, &io.reset, &state_names)
        .unwrap_or_else(|| params[0].name.clone());

    // Stage 5: assemble the model.
    let layout = circle_layout(params.len());
    let mut fsm = Fsm::new(module.name.clone());
    fsm.encoding = encoding;
    fsm.fsm_type = FsmStyle::Moore;
    fsm.clock = io.clock;
    fsm.reset = io.reset;
    fsm.reset_polarity = io.reset_polarity;
    fsm.inputs = io.inputs;
    fsm.outputs = io.outputs;
    fsm.states = params
        .iter()
        .zip(layout)
        .map(|(param, position)| State {
            id: param.name.clone(),
            name: param.name.clone(),
            position,
            is_initial: param.name == initial,
            outputs: Vec::new(),
        })
        .collect();
    fsm.transitions = transitions;
    confidence += 0.2;

    ExtractOutcome {
        fsm: Some(fsm),
        success: true,
        reasons: Vec::new(),
        confidence,
    }
}

struct StateParam {
    name: String,
    bits: String,
}

/// Localparams whose value is a pure binary literal, majority width group.
fn state_parameters(module: &Module) -> Vec<StateParam> {
    let mut candidates: Vec<StateParam> = Vec::new();
    for decl in &module.declarations {
        if let Declaration::Localparam { name, value, .. } = decl {
            if let Expression::Number { value: text } = value {
                if let Some(bits) = veris_ast::expr::parse_sized_literal(text)
                    .as_ref()
                    .and_then(|lit| lit.binary_bits().map(|b| b.to_string()))
                {
                    candidates.push(StateParam {
                        name: name.clone(),
                        bits,
                    });
                }
            }
        }
    }

    // Mixed widths: keep the group that occurs most often.
    let widths: Vec<usize> = candidates.iter().map(|c| c.bits.len()).collect();
    let Some(best_width) = widths
        .iter()
        .copied()
        .max_by_key(|w| widths.iter().filter(|x| *x == w).count())
    else {
        return Vec::new();
    };
    candidates.retain(|c| c.bits.len() == best_width);
    candidates
}

/// Classifies the encoding from the constant values, in declaration order.
fn classify_encoding(params: &[StateParam]) -> Encoding {
    if params.len() >= 2
        && params
            .iter()
            .all(|p| p.bits.bytes().filter(|b| *b == b'1').count() == 1)
    {
        return Encoding::Onehot;
    }
    if params.len() >= 2 {
        let adjacent_one_bit = params.windows(2).all(|pair| {
            pair[0]
                .bits
                .bytes()
                .zip(pair[1].bits.bytes())
                .filter(|(a, b)| a != b)
                .count()
                == 1
        });
        if adjacent_one_bit {
            return Encoding::Gray;
        }
    }
    Encoding::Binary
}

/// Names of regs declared with a constant `[msb:lsb]` range of this width.
fn regs_of_width(module: &Module, width: usize) -> Vec<String> {
    let mut names = Vec::new();
    for decl in &module.declarations {
        if let Declaration::Reg {
            range: Some(range),
            names: decl_names,
            array: None,
            ..
        } = decl
        {
            if let (Some(msb), Some(lsb)) = (const_u32(&range.msb), const_u32(&range.lsb)) {
                if (msb.saturating_sub(lsb) + 1) as usize == width {
                    names.extend(decl_names.iter().cloned());
                }
            }
        }
    }
    // A 1-bit machine may keep its state in an unranged reg.
    if width == 1 {
        for decl in &module.declarations {
            if let Declaration::Reg {
                range: None,
                names: decl_names,
                array: None,
                ..
            } = decl
            {
                names.extend(decl_names.iter().cloned());
            }
        }
    }
    names
}

fn const_u32(expr: &Expression) -> Option<u32> {
    match expr {
        Expression::Number { value } => value.replace('_', "").parse().ok(),
        _ => None,
    }
}

/// The candidate register assigned in a clocked block, preferring
/// conventional names.
fn pick_state_register(module: &Module, candidates: &[String]) -> Option<String> {
    let mut clocked_writes: HashSet<String> = HashSet::new();
    for always in &module.always_blocks {
        if always.kind == AlwaysKind::Sequential {
            written_names(&always.body, &mut clocked_writes);
        }
    }

    candidates
        .iter()
        .filter(|name| clocked_writes.contains(*name))
        .min_by_key(|name| name_preference(name))
        .cloned()
}

/// Lower is better: `current_state`, then `state`, then `*_reg`/`*_state`.
fn name_preference(name: &str) -> u8 {
    if name == "current_state" {
        0
    } else if name == "state" {
        1
    } else if name.ends_with("_reg") || name.ends_with("_state") {
        2
    } else {
        3
    }
}

/// Any other register of the same width, preferring `next_state`/`*_next`.
fn pick_next_register(candidates: &[String], state_reg: &str) -> Option<String> {
    candidates
        .iter()
        .filter(|name| name.as_str() != state_reg)
        .min_by_key(|name| {
            if *name == "next_state" {
                0u8
            } else if name.ends_with("_next") {
                1
            } else {
                2
            }
        })
        .cloned()
}

/// The combinational case over the state register whose arms assign the
/// next-state register.
fn find_next_state_case<'a>(
    module: &'a Module,
    state_reg: &str,
    next_reg: &str,
) -> Option<&'a CaseStatement> {
    for always in &module.always_blocks {
        if always.kind != AlwaysKind::Combinational {
            continue;
        }
        let mut found: Option<&CaseStatement> = None;
        each_case(&always.body, &mut |case| {
            if found.is_some() {
                return;
            }
            let selects_state = matches!(
                &case.selector,
                Expression::Identifier { name } if name == state_reg
            );
            if selects_state && case_assigns(case, next_reg) {
                found = Some(case);
            }
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

fn each_case<'a>(stmt: &'a Statement, f: &mut impl FnMut(&'a CaseStatement)) {
    match stmt {
        Statement::Case(case) => {
            f(case);
            for item in &case.items {
                for s in &item.body {
                    each_case(s, f);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                each_case(s, f);
            }
        }
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            each_case(then_branch, f);
            if let Some(e) = else_branch {
                each_case(e, f);
            }
        }
        _ => {}
    }
}

fn case_assigns(case: &CaseStatement, target: &str) -> bool {
    case.items.iter().any(|item| {
        let mut written = HashSet::new();
        for stmt in &item.body {
            written_names(stmt, &mut written);
        }
        written.contains(target)
    })
}

fn written_names(stmt: &Statement, out: &mut HashSet<String>) {
    match stmt {
        Statement::Blocking { target, .. } | Statement::NonBlocking { target, .. } => {
            if let Expression::Identifier { name } = target {
                out.insert(name.clone());
            }
        }
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            written_names(then_branch, out);
            if let Some(e) = else_branch {
                written_names(e, out);
            }
        }
        Statement::Case(case) => {
            for item in &case.items {
                for s in &item.body {
                    written_names(s, out);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                written_names(s, out);
            }
        }
    }
}

/// Walks the case arms, turning next-state assignments into transitions.
///
/// A bare assignment is an unconditional transition; an assignment guarded
/// by `if (cond)` carries `cond` as its condition. Both branches of an
/// if/else yield separate transitions with the same raw condition text: no
/// negated condition is synthesized for the else branch, and the innermost
/// guard wins for nested ifs.
fn collect_transitions(
    case: &CaseStatement,
    state_names: &HashSet<&str>,
    next_reg: &str,
) -> Vec<Transition> {
    let mut transitions = Vec::new();
    let mut counter = 0usize;

    for item in &case.items {
        if item.is_default {
            continue;
        }
        let sources: Vec<&str> = item
            .values
            .iter()
            .filter_map(|v| match v {
                Expression::Identifier { name } if state_names.contains(name.as_str()) => {
                    Some(name.as_str())
                }
                _ => None,
            })
            .collect();
        if sources.is_empty() {
            continue;
        }

        for stmt in &item.body {
            walk_arm(
                stmt,
                None,
                &sources,
                state_names,
                next_reg,
                &mut counter,
                &mut transitions,
            );
        }
    }

    transitions
}

fn walk_arm(
    stmt: &Statement,
    condition: Option<&str>,
    sources: &[&str],
    state_names: &HashSet<&str>,
    next_reg: &str,
    counter: &mut usize,
    transitions: &mut Vec<Transition>,
) {
    match stmt {
        Statement::Blocking { target, value, .. }
        | Statement::NonBlocking { target, value, .. } => {
            let targets_next =
                matches!(target, Expression::Identifier { name } if name == next_reg);
            if !targets_next {
                return;
            }
            let Expression::Identifier { name: successor } = value else {
                return;
            };
            if !state_names.contains(successor.as_str()) {
                return;
            }
            for source in sources {
                transitions.push(Transition {
                    id: format!("t{}", *counter),
                    from: source.to_string(),
                    to: successor.clone(),
                    condition: condition.unwrap_or(UNCONDITIONAL).to_string(),
                    actions: Vec::new(),
                    priority: None,
                });
                *counter += 1;
            }
        }
        Statement::If {
            condition: cond,
            then_branch,
            else_branch,
            ..
        } => {
            let text = expression_text(cond);
            walk_arm(
                then_branch,
                Some(text.as_str()),
                sources,
                state_names,
                next_reg,
                counter,
                transitions,
            );
            if let Some(els) = else_branch {
                walk_arm(
                    els,
                    Some(text.as_str()),
                    sources,
                    state_names,
                    next_reg,
                    counter,
                    transitions,
                );
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                walk_arm(
                    s,
                    condition,
                    sources,
                    state_names,
                    next_reg,
                    counter,
                    transitions,
                );
            }
        }
        Statement::Case(_) => {}
    }
}

struct PortPartition {
    clock: String,
    reset: String,
    reset_polarity: ResetPolarity,
    inputs: Vec<FsmSignal>,
    outputs: Vec<FsmSignal>,
}

fn is_clock_name(name: &str) -> bool {
    name == "clk" || name == "clock" || name.ends_with("_clk")
}

fn is_reset_name(name: &str) -> bool {
    matches!(name, "rst" | "reset" | "rst_n" | "reset_n")
}

/// Splits module ports into clock, reset, and data signals by name
/// convention. A reset named `*_n` is treated as active-low.
fn partition_ports(module: &Module) -> PortPartition {
    let mut partition = PortPartition {
        clock: "clk".to_string(),
        reset: "rst".to_string(),
        reset_polarity: ResetPolarity::High,
        inputs: Vec::new(),
        outputs: Vec::new(),
    };

    for port in &module.ports {
        if port.direction == Direction::Input && is_clock_name(&port.name) {
            partition.clock = port.name.clone();
            continue;
        }
        if port.direction == Direction::Input && is_reset_name(&port.name) {
            partition.reset = port.name.clone();
            partition.reset_polarity = if port.name.ends_with("_n") {
                ResetPolarity::Low
            } else {
                ResetPolarity::High
            };
            continue;
        }
        let width = port
            .range
            .as_ref()
            .and_then(|r| Some(const_u32(&r.msb)?.saturating_sub(const_u32(&r.lsb)?) + 1))
            .unwrap_or(1);
        let signal = FsmSignal {
            name: port.name.clone(),
            width,
            direction: match port.direction {
                Direction::Output => SignalDirection::Output,
                _ => SignalDirection::Input,
            },
            default: None,
        };
        match port.direction {
            Direction::Output => partition.outputs.push(signal),
            _ => partition.inputs.push(signal),
        }
    }

    partition
}

/// Finds the reset-guarded assignment `if (rst) state <= S` in a clocked
/// block; `S` is the initial state.
fn find_initial_state(
    module: &Module,
    state_reg: &str,
    reset: &str,
    state_names: &HashSet<&str>,
) -> Option<String> {
    for always in &module.always_blocks {
        if always.kind != AlwaysKind::Sequential {
            continue;
        }
        if let Some(name) = reset_assignment(&always.body, state_reg, reset, state_names) {
            return Some(name);
        }
    }
    None
}

fn reset_assignment(
    stmt: &Statement,
    state_reg: &str,
    reset: &str,
    state_names: &HashSet<&str>,
) -> Option<String> {
    match stmt {
        Statement::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            if condition_mentions(condition, reset) {
                if let Some(name) = guarded_state_value(then_branch, state_reg, state_names) {
                    return Some(name);
                }
            }
            if let Some(name) = reset_assignment(then_branch, state_reg, reset, state_names) {
                return Some(name);
            }
            if let Some(els) = else_branch {
                if let Some(name) = reset_assignment(els, state_reg, reset, state_names) {
                    return Some(name);
                }
            }
            None
        }
        Statement::BeginEnd { statements, .. } => statements
            .iter()
            .find_map(|s| reset_assignment(s, state_reg, reset, state_names)),
        _ => None,
    }
}

fn condition_mentions(condition: &Expression, reset: &str) -> bool {
    let mut names = HashSet::new();
    collect_idents(condition, &mut names);
    names.contains(reset)
}

fn collect_idents(expr: &Expression, out: &mut HashSet<String>) {
    match expr {
        Expression::Identifier { name } => {
            out.insert(name.clone());
        }
        Expression::Unary { operand, .. } => collect_idents(operand, out),
        Expression::Binary { left, right, .. } => {
            collect_idents(left, out);
            collect_idents(right, out);
        }
        Expression::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            collect_idents(condition, out);
            collect_idents(then_expr, out);
            collect_idents(else_expr, out);
        }
        _ => {}
    }
}

/// The state constant assigned to the register inside the reset branch.
fn guarded_state_value(
    stmt: &Statement,
    state_reg: &str,
    state_names: &HashSet<&str>,
) -> Option<String> {
    match stmt {
        Statement::Blocking { target, value, .. }
        | Statement::NonBlocking { target, value, .. } => {
            let targets_state =
                matches!(target, Expression::Identifier { name } if name == state_reg);
            if !targets_state {
                return None;
            }
            match value {
                Expression::Identifier { name } if state_names.contains(name.as_str()) => {
                    Some(name.clone())
                }
                _ => None,
            }
        }
        Statement::BeginEnd { statements, .. } => statements
            .iter()
            .find_map(|s| guarded_state_value(s, state_reg, state_names)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{generate_verilog, FsmGenOptions};
    use crate::templates;
    use veris_common::Interner;
    use veris_diagnostics::DiagnosticSink;
    use veris_source::FileId;

    fn parse_module(source: &str) -> Module {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (modules, _) =
            veris_ast::parse_and_build(source, FileId::from_raw(0), &interner, &sink).unwrap();
        assert!(!sink.has_errors(), "parse errors: {:?}", sink.diagnostics());
        modules.into_iter().next().expect("one module")
    }

    #[test]
    fn round_trip_traffic_light() {
        let fsm = templates::by_id("traffic-light").unwrap();
        let text = generate_verilog(&fsm, &FsmGenOptions::default()).unwrap();
        let module = parse_module(&text);
        let outcome = extract_fsm(&module);

        assert!(outcome.success, "reasons: {:?}", outcome.reasons);
        assert!(outcome.confidence >= 0.8);
        let recovered = outcome.fsm.unwrap();
        assert!(recovered.transitions.len() >= 2);
        let names: Vec<&str> = recovered.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["IDLE", "GREEN", "YELLOW"]);
        assert_eq!(recovered.initial_state().unwrap().name, "IDLE");
        assert_eq!(recovered.clock, "clk");
        assert_eq!(recovered.reset, "rst");
        assert_eq!(recovered.encoding, Encoding::Binary);
        let input_names: Vec<&str> = recovered.inputs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(input_names, vec!["start", "timer_done"]);
    }

    #[test]
    fn round_trip_all_templates() {
        for template in templates::registry() {
            let fsm = (template.build)();
            let text = generate_verilog(&fsm, &FsmGenOptions::default()).unwrap();
            let module = parse_module(&text);
            let outcome = extract_fsm(&module);
            assert!(
                outcome.success,
                "template '{}' failed: {:?}",
                template.id, outcome.reasons
            );
            let recovered = outcome.fsm.unwrap();
            assert_eq!(recovered.states.len(), fsm.states.len(), "{}", template.id);
        }
    }

    #[test]
    fn onehot_classified() {
        let mut fsm = templates::by_id("traffic-light").unwrap();
        fsm.encoding = Encoding::Onehot;
        let text = generate_verilog(&fsm, &FsmGenOptions::default()).unwrap();
        let outcome = extract_fsm(&parse_module(&text));
        assert_eq!(outcome.fsm.unwrap().encoding, Encoding::Onehot);
    }

    #[test]
    fn gray_classified() {
        let mut fsm = templates::by_id("traffic-light").unwrap();
        fsm.encoding = Encoding::Gray;
        let text = generate_verilog(&fsm, &FsmGenOptions::default()).unwrap();
        let outcome = extract_fsm(&parse_module(&text));
        assert_eq!(outcome.fsm.unwrap().encoding, Encoding::Gray);
    }

    #[test]
    fn hand_written_fsm_extracts() {
        let source = "
            module blinker(input clk, input rst_n, input enable, output reg led);
                localparam [0:0] OFF = 1'b0;
                localparam [0:0] ON = 1'b1;

                reg [0:0] state;
                reg [0:0] state_next;

                always @(posedge clk or negedge rst_n) begin
                    if (!rst_n)
                        state <= OFF;
                    else
                        state <= state_next;
                end

                always @(*) begin
                    state_next = state;
                    case (state)
                        OFF: begin
                            if (enable)
                                state_next = ON;
                        end
                        ON: begin
                            if (!enable)
                                state_next = OFF;
                        end
                        default: state_next = OFF;
                    endcase
                end
            endmodule";
        let outcome = extract_fsm(&parse_module(source));
        assert!(outcome.success, "reasons: {:?}", outcome.reasons);
        let fsm = outcome.fsm.unwrap();
        assert_eq!(fsm.reset, "rst_n");
        assert_eq!(fsm.reset_polarity, ResetPolarity::Low);
        assert_eq!(fsm.initial_state().unwrap().name, "OFF");
        assert_eq!(fsm.transitions.len(), 2);
        assert_eq!(fsm.transitions[0].condition, "enable");
        assert_eq!(fsm.transitions[1].condition, "!enable");
    }

    #[test]
    fn else_branch_yields_sibling_transition() {
        let source = "
            module two(input clk, input rst, input go, output reg [0:0] unused);
                localparam [1:0] A = 2'b00;
                localparam [1:0] B = 2'b01;
                localparam [1:0] C = 2'b10;

                reg [1:0] current_state;
                reg [1:0] next_state;

                always @(posedge clk) begin
                    if (rst)
                        current_state <= A;
                    else
                        current_state <= next_state;
                end

                always @(*) begin
                    next_state = current_state;
                    case (current_state)
                        A: begin
                            if (go)
                                next_state = B;
                            else
                                next_state = C;
                        end
                        default: next_state = A;
                    endcase
                end
            endmodule";
        let outcome = extract_fsm(&parse_module(source));
        assert!(outcome.success, "reasons: {:?}", outcome.reasons);
        let fsm = outcome.fsm.unwrap();
        // Both branches become transitions carrying the same raw condition.
        assert_eq!(fsm.transitions.len(), 2);
        assert_eq!(fsm.transitions[0].to, "B");
        assert_eq!(fsm.transitions[1].to, "C");
        assert_eq!(fsm.transitions[0].condition, "go");
        assert_eq!(fsm.transitions[1].condition, "go");
    }

    #[test]
    fn bare_assignment_is_unconditional() {
        let source = "
            module hop(input clk, input rst);
                localparam [0:0] X = 1'b0;
                localparam [0:0] Y = 1'b1;
                reg [0:0] current_state;
                reg [0:0] next_state;
                always @(posedge clk) begin
                    if (rst)
                        current_state <= X;
                    else
                        current_state <= next_state;
                end
                always @(*) begin
                    next_state = current_state;
                    case (current_state)
                        X: next_state = Y;
                        Y: next_state = X;
                        default: next_state = X;
                    endcase
                end
            endmodule";
        let outcome = extract_fsm(&parse_module(source));
        assert!(outcome.success, "reasons: {:?}", outcome.reasons);
        let fsm = outcome.fsm.unwrap();
        assert_eq!(fsm.transitions.len(), 2);
        assert!(fsm.transitions.iter().all(|t| t.condition == UNCONDITIONAL));
    }

    #[test]
    fn missing_params_fails_with_zero_confidence() {
        let outcome = extract_fsm(&parse_module("module empty; endmodule"));
        assert!(!outcome.success);
        assert_eq!(outcome.confidence, 0.0);
        assert!(!outcome.reasons.is_empty());
    }

    #[test]
    fn missing_state_register_keeps_partial_confidence() {
        let source = "
            module partial;
                localparam [1:0] A = 2'b00;
                localparam [1:0] B = 2'b01;
            endmodule";
        let outcome = extract_fsm(&parse_module(source));
        assert!(!outcome.success);
        assert!((outcome.confidence - 0.2).abs() < 1e-9);
        assert!(outcome.reasons[0].contains("register"));
    }

    #[test]
    fn no_initial_guard_falls_back_to_first_state() {
        let source = "
            module nofall(input clk);
                localparam [0:0] P = 1'b0;
                localparam [0:0] Q = 1'b1;
                reg [0:0] current_state;
                reg [0:0] next_state;
                always @(posedge clk)
                    current_state <= next_state;
                always @(*) begin
                    next_state = current_state;
                    case (current_state)
                        P: next_state = Q;
                        Q: next_state = P;
                        default: next_state = P;
                    endcase
                end
            endmodule";
        let outcome = extract_fsm(&parse_module(source));
        assert!(outcome.success, "reasons: {:?}", outcome.reasons);
        assert_eq!(outcome.fsm.unwrap().initial_state().unwrap().name, "P");
    }

    #[test]
    fn layout_is_circular() {
        let fsm = templates::by_id("traffic-light").unwrap();
        let text = generate_verilog(&fsm, &FsmGenOptions::default()).unwrap();
        let outcome = extract_fsm(&parse_module(&text));
        let recovered = outcome.fsm.unwrap();
        for state in &recovered.states {
            let d = ((state.position.x - 300.0).powi(2) + (state.position.y - 300.0).powi(2))
                .sqrt();
            assert!((d - 150.0).abs() < 1e-6);
        }
    }
}
