//! Curated pre-built FSMs.
//!
//! Each template builds a fully-populated machine (signals, positioned
//! states, transitions) that validates with zero errors and generates
//! synthesizable code as-is.

use crate::model::{
    circle_layout, Encoding, Fsm, FsmSignal, FsmStyle, OutputAssignment, State, Transition,
    UNCONDITIONAL,
};

/// A registry entry for a pre-built FSM.
pub struct Template {
    /// Stable id used to request the template.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Builds a fresh copy of the FSM.
    pub build: fn() -> Fsm,
}

/// All built-in templates, in display order.
pub fn registry() -> Vec<Template> {
    vec![
        Template {
            id: "traffic-light",
            name: "Traffic light",
            description: "Three-state Moore controller cycling idle/green/yellow",
            build: traffic_light,
        },
        Template {
            id: "seq-detector-101",
            name: "Sequence detector (101)",
            description: "Moore detector asserting after the bit pattern 101",
            build: seq_detector_101,
        },
        Template {
            id: "handshake",
            name: "Request/acknowledge handshake",
            description: "Four-phase handshake initiator",
            build: handshake,
        },
    ]
}

/// Builds the template with the given id, if it exists.
pub fn by_id(id: &str) -> Option<Fsm> {
    registry()
        .into_iter()
        .find(|t| t.id == id)
        .map(|t| (t.build)())
}

fn make_state(
    id: &str,
    name: &str,
    position: crate::model::Position,
    is_initial: bool,
    outputs: &[(&str, &str)],
) -> State {
    State {
        id: id.to_string(),
        name: name.to_string(),
        position,
        is_initial,
        outputs: outputs
            .iter()
            .map(|(signal, value)| OutputAssignment {
                signal: signal.to_string(),
                value: value.to_string(),
            })
            .collect(),
    }
}

fn make_transition(id: &str, from: &str, to: &str, condition: &str) -> Transition {
    Transition {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        condition: condition.to_string(),
        actions: Vec::new(),
        priority: None,
    }
}

fn traffic_light() -> Fsm {
    let mut fsm = Fsm::new("traffic_light");
    fsm.encoding = Encoding::Binary;
    fsm.fsm_type = FsmStyle::Moore;
    fsm.inputs = vec![FsmSignal::input("start"), FsmSignal::input("timer_done")];
    fsm.outputs = vec![
        FsmSignal::output("red"),
        FsmSignal::output("green"),
        FsmSignal::output("yellow"),
    ];

    let layout = circle_layout(3);
    fsm.states = vec![
        make_state("idle", "IDLE", layout[0], true, &[("red", "1'b1")]),
        make_state("green", "GREEN", layout[1], false, &[("green", "1'b1")]),
        make_state("yellow", "YELLOW", layout[2], false, &[("yellow", "1'b1")]),
    ];
    fsm.transitions = vec![
        make_transition("t0", "idle", "green", "start"),
        make_transition("t1", "green", "yellow", "timer_done"),
        make_transition("t2", "yellow", "idle", "timer_done"),
    ];
    fsm
}

fn seq_detector_101() -> Fsm {
    let mut fsm = Fsm::new("seq_detector_101");
    fsm.encoding = Encoding::Binary;
    fsm.fsm_type = FsmStyle::Moore;
    fsm.inputs = vec![FsmSignal::input("din")];
    fsm.outputs = vec![FsmSignal::output("detected")];

    let layout = circle_layout(4);
    fsm.states = vec![
        make_state("s0", "S0", layout[0], true, &[]),
        make_state("s1", "S1", layout[1], false, &[]),
        make_state("s10", "S10", layout[2], false, &[]),
        make_state("s101", "S101", layout[3], false, &[("detected", "1'b1")]),
    ];
    fsm.transitions = vec![
        make_transition("t0", "s0", "s1", "din"),
        make_transition("t1", "s1", "s10", "!din"),
        make_transition("t2", "s1", "s1", "din"),
        make_transition("t3", "s10", "s101", "din"),
        make_transition("t4", "s10", "s0", "!din"),
        make_transition("t5", "s101", "s1", "din"),
        make_transition("t6", "s101", "s0", "!din"),
    ];
    fsm
}

fn handshake() -> Fsm {
    let mut fsm = Fsm::new("handshake");
    fsm.encoding = Encoding::Binary;
    fsm.fsm_type = FsmStyle::Moore;
    fsm.inputs = vec![FsmSignal::input("start"), FsmSignal::input("ack")];
    fsm.outputs = vec![FsmSignal::output("req"), FsmSignal::output("done")];

    let layout = circle_layout(3);
    fsm.states = vec![
        make_state("idle", "IDLE", layout[0], true, &[]),
        make_state("request", "REQUEST", layout[1], false, &[("req", "1'b1")]),
        make_state("complete", "COMPLETE", layout[2], false, &[("done", "1'b1")]),
    ];
    fsm.transitions = vec![
        make_transition("t0", "idle", "request", "start"),
        make_transition("t1", "request", "complete", "ack"),
        make_transition("t2", "complete", "idle", UNCONDITIONAL),
    ];
    fsm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_required_ids() {
        let ids: Vec<&str> = registry().iter().map(|t| t.id).collect();
        assert!(ids.contains(&"traffic-light"));
        assert!(ids.contains(&"seq-detector-101"));
    }

    #[test]
    fn by_id_builds() {
        let fsm = by_id("traffic-light").unwrap();
        assert_eq!(fsm.module_name, "traffic_light");
        assert_eq!(fsm.states.len(), 3);
        assert_eq!(fsm.transitions.len(), 3);
        assert!(by_id("no-such-template").is_none());
    }

    #[test]
    fn traffic_light_shape() {
        let fsm = by_id("traffic-light").unwrap();
        let names: Vec<&str> = fsm.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["IDLE", "GREEN", "YELLOW"]);
        assert_eq!(fsm.initial_state().unwrap().name, "IDLE");
        assert_eq!(fsm.states[0].outputs[0].signal, "red");
    }

    #[test]
    fn seq_detector_covers_both_input_values() {
        let fsm = by_id("seq-detector-101").unwrap();
        // Every non-initial state has transitions for din and !din (the
        // initial state may idle on 0).
        for state in fsm.states.iter().filter(|s| !s.is_initial) {
            let conditions: Vec<&str> = fsm
                .transitions_from(&state.id)
                .iter()
                .map(|t| t.condition.as_str())
                .collect();
            assert!(conditions.contains(&"din"), "state {}", state.name);
            assert!(conditions.contains(&"!din"), "state {}", state.name);
        }
    }

    #[test]
    fn every_template_has_exactly_one_initial() {
        for template in registry() {
            let fsm = (template.build)();
            assert_eq!(
                fsm.states.iter().filter(|s| s.is_initial).count(),
                1,
                "template {}",
                template.id
            );
        }
    }

    #[test]
    fn positions_are_distinct() {
        for template in registry() {
            let fsm = (template.build)();
            for (i, a) in fsm.states.iter().enumerate() {
                for b in fsm.states.iter().skip(i + 1) {
                    let dx = a.position.x - b.position.x;
                    let dy = a.position.y - b.position.y;
                    assert!(dx.abs() > 1.0 || dy.abs() > 1.0);
                }
            }
        }
    }
}
