//! Structural validation of the FSM model.
//!
//! Run after every structural edit. All findings are diagnostics (with dummy
//! spans; the FSM lives in the editor, not in a file): none of them stops
//! generation, though generation itself fails separately on a missing
//! initial state.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Bfs;
use veris_common::is_valid_identifier;
use veris_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use veris_source::Span;

use crate::model::Fsm;

/// Validates an FSM, returning diagnostics in rule order:
/// missing/duplicate initial, bad or duplicate names, dangling transitions,
/// unreachable states, terminal states, undefined signals.
pub fn validate(fsm: &Fsm) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    check_initial(fsm, &mut diags);
    check_state_names(fsm, &mut diags);
    check_dead_transitions(fsm, &mut diags);
    check_reachability(fsm, &mut diags);
    check_missing_outgoing(fsm, &mut diags);
    check_undefined_signals(fsm, &mut diags);

    diags
}

fn check_initial(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let initial_count = fsm.states.iter().filter(|s| s.is_initial).count();
    match initial_count {
        0 => diags.push(Diagnostic::uncoded(
            Severity::Error,
            "no state is marked as initial",
            Span::DUMMY,
        )),
        1 => {}
        n => diags.push(Diagnostic::uncoded(
            Severity::Warning,
            format!("{n} states are marked as initial; the first one is used"),
            Span::DUMMY,
        )),
    }
}

/// State names become Verilog constants, so they must be unique and
/// lexically valid identifiers. Parsed names are valid by construction;
/// names typed into the editor canvas are not.
fn check_state_names(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for state in &fsm.states {
        if !is_valid_identifier(&state.name) {
            diags.push(Diagnostic::uncoded(
                Severity::Error,
                format!("state name '{}' is not a valid identifier", state.name),
                Span::DUMMY,
            ));
        }
        if !seen.insert(state.name.as_str()) {
            diags.push(Diagnostic::uncoded(
                Severity::Error,
                format!("duplicate state name '{}'", state.name),
                Span::DUMMY,
            ));
        }
    }
}

fn check_dead_transitions(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let ids: HashSet<&str> = fsm.states.iter().map(|s| s.id.as_str()).collect();
    for transition in &fsm.transitions {
        for (end, id) in [("source", &transition.from), ("destination", &transition.to)] {
            if !ids.contains(id.as_str()) {
                diags.push(Diagnostic::uncoded(
                    Severity::Error,
                    format!(
                        "transition '{}' references nonexistent {end} state '{id}'",
                        transition.id
                    ),
                    Span::DUMMY,
                ));
            }
        }
    }
}

fn check_reachability(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let Some(initial) = fsm.initial_state() else {
        return;
    };

    let index_of: HashMap<&str, usize> = fsm
        .states
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for i in 0..fsm.states.len() {
        graph.add_node(i);
    }
    for transition in &fsm.transitions {
        if let (Some(&from), Some(&to)) = (
            index_of.get(transition.from.as_str()),
            index_of.get(transition.to.as_str()),
        ) {
            graph.add_edge(from, to, ());
        }
    }

    let start = index_of[initial.id.as_str()];
    let mut reached = HashSet::new();
    let mut bfs = Bfs::new(&graph, start);
    while let Some(node) = bfs.next(&graph) {
        reached.insert(node);
    }

    for (i, state) in fsm.states.iter().enumerate() {
        if !reached.contains(&i) {
            diags.push(Diagnostic::uncoded(
                Severity::Warning,
                format!("state '{}' is unreachable from the initial state", state.name),
                Span::DUMMY,
            ));
        }
    }
}

fn check_missing_outgoing(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let has_outgoing: HashSet<&str> = fsm.transitions.iter().map(|t| t.from.as_str()).collect();
    for state in &fsm.states {
        if !has_outgoing.contains(state.id.as_str()) {
            diags.push(Diagnostic::uncoded(
                Severity::Info,
                format!("state '{}' has no outgoing transitions", state.name),
                Span::DUMMY,
            ));
        }
    }
}

fn check_undefined_signals(fsm: &Fsm, diags: &mut Vec<Diagnostic>) {
    let declared: HashSet<&str> = fsm
        .inputs
        .iter()
        .chain(fsm.outputs.iter())
        .map(|s| s.name.as_str())
        .collect();

    let mut reported: HashSet<String> = HashSet::new();
    let mut report = |name: &str, context: &str, diags: &mut Vec<Diagnostic>| {
        if !declared.contains(name) && reported.insert(name.to_string()) {
            diags.push(Diagnostic::warning(
                DiagnosticCode::new(Category::Error, 103),
                format!("signal '{name}' used in {context} is not declared"),
                Span::DUMMY,
            ));
        }
    };

    for transition in &fsm.transitions {
        for name in identifiers_in(&transition.condition) {
            report(&name, "a transition condition", diags);
        }
        for action in &transition.actions {
            report(&action.signal, "a transition action", diags);
            for name in identifiers_in(&action.value) {
                report(&name, "a transition action", diags);
            }
        }
    }
    for state in &fsm.states {
        for output in &state.outputs {
            report(&output.signal, "a state output", diags);
            for name in identifiers_in(&output.value) {
                report(&name, "a state output", diags);
            }
        }
    }
}

/// Extracts candidate signal names from a Verilog expression string.
///
/// Sized literals (`4'b10xz`) are skipped whole, operators are separators,
/// and bare integers are filtered out.
pub(crate) fn identifiers_in(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() || b == b'\'' {
            // A number, possibly the size prefix of a based literal; consume
            // the base letter and its digits (including x/z) in one go.
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'\'' {
                i += 1;
                if i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1; // base letter
                }
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1; // based digits, including x and z
                }
            }
        } else if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
            {
                i += 1;
            }
            names.push(text[start..i].to_string());
        } else {
            i += 1;
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::templates;

    fn state(id: &str, name: &str, initial: bool) -> State {
        State {
            id: id.to_string(),
            name: name.to_string(),
            position: Position { x: 0.0, y: 0.0 },
            is_initial: initial,
            outputs: Vec::new(),
        }
    }

    fn transition(id: &str, from: &str, to: &str) -> Transition {
        Transition {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            condition: UNCONDITIONAL.to_string(),
            actions: Vec::new(),
            priority: None,
        }
    }

    fn errors(diags: &[Diagnostic]) -> usize {
        diags.iter().filter(|d| d.severity == Severity::Error).count()
    }

    #[test]
    fn missing_initial_is_error() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", false));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains("initial")));
    }

    #[test]
    fn multiple_initial_is_warning() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.states.push(state("b", "B", true));
        fsm.transitions.push(transition("t", "a", "b"));
        fsm.transitions.push(transition("u", "b", "a"));
        let diags = validate(&fsm);
        assert_eq!(errors(&diags), 0);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("initial")));
    }

    #[test]
    fn duplicate_names_error() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "IDLE", true));
        fsm.states.push(state("b", "IDLE", false));
        fsm.transitions.push(transition("t", "a", "b"));
        fsm.transitions.push(transition("u", "b", "a"));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains("duplicate")));
    }

    #[test]
    fn invalid_state_name_error() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "2 fast", true));
        fsm.transitions.push(transition("t", "a", "a"));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error
                && d.message.contains("'2 fast' is not a valid identifier")));
    }

    #[test]
    fn dead_transition_error() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.transitions.push(transition("t", "a", "ghost"));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains("nonexistent")));
    }

    #[test]
    fn unreachable_state_warning() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.states.push(state("b", "B", false));
        fsm.states.push(state("c", "C", false));
        fsm.transitions.push(transition("t", "a", "b"));
        fsm.transitions.push(transition("u", "b", "a"));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("'C' is unreachable")));
        assert!(!diags.iter().any(|d| d.message.contains("'B' is unreachable")));
    }

    #[test]
    fn self_loop_is_reachable() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.transitions.push(transition("t", "a", "a"));
        let diags = validate(&fsm);
        assert!(!diags.iter().any(|d| d.message.contains("unreachable")));
    }

    #[test]
    fn terminal_state_is_info() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.states.push(state("b", "B", false));
        fsm.transitions.push(transition("t", "a", "b"));
        let diags = validate(&fsm);
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Info && d.message.contains("'B' has no outgoing")));
    }

    #[test]
    fn undefined_condition_signal_warns() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        fsm.states.push(state("b", "B", false));
        let mut t = transition("t", "a", "b");
        t.condition = "go && !stop".to_string();
        fsm.transitions.push(t);
        fsm.transitions.push(transition("u", "b", "a"));
        fsm.inputs.push(FsmSignal::input("go"));
        let diags = validate(&fsm);
        assert!(diags.iter().any(|d| d.message.contains("'stop'")));
        assert!(!diags.iter().any(|d| d.message.contains("'go'")));
    }

    #[test]
    fn literal_not_a_signal() {
        let mut fsm = Fsm::new("m");
        fsm.states.push(state("a", "A", true));
        let mut t = transition("t", "a", "a");
        t.condition = "cnt == 4'b10xz".to_string();
        fsm.transitions.push(t);
        fsm.inputs.push(FsmSignal {
            name: "cnt".to_string(),
            width: 4,
            direction: SignalDirection::Input,
            default: None,
        });
        let diags = validate(&fsm);
        // Neither the literal digits nor its x/z tail count as signals.
        assert!(!diags
            .iter()
            .any(|d| format!("{}", d.effective_code()) == "E103"));
    }

    #[test]
    fn identifiers_in_extraction() {
        assert_eq!(identifiers_in("start"), vec!["start"]);
        assert_eq!(identifiers_in("a && b"), vec!["a", "b"]);
        assert_eq!(identifiers_in("cnt == 4'b1010"), vec!["cnt"]);
        assert_eq!(identifiers_in("x == 8'hFF"), vec!["x"]);
        assert_eq!(identifiers_in("42"), Vec::<String>::new());
        assert_eq!(identifiers_in("1'b1"), Vec::<String>::new());
        assert_eq!(identifiers_in("!ready || (count > 3)"), vec!["ready", "count"]);
    }

    #[test]
    fn templates_validate_clean() {
        for template in templates::registry() {
            let fsm = (template.build)();
            let diags = validate(&fsm);
            assert_eq!(
                errors(&diags),
                0,
                "template '{}' has validation errors: {:?}",
                template.id,
                diags.iter().map(|d| &d.message).collect::<Vec<_>>()
            );
        }
    }
}
