//! State encoders: binary, one-hot, and Gray.

use crate::error::FsmError;
use crate::model::{EncodedState, Encoding, State};
use veris_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use veris_source::Span;

/// The bit width of a binary or Gray encoding of `n` states:
/// `max(1, ⌈log₂ n⌉)`.
pub fn binary_width(n: usize) -> u32 {
    if n <= 1 {
        1
    } else {
        (usize::BITS - (n - 1).leading_zeros()).max(1)
    }
}

/// Converts `i` to Gray code.
pub fn binary_to_gray(i: u32) -> u32 {
    i ^ (i >> 1)
}

/// Converts a Gray-code value back to binary.
pub fn gray_to_binary(g: u32) -> u32 {
    let mut result = g;
    let mut mask = g >> 1;
    while mask != 0 {
        result ^= mask;
        mask >>= 1;
    }
    result
}

/// Encodes each state per the chosen scheme.
///
/// Binary assigns sequential values of width `max(1, ⌈log₂ n⌉)`; one-hot
/// assigns width `n` with the i-th bit (MSB first) set; Gray assigns
/// `i XOR (i >> 1)` at binary width. States are enumerated in authoring
/// order. An empty state list is an error.
pub fn encode_states(states: &[State], encoding: Encoding) -> Result<Vec<EncodedState>, FsmError> {
    if states.is_empty() {
        return Err(FsmError::EmptyFsm);
    }
    let n = states.len();

    let encoded = states
        .iter()
        .enumerate()
        .map(|(i, state)| {
            let (value, width) = match encoding {
                Encoding::Binary => {
                    let width = binary_width(n);
                    (to_binary_string(i as u32, width), width)
                }
                Encoding::Gray => {
                    let width = binary_width(n);
                    (to_binary_string(binary_to_gray(i as u32), width), width)
                }
                Encoding::Onehot => {
                    let width = n as u32;
                    let mut bits = vec![b'0'; n];
                    bits[i] = b'1';
                    (String::from_utf8(bits).unwrap(), width)
                }
            };
            EncodedState {
                id: state.id.clone(),
                name: state.name.clone(),
                value,
                width,
            }
        })
        .collect();

    Ok(encoded)
}

/// Checks an encoding choice against the state count.
///
/// One-hot over 16 states still generates, but the register width becomes
/// questionable; that is reported as a warning.
pub fn validate_encoding(state_count: usize, encoding: Encoding, sink: &DiagnosticSink) {
    if encoding == Encoding::Onehot && state_count > 16 {
        sink.emit(Diagnostic::uncoded(
            Severity::Warning,
            format!(
                "one-hot encoding with {state_count} states needs a {state_count}-bit register; consider binary or gray"
            ),
            Span::DUMMY,
        ));
    }
}

/// Renders `value` as a binary string of exactly `width` bits, MSB first.
fn to_binary_string(value: u32, width: u32) -> String {
    (0..width)
        .rev()
        .map(|bit| if value & (1 << bit) != 0 { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn states(n: usize) -> Vec<State> {
        (0..n)
            .map(|i| State {
                id: format!("s{i}"),
                name: format!("S{i}"),
                position: Position { x: 0.0, y: 0.0 },
                is_initial: i == 0,
                outputs: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn binary_width_formula() {
        assert_eq!(binary_width(1), 1);
        assert_eq!(binary_width(2), 1);
        assert_eq!(binary_width(3), 2);
        assert_eq!(binary_width(4), 2);
        assert_eq!(binary_width(5), 3);
        assert_eq!(binary_width(8), 3);
        assert_eq!(binary_width(9), 4);
    }

    #[test]
    fn binary_encoding_sequential() {
        let encoded = encode_states(&states(3), Encoding::Binary).unwrap();
        let values: Vec<&str> = encoded.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["00", "01", "10"]);
        assert!(encoded.iter().all(|e| e.width == 2));
    }

    #[test]
    fn onehot_encoding_msb_first() {
        let encoded = encode_states(&states(3), Encoding::Onehot).unwrap();
        let values: Vec<&str> = encoded.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["100", "010", "001"]);
        assert!(encoded.iter().all(|e| e.width == 3));
    }

    #[test]
    fn gray_encoding_three_states() {
        let encoded = encode_states(&states(3), Encoding::Gray).unwrap();
        let values: Vec<&str> = encoded.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["00", "01", "11"]);
    }

    #[test]
    fn gray_adjacent_differ_by_one_bit() {
        for n in 2..=16 {
            let encoded = encode_states(&states(n), Encoding::Gray).unwrap();
            for pair in encoded.windows(2) {
                let diff = pair[0]
                    .value
                    .bytes()
                    .zip(pair[1].value.bytes())
                    .filter(|(a, b)| a != b)
                    .count();
                assert_eq!(diff, 1, "gray values {:?} -> {:?}", pair[0].value, pair[1].value);
            }
        }
    }

    #[test]
    fn onehot_single_bit_each() {
        for n in 1..=20 {
            let encoded = encode_states(&states(n), Encoding::Onehot).unwrap();
            for e in &encoded {
                assert_eq!(e.value.bytes().filter(|b| *b == b'1').count(), 1);
                assert_eq!(e.width as usize, n);
            }
        }
    }

    #[test]
    fn values_distinct_and_uniform_width() {
        for encoding in [Encoding::Binary, Encoding::Onehot, Encoding::Gray] {
            for n in 1..=12 {
                let encoded = encode_states(&states(n), encoding).unwrap();
                let mut values: Vec<&str> =
                    encoded.iter().map(|e| e.value.as_str()).collect();
                let width = encoded[0].width;
                assert!(encoded.iter().all(|e| e.width == width));
                values.sort_unstable();
                values.dedup();
                assert_eq!(values.len(), n, "{encoding:?} with {n} states");
            }
        }
    }

    #[test]
    fn single_state_width_one() {
        for (encoding, expected) in [
            (Encoding::Binary, "0"),
            (Encoding::Onehot, "1"),
            (Encoding::Gray, "0"),
        ] {
            let encoded = encode_states(&states(1), encoding).unwrap();
            assert_eq!(encoded[0].width, 1);
            assert_eq!(encoded[0].value, expected);
        }
    }

    #[test]
    fn empty_is_error() {
        assert!(matches!(
            encode_states(&[], Encoding::Binary),
            Err(FsmError::EmptyFsm)
        ));
    }

    #[test]
    fn gray_binary_roundtrip() {
        for i in 0..256u32 {
            assert_eq!(gray_to_binary(binary_to_gray(i)), i);
        }
    }

    #[test]
    fn onehot_over_16_warns() {
        let sink = DiagnosticSink::new();
        validate_encoding(17, Encoding::Onehot, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn onehot_at_16_ok() {
        let sink = DiagnosticSink::new();
        validate_encoding(16, Encoding::Onehot, &sink);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn binary_never_warns() {
        let sink = DiagnosticSink::new();
        validate_encoding(100, Encoding::Binary, &sink);
        assert!(sink.take_all().is_empty());
    }
}
