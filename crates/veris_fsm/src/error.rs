//! Structured failures from the FSM generator and encoders.

/// Errors raised when an FSM cannot be encoded or generated.
///
/// Structural problems that do not prevent generation (duplicate names,
/// unreachable states) are diagnostics from [`validate`](crate::validate),
/// not errors.
#[derive(Debug, thiserror::Error)]
pub enum FsmError {
    /// The FSM has no states at all.
    #[error("FSM has no states")]
    EmptyFsm,

    /// No state is marked as the initial state.
    #[error("FSM has no initial state")]
    NoInitialState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(format!("{}", FsmError::EmptyFsm), "FSM has no states");
        assert_eq!(
            format!("{}", FsmError::NoInitialState),
            "FSM has no initial state"
        );
    }
}
