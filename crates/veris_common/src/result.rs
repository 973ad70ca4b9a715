//! The internal-error type that separates veris bugs from user mistakes.
//!
//! Problems in the user's source never surface here; they become
//! diagnostics and the operation still returns `Ok` with whatever was
//! recovered. `Err` is reserved for states the pipeline cannot legally
//! reach, such as the AST builder meeting a tree shape the parser cannot
//! produce.

/// Result alias for operations whose only failure mode is a veris bug.
pub type VerisResult<T> = Result<T, InternalError>;

/// A bug in veris itself.
///
/// Carries the pipeline stage that noticed the impossible state, so a
/// report pinpoints the faulty component without a backtrace.
#[derive(Debug, thiserror::Error)]
#[error("internal error in {stage}: {message}")]
pub struct InternalError {
    /// The component that detected the problem (e.g. `"ast-builder"`).
    pub stage: &'static str,
    /// What was observed.
    pub message: String,
}

impl InternalError {
    /// Creates an internal error attributed to `stage`.
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}
