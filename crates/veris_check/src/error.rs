//! Error types for the external-checker adapter.

/// Errors from staging the check invocation.
///
/// Tool-side conditions (timeout, spawn failure, diagnostics in the source)
/// are reported inside [`CheckReport`](crate::CheckReport), not here; these
/// errors cover the adapter's own I/O only.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Creating or writing the temporary source file failed.
    #[error("failed to stage source for checking: {0}")]
    Io(#[from] std::io::Error),
}
