//! Errors that end an interface node run.

use smartlock_hardware::HardwareError;

/// Result type alias for interface node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// A link or peripheral failure.
///
/// A wrong credential is not an error; it is a `Verdict::Incorrect` from
/// the control node.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Link-level failure (peer gone, timeout, I/O).
    #[error("link: {0}")]
    Link(#[from] smartlock_core::Error),

    /// Keypad or display failure.
    #[error("hardware: {0}")]
    Hardware(#[from] HardwareError),
}

impl NodeError {
    /// Whether the run should stop quietly: the peer hung up or the
    /// keypad has no more input.
    pub fn is_shutdown(&self) -> bool {
        match self {
            NodeError::Link(e) => matches!(e, smartlock_core::Error::LinkClosed),
            NodeError::Hardware(e) => e.is_disconnected(),
        }
    }
}
