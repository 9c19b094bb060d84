//! Errors that end a control node run.

use smartlock_hardware::HardwareError;

/// Result type alias for control node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// A link or peripheral failure.
///
/// Credential mismatches are not errors; they are `Verdict::Incorrect`
/// values flowing through the state machine.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Link-level failure (peer gone, timeout, I/O).
    #[error("link: {0}")]
    Link(#[from] smartlock_core::Error),

    /// Store, motor or buzzer failure.
    #[error("hardware: {0}")]
    Hardware(#[from] HardwareError),
}

impl NodeError {
    /// Whether the peer hung up, which ends a run cleanly.
    pub fn is_link_closed(&self) -> bool {
        matches!(self, NodeError::Link(smartlock_core::Error::LinkClosed))
    }
}
