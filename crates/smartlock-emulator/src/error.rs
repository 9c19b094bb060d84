//! Emulator error types.

use smartlock_hardware::HardwareError;

pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Failure of a simulated lock run, tagged with the node that failed.
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    #[error("control node: {0}")]
    Control(#[from] smartlock_control::NodeError),

    #[error("interface node: {0}")]
    Interface(#[from] smartlock_interface::NodeError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] smartlock_core::Error),

    /// The scripted keypad could not be fed.
    #[error("keypad: {0}")]
    Keypad(#[from] HardwareError),
}
