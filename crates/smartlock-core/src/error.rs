use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid digit: {value} (expected 0-9)")]
    InvalidDigit { value: u8 },

    #[error("Invalid credential length: expected {expected}, got {actual}")]
    InvalidCredentialLength { expected: usize, actual: usize },

    // Link errors
    #[error("Invalid command code: 0x{code:02X}")]
    InvalidCommandCode { code: u8 },

    #[error("Link closed by peer")]
    LinkClosed,

    #[error("Link timeout after {duration_ms}ms waiting for {waiting_for}")]
    LinkTimeout { duration_ms: u64, waiting_for: String },

    // Session errors
    #[error("Invalid phase transition from {from} to {to}")]
    InvalidPhaseTransition { from: String, to: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
