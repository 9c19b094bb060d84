//! Error types for peripheral operations.
//!
//! Covers the failure modes the lock's peripherals can report: a device that
//! went away, a write the device cannot represent, and a store address that
//! does not exist.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during peripheral operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Data the device cannot represent (non-ASCII text, row out of range).
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Non-volatile store access outside its capacity.
    #[error("Store address {address} out of range (capacity {capacity})")]
    AddressOutOfRange { address: u16, capacity: usize },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn address_out_of_range(address: u16, capacity: usize) -> Self {
        Self::AddressOutOfRange { address, capacity }
    }

    /// Whether the device is gone for good.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
