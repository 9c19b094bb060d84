//! In-process smart lock.
//!
//! Runs the interface node and the control node against each other over an
//! in-memory serial line with mock peripherals. Used by the `simulate`
//! subcommand of the binary and by the end-to-end tests.

pub mod config;
pub mod error;
pub mod lock;

pub use config::LockConfig;
pub use error::{EmulatorError, Result};
pub use lock::{LockReport, Monitors, SimulatedLock, SimulatedLockBuilder};
