//! Core types shared by both nodes of the smart lock.
//!
//! The interface node (keypad + display) and the control node (door motor +
//! credential store) agree on everything in this crate: the shape of a
//! credential, the verdict and menu codes, the retry budget and the session
//! phases both state machines walk through.

pub mod constants;
pub mod error;
pub mod session;
pub mod types;

pub use error::{Error, Result};
pub use session::{PhaseTransition, RetryBudget, RetryOutcome, Session, SessionPhase};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
