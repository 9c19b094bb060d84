//! Mock device implementations for testing and development.
//!
//! Every mock comes with a cloneable handle that observes (or feeds) the
//! device after it has been moved into a node. Observations carry tokio
//! timestamps, so tests under a paused runtime can assert exact durations.

pub mod buzzer;
pub mod display;
pub mod eeprom;
pub mod keypad;
pub mod motor;

use std::sync::{Mutex, MutexGuard};

pub use buzzer::{BuzzerEvent, MockBuzzer, MockBuzzerHandle};
pub use display::{Frame, MockDisplay, MockDisplayHandle};
pub use eeprom::{MockEeprom, MockEepromHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motor::{MockMotor, MockMotorHandle, MotorEvent};

/// Lock shared mock state, recovering it if a panicking test poisoned it.
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
