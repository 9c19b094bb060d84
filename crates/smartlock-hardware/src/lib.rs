//! Peripheral abstraction layer for the smart lock.
//!
//! This crate provides trait-based abstractions for the devices the two lock
//! nodes drive: the interface node's keypad and 16x2 character LCD, and the
//! control node's EEPROM, door motor and alarm buzzer. The node state
//! machines are generic over these traits, so the same code runs against
//! mocks in tests, console devices on a host, or real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//! - **Time is injected**: timed holds go through a [`Clock`], never a
//!   busy-wait, so tests can run minutes of lock time under a paused runtime.
//!
//! # Example
//!
//! ```no_run
//! use smartlock_hardware::traits::{DisplayDevice, KeypadDevice, KeypadInput};
//! use smartlock_hardware::Result;
//!
//! async fn echo_digits<K: KeypadDevice, D: DisplayDevice>(
//!     keypad: &mut K,
//!     display: &mut D,
//! ) -> Result<()> {
//!     display.clear().await?;
//!     loop {
//!         match keypad.read_input().await? {
//!             KeypadInput::Digit(_) => display.put_char('*').await?,
//!             KeypadInput::Confirm => return Ok(()),
//!             _ => {}
//!         }
//!     }
//! }
//! ```

pub mod clock;
pub mod display;
pub mod error;
pub mod file_eeprom;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, TokioClock};
pub use display::VirtualDisplay;
pub use error::{HardwareError, Result};
pub use file_eeprom::FileEeprom;
pub use traits::{
    Buzzer, DisplayDevice, KeypadDevice, KeypadInput, MotorDriver, NonVolatileStore,
};
pub use types::{EEPROM_CAPACITY, LCD_COLUMNS, LCD_ROWS, MotorDirection};
