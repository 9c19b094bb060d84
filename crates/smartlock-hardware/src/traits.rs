//! Peripheral trait definitions.
//!
//! These traits are the contract between the two node state machines and the
//! devices they drive: the interface node's keypad and character LCD, the
//! control node's EEPROM, door motor and buzzer. Mocks, console devices and
//! file-backed stores all plug in behind them.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::{HardwareError, Result};
use crate::types::MotorDirection;

/// Input from the interface keypad.
///
/// The lock's keypad has the ten digits plus the arithmetic keys of a 4x4
/// calculator matrix. Only `=`, `+`, `-` and the clear key have meaning;
/// everything else arrives as [`KeypadInput::Other`] and is ignored by the
/// state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadInput {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Confirm key (`=`).
    Confirm,

    /// Menu: open door (`+`).
    Plus,

    /// Menu: change password (`-`).
    Minus,

    /// Clear key (`c`, "ON/C" on the matrix).
    Clear,

    /// Any other key.
    Other(char),
}

impl KeypadInput {
    /// Create a digit input.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use smartlock_hardware::traits::KeypadInput;
    ///
    /// let input = KeypadInput::digit(5).unwrap();
    /// assert_eq!(input, KeypadInput::Digit(5));
    ///
    /// assert!(KeypadInput::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a key label to an input.
    ///
    /// ```
    /// use smartlock_hardware::traits::KeypadInput;
    ///
    /// assert_eq!(KeypadInput::from_char('7'), KeypadInput::Digit(7));
    /// assert_eq!(KeypadInput::from_char('='), KeypadInput::Confirm);
    /// assert_eq!(KeypadInput::from_char('*'), KeypadInput::Other('*'));
    /// ```
    pub fn from_char(key: char) -> Self {
        match key {
            '0'..='9' => Self::Digit(key as u8 - b'0'),
            '=' => Self::Confirm,
            '+' => Self::Plus,
            '-' => Self::Minus,
            'c' | 'C' => Self::Clear,
            other => Self::Other(other),
        }
    }
}

/// Keypad abstraction.
///
/// **NOTE**: this trait is NOT object-safe because `async fn` methods return
/// opaque futures. Use generic type parameters:
///
/// ```no_run
/// use smartlock_hardware::traits::{KeypadDevice, KeypadInput};
/// use smartlock_hardware::Result;
///
/// async fn wait_for_confirm<K: KeypadDevice>(keypad: &mut K) -> Result<()> {
///     while keypad.read_input().await? != KeypadInput::Confirm {}
///     Ok(())
/// }
/// ```
pub trait KeypadDevice: Send + Sync {
    /// Read the next key press.
    ///
    /// Blocks asynchronously until a key is pressed.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Disconnected` once no more input can arrive.
    async fn read_input(&mut self) -> Result<KeypadInput>;
}

/// Fixed-position character display.
///
/// Rows and columns are zero-based. Text past the last column is clipped.
pub trait DisplayDevice: Send + Sync {
    /// Blank every cell and home the cursor.
    async fn clear(&mut self) -> Result<()>;

    /// Write `text` starting at (`row`, `col`) and leave the cursor after it.
    async fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()>;

    /// Write one character at the cursor and advance it.
    async fn put_char(&mut self, ch: char) -> Result<()>;
}

/// Byte-addressed non-volatile memory.
pub trait NonVolatileStore: Send + Sync {
    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()>;

    async fn read_byte(&mut self, address: u16) -> Result<u8>;
}

/// DC motor behind an H-bridge.
pub trait MotorDriver: Send + Sync {
    /// Drive the motor in `direction` at the direction's duty cycle.
    ///
    /// Returns immediately; the caller decides how long the state holds.
    async fn rotate(&mut self, direction: MotorDirection) -> Result<()>;
}

/// Alarm buzzer.
pub trait Buzzer: Send + Sync {
    async fn on(&mut self) -> Result<()>;

    async fn off(&mut self) -> Result<()>;
}
