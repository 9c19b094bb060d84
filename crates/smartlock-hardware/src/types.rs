//! Common types shared across peripheral implementations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rows of the character LCD on the interface node.
pub const LCD_ROWS: usize = 2;

/// Columns of the character LCD on the interface node.
pub const LCD_COLUMNS: usize = 16;

/// Capacity of the control node's external EEPROM in bytes.
pub const EEPROM_CAPACITY: usize = 2048;

/// Duty cycle used whenever the door motor turns.
pub const MOTOR_FULL_DUTY: u8 = 100;

/// Rotation state of the door motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorDirection {
    /// Unlocking direction.
    Clockwise,
    /// Locking direction.
    CounterClockwise,
    Stop,
}

impl MotorDirection {
    /// Duty cycle the firmware pairs with this direction.
    pub fn duty(self) -> u8 {
        match self {
            MotorDirection::Stop => 0,
            _ => MOTOR_FULL_DUTY,
        }
    }
}

impl fmt::Display for MotorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorDirection::Clockwise => write!(f, "CW"),
            MotorDirection::CounterClockwise => write!(f, "CCW"),
            MotorDirection::Stop => write!(f, "STOP"),
        }
    }
}
