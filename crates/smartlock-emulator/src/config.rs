//! Whole-lock configuration: link settings plus both nodes' tables.

use serde::{Deserialize, Serialize};

use smartlock_control::ControlConfig;
use smartlock_core::{Error, Result};
use smartlock_interface::InterfaceConfig;
use smartlock_protocol::LinkConfig;

/// Settings for a complete lock, as read from a TOML file with `[link]`,
/// `[control]` and `[interface]` tables. Every table and key is optional.
///
/// ```
/// use smartlock_emulator::LockConfig;
///
/// let config: LockConfig = toml::from_str(r#"
///     [link]
///     receive_timeout_ms = 2000
///
///     [control]
///     alarm_seconds = 30
///
///     [interface]
///     alarm_seconds = 30
/// "#).unwrap();
///
/// assert_eq!(config.link.baud_rate, 9600);
/// assert_eq!(config.control.alarm_seconds, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub link: LinkConfig,
    pub control: ControlConfig,
    pub interface: InterfaceConfig,
}

impl LockConfig {
    /// Validate both node tables and check they agree with each other.
    ///
    /// The nodes never exchange their budgets or durations, so a mismatch
    /// here shows up as the two sides disagreeing about what comes next.
    ///
    /// # Errors
    /// Returns `Error::Config` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        self.control.validate()?;
        self.interface.validate()?;

        let pairs = [
            (
                "retry_budget",
                u64::from(self.control.retry_budget),
                u64::from(self.interface.retry_budget),
            ),
            (
                "unlock_seconds",
                self.control.unlock_seconds,
                self.interface.unlock_seconds,
            ),
            ("hold_seconds", self.control.hold_seconds, self.interface.hold_seconds),
            ("lock_seconds", self.control.lock_seconds, self.interface.lock_seconds),
            ("alarm_seconds", self.control.alarm_seconds, self.interface.alarm_seconds),
        ];
        for (key, control, interface) in pairs {
            if control != interface {
                return Err(Error::Config(format!(
                    "control.{key} ({control}) and interface.{key} ({interface}) must match"
                )));
            }
        }
        Ok(())
    }
}
