//! Control node configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use smartlock_core::constants::{
    ALARM_SECONDS, DEFAULT_RETRY_BUDGET, HOLD_SECONDS, LOCK_SECONDS, UNLOCK_SECONDS,
};
use smartlock_core::{Error, Result};

/// Timing and retry settings of the control node.
///
/// Defaults match the lock's firmware. Loaded from the `[control]` table of
/// the binary's TOML file; missing keys keep their defaults.
///
/// ```
/// use std::time::Duration;
/// use smartlock_control::ControlConfig;
///
/// let config = ControlConfig::default();
/// assert_eq!(config.unlock(), Duration::from_secs(15));
/// assert_eq!(config.alarm(), Duration::from_secs(60));
/// assert_eq!(config.retry_budget, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Clockwise (unlocking) drive time.
    pub unlock_seconds: u64,

    /// Idle time with the door held open.
    pub hold_seconds: u64,

    /// Counter-clockwise (locking) drive time.
    pub lock_seconds: u64,

    /// Buzzer time after the retry budget runs out.
    pub alarm_seconds: u64,

    /// Consecutive mismatches tolerated before a lockout.
    pub retry_budget: u8,
}

impl ControlConfig {
    pub fn unlock(&self) -> Duration {
        Duration::from_secs(self.unlock_seconds)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_secs(self.hold_seconds)
    }

    pub fn lock(&self) -> Duration {
        Duration::from_secs(self.lock_seconds)
    }

    pub fn alarm(&self) -> Duration {
        Duration::from_secs(self.alarm_seconds)
    }

    /// Reject settings the state machine cannot run with.
    ///
    /// # Errors
    /// Returns `Error::Config` for a zero retry budget.
    pub fn validate(&self) -> Result<()> {
        if self.retry_budget == 0 {
            return Err(Error::Config(
                "control.retry_budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            unlock_seconds: UNLOCK_SECONDS,
            hold_seconds: HOLD_SECONDS,
            lock_seconds: LOCK_SECONDS,
            alarm_seconds: ALARM_SECONDS,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}
