//! Interface node configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use smartlock_core::constants::{
    ALARM_SECONDS, DEFAULT_RETRY_BUDGET, FEEDBACK_MILLIS, HOLD_SECONDS, LOCK_SECONDS,
    UNLOCK_SECONDS,
};
use smartlock_core::{Error, Result};

/// Screen timings and retry budget of the interface node.
///
/// The door and alarm durations only decide how long the matching screens
/// stay up; they must equal the control node's values or the two nodes
/// drift apart. Loaded from the `[interface]` table of the binary's TOML
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// "Unlocking..." screen time.
    pub unlock_seconds: u64,

    /// "WAITING..." screen time.
    pub hold_seconds: u64,

    /// "Locking..." screen time.
    pub lock_seconds: u64,

    /// "ERROR" screen time during a lockout.
    pub alarm_seconds: u64,

    /// How long short feedback ("Pass Matched!", "Wrong Password") stays up.
    pub feedback_millis: u64,

    /// Consecutive mismatches tolerated before a lockout.
    pub retry_budget: u8,
}

impl InterfaceConfig {
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

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_millis)
    }

    /// # Errors
    /// Returns `Error::Config` for a zero retry budget.
    pub fn validate(&self) -> Result<()> {
        if self.retry_budget == 0 {
            return Err(Error::Config(
                "interface.retry_budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            unlock_seconds: UNLOCK_SECONDS,
            hold_seconds: HOLD_SECONDS,
            lock_seconds: LOCK_SECONDS,
            alarm_seconds: ALARM_SECONDS,
            feedback_millis: FEEDBACK_MILLIS,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}
