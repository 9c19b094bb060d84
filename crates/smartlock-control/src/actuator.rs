//! Door motor sequencing and the lockout alarm.
//!
//! Both run to completion once started: the control node reads nothing from
//! the link while the door cycles or the buzzer sounds, so no input can cut
//! them short.

use std::time::Duration;

use tracing::{info, warn};

use smartlock_hardware::{Buzzer, Clock, MotorDirection, MotorDriver};

use crate::config::ControlConfig;
use crate::error::Result;

/// One step of the door cycle: drive, then hold for `hold` if set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorStep {
    pub direction: MotorDirection,
    pub hold: Option<Duration>,
}

/// The door cycle for `config`: unlock, hold open, lock, stop.
///
/// ```
/// use std::time::Duration;
/// use smartlock_control::{ControlConfig, actuator::door_sequence};
/// use smartlock_hardware::MotorDirection;
///
/// let steps = door_sequence(&ControlConfig::default());
/// assert_eq!(steps[0].direction, MotorDirection::Clockwise);
/// assert_eq!(steps[0].hold, Some(Duration::from_secs(15)));
/// assert_eq!(steps[3].direction, MotorDirection::Stop);
/// assert_eq!(steps[3].hold, None);
/// ```
pub fn door_sequence(config: &ControlConfig) -> [DoorStep; 4] {
    [
        DoorStep {
            direction: MotorDirection::Clockwise,
            hold: Some(config.unlock()),
        },
        DoorStep {
            direction: MotorDirection::Stop,
            hold: Some(config.hold()),
        },
        DoorStep {
            direction: MotorDirection::CounterClockwise,
            hold: Some(config.lock()),
        },
        DoorStep {
            direction: MotorDirection::Stop,
            hold: None,
        },
    ]
}

/// The control node's output devices.
#[derive(Debug)]
pub struct Actuators<M, B> {
    motor: M,
    buzzer: B,
}

impl<M: MotorDriver, B: Buzzer> Actuators<M, B> {
    pub fn new(motor: M, buzzer: B) -> Self {
        Self { motor, buzzer }
    }

    /// Run the full door cycle.
    pub async fn open_door<C: Clock>(&mut self, clock: &C, config: &ControlConfig) -> Result<()> {
        let started = clock.now();
        for step in door_sequence(config) {
            info!(direction = %step.direction, duty = step.direction.duty(), "door motor");
            self.motor.rotate(step.direction).await?;
            if let Some(hold) = step.hold {
                clock.sleep(hold).await;
            }
        }
        info!(elapsed_ms = (clock.now() - started).as_millis() as u64, "door cycle complete");
        Ok(())
    }

    /// Sound the buzzer for `duration`.
    ///
    /// The off command is sent even when switching on failed.
    pub async fn sound_alarm<C: Clock>(&mut self, clock: &C, duration: Duration) -> Result<()> {
        warn!(duration_s = duration.as_secs(), "lockout alarm on");
        let on = self.buzzer.on().await;
        if on.is_ok() {
            clock.sleep(duration).await;
        }
        self.buzzer.off().await?;
        on?;
        info!("lockout alarm off");
        Ok(())
    }
}
