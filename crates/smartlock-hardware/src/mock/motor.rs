//! Mock door motor.

use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::lock;
use crate::{Result, traits::MotorDriver, types::MotorDirection};

/// One `rotate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorEvent {
    pub at: Instant,
    pub direction: MotorDirection,
    pub duty: u8,
}

/// Motor that records every command it receives.
#[derive(Debug)]
pub struct MockMotor {
    events: Arc<Mutex<Vec<MotorEvent>>>,
}

impl MockMotor {
    pub fn new() -> (Self, MockMotorHandle) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let handle = MockMotorHandle {
            events: Arc::clone(&events),
        };
        (Self { events }, handle)
    }
}

impl MotorDriver for MockMotor {
    async fn rotate(&mut self, direction: MotorDirection) -> Result<()> {
        lock(&self.events).push(MotorEvent {
            at: Instant::now(),
            direction,
            duty: direction.duty(),
        });
        Ok(())
    }
}

/// Observer for a [`MockMotor`].
#[derive(Debug, Clone)]
pub struct MockMotorHandle {
    events: Arc<Mutex<Vec<MotorEvent>>>,
}

impl MockMotorHandle {
    pub fn events(&self) -> Vec<MotorEvent> {
        lock(&self.events).clone()
    }

    /// Commanded directions, oldest first.
    pub fn directions(&self) -> Vec<MotorDirection> {
        lock(&self.events).iter().map(|e| e.direction).collect()
    }

    /// Most recent direction, `Stop` if never driven.
    pub fn current(&self) -> MotorDirection {
        lock(&self.events)
            .last()
            .map_or(MotorDirection::Stop, |e| e.direction)
    }
}
