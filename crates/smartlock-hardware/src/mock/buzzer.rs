//! Mock alarm buzzer.

use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::lock;
use crate::{Result, traits::Buzzer};

/// One buzzer state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzerEvent {
    pub at: Instant,
    pub active: bool,
}

/// Buzzer that records every switch.
#[derive(Debug)]
pub struct MockBuzzer {
    events: Arc<Mutex<Vec<BuzzerEvent>>>,
}

impl MockBuzzer {
    pub fn new() -> (Self, MockBuzzerHandle) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let handle = MockBuzzerHandle {
            events: Arc::clone(&events),
        };
        (Self { events }, handle)
    }

    fn push(&self, active: bool) {
        lock(&self.events).push(BuzzerEvent {
            at: Instant::now(),
            active,
        });
    }
}

impl Buzzer for MockBuzzer {
    async fn on(&mut self) -> Result<()> {
        self.push(true);
        Ok(())
    }

    async fn off(&mut self) -> Result<()> {
        self.push(false);
        Ok(())
    }
}

/// Observer for a [`MockBuzzer`].
#[derive(Debug, Clone)]
pub struct MockBuzzerHandle {
    events: Arc<Mutex<Vec<BuzzerEvent>>>,
}

impl MockBuzzerHandle {
    pub fn events(&self) -> Vec<BuzzerEvent> {
        lock(&self.events).clone()
    }

    pub fn is_on(&self) -> bool {
        lock(&self.events).last().is_some_and(|e| e.active)
    }

    /// Number of times the buzzer was switched on.
    pub fn activations(&self) -> usize {
        lock(&self.events).iter().filter(|e| e.active).count()
    }
}
