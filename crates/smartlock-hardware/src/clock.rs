//! Monotonic time source for timed waits.
//!
//! Every "hold this state for N seconds" step of the lock (door actuation,
//! lockout alarm, feedback screens) goes through a [`Clock`]. Production
//! uses [`TokioClock`]; tests run the same clock under a paused tokio
//! runtime so minute-long waits complete instantly and deterministically.

use std::time::Duration;

use tokio::time::Instant;

/// Monotonic clock with a cooperative sleep.
///
/// # Invariants
///
/// - `now()` never goes backwards.
/// - `sleep(d)` returns no earlier than `d` after it was called.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;

    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
