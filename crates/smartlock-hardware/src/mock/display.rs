//! Mock display backed by a [`VirtualDisplay`].

use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::lock;
use crate::{Result, VirtualDisplay, traits::DisplayDevice};

/// Snapshot of the panel after one display operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub at: Instant,
    /// Row contents with trailing padding removed.
    pub rows: Vec<String>,
}

impl Frame {
    /// Whether any row contains `text`.
    pub fn shows(&self, text: &str) -> bool {
        self.rows.iter().any(|row| row.contains(text))
    }
}

#[derive(Debug)]
struct DisplayState {
    panel: VirtualDisplay,
    frames: Vec<Frame>,
}

impl DisplayState {
    fn record(&mut self) {
        let rows = self.panel.text();
        // Repeated identical frames add nothing for observers.
        if self.frames.last().is_some_and(|last| last.rows == rows) {
            return;
        }
        self.frames.push(Frame {
            at: Instant::now(),
            rows,
        });
    }
}

/// Mock 16x2 display.
///
/// ```
/// use smartlock_hardware::mock::MockDisplay;
/// use smartlock_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> smartlock_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///     display.write_at(0, 0, "ERROR").await?;
///
///     assert_eq!(handle.screen()[0], "ERROR");
///     assert!(handle.saw("ERROR"));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplay {
    pub fn new() -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState {
            panel: VirtualDisplay::lcd(),
            frames: Vec::new(),
        }));
        let handle = MockDisplayHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }

    fn apply(&self, op: impl FnOnce(&mut VirtualDisplay) -> Result<()>) -> Result<()> {
        let mut state = lock(&self.state);
        op(&mut state.panel)?;
        state.record();
        Ok(())
    }
}

impl DisplayDevice for MockDisplay {
    async fn clear(&mut self) -> Result<()> {
        self.apply(|panel| {
            panel.clear();
            Ok(())
        })
    }

    async fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.apply(|panel| panel.write_at(row, col, text))
    }

    async fn put_char(&mut self, ch: char) -> Result<()> {
        self.apply(|panel| panel.put_char(ch))
    }
}

/// Observer for a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    /// Current rows, trailing padding removed.
    pub fn screen(&self) -> Vec<String> {
        lock(&self.state).panel.text()
    }

    /// Every distinct panel state so far, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        lock(&self.state).frames.clone()
    }

    /// Whether `text` has appeared on any row at any point.
    pub fn saw(&self, text: &str) -> bool {
        lock(&self.state).frames.iter().any(|f| f.shows(text))
    }

    /// Number of separate times `text` appeared (consecutive frames count once).
    pub fn occurrences(&self, text: &str) -> usize {
        let state = lock(&self.state);
        let mut count = 0;
        let mut showing = false;
        for frame in &state.frames {
            let shows = frame.shows(text);
            if shows && !showing {
                count += 1;
            }
            showing = shows;
        }
        count
    }

    /// When `text` first appeared.
    pub fn first_seen(&self, text: &str) -> Option<Instant> {
        lock(&self.state)
            .frames
            .iter()
            .find(|f| f.shows(text))
            .map(|f| f.at)
    }

    /// When the panel first stopped showing `text` after first showing it.
    pub fn first_gone(&self, text: &str) -> Option<Instant> {
        let state = lock(&self.state);
        let start = state.frames.iter().position(|f| f.shows(text))?;
        state.frames[start..]
            .iter()
            .find(|f| !f.shows(text))
            .map(|f| f.at)
    }
}
