//! Host stand-ins for the lock's peripherals.
//!
//! The keypad reads key labels from stdin, the display prints the panel to
//! stdout, and the motor and buzzer only log.

use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;
use tracing::{info, warn};

use smartlock_hardware::{
    Buzzer, DisplayDevice, HardwareError, KeypadDevice, KeypadInput, MotorDirection, MotorDriver,
    Result, VirtualDisplay,
};

/// Keypad fed by lines on stdin. Every non-blank character is one key
/// press (`0-9 = + - c`); end of input disconnects the keypad.
#[derive(Debug)]
pub struct StdinKeypad {
    keys: mpsc::UnboundedReceiver<char>,
}

impl StdinKeypad {
    /// Start the stdin reader thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, keys) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("stdin-keypad".to_string())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { return };
                    for key in line.chars().filter(|c| !c.is_whitespace()) {
                        if tx.send(key).is_err() {
                            return;
                        }
                    }
                }
            })?;
        Ok(Self { keys })
    }
}

impl KeypadDevice for StdinKeypad {
    async fn read_input(&mut self) -> Result<KeypadInput> {
        self.keys
            .recv()
            .await
            .map(KeypadInput::from_char)
            .ok_or_else(|| HardwareError::disconnected("stdin keypad"))
    }
}

/// 16x2 panel printed to stdout whenever its text changes.
#[derive(Debug)]
pub struct StdoutDisplay {
    panel: VirtualDisplay,
    shown: Vec<String>,
}

impl StdoutDisplay {
    pub fn new() -> Self {
        let panel = VirtualDisplay::lcd();
        let shown = panel.text();
        Self { panel, shown }
    }

    fn refresh(&mut self) {
        let text = self.panel.text();
        if text == self.shown {
            return;
        }
        println!("{}", frame(&self.panel));
        self.shown = text;
    }
}

impl Default for StdoutDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDevice for StdoutDisplay {
    async fn clear(&mut self) -> Result<()> {
        // Printed with the next write.
        self.panel.clear();
        Ok(())
    }

    async fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.panel.write_at(row, col, text)?;
        self.refresh();
        Ok(())
    }

    async fn put_char(&mut self, ch: char) -> Result<()> {
        self.panel.put_char(ch)?;
        self.refresh();
        Ok(())
    }
}

/// Boxed rendering of a panel.
pub fn frame(panel: &VirtualDisplay) -> String {
    frame_rows(&panel.lines(), panel.columns())
}

/// Boxed rendering of rows `columns` wide.
pub fn frame_rows<S: AsRef<str>>(rows: &[S], columns: usize) -> String {
    let border = format!("+{}+", "-".repeat(columns));
    let mut out = border.clone();
    for row in rows {
        out.push_str(&format!("\n|{:<columns$}|", row.as_ref()));
    }
    out.push('\n');
    out.push_str(&border);
    out
}

/// Motor that only reports what it would do.
#[derive(Debug, Default)]
pub struct LoggedMotor;

impl MotorDriver for LoggedMotor {
    async fn rotate(&mut self, direction: MotorDirection) -> Result<()> {
        info!(%direction, duty = direction.duty(), "motor");
        Ok(())
    }
}

/// Buzzer that only reports what it would do.
#[derive(Debug, Default)]
pub struct LoggedBuzzer;

impl Buzzer for LoggedBuzzer {
    async fn on(&mut self) -> Result<()> {
        warn!("buzzer on");
        Ok(())
    }

    async fn off(&mut self) -> Result<()> {
        info!("buzzer off");
        Ok(())
    }
}
