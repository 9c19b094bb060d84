//! Virtual character LCD.
//!
//! A model of the interface node's 16x2 HD44780-style display: a grid of
//! ASCII cells and a cursor. Writes start at an explicit (row, column) or at
//! the cursor, advance the cursor, and clip at the end of the row instead of
//! wrapping.
//!
//! # Character Encoding - ASCII Only
//!
//! The LCD's character ROM has no Unicode. Non-ASCII input is rejected with
//! `HardwareError::InvalidData` rather than transliterated, so callers see
//! the same constraint the real panel imposes. Control characters are
//! dropped.
//!
//! # Examples
//!
//! ```
//! use smartlock_hardware::VirtualDisplay;
//!
//! let mut display = VirtualDisplay::lcd();
//! display.write_at(0, 0, "Plz enter pass:").unwrap();
//! display.write_at(1, 0, "").unwrap();
//! display.put_char('*').unwrap();
//! display.put_char('*').unwrap();
//!
//! assert_eq!(display.line(0).unwrap(), "Plz enter pass: ");
//! assert_eq!(display.line(1).unwrap().trim_end(), "**");
//! ```

use crate::error::{HardwareError, Result};
use crate::types::{LCD_COLUMNS, LCD_ROWS};

/// Virtual character display.
///
/// Not thread-safe by itself; mocks share it behind a mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDisplay {
    rows: usize,
    columns: usize,

    /// One space-padded ASCII string per row, always `columns` long.
    buffer: Vec<String>,

    /// Cursor as (row, column); column may equal `columns` (past the end).
    cursor: (usize, usize),
}

impl VirtualDisplay {
    /// Create a blank display with the given geometry.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            buffer: vec![" ".repeat(columns); rows],
            cursor: (0, 0),
        }
    }

    /// The interface node's 16x2 panel.
    pub fn lcd() -> Self {
        Self::new(LCD_ROWS, LCD_COLUMNS)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Blank every cell and home the cursor.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
        self.cursor = (0, 0);
    }

    /// Move the cursor without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the position lies outside the panel.
    pub fn move_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.columns {
            return Err(HardwareError::invalid_data(format!(
                "Cursor ({row}, {col}) outside {}x{} display",
                self.columns, self.rows
            )));
        }
        self.cursor = (row, col);
        Ok(())
    }

    /// Write `text` at (`row`, `col`), clipping at the row end.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the panel or the text is
    /// not ASCII.
    pub fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.move_cursor(row, col)?;
        self.write(text)
    }

    /// Write one character at the cursor and advance it.
    pub fn put_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf))
    }

    /// Row contents, always exactly `columns` characters.
    pub fn line(&self, row: usize) -> Result<&str> {
        self.buffer.get(row).map(String::as_str).ok_or_else(|| {
            HardwareError::invalid_data(format!("Row {row} outside {}-row display", self.rows))
        })
    }

    pub fn lines(&self) -> Vec<&str> {
        self.buffer.iter().map(String::as_str).collect()
    }

    /// Rows with trailing padding removed.
    pub fn text(&self) -> Vec<String> {
        self.buffer
            .iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|line| line.trim().is_empty())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if !text.is_ascii() {
            return Err(HardwareError::invalid_data(format!(
                "Display text must be ASCII, got {text:?}"
            )));
        }

        let (row, col) = self.cursor;
        let sanitized = sanitize_text(text);
        let room = self.columns.saturating_sub(col);
        let visible = truncate_text(&sanitized, room);
        let end = col + visible.len();

        // ASCII only, so byte offsets are character offsets.
        self.buffer[row].replace_range(col..end, &visible);
        self.cursor = (row, end);
        Ok(())
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::lcd()
    }
}

/// Truncate text to at most `max_chars` characters.
///
/// ```
/// use smartlock_hardware::display::truncate_text;
///
/// assert_eq!(truncate_text("Unlocking...", 6), "Unlock");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn sanitize_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
