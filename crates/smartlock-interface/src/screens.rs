//! Fixed screens of the interface node's 16x2 LCD.
//!
//! Every screen is a clear followed by text at fixed positions. Entry
//! screens leave the cursor where the `*` echo of typed digits goes.

use std::fmt;

use smartlock_hardware::DisplayDevice;

use crate::error::Result;

/// A screen the interface node can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// First credential prompt.
    Entry,
    /// Confirmation prompt during provisioning.
    Confirm,
    /// Waiting for the control node to take the digits.
    Sending,
    PassMatched,
    PassNotMatched,
    Menu,
    Unlocking,
    Waiting,
    Locking,
    WrongPassword,
    Error,
}

impl Screen {
    /// Text placements as (row, column, text). The last placement leaves
    /// the cursor where entry screens echo digits.
    pub fn layout(self) -> &'static [(usize, usize, &'static str)] {
        match self {
            Screen::Entry => &[(0, 0, "Plz enter pass:"), (1, 0, "")],
            Screen::Confirm => &[(0, 0, "Plz re-enter the"), (1, 0, "same pass:")],
            Screen::Sending => &[(0, 0, "Send...")],
            Screen::PassMatched => &[(0, 0, "Pass Matched!")],
            Screen::PassNotMatched => &[(0, 0, "Pass Not Matched!")],
            Screen::Menu => &[(0, 1, "+ : Open Door"), (1, 1, "- : Change pass")],
            Screen::Unlocking => &[(0, 4, "Door is"), (1, 2, "Unlocking...")],
            Screen::Waiting => &[(0, 3, "WAITING...")],
            Screen::Locking => &[(0, 4, "Door is"), (1, 3, "Locking...")],
            Screen::WrongPassword => &[(0, 1, "Wrong Password")],
            Screen::Error => &[(0, 5, "ERROR")],
        }
    }

    /// Clear the display and draw this screen.
    pub async fn render<D: DisplayDevice>(self, display: &mut D) -> Result<()> {
        display.clear().await?;
        for &(row, col, text) in self.layout() {
            display.write_at(row, col, text).await?;
        }
        Ok(())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<&str> = self
            .layout()
            .iter()
            .map(|&(_, _, text)| text)
            .filter(|text| !text.is_empty())
            .collect();
        write!(f, "{}", text.join(" / "))
    }
}
