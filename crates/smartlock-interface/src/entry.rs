//! Credential entry on the keypad.
//!
//! Exactly five digits are taken, each echoed as `*`; any other key is
//! ignored while digits are being collected. After the fifth digit every
//! key except confirm is ignored. There is no backspace: a mistyped digit
//! can only be corrected by letting the round fail.

use tracing::trace;

use smartlock_core::Credential;
use smartlock_core::constants::CREDENTIAL_LEN;
use smartlock_hardware::{DisplayDevice, KeypadDevice, KeypadInput};

use crate::error::Result;
use crate::screens::Screen;

/// Which prompt to show while collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Entry,
    Confirm,
}

impl Prompt {
    fn screen(self) -> Screen {
        match self {
            Prompt::Entry => Screen::Entry,
            Prompt::Confirm => Screen::Confirm,
        }
    }
}

/// Show `prompt` and collect one credential.
pub async fn read_credential<K, D>(
    keypad: &mut K,
    display: &mut D,
    prompt: Prompt,
) -> Result<Credential>
where
    K: KeypadDevice,
    D: DisplayDevice,
{
    prompt.screen().render(display).await?;

    let mut digits = [0u8; CREDENTIAL_LEN];
    let mut filled = 0;
    while filled < CREDENTIAL_LEN {
        match keypad.read_input().await? {
            KeypadInput::Digit(d) => {
                digits[filled] = d;
                filled += 1;
                display.put_char('*').await?;
            }
            other => trace!(?other, "ignoring key during entry"),
        }
    }

    while keypad.read_input().await? != KeypadInput::Confirm {}

    // Keypad mocks and drivers only produce digits 0-9.
    Ok(Credential::new(digits)?)
}
