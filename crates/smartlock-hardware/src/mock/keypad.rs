//! Mock keypad implementation for testing and development.

use tokio::sync::mpsc;

use crate::{
    HardwareError, Result,
    traits::{KeypadDevice, KeypadInput},
};

/// Mock keypad device.
///
/// Key presses arrive through an internal channel, fed either live through a
/// [`MockKeypadHandle`] or all at once from a script. Once every handle is
/// dropped and the queue is drained, `read_input` reports the keypad as
/// disconnected, which ends the interface node's run loop.
///
/// # Examples
///
/// ```
/// use smartlock_hardware::mock::MockKeypad;
/// use smartlock_hardware::traits::{KeypadDevice, KeypadInput};
///
/// #[tokio::main]
/// async fn main() -> smartlock_hardware::Result<()> {
///     let mut keypad = MockKeypad::from_keys("12=");
///
///     assert_eq!(keypad.read_input().await?, KeypadInput::Digit(1));
///     assert_eq!(keypad.read_input().await?, KeypadInput::Digit(2));
///     assert_eq!(keypad.read_input().await?, KeypadInput::Confirm);
///     assert!(keypad.read_input().await.is_err());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    input_rx: mpsc::UnboundedReceiver<KeypadInput>,
}

impl MockKeypad {
    /// Create a live mock keypad fed through the returned handle.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a live mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();

        let keypad = Self { input_rx };
        let handle = MockKeypadHandle { input_tx, name };

        (keypad, handle)
    }

    /// Create a keypad that replays `inputs` and then disconnects.
    pub fn scripted(inputs: impl IntoIterator<Item = KeypadInput>) -> Self {
        let (keypad, handle) = Self::with_name("Scripted Keypad".to_string());
        for input in inputs {
            // The receiver is alive, so the send cannot fail.
            let _ = handle.send_input(input);
        }
        keypad
    }

    /// Create a scripted keypad from key labels (`0-9 = + - c`).
    ///
    /// Whitespace is skipped so scripts can be grouped for readability.
    pub fn from_keys(keys: &str) -> Self {
        Self::scripted(
            keys.chars()
                .filter(|c| !c.is_whitespace())
                .map(KeypadInput::from_char),
        )
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeypadDevice for MockKeypad {
    async fn read_input(&mut self) -> Result<KeypadInput> {
        self.input_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Keypad input channel closed"))
    }
}

/// Handle for feeding a mock keypad.
///
/// Cloneable; the keypad disconnects once every clone is dropped.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    input_tx: mpsc::UnboundedSender<KeypadInput>,
    name: String,
}

impl MockKeypadHandle {
    /// Queue one key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn send_input(&self, input: KeypadInput) -> Result<()> {
        self.input_tx
            .send(input)
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Queue a sequence of digits.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the keypad has
    /// been dropped.
    pub fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            self.send_input(KeypadInput::digit(digit)?)?;
        }
        Ok(())
    }

    /// Queue a complete credential followed by the confirm key.
    pub fn send_credential(&self, digits: &[u8]) -> Result<()> {
        self.send_digits(digits)?;
        self.send_input(KeypadInput::Confirm)
    }

    /// Queue key presses from labels, as in [`MockKeypad::from_keys`].
    pub fn send_keys(&self, keys: &str) -> Result<()> {
        keys.chars()
            .filter(|c| !c.is_whitespace())
            .try_for_each(|c| self.send_input(KeypadInput::from_char(c)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_keypad_basic_input() {
        let (mut keypad, handle) = MockKeypad::new();

        handle.send_input(KeypadInput::Digit(5)).unwrap();

        let input = keypad.read_input().await.unwrap();
        assert_eq!(input, KeypadInput::Digit(5));
    }

    #[tokio::test]
    async fn test_mock_keypad_send_credential() {
        let (mut keypad, handle) = MockKeypad::new();

        handle.send_credential(&[9, 8, 7, 6, 5]).unwrap();

        for expected in [9, 8, 7, 6, 5] {
            assert_eq!(keypad.read_input().await.unwrap(), KeypadInput::Digit(expected));
        }
        assert_eq!(keypad.read_input().await.unwrap(), KeypadInput::Confirm);
    }

    #[tokio::test]
    async fn test_send_digits_rejects_out_of_range() {
        let (_keypad, handle) = MockKeypad::new();
        assert!(handle.send_digits(&[1, 10]).is_err());
    }

    #[tokio::test]
    async fn test_scripted_keypad_disconnects_when_drained() {
        let mut keypad = MockKeypad::from_keys("1 + -");

        assert_eq!(keypad.read_input().await.unwrap(), KeypadInput::Digit(1));
        assert_eq!(keypad.read_input().await.unwrap(), KeypadInput::Plus);
        assert_eq!(keypad.read_input().await.unwrap(), KeypadInput::Minus);

        let err = keypad.read_input().await.unwrap_err();
        assert!(err.is_disconnected());
    }

    #[test]
    fn test_handle_carries_keypad_name() {
        let (_keypad, handle) = MockKeypad::with_name("Door Keypad".to_string());
        assert_eq!(handle.name(), "Door Keypad");
    }

    #[tokio::test]
    async fn test_mock_keypad_closed_channel() {
        let (mut keypad, handle) = MockKeypad::new();

        drop(handle);

        let result = keypad.read_input().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_to_dropped_keypad() {
        let (keypad, handle) = MockKeypad::new();
        drop(keypad);
        assert!(handle.send_keys("12").is_err());
    }
}
