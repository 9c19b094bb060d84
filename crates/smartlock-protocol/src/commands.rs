//! Command byte table for the serial link.

use std::fmt;

use serde::{Deserialize, Serialize};
use smartlock_core::constants::*;
use smartlock_core::{Error, MenuOption, Result, Verdict};

/// Single-byte command codes exchanged between the two nodes.
///
/// # Examples
///
/// ```
/// use smartlock_protocol::CommandCode;
///
/// let code = CommandCode::from_u8(0x07).unwrap();
/// assert_eq!(code, CommandCode::ChosenOption);
/// assert_eq!(code.to_u8(), 0x07);
/// assert!(CommandCode::from_u8(0x42).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommandCode {
    /// Control is ready to receive the provisioning pair.
    ReadyForPair = CMD_READY_FOR_PAIR,
    /// Verdict: mismatch.
    Incorrect = CMD_INCORRECT,
    /// Verdict: match.
    Correct = CMD_CORRECT,
    /// Interface requests the verdict of a menu round.
    DoorState = CMD_DOOR_STATE,
    /// Interface requests the verdict of a provisioning round.
    CheckingPassword = CMD_CHECKING_PASSWORD,
    /// Control requests the candidate credential.
    RequestCandidate = CMD_REQUEST_CANDIDATE,
    /// Control requests the chosen menu option.
    ChosenOption = CMD_CHOSEN_OPTION,
    /// Option byte: open door.
    OptionOpenDoor = CMD_OPTION_OPEN_DOOR,
    /// Option byte: change password.
    OptionChangePassword = CMD_OPTION_CHANGE_PASSWORD,
}

impl CommandCode {
    /// Decode a command byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommandCode` for bytes outside 0x01..=0x09.
    pub fn from_u8(value: u8) -> Result<Self> {
        let code = match value {
            CMD_READY_FOR_PAIR => CommandCode::ReadyForPair,
            CMD_INCORRECT => CommandCode::Incorrect,
            CMD_CORRECT => CommandCode::Correct,
            CMD_DOOR_STATE => CommandCode::DoorState,
            CMD_CHECKING_PASSWORD => CommandCode::CheckingPassword,
            CMD_REQUEST_CANDIDATE => CommandCode::RequestCandidate,
            CMD_CHOSEN_OPTION => CommandCode::ChosenOption,
            CMD_OPTION_OPEN_DOOR => CommandCode::OptionOpenDoor,
            CMD_OPTION_CHANGE_PASSWORD => CommandCode::OptionChangePassword,
            _ => return Err(Error::InvalidCommandCode { code: value }),
        };
        Ok(code)
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Verdict carried by this code, if it is one.
    pub fn as_verdict(self) -> Option<Verdict> {
        Verdict::from_u8(self.to_u8()).ok()
    }

    /// Menu option carried by this code, if it is one.
    pub fn as_option(self) -> Option<MenuOption> {
        MenuOption::from_u8(self.to_u8()).ok()
    }
}

impl From<Verdict> for CommandCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Incorrect => CommandCode::Incorrect,
            Verdict::Correct => CommandCode::Correct,
        }
    }
}

impl From<MenuOption> for CommandCode {
    fn from(option: MenuOption) -> Self {
        match option {
            MenuOption::OpenDoor => CommandCode::OptionOpenDoor,
            MenuOption::ChangePassword => CommandCode::OptionChangePassword,
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandCode::ReadyForPair => "ReadyForPair",
            CommandCode::Incorrect => "Incorrect",
            CommandCode::Correct => "Correct",
            CommandCode::DoorState => "DoorState",
            CommandCode::CheckingPassword => "CheckingPassword",
            CommandCode::RequestCandidate => "RequestCandidate",
            CommandCode::ChosenOption => "ChosenOption",
            CommandCode::OptionOpenDoor => "OptionOpenDoor",
            CommandCode::OptionChangePassword => "OptionChangePassword",
        };
        write!(f, "{name}(0x{:02X})", self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x01, CommandCode::ReadyForPair)]
    #[case(0x02, CommandCode::Incorrect)]
    #[case(0x03, CommandCode::Correct)]
    #[case(0x04, CommandCode::DoorState)]
    #[case(0x05, CommandCode::CheckingPassword)]
    #[case(0x06, CommandCode::RequestCandidate)]
    #[case(0x07, CommandCode::ChosenOption)]
    #[case(0x08, CommandCode::OptionOpenDoor)]
    #[case(0x09, CommandCode::OptionChangePassword)]
    fn test_command_table(#[case] byte: u8, #[case] code: CommandCode) {
        assert_eq!(CommandCode::from_u8(byte).unwrap(), code);
        assert_eq!(code.to_u8(), byte);
    }

    #[rstest]
    #[case(0x00)]
    #[case(0x0A)]
    #[case(0xFF)]
    fn test_unknown_command(#[case] byte: u8) {
        assert!(matches!(
            CommandCode::from_u8(byte),
            Err(Error::InvalidCommandCode { code }) if code == byte
        ));
    }

    #[test]
    fn test_verdict_and_option_views() {
        assert_eq!(CommandCode::Correct.as_verdict(), Some(Verdict::Correct));
        assert_eq!(CommandCode::DoorState.as_verdict(), None);
        assert_eq!(
            CommandCode::OptionChangePassword.as_option(),
            Some(MenuOption::ChangePassword)
        );
        assert_eq!(CommandCode::from(Verdict::Incorrect), CommandCode::Incorrect);
        assert_eq!(
            CommandCode::from(MenuOption::OpenDoor),
            CommandCode::OptionOpenDoor
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CommandCode::ChosenOption.to_string(), "ChosenOption(0x07)");
    }
}
