use crate::{
    Result,
    constants::{
        CMD_CORRECT, CMD_INCORRECT, CMD_OPTION_CHANGE_PASSWORD, CMD_OPTION_OPEN_DOOR,
        CREDENTIAL_LEN, MAX_DIGIT,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Five-digit credential, stored and transmitted as raw digit values.
///
/// # Security
/// Credentials travel over the link and sit in non-volatile memory in
/// plaintext. Equality is constant-time, and neither `Debug` nor `Display`
/// reveal the digits, but nothing here protects against an observer on the
/// serial line or someone dumping the EEPROM.
#[derive(Clone, Copy, Eq)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Create a credential from exactly five digit values.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if any value is greater than 9.
    pub fn new(digits: [u8; CREDENTIAL_LEN]) -> Result<Self> {
        if let Some(&value) = digits.iter().find(|&&d| d > MAX_DIGIT) {
            return Err(Error::InvalidDigit { value });
        }
        Ok(Credential(digits))
    }

    /// Create a credential from a slice of digit values.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentialLength` if the slice is not five
    /// values long, or `Error::InvalidDigit` for a value greater than 9.
    pub fn from_slice(digits: &[u8]) -> Result<Self> {
        let array: [u8; CREDENTIAL_LEN] =
            digits
                .try_into()
                .map_err(|_| Error::InvalidCredentialLength {
                    expected: CREDENTIAL_LEN,
                    actual: digits.len(),
                })?;
        Credential::new(array)
    }

    /// Wrap raw bytes read off the link or out of the store.
    ///
    /// Neither the link nor the store validate what they carry, so a
    /// corrupted byte simply produces a credential that matches nothing
    /// a keypad can enter.
    #[must_use]
    pub fn from_raw(bytes: [u8; CREDENTIAL_LEN]) -> Self {
        Credential(bytes)
    }

    /// Digits in entry order.
    #[must_use]
    pub fn digits(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// Compare two credentials element-wise.
    ///
    /// Returns `Comparison::Matched` carrying `self` when every digit
    /// agrees, `Comparison::Mismatched` otherwise.
    #[must_use]
    pub fn compare(&self, other: &Credential) -> Comparison {
        if self == other {
            Comparison::Matched(*self)
        } else {
            Comparison::Mismatched
        }
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(*****)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&"*".repeat(CREDENTIAL_LEN))
    }
}

impl std::str::FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(Error::InvalidDigit { value: c as u8 })
            })
            .collect::<Result<Vec<u8>>>()?;
        Credential::from_slice(&digits)
    }
}

/// Outcome of comparing two credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// All digits agree; carries the matched credential.
    Matched(Credential),
    /// At least one digit differs.
    Mismatched,
}

impl Comparison {
    /// Verdict reported over the link for this comparison.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self {
            Comparison::Matched(_) => Verdict::Correct,
            Comparison::Mismatched => Verdict::Incorrect,
        }
    }

    /// The matched credential, if any.
    #[must_use]
    pub fn matched(&self) -> Option<&Credential> {
        match self {
            Comparison::Matched(credential) => Some(credential),
            Comparison::Mismatched => None,
        }
    }
}

/// Result of a comparison as carried on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Verdict {
    Incorrect = CMD_INCORRECT,
    Correct = CMD_CORRECT,
}

impl Verdict {
    /// Decode a verdict byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommandCode` for any byte other than 0x02 or 0x03.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            CMD_INCORRECT => Ok(Verdict::Incorrect),
            CMD_CORRECT => Ok(Verdict::Correct),
            _ => Err(Error::InvalidCommandCode { code: value }),
        }
    }

    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Incorrect => write!(f, "Incorrect"),
            Verdict::Correct => write!(f, "Correct"),
        }
    }
}

/// Main menu option picked on the interface node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MenuOption {
    OpenDoor = CMD_OPTION_OPEN_DOOR,
    ChangePassword = CMD_OPTION_CHANGE_PASSWORD,
}

impl MenuOption {
    /// Decode an option byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommandCode` for any byte other than 0x08 or 0x09.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            CMD_OPTION_OPEN_DOOR => Ok(MenuOption::OpenDoor),
            CMD_OPTION_CHANGE_PASSWORD => Ok(MenuOption::ChangePassword),
            _ => Err(Error::InvalidCommandCode { code: value }),
        }
    }

    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MenuOption::OpenDoor => write!(f, "OpenDoor"),
            MenuOption::ChangePassword => write!(f, "ChangePassword"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case([1, 2, 3, 4, 5])]
    #[case([0, 0, 0, 0, 0])]
    #[case([9, 9, 9, 9, 9])]
    fn test_credential_valid(#[case] digits: [u8; 5]) {
        let credential = Credential::new(digits).unwrap();
        assert_eq!(credential.digits(), &digits);
    }

    #[rstest]
    #[case([1, 2, 3, 4, 10], 10)]
    #[case([255, 0, 0, 0, 0], 255)]
    fn test_credential_invalid_digit(#[case] digits: [u8; 5], #[case] bad: u8) {
        let err = Credential::new(digits).unwrap_err();
        assert!(matches!(err, Error::InvalidDigit { value } if value == bad));
    }

    #[rstest]
    #[case(&[1, 2, 3, 4])]
    #[case(&[1, 2, 3, 4, 5, 6])]
    #[case(&[])]
    fn test_credential_wrong_length(#[case] digits: &[u8]) {
        let err = Credential::from_slice(digits).unwrap_err();
        assert!(matches!(err, Error::InvalidCredentialLength { expected: 5, .. }));
    }

    #[test]
    fn test_credential_from_str() {
        let credential: Credential = "12345".parse().unwrap();
        assert_eq!(credential.digits(), &[1, 2, 3, 4, 5]);
        assert!("1234a".parse::<Credential>().is_err());
        assert!("123".parse::<Credential>().is_err());
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new([1, 2, 3, 4, 5]).unwrap();
        assert_eq!(format!("{credential}"), "*****");
        assert_eq!(format!("{credential:?}"), "Credential(*****)");
    }

    #[test]
    fn test_compare_matched_returns_first() {
        let a = Credential::new([1, 2, 3, 4, 5]).unwrap();
        let b = Credential::new([1, 2, 3, 4, 5]).unwrap();
        let comparison = a.compare(&b);
        assert_eq!(comparison.verdict(), Verdict::Correct);
        assert_eq!(comparison.matched(), Some(&a));
    }

    #[test]
    fn test_compare_mismatched() {
        let a = Credential::new([1, 1, 1, 1, 1]).unwrap();
        let b = Credential::new([2, 2, 2, 2, 2]).unwrap();
        let comparison = a.compare(&b);
        assert_eq!(comparison, Comparison::Mismatched);
        assert_eq!(comparison.verdict(), Verdict::Incorrect);
        assert!(comparison.matched().is_none());
    }

    #[test]
    fn test_compare_last_digit_differs() {
        let a = Credential::new([1, 2, 3, 4, 5]).unwrap();
        let b = Credential::new([1, 2, 3, 4, 6]).unwrap();
        assert_eq!(a.compare(&b).verdict(), Verdict::Incorrect);
    }

    #[test]
    fn test_verdict_codes() {
        assert_eq!(Verdict::from_u8(0x02).unwrap(), Verdict::Incorrect);
        assert_eq!(Verdict::from_u8(0x03).unwrap(), Verdict::Correct);
        assert!(Verdict::from_u8(0x04).is_err());
        assert_eq!(Verdict::Correct.to_u8(), 0x03);
        assert!(Verdict::Correct.is_correct());
        assert!(!Verdict::Incorrect.is_correct());
    }

    #[test]
    fn test_menu_option_codes() {
        assert_eq!(MenuOption::from_u8(0x08).unwrap(), MenuOption::OpenDoor);
        assert_eq!(
            MenuOption::from_u8(0x09).unwrap(),
            MenuOption::ChangePassword
        );
        assert!(MenuOption::from_u8(0x07).is_err());
        assert_eq!(MenuOption::ChangePassword.to_u8(), 0x09);
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::Correct).unwrap();
        let verdict: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(verdict, Verdict::Correct);
    }

    proptest! {
        #[test]
        fn prop_compare_correct_iff_equal(
            a in proptest::array::uniform5(0u8..=9),
            b in proptest::array::uniform5(0u8..=9),
        ) {
            let first = Credential::new(a).unwrap();
            let second = Credential::new(b).unwrap();
            let comparison = first.compare(&second);

            prop_assert_eq!(comparison.verdict().is_correct(), a == b);
            if let Some(matched) = comparison.matched() {
                prop_assert_eq!(matched.digits(), &a);
            }
        }
    }
}
