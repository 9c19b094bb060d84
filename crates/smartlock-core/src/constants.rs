//! Link-level and timing constants shared by both nodes.
//!
//! Both processors are flashed with the same table; the link has no version
//! negotiation, so changing any value here breaks interoperability with a
//! node built from an older table.
//!
//! # Command Bytes
//!
//! | Byte | Name | Direction |
//! |------|------|-----------|
//! | `0x01` | [`CMD_READY_FOR_PAIR`] | control → interface |
//! | `0x02` | [`CMD_INCORRECT`] | control → interface |
//! | `0x03` | [`CMD_CORRECT`] | control → interface |
//! | `0x04` | [`CMD_DOOR_STATE`] | interface → control |
//! | `0x05` | [`CMD_CHECKING_PASSWORD`] | interface → control |
//! | `0x06` | [`CMD_REQUEST_CANDIDATE`] | control → interface |
//! | `0x07` | [`CMD_CHOSEN_OPTION`] | control → interface |
//! | `0x08` | [`CMD_OPTION_OPEN_DOOR`] | interface → control |
//! | `0x09` | [`CMD_OPTION_CHANGE_PASSWORD`] | interface → control |
//!
//! Digit payload bytes are raw values `0..=9`, so they share the numeric range
//! of the command bytes. The receiver always knows from context whether the
//! next byte is a payload byte or a marker.

// ============================================================================
// Credential Layout
// ============================================================================

/// Number of digits in a credential.
pub const CREDENTIAL_LEN: usize = 5;

/// Largest value a single credential digit may take.
pub const MAX_DIGIT: u8 = 9;

/// Non-volatile address of the first stored credential digit.
///
/// Digits occupy `STORE_BASE_ADDRESS..STORE_BASE_ADDRESS + CREDENTIAL_LEN`
/// (offsets 1..=5). Offset 0 is unused.
pub const STORE_BASE_ADDRESS: u16 = 0x01;

// ============================================================================
// Command Bytes
// ============================================================================

/// Control node is ready to receive the provisioning pair.
pub const CMD_READY_FOR_PAIR: u8 = 0x01;

/// Verdict: the compared credentials differ.
pub const CMD_INCORRECT: u8 = 0x02;

/// Verdict: the compared credentials match.
pub const CMD_CORRECT: u8 = 0x03;

/// Interface asks for the verdict of a menu round.
pub const CMD_DOOR_STATE: u8 = 0x04;

/// Interface asks for the verdict of a provisioning round.
pub const CMD_CHECKING_PASSWORD: u8 = 0x05;

/// Control node asks for the candidate credential.
pub const CMD_REQUEST_CANDIDATE: u8 = 0x06;

/// Control node asks which menu option the user picked.
pub const CMD_CHOSEN_OPTION: u8 = 0x07;

/// Menu option: open the door.
pub const CMD_OPTION_OPEN_DOOR: u8 = 0x08;

/// Menu option: change the stored credential.
pub const CMD_OPTION_CHANGE_PASSWORD: u8 = 0x09;

// ============================================================================
// Retry Policy
// ============================================================================

/// Consecutive mismatches allowed before the lockout alarm.
pub const DEFAULT_RETRY_BUDGET: u8 = 3;

// ============================================================================
// Timing (seconds unless noted)
// ============================================================================

/// Motor runs clockwise for this long to unlock the door.
pub const UNLOCK_SECONDS: u64 = 15;

/// Motor idles for this long with the door open.
pub const HOLD_SECONDS: u64 = 3;

/// Motor runs counter-clockwise for this long to lock the door.
pub const LOCK_SECONDS: u64 = 15;

/// Length of the lockout alarm.
pub const ALARM_SECONDS: u64 = 60;

/// How long short feedback messages stay on the display (milliseconds).
pub const FEEDBACK_MILLIS: u64 = 500;

// ============================================================================
// Serial Link
// ============================================================================

/// Baud rate both UARTs are configured with (8 data bits, no parity, 1 stop bit).
pub const DEFAULT_BAUD_RATE: u32 = 9600;
