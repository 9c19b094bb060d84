use smartlock_core::{Credential, MenuOption, Verdict, constants::CREDENTIAL_LEN};

use crate::CommandCode;

/// One unit written to the link.
///
/// Markers, options and verdicts are a single byte. Credential payloads are
/// the raw digit values with no framing; the receiver knows from the
/// preceding marker how many bytes follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Bare command marker.
    Marker(CommandCode),

    /// Menu option chosen on the interface node.
    Option(MenuOption),

    /// Comparison verdict from the control node.
    Verdict(Verdict),

    /// One credential (5 bytes).
    Digits(Credential),

    /// Provisioning pair (10 bytes, entry then confirmation).
    Pair(Credential, Credential),
}

impl Message {
    /// Number of bytes this message occupies on the wire.
    pub fn wire_len(&self) -> usize {
        match self {
            Message::Marker(_) | Message::Option(_) | Message::Verdict(_) => 1,
            Message::Digits(_) => CREDENTIAL_LEN,
            Message::Pair(_, _) => 2 * CREDENTIAL_LEN,
        }
    }

    /// Append the wire bytes of this message to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Message::Marker(code) => out.push(code.to_u8()),
            Message::Option(option) => out.push(option.to_u8()),
            Message::Verdict(verdict) => out.push(verdict.to_u8()),
            Message::Digits(credential) => out.extend_from_slice(credential.digits()),
            Message::Pair(first, second) => {
                out.extend_from_slice(first.digits());
                out.extend_from_slice(second.digits());
            }
        }
    }

    /// Wire bytes of this message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        self.write_to(&mut out);
        out
    }
}

impl From<CommandCode> for Message {
    fn from(code: CommandCode) -> Self {
        Message::Marker(code)
    }
}
