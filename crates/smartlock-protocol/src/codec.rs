//! Tokio codec for the byte-oriented lock link.
//!
//! The link has no framing: every byte is a unit. Decoding therefore yields
//! raw bytes one at a time and leaves interpretation (marker, payload digit,
//! verdict) to [`Link`](crate::Link), which knows from the current phase what
//! it is waiting for. Encoding turns a [`Message`] into its wire bytes.
//!
//! ```text
//! serial / duplex stream -> Decoder -> u8 (one per frame)
//! Message -> Encoder -> serial / duplex stream
//! ```
//!
//! # Usage with Tokio Framed
//!
//! ```
//! use futures::{SinkExt, StreamExt};
//! use smartlock_protocol::{CommandCode, LinkCodec, Message};
//! use tokio_util::codec::Framed;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> smartlock_core::Result<()> {
//! let (a, b) = tokio::io::duplex(64);
//! let mut left = Framed::new(a, LinkCodec::new());
//! let mut right = Framed::new(b, LinkCodec::new());
//!
//! left.send(Message::Marker(CommandCode::ChosenOption)).await?;
//! assert_eq!(right.next().await.transpose()?, Some(0x07));
//! # Ok(())
//! # }
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::Message;
use smartlock_core::{Error, Result};

/// Codec yielding one raw byte per decoded frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkCodec {
    _private: (),
}

impl LinkCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LinkCodec {
    type Item = u8;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.is_empty() {
            return Ok(None);
        }
        Ok(Some(src.get_u8()))
    }
}

impl Encoder<Message> for LinkCodec {
    type Error = Error;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(item.wire_len());
        dst.extend_from_slice(&item.to_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandCode;
    use smartlock_core::{Credential, Verdict};

    #[test]
    fn test_decode_empty_buffer() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::new();
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_decode_one_byte_at_a_time() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x01, 0x05, 0x03][..]);

        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0x01));
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0x05));
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0x03));
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_decode_does_not_validate() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0xFF][..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0xFF));
    }

    #[test]
    fn test_encode_marker_then_digits() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::new();
        let credential = Credential::new([4, 3, 2, 1, 0]).unwrap();

        codec
            .encode(Message::Marker(CommandCode::RequestCandidate), &mut buffer)
            .unwrap();
        codec.encode(Message::Digits(credential), &mut buffer).unwrap();
        codec
            .encode(Message::Verdict(Verdict::Incorrect), &mut buffer)
            .unwrap();

        assert_eq!(&buffer[..], &[0x06, 4, 3, 2, 1, 0, 0x02]);
    }
}
