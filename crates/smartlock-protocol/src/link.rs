//! Rendezvous primitives over a blocking byte channel.
//!
//! Every cross-node step is a rendezvous: one side writes a marker, the other
//! side reads and discards bytes until that exact marker shows up. There is
//! no acknowledgement, no retransmission and no error detection. If a marker
//! is lost or corrupted the waiting node blocks indefinitely, which is the
//! documented failure mode of the link.
//!
//! A bounded wait can be opted into through
//! [`LinkConfig::receive_timeout_ms`]; with it set, a silent peer turns into
//! `Error::LinkTimeout` instead of a hang. The limit covers only replies the
//! peer owes right away: markers, verdicts and the rest of a payload once its
//! first byte is in. The chosen option and the first byte of a credential
//! arrive whenever the user finishes typing, so those waits stay unbounded.
//! Nothing is retransmitted in either mode.
//!
//! # Example
//!
//! ```
//! use smartlock_core::Credential;
//! use smartlock_protocol::{CommandCode, Link};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> smartlock_core::Result<()> {
//! let (a, b) = tokio::io::duplex(64);
//! let mut control = Link::new(a);
//! let mut interface = Link::new(b);
//!
//! control.send_marker(CommandCode::RequestCandidate).await?;
//!
//! interface.wait_for(CommandCode::RequestCandidate).await?;
//! interface.send_credential(&"24680".parse()?).await?;
//!
//! let candidate = control.recv_credential().await?;
//! assert_eq!(candidate, "24680".parse::<Credential>()?);
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use smartlock_core::constants::{CREDENTIAL_LEN, DEFAULT_BAUD_RATE};
use smartlock_core::{Credential, Error, MenuOption, Result, Verdict};

use crate::{CommandCode, LinkCodec, Message};

/// Serial link settings.
///
/// # Example
///
/// ```
/// use smartlock_protocol::LinkConfig;
///
/// let config = LinkConfig::default();
/// assert_eq!(config.baud_rate, 9600);
/// assert!(config.receive_timeout().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// UART baud rate (8 data bits, no parity, 1 stop bit).
    pub baud_rate: u32,

    /// Upper bound on any single wait, in milliseconds.
    ///
    /// `None` keeps the indefinite block of the baseline link.
    pub receive_timeout_ms: Option<u64>,
}

impl LinkConfig {
    pub fn receive_timeout(&self) -> Option<Duration> {
        self.receive_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            receive_timeout_ms: None,
        }
    }
}

/// One node's end of the lock link.
///
/// Wraps any async byte stream (a serial bridge, a `tokio::io::duplex`
/// half) in a [`LinkCodec`] frame and exposes the handful of operations the
/// two state machines are built from.
pub struct Link<T> {
    framed: Framed<T, LinkCodec>,
    receive_timeout: Option<Duration>,
}

impl<T> Link<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap `io` with the baseline settings (indefinite waits).
    pub fn new(io: T) -> Self {
        Self::with_config(io, &LinkConfig::default())
    }

    pub fn with_config(io: T, config: &LinkConfig) -> Self {
        Self {
            framed: Framed::new(io, LinkCodec::new()),
            receive_timeout: config.receive_timeout(),
        }
    }

    /// Write a message and flush it.
    pub async fn send(&mut self, message: Message) -> Result<()> {
        trace!(?message, "link send");
        self.framed.send(message).await.map_err(hang_up_as_closed)
    }

    pub async fn send_marker(&mut self, code: CommandCode) -> Result<()> {
        debug!(%code, "sending marker");
        self.send(Message::Marker(code)).await
    }

    pub async fn send_verdict(&mut self, verdict: Verdict) -> Result<()> {
        debug!(%verdict, "sending verdict");
        self.send(Message::Verdict(verdict)).await
    }

    pub async fn send_option(&mut self, option: MenuOption) -> Result<()> {
        debug!(%option, "sending option");
        self.send(Message::Option(option)).await
    }

    pub async fn send_credential(&mut self, credential: &Credential) -> Result<()> {
        self.send(Message::Digits(*credential)).await
    }

    pub async fn send_pair(&mut self, first: &Credential, second: &Credential) -> Result<()> {
        self.send(Message::Pair(*first, *second)).await
    }

    /// Read the next raw byte.
    ///
    /// # Errors
    /// `Error::LinkClosed` when the peer hung up, `Error::LinkTimeout` when a
    /// receive timeout is configured and expires.
    pub async fn recv_byte(&mut self) -> Result<u8> {
        let limit = self.receive_timeout;
        deadline(limit, "byte", self.next_byte()).await
    }

    /// Block until `code` arrives, discarding every other byte.
    pub async fn wait_for(&mut self, code: CommandCode) -> Result<()> {
        debug!(%code, "waiting for marker");
        let limit = self.receive_timeout;
        deadline(limit, &code.to_string(), self.skip_until(code)).await
    }

    /// Block until a verdict byte arrives, discarding anything else.
    pub async fn recv_verdict(&mut self) -> Result<Verdict> {
        let limit = self.receive_timeout;
        let verdict = deadline(limit, "verdict", self.next_matching(Verdict::from_u8)).await?;
        debug!(%verdict, "received verdict");
        Ok(verdict)
    }

    /// Block until an option byte arrives, discarding anything else.
    ///
    /// Never bounded: the peer sends the option when the user picks one.
    pub async fn recv_option(&mut self) -> Result<MenuOption> {
        let option = self.next_matching(MenuOption::from_u8).await?;
        debug!(%option, "received option");
        Ok(option)
    }

    /// Read one five-byte credential payload.
    ///
    /// The bytes are taken as-is; a corrupted payload simply yields a
    /// credential that will not compare equal to anything enterable. The
    /// first byte may take as long as the user does; the other four are
    /// bounded by the receive timeout.
    pub async fn recv_credential(&mut self) -> Result<Credential> {
        let lead = self.next_byte().await?;
        let limit = self.receive_timeout;
        deadline(limit, "credential", self.payload_after(lead)).await
    }

    /// Read a provisioning pair (entry, then confirmation).
    ///
    /// Only the first byte is unbounded; the confirmation follows the entry
    /// back to back.
    pub async fn recv_pair(&mut self) -> Result<(Credential, Credential)> {
        let first = self.recv_credential().await?;
        let limit = self.receive_timeout;
        let second = deadline(limit, "credential", async {
            let lead = self.next_byte().await?;
            self.payload_after(lead).await
        })
        .await?;
        Ok((first, second))
    }

    async fn next_byte(&mut self) -> Result<u8> {
        match self.framed.next().await {
            Some(result) => result.map_err(hang_up_as_closed),
            None => Err(Error::LinkClosed),
        }
    }

    async fn skip_until(&mut self, code: CommandCode) -> Result<()> {
        loop {
            let byte = self.next_byte().await?;
            if byte == code.to_u8() {
                return Ok(());
            }
            warn!(byte = format_args!("0x{byte:02X}"), %code, "skipping unexpected byte");
        }
    }

    async fn next_matching<V>(&mut self, parse: fn(u8) -> Result<V>) -> Result<V> {
        loop {
            let byte = self.next_byte().await?;
            match parse(byte) {
                Ok(value) => return Ok(value),
                Err(_) => warn!(byte = format_args!("0x{byte:02X}"), "skipping unexpected byte"),
            }
        }
    }

    async fn payload_after(&mut self, lead: u8) -> Result<Credential> {
        let mut digits = [lead; CREDENTIAL_LEN];
        for slot in digits.iter_mut().skip(1) {
            *slot = self.next_byte().await?;
        }
        trace!("received credential payload");
        Ok(Credential::from_raw(digits))
    }
}

/// Report a peer that went away mid-write as a closed link.
fn hang_up_as_closed(error: Error) -> Error {
    match error {
        Error::Io(io)
            if matches!(
                io.kind(),
                ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::UnexpectedEof
            ) =>
        {
            Error::LinkClosed
        }
        other => other,
    }
}

/// Await `op`, bounded by `limit` when one is configured.
async fn deadline<R>(
    limit: Option<Duration>,
    waiting_for: &str,
    op: impl Future<Output = Result<R>>,
) -> Result<R> {
    let Some(limit) = limit else {
        return op.await;
    };
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(Error::LinkTimeout {
            duration_ms: limit.as_millis() as u64,
            waiting_for: waiting_for.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncWriteExt, DuplexStream, duplex};

    fn pair() -> (Link<DuplexStream>, DuplexStream) {
        let (a, b) = duplex(64);
        (Link::new(a), b)
    }

    #[tokio::test]
    async fn test_wait_for_skips_other_bytes() {
        let (mut link, mut peer) = pair();
        peer.write_all(&[0x03, 0xFF, 0x02, 0x07, 0x08]).await.unwrap();

        link.wait_for(CommandCode::ChosenOption).await.unwrap();
        // The byte after the marker is still available.
        assert_eq!(link.recv_byte().await.unwrap(), 0x08);
    }

    #[tokio::test]
    async fn test_recv_credential_reads_five_raw_bytes() {
        let (mut link, mut peer) = pair();
        peer.write_all(&[1, 2, 3, 4, 5, 6]).await.unwrap();

        let credential = link.recv_credential().await.unwrap();
        assert_eq!(credential.digits(), &[1, 2, 3, 4, 5]);
        assert_eq!(link.recv_byte().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_recv_pair_order() {
        let (mut link, mut peer) = pair();
        peer.write_all(&[1, 1, 1, 1, 1, 2, 2, 2, 2, 2]).await.unwrap();

        let (first, second) = link.recv_pair().await.unwrap();
        assert_eq!(first.digits(), &[1; 5]);
        assert_eq!(second.digits(), &[2; 5]);
    }

    #[tokio::test]
    async fn test_recv_verdict_and_option_skip_noise() {
        let (mut link, mut peer) = pair();
        peer.write_all(&[0x07, 0x03, 0x01, 0x09]).await.unwrap();

        assert_eq!(link.recv_verdict().await.unwrap(), Verdict::Correct);
        assert_eq!(
            link.recv_option().await.unwrap(),
            MenuOption::ChangePassword
        );
    }

    #[tokio::test]
    async fn test_closed_peer_reports_link_closed() {
        let (mut link, peer) = pair();
        drop(peer);

        let err = link.wait_for(CommandCode::ReadyForPair).await.unwrap_err();
        assert!(matches!(err, Error::LinkClosed));
    }

    #[tokio::test]
    async fn test_send_reaches_peer() {
        let (a, b) = duplex(64);
        let mut left = Link::new(a);
        let mut right = Link::new(b);

        let first = Credential::new([1, 2, 3, 4, 5]).unwrap();
        let second = Credential::new([5, 4, 3, 2, 1]).unwrap();
        left.send_marker(CommandCode::ReadyForPair).await.unwrap();
        left.send_pair(&first, &second).await.unwrap();
        left.send_verdict(Verdict::Incorrect).await.unwrap();

        right.wait_for(CommandCode::ReadyForPair).await.unwrap();
        assert_eq!(right.recv_pair().await.unwrap(), (first, second));
        assert_eq!(right.recv_verdict().await.unwrap(), Verdict::Incorrect);
    }

    #[tokio::test]
    async fn test_send_to_closed_peer_reports_link_closed() {
        let (mut link, peer) = pair();
        drop(peer);

        let err = link.send_marker(CommandCode::ChosenOption).await.unwrap_err();
        assert!(matches!(err, Error::LinkClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_timeout_is_opt_in() {
        let (a, _peer) = duplex(64);
        let config = LinkConfig {
            receive_timeout_ms: Some(2_000),
            ..LinkConfig::default()
        };
        let mut link = Link::with_config(a, &config);

        let err = link.wait_for(CommandCode::DoorState).await.unwrap_err();
        assert!(matches!(
            err,
            Error::LinkTimeout { duration_ms: 2_000, .. }
        ));
    }

    fn bounded(io: DuplexStream) -> Link<DuplexStream> {
        let config = LinkConfig {
            receive_timeout_ms: Some(2_000),
            ..LinkConfig::default()
        };
        Link::with_config(io, &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_option_is_not_a_timeout() {
        let (a, mut peer) = duplex(64);
        let mut link = bounded(a);

        let user = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            peer.write_u8(0x08).await.unwrap();
        };
        let (option, ()) = tokio::join!(link.recv_option(), user);
        assert_eq!(option.unwrap(), MenuOption::OpenDoor);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_first_payload_byte_is_not_a_timeout() {
        let (a, mut peer) = duplex(64);
        let mut link = bounded(a);

        let user = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            peer.write_all(&[1, 2, 3, 4, 5, 5, 4, 3, 2, 1]).await.unwrap();
        };
        let (pair, ()) = tokio::join!(link.recv_pair(), user);
        let (first, second) = pair.unwrap();
        assert_eq!(first.digits(), &[1, 2, 3, 4, 5]);
        assert_eq!(second.digits(), &[5, 4, 3, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_payload_times_out() {
        let (a, mut peer) = duplex(64);
        let mut link = bounded(a);
        peer.write_all(&[1, 2]).await.unwrap();

        let err = link.recv_credential().await.unwrap_err();
        assert!(matches!(
            err,
            Error::LinkTimeout { duration_ms: 2_000, ref waiting_for } if waiting_for == "credential"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_confirmation_times_out() {
        let (a, mut peer) = duplex(64);
        let mut link = bounded(a);
        peer.write_all(&[1, 2, 3, 4, 5]).await.unwrap();

        let err = link.recv_pair().await.unwrap_err();
        assert!(matches!(err, Error::LinkTimeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_waits_indefinitely() {
        let (a, _peer) = duplex(64);
        let mut link = Link::new(a);

        let waited = tokio::time::timeout(
            Duration::from_secs(3600),
            link.wait_for(CommandCode::DoorState),
        )
        .await;
        assert!(waited.is_err(), "baseline link must not give up on its own");
    }
}
