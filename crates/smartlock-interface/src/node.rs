//! Interface node state machine (initiator).
//!
//! ```text
//! Provisioning:  entry + confirm -> "Send..." -> wait 0x01 -> pair -> 0x05 -> verdict
//!                   "Pass Matched!" -> MainMenu, "Pass Not Matched!" -> Provisioning
//! MainMenu:      menu screen -> '+' or '-' -> wait 0x07 -> option
//! Check:         entry -> "Send..." -> wait 0x06 -> candidate -> 0x04 -> verdict
//!                   Correct + OpenDoor        -> door screens -> MainMenu
//!                   Correct + ChangePassword  -> Provisioning
//!                   Incorrect                 -> "Wrong Password" -> MainMenu or Lockout
//! Lockout:       "ERROR" for the alarm interval -> MainMenu with a full budget
//! ```
//!
//! Keys are always collected before the node waits for the control node's
//! marker, so a user can type while the other side is still busy.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, trace, warn};

use smartlock_core::{MenuOption, Session, SessionPhase, Verdict};
use smartlock_hardware::{Clock, DisplayDevice, KeypadDevice, KeypadInput, TokioClock};
use smartlock_protocol::{CommandCode, Link};

use crate::config::InterfaceConfig;
use crate::entry::{Prompt, read_credential};
use crate::error::Result;
use crate::screens::Screen;

/// The interface node: link, keypad and display.
pub struct InterfaceNode<T, K, D, C = TokioClock> {
    link: Link<T>,
    keypad: K,
    display: D,
    clock: C,
    config: InterfaceConfig,
}

impl<T, K, D, C> InterfaceNode<T, K, D, C>
where
    T: AsyncRead + AsyncWrite + Unpin,
    K: KeypadDevice,
    D: DisplayDevice,
    C: Clock,
{
    pub fn new(link: Link<T>, keypad: K, display: D, clock: C, config: InterfaceConfig) -> Self {
        Self {
            link,
            keypad,
            display,
            clock,
            config,
        }
    }

    /// A fresh session with this node's retry budget.
    pub fn session(&self) -> Session {
        Session::new(self.config.retry_budget)
    }

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Run until the peer hangs up or the keypad runs dry.
    ///
    /// # Errors
    /// Any other link or peripheral failure.
    pub async fn run(&mut self, session: &mut Session) -> Result<()> {
        info!(phase = %session.phase(), "interface node started");
        loop {
            match self.step(session).await {
                Ok(_) => {}
                Err(e) if e.is_shutdown() => {
                    info!(phase = %session.phase(), reason = %e, "interface node stopping");
                    return Ok(());
                }
                Err(e) => {
                    error!(phase = %session.phase(), error = %e, "interface node failed");
                    return Err(e);
                }
            }
        }
    }

    /// Execute the current phase once and advance `session`.
    pub async fn step(&mut self, session: &mut Session) -> Result<SessionPhase> {
        let next = match session.phase() {
            SessionPhase::Provisioning => self.provision(session).await?,
            SessionPhase::MainMenu => self.menu(session).await?,
            SessionPhase::DoorCheck => self.check(session, MenuOption::OpenDoor).await?,
            SessionPhase::PasswordChangeCheck => {
                self.check(session, MenuOption::ChangePassword).await?
            }
            SessionPhase::Lockout => self.lockout(session).await?,
        };
        debug!(%next, "interface step complete");
        Ok(next)
    }

    async fn provision(&mut self, session: &mut Session) -> Result<SessionPhase> {
        let first = read_credential(&mut self.keypad, &mut self.display, Prompt::Entry).await?;
        let second = read_credential(&mut self.keypad, &mut self.display, Prompt::Confirm).await?;
        self.show(Screen::Sending).await?;

        self.link.wait_for(CommandCode::ReadyForPair).await?;
        self.link.send_pair(&first, &second).await?;
        self.link.send_marker(CommandCode::CheckingPassword).await?;
        let verdict = self.link.recv_verdict().await?;

        let feedback = match verdict {
            Verdict::Correct => Screen::PassMatched,
            Verdict::Incorrect => Screen::PassNotMatched,
        };
        self.show_for(feedback, self.config.feedback()).await?;

        let next = session.settle_provisioning(verdict)?;
        info!(%verdict, %next, "provisioning round settled");
        Ok(next)
    }

    async fn menu(&mut self, session: &mut Session) -> Result<SessionPhase> {
        self.show(Screen::Menu).await?;
        let option = self.read_option().await?;

        self.link.wait_for(CommandCode::ChosenOption).await?;
        self.link.send_option(option).await?;

        let next = session.choose(option)?;
        info!(%option, "menu option sent");
        Ok(next)
    }

    async fn check(&mut self, session: &mut Session, option: MenuOption) -> Result<SessionPhase> {
        let candidate = read_credential(&mut self.keypad, &mut self.display, Prompt::Entry).await?;
        self.show(Screen::Sending).await?;

        self.link.wait_for(CommandCode::RequestCandidate).await?;
        self.link.send_credential(&candidate).await?;
        self.link.send_marker(CommandCode::DoorState).await?;
        let verdict = self.link.recv_verdict().await?;

        let next = session.settle(verdict)?;
        info!(
            %option,
            %verdict,
            remaining = session.retries().remaining(),
            %next,
            "check round settled"
        );

        match (verdict, option) {
            (Verdict::Correct, MenuOption::OpenDoor) => self.door_cycle().await?,
            (Verdict::Correct, MenuOption::ChangePassword) => {}
            (Verdict::Incorrect, _) => {
                self.show_for(Screen::WrongPassword, self.config.feedback())
                    .await?
            }
        }
        Ok(next)
    }

    async fn lockout(&mut self, session: &mut Session) -> Result<SessionPhase> {
        warn!(lockouts = session.lockouts() + 1, "retry budget exhausted");
        self.show_for(Screen::Error, self.config.alarm()).await?;
        let next = session.finish_lockout()?;
        info!(remaining = session.retries().remaining(), "lockout finished");
        Ok(next)
    }

    /// Mirror the control node's motor cycle on screen.
    async fn door_cycle(&mut self) -> Result<()> {
        self.show_for(Screen::Unlocking, self.config.unlock()).await?;
        self.show_for(Screen::Waiting, self.config.hold()).await?;
        self.show_for(Screen::Locking, self.config.lock()).await
    }

    /// Block until `+` or `-`; every other key is ignored.
    async fn read_option(&mut self) -> Result<MenuOption> {
        loop {
            match self.keypad.read_input().await? {
                KeypadInput::Plus => return Ok(MenuOption::OpenDoor),
                KeypadInput::Minus => return Ok(MenuOption::ChangePassword),
                other => trace!(?other, "ignoring key on menu"),
            }
        }
    }

    async fn show(&mut self, screen: Screen) -> Result<()> {
        debug!(%screen, "display");
        screen.render(&mut self.display).await
    }

    async fn show_for(&mut self, screen: Screen, duration: Duration) -> Result<()> {
        self.show(screen).await?;
        self.clock.sleep(duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use smartlock_hardware::mock::{MockDisplay, MockDisplayHandle, MockKeypad};
    use smartlock_protocol::LinkConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

    type TestNode = InterfaceNode<DuplexStream, MockKeypad, MockDisplay>;

    fn harness(keys: &str) -> (TestNode, DuplexStream, MockDisplayHandle) {
        let (ours, peer) = duplex(64);
        let (display, handle) = MockDisplay::new();
        let node = InterfaceNode::new(
            Link::new(ours),
            MockKeypad::from_keys(keys),
            display,
            TokioClock,
            InterfaceConfig::default(),
        );
        (node, peer, handle)
    }

    async fn read_n(peer: &mut DuplexStream, n: usize) -> Vec<u8> {
        let mut buf = vec![0; n];
        peer.read_exact(&mut buf).await.unwrap();
        buf
    }

    /// Control side of a provisioning round.
    async fn provision(peer: &mut DuplexStream, verdict: u8) -> Vec<u8> {
        peer.write_u8(0x01).await.unwrap();
        let sent = read_n(peer, 11).await;
        peer.write_u8(verdict).await.unwrap();
        sent
    }

    /// Control side of a menu round followed by its check.
    async fn menu_round(peer: &mut DuplexStream, verdict: u8) -> (u8, Vec<u8>) {
        peer.write_u8(0x07).await.unwrap();
        let option = peer.read_u8().await.unwrap();
        peer.write_u8(0x06).await.unwrap();
        let sent = read_n(peer, 6).await;
        peer.write_u8(verdict).await.unwrap();
        (option, sent)
    }

    fn at_menu(node: &TestNode) -> Session {
        let mut session = node.session();
        session.settle_provisioning(Verdict::Correct).unwrap();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_provisioning_sends_pair_then_checking_marker() {
        let (mut node, mut peer, display) = harness("12345= 12345=");
        let mut session = node.session();

        let (step, sent) = tokio::join!(node.step(&mut session), provision(&mut peer, 0x03));

        assert_eq!(step.unwrap(), SessionPhase::MainMenu);
        assert_eq!(sent, vec![1, 2, 3, 4, 5, 1, 2, 3, 4, 5, 0x05]);
        assert!(display.saw("Plz re-enter the"));
        assert!(display.saw("Send..."));
        assert_eq!(display.screen()[0], "Pass Matched!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatch_verdict_restarts_provisioning() {
        let (mut node, mut peer, display) = harness("12345= 54321=");
        let mut session = node.session();

        let (step, sent) = tokio::join!(node.step(&mut session), provision(&mut peer, 0x02));

        assert_eq!(step.unwrap(), SessionPhase::Provisioning);
        assert_eq!(&sent[5..10], &[5, 4, 3, 2, 1]);
        assert!(display.saw("Pass Not Matched"));
    }

    #[tokio::test]
    async fn test_menu_ignores_keys_other_than_plus_minus() {
        let (mut node, mut peer, display) = harness("1 = c -");
        let mut session = at_menu(&node);

        let peer_side = async {
            peer.write_u8(0x07).await.unwrap();
            peer.read_u8().await.unwrap()
        };
        let (step, option) = tokio::join!(node.step(&mut session), peer_side);

        assert_eq!(step.unwrap(), SessionPhase::PasswordChangeCheck);
        assert_eq!(option, 0x09);
        assert_eq!(display.screen(), vec![" + : Open Door", " - : Change pass"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_door_screens_follow_motor_timing() {
        let (mut node, mut peer, display) = harness("+ 24680=");
        let mut session = at_menu(&node);

        let interface_side = async {
            node.step(&mut session).await.unwrap();
            node.step(&mut session).await.unwrap()
        };
        let (phase, (option, sent)) = tokio::join!(interface_side, menu_round(&mut peer, 0x03));

        assert_eq!(phase, SessionPhase::MainMenu);
        assert_eq!(option, 0x08);
        assert_eq!(sent, vec![2, 4, 6, 8, 0, 0x04]);

        let unlocking = display.first_seen("Unlocking...").unwrap();
        let waiting = display.first_seen("WAITING...").unwrap();
        let locking = display.first_seen("Locking...").unwrap();
        assert_eq!(waiting - unlocking, Duration::from_secs(15));
        assert_eq!(locking - waiting, Duration::from_secs(3));
        assert!(!display.saw("Wrong Password"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_change_password_goes_straight_to_provisioning() {
        let (mut node, mut peer, display) = harness("- 11111=");
        let mut session = at_menu(&node);

        let interface_side = async {
            node.step(&mut session).await.unwrap();
            node.step(&mut session).await.unwrap()
        };
        let (phase, (option, _)) = tokio::join!(interface_side, menu_round(&mut peer, 0x03));

        assert_eq!(phase, SessionPhase::Provisioning);
        assert_eq!(option, 0x09);
        assert!(!display.saw("Unlocking..."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_wrong_attempts_show_error_for_alarm_interval() {
        let keys = "12345= 12345= +99999= +99999= +99999=";
        let (mut node, mut peer, display) = harness(keys);
        let mut session = node.session();

        let control_side = async move {
            provision(&mut peer, 0x03).await;
            for _ in 0..3 {
                let (option, _) = menu_round(&mut peer, 0x02).await;
                assert_eq!(option, 0x08);
            }
        };
        let (result, ()) = tokio::join!(node.run(&mut session), control_side);

        // The keypad runs dry at the menu after the lockout.
        result.unwrap();
        assert_eq!(display.occurrences("Wrong Password"), 3);
        assert_eq!(display.occurrences("ERROR"), 1);
        let shown = display.first_seen("ERROR").unwrap();
        let gone = display.first_gone("ERROR").unwrap();
        assert_eq!(gone - shown, Duration::from_secs(60));
        assert_eq!(session.lockouts(), 1);
        assert_eq!(session.phase(), SessionPhase::MainMenu);
        assert_eq!(session.retries().remaining(), 3);
    }

    #[tokio::test]
    async fn test_run_ends_cleanly_when_peer_hangs_up() {
        let (mut node, peer, _display) = harness("12345= 12345=");
        let mut session = node.session();
        drop(peer);

        node.run(&mut session).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Provisioning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out_when_configured() {
        let (ours, _peer) = duplex(64);
        let (display, _) = MockDisplay::new();
        let config = LinkConfig {
            receive_timeout_ms: Some(250),
            ..LinkConfig::default()
        };
        let mut node = InterfaceNode::new(
            Link::with_config(ours, &config),
            MockKeypad::from_keys("12345= 12345="),
            display,
            TokioClock,
            InterfaceConfig::default(),
        );
        let mut session = node.session();

        let err = node.run(&mut session).await.unwrap_err();
        assert!(!err.is_shutdown());
        assert!(err.to_string().contains("link"));
    }
}
