//! Control node state machine (responder).
//!
//! ```text
//! Provisioning:  send 0x01 -> read pair -> [persist, read back] -> wait 0x05 -> verdict
//!                   match -> MainMenu, mismatch -> Provisioning
//! MainMenu:      send 0x07 -> read option -> DoorCheck | PasswordChangeCheck
//! Check:         send 0x06 -> read candidate -> compare once -> wait 0x04 -> verdict
//!                   Correct + OpenDoor        -> door cycle -> MainMenu
//!                   Correct + ChangePassword  -> Provisioning
//!                   Incorrect                 -> MainMenu, or Lockout when the budget is gone
//! Lockout:       buzzer for the alarm interval -> MainMenu with a full budget
//! ```
//!
//! The candidate is compared exactly once per round against the credential
//! read back from the store after provisioning; the chosen option only
//! decides what the verdict leads to.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use smartlock_core::{Credential, MenuOption, Session, SessionPhase};
use smartlock_hardware::{Buzzer, Clock, MotorDriver, NonVolatileStore, TokioClock};
use smartlock_protocol::{CommandCode, Link};

use crate::actuator::Actuators;
use crate::config::ControlConfig;
use crate::error::Result;
use crate::store::CredentialStore;

/// The control node: link, credential store, motor and buzzer.
pub struct ControlNode<T, S, M, B, C = TokioClock> {
    link: Link<T>,
    store: CredentialStore<S>,
    actuators: Actuators<M, B>,
    clock: C,
    config: ControlConfig,

    /// Read-back copy of the stored credential.
    stored: Option<Credential>,
}

impl<T, S, M, B, C> ControlNode<T, S, M, B, C>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: NonVolatileStore,
    M: MotorDriver,
    B: Buzzer,
    C: Clock,
{
    pub fn new(
        link: Link<T>,
        store: S,
        motor: M,
        buzzer: B,
        clock: C,
        config: ControlConfig,
    ) -> Self {
        Self {
            link,
            store: CredentialStore::new(store),
            actuators: Actuators::new(motor, buzzer),
            clock,
            config,
            stored: None,
        }
    }

    /// A fresh session with this node's retry budget.
    pub fn session(&self) -> Session {
        Session::new(self.config.retry_budget)
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Run until the peer hangs up.
    ///
    /// # Errors
    /// Any failure other than the peer closing the link.
    pub async fn run(&mut self, session: &mut Session) -> Result<()> {
        info!(phase = %session.phase(), "control node started");
        loop {
            match self.step(session).await {
                Ok(_) => {}
                Err(e) if e.is_link_closed() => {
                    info!(phase = %session.phase(), "link closed, control node stopping");
                    return Ok(());
                }
                Err(e) => {
                    error!(phase = %session.phase(), error = %e, "control node failed");
                    return Err(e);
                }
            }
        }
    }

    /// Execute the current phase once and advance `session`.
    pub async fn step(&mut self, session: &mut Session) -> Result<SessionPhase> {
        let next = match session.phase() {
            SessionPhase::Provisioning => self.provision(session).await?,
            SessionPhase::MainMenu => self.await_option(session).await?,
            SessionPhase::DoorCheck => self.check(session, MenuOption::OpenDoor).await?,
            SessionPhase::PasswordChangeCheck => {
                self.check(session, MenuOption::ChangePassword).await?
            }
            SessionPhase::Lockout => self.lockout(session).await?,
        };
        debug!(%next, "control step complete");
        Ok(next)
    }

    async fn provision(&mut self, session: &mut Session) -> Result<SessionPhase> {
        self.link.send_marker(CommandCode::ReadyForPair).await?;
        let (first, second) = self.link.recv_pair().await?;

        let comparison = first.compare(&second);
        if let Some(matched) = comparison.matched() {
            self.store.persist(matched).await?;
            let read_back = self.store.load().await?;
            if read_back != *matched {
                warn!("stored credential differs from the one written");
            }
            self.stored = Some(read_back);
        }

        let verdict = comparison.verdict();
        self.link.wait_for(CommandCode::CheckingPassword).await?;
        self.link.send_verdict(verdict).await?;

        let next = session.settle_provisioning(verdict)?;
        info!(%verdict, %next, "provisioning round settled");
        Ok(next)
    }

    async fn await_option(&mut self, session: &mut Session) -> Result<SessionPhase> {
        self.link.send_marker(CommandCode::ChosenOption).await?;
        let option = self.link.recv_option().await?;
        let next = session.choose(option)?;
        info!(%option, "menu option chosen");
        Ok(next)
    }

    async fn check(&mut self, session: &mut Session, option: MenuOption) -> Result<SessionPhase> {
        self.link.send_marker(CommandCode::RequestCandidate).await?;
        let candidate = self.link.recv_credential().await?;

        let stored = self.stored_credential().await?;
        let verdict = candidate.compare(&stored).verdict();

        self.link.wait_for(CommandCode::DoorState).await?;
        self.link.send_verdict(verdict).await?;

        let next = session.settle(verdict)?;
        info!(
            %option,
            %verdict,
            remaining = session.retries().remaining(),
            %next,
            "check round settled"
        );

        if verdict.is_correct() && option == MenuOption::OpenDoor {
            self.actuators.open_door(&self.clock, &self.config).await?;
        }
        Ok(next)
    }

    async fn lockout(&mut self, session: &mut Session) -> Result<SessionPhase> {
        warn!(lockouts = session.lockouts() + 1, "retry budget exhausted");
        self.actuators
            .sound_alarm(&self.clock, self.config.alarm())
            .await?;
        let next = session.finish_lockout()?;
        info!(remaining = session.retries().remaining(), "lockout finished");
        Ok(next)
    }

    /// The credential candidates are checked against.
    ///
    /// Normally the copy read back after provisioning; loaded from the store
    /// if this node has not provisioned since it started.
    async fn stored_credential(&mut self) -> Result<Credential> {
        match self.stored {
            Some(credential) => Ok(credential),
            None => {
                let credential = self.store.load().await?;
                self.stored = Some(credential);
                Ok(credential)
            }
        }
    }
}
