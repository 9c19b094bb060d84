//! Session phases and retry bookkeeping shared by both nodes.
//!
//! Each node threads a [`Session`] value through its transition function:
//! the phase it is in, the remaining retry budget and a bounded history of
//! phase changes. Nothing here is global; two nodes stay in step only because
//! both feed the same verdict into [`Session::settle`] every round.
//!
//! # Phases
//!
//! - `Provisioning`: a fresh credential pair is being entered and compared
//! - `MainMenu`: waiting for the user to pick open-door or change-password
//! - `DoorCheck`: a candidate is being checked for opening the door
//! - `PasswordChangeCheck`: a candidate is being checked before re-provisioning
//! - `Lockout`: the alarm interval after the retry budget ran out
//!
//! # Valid Transitions
//!
//! - Provisioning → Provisioning (pair mismatch) / MainMenu (pair match)
//! - MainMenu → DoorCheck / PasswordChangeCheck
//! - DoorCheck → MainMenu / Lockout
//! - PasswordChangeCheck → Provisioning / MainMenu / Lockout
//! - Lockout → MainMenu
//!
//! # Examples
//!
//! ```
//! use smartlock_core::{MenuOption, Session, SessionPhase, Verdict};
//!
//! let mut session = Session::new(3);
//! session.transition_to(SessionPhase::MainMenu).unwrap();
//! session.choose(MenuOption::OpenDoor).unwrap();
//!
//! let next = session.settle(Verdict::Incorrect).unwrap();
//! assert_eq!(next, SessionPhase::MainMenu);
//! assert_eq!(session.retries().remaining(), 2);
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RETRY_BUDGET;
use crate::{Error, MenuOption, Result, Verdict};

/// Maximum number of phase transitions kept in a session's history.
///
/// A full door round is three transitions, so this covers the last thirty
/// or so rounds, which is plenty to reconstruct how a node got stuck.
const MAX_HISTORY_SIZE: usize = 100;

/// Protocol phase a node is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Collecting and comparing a fresh credential pair.
    Provisioning,

    /// Waiting for the user to pick a menu option.
    MainMenu,

    /// Checking a candidate before opening the door.
    DoorCheck,

    /// Checking a candidate before re-provisioning.
    PasswordChangeCheck,

    /// Alarm interval after the retry budget ran out.
    Lockout,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            SessionPhase::Provisioning => "Provisioning",
            SessionPhase::MainMenu => "MainMenu",
            SessionPhase::DoorCheck => "DoorCheck",
            SessionPhase::PasswordChangeCheck => "PasswordChangeCheck",
            SessionPhase::Lockout => "Lockout",
        };
        write!(f, "{}", phase)
    }
}

impl SessionPhase {
    /// Check if moving to `target` is a legal step from this phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use smartlock_core::SessionPhase;
    ///
    /// assert!(SessionPhase::MainMenu.can_transition_to(&SessionPhase::DoorCheck));
    /// assert!(!SessionPhase::DoorCheck.can_transition_to(&SessionPhase::Provisioning));
    /// ```
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        matches!(
            (self, target),
            (
                SessionPhase::Provisioning,
                SessionPhase::Provisioning | SessionPhase::MainMenu
            ) | (
                SessionPhase::MainMenu,
                SessionPhase::DoorCheck | SessionPhase::PasswordChangeCheck
            ) | (
                SessionPhase::DoorCheck,
                SessionPhase::MainMenu | SessionPhase::Lockout
            ) | (
                SessionPhase::PasswordChangeCheck,
                SessionPhase::Provisioning | SessionPhase::MainMenu | SessionPhase::Lockout
            ) | (SessionPhase::Lockout, SessionPhase::MainMenu)
        )
    }

    /// Phase that checks a candidate for the given menu option.
    pub fn check_for(option: MenuOption) -> Self {
        match option {
            MenuOption::OpenDoor => SessionPhase::DoorCheck,
            MenuOption::ChangePassword => SessionPhase::PasswordChangeCheck,
        }
    }

    /// Menu option being checked, if this is a check phase.
    pub fn option(&self) -> Option<MenuOption> {
        match self {
            SessionPhase::DoorCheck => Some(MenuOption::OpenDoor),
            SessionPhase::PasswordChangeCheck => Some(MenuOption::ChangePassword),
            _ => None,
        }
    }
}

/// Effect of one verdict on the retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Correct verdict; budget refilled.
    Reset,
    /// Incorrect verdict; this many attempts are left.
    Remaining(u8),
    /// Incorrect verdict used the last attempt; lockout must follow.
    Exhausted,
}

/// Consecutive-mismatch budget, held independently by each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryBudget {
    budget: u8,
    remaining: u8,
}

impl RetryBudget {
    /// Create a full budget of `budget` attempts (at least one).
    pub fn new(budget: u8) -> Self {
        let budget = budget.max(1);
        Self {
            budget,
            remaining: budget,
        }
    }

    /// Attempts left before lockout.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Size of a full budget.
    pub fn budget(&self) -> u8 {
        self.budget
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Apply a verdict: refill on `Correct`, spend one attempt on `Incorrect`.
    pub fn record(&mut self, verdict: Verdict) -> RetryOutcome {
        match verdict {
            Verdict::Correct => {
                self.reset();
                RetryOutcome::Reset
            }
            Verdict::Incorrect => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    RetryOutcome::Exhausted
                } else {
                    RetryOutcome::Remaining(self.remaining)
                }
            }
        }
    }

    /// Refill the budget.
    pub fn reset(&mut self) {
        self.remaining = self.budget;
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET)
    }
}

/// A single recorded phase change.
///
/// Ordering is all the history keeps; how long a phase lasted is decided by
/// the node's clock, not recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: SessionPhase,
    pub to: SessionPhase,
}

impl PhaseTransition {
    pub fn new(from: SessionPhase, to: SessionPhase) -> Self {
        Self { from, to }
    }
}

/// Per-node session state threaded through the transition function.
///
/// A session always starts in `Provisioning` with a full retry budget;
/// neither node skips provisioning at power-up.
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    retries: RetryBudget,
    history: VecDeque<PhaseTransition>,
    lockouts: u32,
}

impl Session {
    /// Create a session in `Provisioning` with `retry_budget` attempts.
    pub fn new(retry_budget: u8) -> Self {
        Self {
            phase: SessionPhase::Provisioning,
            retries: RetryBudget::new(retry_budget),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            lockouts: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn retries(&self) -> &RetryBudget {
        &self.retries
    }

    /// Number of lockouts completed in this session.
    pub fn lockouts(&self) -> u32 {
        self.lockouts
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<PhaseTransition> {
        &self.history
    }

    /// Move to `next`, validating the step.
    ///
    /// # Errors
    /// Returns `Error::InvalidPhaseTransition` if the step is not allowed
    /// from the current phase; the session is left unchanged.
    pub fn transition_to(&mut self, next: SessionPhase) -> Result<PhaseTransition> {
        if !self.phase.can_transition_to(&next) {
            return Err(Error::InvalidPhaseTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }

        let transition = PhaseTransition::new(self.phase, next);
        self.phase = next;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }

    /// Resolve a provisioning round.
    ///
    /// A matched pair moves to `MainMenu`; a mismatch stays in
    /// `Provisioning`. The retry budget is not involved.
    pub fn settle_provisioning(&mut self, verdict: Verdict) -> Result<SessionPhase> {
        let next = if verdict.is_correct() {
            SessionPhase::MainMenu
        } else {
            SessionPhase::Provisioning
        };
        self.transition_to(next)?;
        Ok(next)
    }

    /// Enter the check phase for the chosen menu option.
    pub fn choose(&mut self, option: MenuOption) -> Result<SessionPhase> {
        let next = SessionPhase::check_for(option);
        self.transition_to(next)?;
        Ok(next)
    }

    /// Resolve a check round with the verdict both nodes observed.
    ///
    /// - `Correct` refills the budget and moves to `MainMenu` (door) or
    ///   `Provisioning` (change password).
    /// - `Incorrect` spends one attempt and returns to `MainMenu`, or moves
    ///   to `Lockout` when the last attempt is gone.
    ///
    /// # Errors
    /// Returns `Error::InvalidPhaseTransition` if called outside a check phase.
    pub fn settle(&mut self, verdict: Verdict) -> Result<SessionPhase> {
        let option = self.phase.option().ok_or_else(|| Error::InvalidPhaseTransition {
            from: self.phase.to_string(),
            to: "verdict".to_string(),
        })?;

        let next = match (self.retries.record(verdict), option) {
            (RetryOutcome::Reset, MenuOption::OpenDoor) => SessionPhase::MainMenu,
            (RetryOutcome::Reset, MenuOption::ChangePassword) => SessionPhase::Provisioning,
            (RetryOutcome::Remaining(_), _) => SessionPhase::MainMenu,
            (RetryOutcome::Exhausted, _) => SessionPhase::Lockout,
        };
        self.transition_to(next)?;
        Ok(next)
    }

    /// Leave `Lockout` after the alarm interval, refilling the budget.
    pub fn finish_lockout(&mut self) -> Result<SessionPhase> {
        self.transition_to(SessionPhase::MainMenu)?;
        self.retries.reset();
        self.lockouts += 1;
        Ok(SessionPhase::MainMenu)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET)
    }
}
