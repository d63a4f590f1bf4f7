//! Round controller shared by every surface
//!
//! One round walks `Idle -> WagerPlaced -> ResolutionPending -> Revealed -> Idle`:
//! - `place_wager` validates the stake, debits it, draws the decision and
//!   synthesizes the outcome (kept private until reveal)
//! - `reveal` waits on the surface's reveal policy, credits any payout and
//!   appends the round record
//! - `complete` waits out the presentation delay and returns to idle
//!
//! A new wager is rejected while the controller is not idle. The stake debit
//! is irrevocable: a cancelled round does not re-credit it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use shared::{
    BetDescriptor, Outcome, ResultDomain, RoundRecord, RoundResult, SurfaceKind, ValidationError,
    WagerBounds,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::history::RoundHistory;
use crate::ledger::{EntryKind, Ledger, LedgerError};
use crate::odds::{BernoulliDraw, DecisionSource, WinRateSchedule};
use crate::synth;
use crate::timing::TimingGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    Idle,
    WagerPlaced,
    ResolutionPending,
    Revealed,
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RoundState::Idle => "idle",
            RoundState::WagerPlaced => "wager_placed",
            RoundState::ResolutionPending => "resolution_pending",
            RoundState::Revealed => "revealed",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum RoundError {
    #[error("Invalid wager: {0}")]
    InvalidWager(#[from] ValidationError),

    #[error("Bet {bet} is not offered on the {surface} surface")]
    InvalidBet {
        bet: BetDescriptor,
        surface: SurfaceKind,
    },

    #[error("No reference card has been dealt")]
    NoReferenceCard,

    #[error("Round already in progress ({state})")]
    ConcurrentRoundRejected { state: RoundState },

    #[error("No round is waiting in state {state}")]
    NoPendingRound { state: RoundState },

    #[error("Round {round_id} cancelled before reveal")]
    Cancelled { round_id: Uuid },

    #[error("Surface has been closed")]
    SurfaceClosed,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<RoundError> for ServiceError {
    fn from(error: RoundError) -> Self {
        match error {
            RoundError::InvalidWager(ValidationError::WagerExceedsBalance { amount, balance }) => {
                ServiceError::insufficient_balance(amount, balance)
            }
            RoundError::InvalidWager(ref inner) => match inner {
                ValidationError::WagerOutOfRange { amount, .. } => {
                    ServiceError::invalid_wager(*amount, inner.to_string())
                }
                other => ServiceError::invalid_wager(0, other.to_string()),
            },
            RoundError::InvalidBet { bet, surface } => ServiceError::invalid_bet(bet, surface),
            RoundError::NoReferenceCard => {
                ServiceError::invalid_bet("card comparison", "no card dealt")
            }
            RoundError::ConcurrentRoundRejected { state } => ServiceError::round_in_progress(state),
            RoundError::NoPendingRound { state } => ServiceError::no_pending_round(state),
            RoundError::Cancelled { round_id } => ServiceError::round_cancelled(round_id),
            RoundError::SurfaceClosed => ServiceError::surface_closed(),
            RoundError::Ledger(e) => ServiceError::ledger_error(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, RoundError>;

/// How a surface defers the reveal
pub enum RevealPolicy {
    /// Reveal after a fixed suspense delay (card and wheel tables)
    FixedDelay(Duration),
    /// Reveal at the next allowed second of the timing gate (signal desk)
    Gate(TimingGate),
}

/// Static description of a surface
#[derive(Debug, Clone, Copy)]
pub struct SurfaceProfile {
    pub kind: SurfaceKind,
    pub domain: ResultDomain,
    pub bounds: WagerBounds,
    pub presentation_delay: Duration,
}

struct PendingRound {
    round_id: Uuid,
    bet: BetDescriptor,
    wager: u64,
    outcome: Outcome,
    won: bool,
    payout_if_won: u64,
}

pub struct RoundController<L: Ledger, D: DecisionSource = BernoulliDraw> {
    profile: SurfaceProfile,
    ledger: Arc<L>,
    decisions: D,
    schedule: WinRateSchedule,
    rng: StdRng,
    reveal: RevealPolicy,
    state: RoundState,
    pending: Option<PendingRound>,
    last_result: Option<RoundResult>,
    history: RoundHistory,
    shutdown: CancellationToken,
}

impl<L: Ledger, D: DecisionSource> RoundController<L, D> {
    pub fn new(profile: SurfaceProfile, ledger: Arc<L>, decisions: D, reveal: RevealPolicy) -> Self {
        Self {
            profile,
            ledger,
            decisions,
            schedule: WinRateSchedule::standard(),
            rng: StdRng::from_entropy(),
            reveal,
            state: RoundState::Idle,
            pending: None,
            last_result: None,
            history: RoundHistory::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the synthesis RNG (reproducible tests)
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn profile(&self) -> &SurfaceProfile {
        &self.profile
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// Token cancelled when the surface is torn down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel any pending reveal wait and refuse further wagers
    pub fn teardown(&self) {
        tracing::info!(surface = %self.profile.kind, state = %self.state, "Surface torn down");
        self.shutdown.cancel();
    }

    /// Idle -> WagerPlaced -> ResolutionPending
    pub async fn place_wager(&mut self, bet: BetDescriptor, stake: u64) -> Result<Uuid> {
        if self.shutdown.is_cancelled() {
            return Err(RoundError::SurfaceClosed);
        }
        if self.state != RoundState::Idle {
            tracing::warn!(
                surface = %self.profile.kind,
                state = %self.state,
                "Wager rejected, round in progress"
            );
            return Err(RoundError::ConcurrentRoundRejected { state: self.state });
        }
        if bet.domain() != self.profile.domain {
            return Err(RoundError::InvalidBet {
                bet,
                surface: self.profile.kind,
            });
        }

        let balance = self.ledger.balance().await?;
        let wager = self.profile.bounds.check(stake, balance).map_err(|e| {
            tracing::warn!(surface = %self.profile.kind, stake, balance, error = %e, "Wager rejected");
            RoundError::InvalidWager(e)
        })?;

        let round_id = Uuid::new_v4();
        self.state = RoundState::WagerPlaced;
        tracing::info!(
            round_id = %round_id,
            surface = %self.profile.kind,
            bet = %bet,
            stake,
            balance,
            "Wager placed"
        );

        let memo = format!("{} stake ({})", self.profile.kind, bet);
        if let Err(e) = self.ledger.debit(wager.as_u64(), EntryKind::Stake, &memo).await {
            self.state = RoundState::Idle;
            return Err(e.into());
        }
        self.state = RoundState::ResolutionPending;

        let payout_if_won = bet.potential_payout(wager.as_u64());
        let probability = self.schedule.target_win_probability(balance, payout_if_won);
        let decision = self.decisions.draw(probability);
        let outcome = synth::synthesize(&bet, decision, &mut self.rng);
        let won = synth::evaluate(&outcome, &bet);

        tracing::debug!(round_id = %round_id, probability, "Round resolved, awaiting reveal");

        self.pending = Some(PendingRound {
            round_id,
            bet,
            wager: wager.as_u64(),
            outcome,
            won,
            payout_if_won,
        });
        Ok(round_id)
    }

    /// ResolutionPending -> Revealed
    ///
    /// Waits on the reveal policy until it fires or `cancel` is cancelled.
    pub async fn reveal(&mut self, cancel: &CancellationToken) -> Result<RoundResult> {
        if self.state != RoundState::ResolutionPending {
            return Err(RoundError::NoPendingRound { state: self.state });
        }
        let pending = self
            .pending
            .take()
            .ok_or(RoundError::NoPendingRound { state: self.state })?;

        let waited = match &mut self.reveal {
            RevealPolicy::FixedDelay(delay) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    _ = tokio::time::sleep(*delay) => true,
                }
            }
            RevealPolicy::Gate(gate) => gate.wait_for_reveal(cancel).await.is_ok(),
        };

        if !waited {
            self.state = RoundState::Idle;
            tracing::warn!(
                round_id = %pending.round_id,
                surface = %self.profile.kind,
                stake = pending.wager,
                "Round cancelled before reveal, stake kept"
            );
            return Err(RoundError::Cancelled {
                round_id: pending.round_id,
            });
        }

        let payout = if pending.won { pending.payout_if_won } else { 0 };
        if payout > 0 {
            let memo = format!("{} payout ({})", self.profile.kind, pending.bet);
            if let Err(e) = self.ledger.credit(payout, EntryKind::Payout, &memo).await {
                self.state = RoundState::Idle;
                return Err(e.into());
            }
        }

        self.history.push(RoundRecord {
            round_id: pending.round_id,
            surface: self.profile.kind,
            timestamp: Utc::now(),
            wager: pending.wager,
            bet: pending.bet,
            outcome: pending.outcome,
            won: pending.won,
            payout,
        });
        self.state = RoundState::Revealed;

        let result = RoundResult {
            round_id: pending.round_id,
            outcome: pending.outcome,
            won: pending.won,
            payout,
        };
        self.last_result = Some(result);

        tracing::info!(
            round_id = %result.round_id,
            surface = %self.profile.kind,
            outcome = %result.outcome,
            won = result.won,
            payout,
            "Round revealed"
        );
        Ok(result)
    }

    /// Revealed -> Idle after the presentation delay
    pub async fn complete(&mut self) -> Result<()> {
        if self.state != RoundState::Revealed {
            return Err(RoundError::NoPendingRound { state: self.state });
        }
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {}
            _ = tokio::time::sleep(self.profile.presentation_delay) => {}
        }
        self.state = RoundState::Idle;
        Ok(())
    }

    /// Run a whole round: wager, reveal, presentation delay.
    /// The reveal wait is cancelled by [`RoundController::teardown`].
    pub async fn play(&mut self, bet: BetDescriptor, stake: u64) -> Result<RoundResult> {
        self.place_wager(bet, stake).await?;
        let shutdown = self.shutdown.clone();
        let result = self.reveal(&shutdown).await?;
        self.complete().await?;
        Ok(result)
    }
}
