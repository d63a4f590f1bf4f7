use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{BetDescriptor, ResultDomain, RoundResult, SurfaceKind, WagerBounds};
use tokio_util::sync::CancellationToken;

use crate::ledger::Ledger;
use crate::odds::{BernoulliDraw, DecisionSource};
use crate::round::{RevealPolicy, RoundController, RoundError, SurfaceProfile};
use crate::timing::{Clock, SignalCategory, TimingGate};

/// Buy/sell and small/large calls revealed on the timing gate of one category
pub struct SignalDesk<L: Ledger, D: DecisionSource = BernoulliDraw> {
    category: SignalCategory,
    round: RoundController<L, D>,
}

impl<L: Ledger, D: DecisionSource> SignalDesk<L, D> {
    pub fn new(
        ledger: Arc<L>,
        decisions: D,
        category: SignalCategory,
        bounds: WagerBounds,
        poll_interval: Duration,
        presentation_delay: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let profile = SurfaceProfile {
            kind: SurfaceKind::Signal,
            domain: ResultDomain::Categorical,
            bounds,
            presentation_delay,
        };
        let gate = TimingGate::new(category, poll_interval, clock);
        Self {
            category,
            round: RoundController::new(profile, ledger, decisions, RevealPolicy::Gate(gate)),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.round = self.round.with_rng(StdRng::seed_from_u64(seed));
        self
    }

    pub fn category(&self) -> SignalCategory {
        self.category
    }

    pub async fn play(&mut self, bet: BetDescriptor, stake: u64) -> Result<RoundResult, RoundError> {
        self.round.play(bet, stake).await
    }

    /// Token that stops the reveal poll when the desk is closed
    pub fn shutdown_token(&self) -> CancellationToken {
        self.round.shutdown_token()
    }

    pub fn close(&self) {
        self.round.teardown();
    }

    pub fn controller(&self) -> &RoundController<L, D> {
        &self.round
    }

    pub fn controller_mut(&mut self) -> &mut RoundController<L, D> {
        &mut self.round
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::odds::ForcedDecision;
    use crate::timing::VirtualClock;
    use chrono::{TimeZone, Utc};
    use shared::{Outcome, SizeCategory, TradeDirection};

    async fn desk(
        category: SignalCategory,
        start_second: u32,
        decision: bool,
    ) -> SignalDesk<InMemoryLedger, ForcedDecision> {
        let ledger = Arc::new(InMemoryLedger::with_grant(10_000).await.unwrap());
        let origin = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, start_second).unwrap();
        SignalDesk::new(
            ledger,
            ForcedDecision(decision),
            category,
            WagerBounds::default(),
            Duration::from_millis(100),
            Duration::ZERO,
            Arc::new(VirtualClock::starting_at(origin)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_roulette_reveals_at_next_slot() {
        let mut desk = desk(SignalCategory::Roulette, 26, true).await;
        let started = tokio::time::Instant::now();

        let result = desk
            .play(BetDescriptor::TradeDirection(TradeDirection::Sell), 1_000)
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::Trade(TradeDirection::Sell));
        assert!(result.won);
        // :26 -> :45
        assert!(started.elapsed() >= Duration::from_secs(19));
        assert!(started.elapsed() < Duration::from_secs(20));
        assert_eq!(desk.controller().ledger().balance().await.unwrap(), 11_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_size_loss_reveals_opposite() {
        let mut desk = desk(SignalCategory::Card, 44, false).await;
        let result = desk
            .play(BetDescriptor::Size(SizeCategory::Large), 2_000)
            .await
            .unwrap();
        assert_eq!(result.outcome, Outcome::Size(SizeCategory::Small));
        assert_eq!(desk.controller().ledger().balance().await.unwrap(), 8_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_poll() {
        let mut desk = desk(SignalCategory::Trade, 1, true).await;
        let shutdown = desk.shutdown_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            shutdown.cancel();
        });

        let err = desk
            .play(BetDescriptor::TradeDirection(TradeDirection::Buy), 1_000)
            .await
            .unwrap_err();
        assert!(matches!(err, RoundError::Cancelled { .. }));
        assert_eq!(desk.controller().ledger().balance().await.unwrap(), 9_000);

        desk.close();
        assert!(matches!(
            desk.play(BetDescriptor::TradeDirection(TradeDirection::Buy), 1_000).await,
            Err(RoundError::SurfaceClosed)
        ));
    }
}
