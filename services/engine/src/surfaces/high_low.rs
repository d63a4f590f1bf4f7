use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shared::{BetDescriptor, Card, Outcome, ResultDomain, RoundResult, SurfaceKind};

use super::TableSettings;
use crate::ledger::Ledger;
use crate::odds::{BernoulliDraw, DecisionSource};
use crate::round::{RevealPolicy, RoundController, RoundError, RoundState, SurfaceProfile};
use crate::synth::cards::random_card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLowChoice {
    Higher,
    Lower,
    Red,
    Black,
}

/// Card table: guess how the next card compares with the dealt one, or its color
pub struct HighLowTable<L: Ledger, D: DecisionSource = BernoulliDraw> {
    round: RoundController<L, D>,
    reference: Option<Card>,
    dealer: StdRng,
}

impl<L: Ledger, D: DecisionSource> HighLowTable<L, D> {
    pub fn new(ledger: Arc<L>, decisions: D, settings: TableSettings) -> Self {
        let profile = SurfaceProfile {
            kind: SurfaceKind::HighLow,
            domain: ResultDomain::Card,
            bounds: settings.bounds,
            presentation_delay: settings.presentation_delay,
        };
        Self {
            round: RoundController::new(
                profile,
                ledger,
                decisions,
                RevealPolicy::FixedDelay(settings.reveal_delay),
            ),
            reference: None,
            dealer: StdRng::from_entropy(),
        }
    }

    /// Seed both the dealer and the outcome synthesizer
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.dealer = StdRng::seed_from_u64(seed);
        self.round = self.round.with_rng(StdRng::seed_from_u64(seed.wrapping_add(1)));
        self
    }

    /// Deal a fresh reference card. Only allowed between rounds.
    pub fn deal(&mut self) -> Result<Card, RoundError> {
        if self.round.state() != RoundState::Idle {
            return Err(RoundError::ConcurrentRoundRejected {
                state: self.round.state(),
            });
        }
        let card = random_card(&mut self.dealer);
        tracing::debug!(card = %card, "Dealt reference card");
        self.reference = Some(card);
        Ok(card)
    }

    pub fn reference(&self) -> Option<Card> {
        self.reference
    }

    /// Bet for a choice against the current reference card
    pub fn bet_for(&self, choice: HighLowChoice) -> Result<BetDescriptor, RoundError> {
        match choice {
            HighLowChoice::Higher => self
                .reference
                .map(|reference| BetDescriptor::Higher { reference })
                .ok_or(RoundError::NoReferenceCard),
            HighLowChoice::Lower => self
                .reference
                .map(|reference| BetDescriptor::Lower { reference })
                .ok_or(RoundError::NoReferenceCard),
            HighLowChoice::Red => Ok(BetDescriptor::RedCard),
            HighLowChoice::Black => Ok(BetDescriptor::BlackCard),
        }
    }

    /// Play one round. The revealed card becomes the next reference.
    pub async fn play(&mut self, choice: HighLowChoice, stake: u64) -> Result<RoundResult, RoundError> {
        let bet = self.bet_for(choice)?;
        let result = self.round.play(bet, stake).await?;
        if let Outcome::Card(card) = result.outcome {
            self.reference = Some(card);
        }
        Ok(result)
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
    use shared::{Rank, SuitColor, WagerBounds};
    use std::time::Duration;

    fn settings() -> TableSettings {
        TableSettings {
            bounds: WagerBounds::default(),
            reveal_delay: Duration::from_millis(2_000),
            presentation_delay: Duration::ZERO,
        }
    }

    async fn table(decision: bool) -> HighLowTable<InMemoryLedger, ForcedDecision> {
        let ledger = Arc::new(InMemoryLedger::with_grant(10_000).await.unwrap());
        HighLowTable::new(ledger, ForcedDecision(decision), settings()).with_seed(3)
    }

    #[tokio::test]
    async fn test_comparison_needs_dealt_card() {
        let mut table = table(true).await;
        assert!(matches!(
            table.play(HighLowChoice::Higher, 1_000).await,
            Err(RoundError::NoReferenceCard)
        ));
        assert_eq!(table.controller().ledger().balance().await.unwrap(), 10_000);
        // Color bets do not need a reference
        assert!(table.bet_for(HighLowChoice::Red).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_revealed_card_becomes_reference() {
        let mut table = table(false).await;
        table.deal().unwrap();

        let result = table.play(HighLowChoice::Black, 1_000).await.unwrap();
        let Outcome::Card(card) = result.outcome else {
            panic!("card table produced {:?}", result.outcome);
        };
        assert!(!result.won);
        assert_eq!(card.color(), SuitColor::Red);
        assert_eq!(table.reference(), Some(card));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_win_higher() {
        let mut table = table(true).await;
        let mut reference = table.deal().unwrap();
        while reference.rank == Rank::KING {
            reference = table.deal().unwrap();
        }

        let result = table.play(HighLowChoice::Higher, 2_000).await.unwrap();
        let Outcome::Card(card) = result.outcome else {
            panic!("card table produced {:?}", result.outcome);
        };
        assert!(result.won);
        assert!(card.rank > reference.rank);
        assert_eq!(result.payout, 4_000);
        assert_eq!(table.controller().ledger().balance().await.unwrap(), 12_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_waits_card_delay() {
        let mut table = table(true).await;
        let started = tokio::time::Instant::now();
        table.play(HighLowChoice::Red, 1_000).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2_000));
    }

    #[tokio::test]
    async fn test_deal_rejected_mid_round() {
        let mut table = table(true).await;
        table
            .controller_mut()
            .place_wager(BetDescriptor::RedCard, 1_000)
            .await
            .unwrap();
        assert!(matches!(
            table.deal(),
            Err(RoundError::ConcurrentRoundRejected { .. })
        ));
    }
}
