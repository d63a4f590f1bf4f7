use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{BetDescriptor, ResultDomain, RoundResult, SurfaceKind};

use super::TableSettings;
use crate::ledger::Ledger;
use crate::odds::{BernoulliDraw, DecisionSource};
use crate::round::{RevealPolicy, RoundController, RoundError, SurfaceProfile};

/// Number wheel 1..=14: color, parity, range or an exact number
pub struct WinGoTable<L: Ledger, D: DecisionSource = BernoulliDraw> {
    round: RoundController<L, D>,
}

impl<L: Ledger, D: DecisionSource> WinGoTable<L, D> {
    pub fn new(ledger: Arc<L>, decisions: D, settings: TableSettings) -> Self {
        let profile = SurfaceProfile {
            kind: SurfaceKind::WinGo,
            domain: ResultDomain::Wheel,
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
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.round = self.round.with_rng(StdRng::seed_from_u64(seed));
        self
    }

    pub async fn play(&mut self, bet: BetDescriptor, stake: u64) -> Result<RoundResult, RoundError> {
        self.round.play(bet, stake).await
    }

    pub fn controller(&self) -> &RoundController<L, D> {
        &self.round
    }

    pub fn controller_mut(&mut self) -> &mut RoundController<L, D> {
        &mut self.round
    }
}
