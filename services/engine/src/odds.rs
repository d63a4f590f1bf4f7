//! Balance-tier odds table
//!
//! Maps the current balance to a target win probability. A round that could
//! lift the balance above [`BALANCE_CEILING`] is never won.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::BALANCE_CEILING;

/// One band of the schedule: balances up to and including `upper` win with
/// `probability`. `None` marks the open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinRateBand {
    pub upper: Option<u64>,
    pub probability: f64,
}

/// Ordered bands plus the ceiling override
#[derive(Debug, Clone, PartialEq)]
pub struct WinRateSchedule {
    bands: Vec<WinRateBand>,
    ceiling: u64,
}

impl WinRateSchedule {
    /// The schedule every surface plays against
    pub fn standard() -> Self {
        Self {
            bands: vec![
                WinRateBand { upper: Some(1_000), probability: 0.5 },
                WinRateBand { upper: Some(5_000), probability: 0.5 },
                WinRateBand { upper: Some(20_000), probability: 0.8 },
                WinRateBand { upper: Some(30_000), probability: 0.7 },
                WinRateBand { upper: Some(40_000), probability: 0.9 },
                WinRateBand { upper: None, probability: 0.6 },
            ],
            ceiling: BALANCE_CEILING,
        }
    }

    pub fn bands(&self) -> &[WinRateBand] {
        &self.bands
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Probability of the band containing `balance`, ignoring the ceiling
    pub fn band_probability(&self, balance: u64) -> f64 {
        self.bands
            .iter()
            .find(|band| band.upper.map_or(true, |upper| balance <= upper))
            .map(|band| band.probability)
            .unwrap_or(0.0)
    }

    /// Target win probability for a round
    ///
    /// Returns exactly 0 when `balance + potential_payout` exceeds the ceiling.
    pub fn target_win_probability(&self, balance: u64, potential_payout: u64) -> f64 {
        if balance.saturating_add(potential_payout) > self.ceiling {
            tracing::debug!(
                balance,
                potential_payout,
                ceiling = self.ceiling,
                "Ceiling override, win probability forced to zero"
            );
            return 0.0;
        }
        self.band_probability(balance).clamp(0.0, 1.0)
    }
}

impl Default for WinRateSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Target win probability under the standard schedule
pub fn target_win_probability(balance: u64, potential_payout: u64) -> f64 {
    WinRateSchedule::standard().target_win_probability(balance, potential_payout)
}

/// Source of the per-round win/lose decision
pub trait DecisionSource: Send {
    fn draw(&mut self, probability: f64) -> bool;
}

/// Independent Bernoulli draw: `uniform() < probability`
pub struct BernoulliDraw {
    rng: StdRng,
}

impl BernoulliDraw {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Default for BernoulliDraw {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSource for BernoulliDraw {
    fn draw(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }
}

/// Always returns the same decision, regardless of probability
#[derive(Debug, Clone, Copy)]
pub struct ForcedDecision(pub bool);

impl DecisionSource for ForcedDecision {
    fn draw(&mut self, _probability: f64) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let schedule = WinRateSchedule::standard();
        let cases = [
            (0, 0.5),
            (1_000, 0.5),
            (1_001, 0.5),
            (5_000, 0.5),
            (5_001, 0.8),
            (20_000, 0.8),
            (20_001, 0.7),
            (30_000, 0.7),
            (30_001, 0.9),
            (40_000, 0.9),
            (40_001, 0.6),
            (45_000, 0.6),
        ];
        for (balance, expected) in cases {
            assert_eq!(
                schedule.target_win_probability(balance, 0),
                expected,
                "balance {}",
                balance
            );
        }
    }

    #[test]
    fn test_ceiling_override() {
        // 48500 + 2000 > 49000 regardless of the 0.6 band
        assert_eq!(target_win_probability(48_500, 2_000), 0.0);
        // Exactly at the ceiling is still allowed
        assert_eq!(target_win_probability(47_000, 2_000), 0.6);
        assert_eq!(target_win_probability(47_001, 2_000), 0.0);
        // Exact-number bets reach the ceiling from much lower balances
        assert_eq!(target_win_probability(36_000, 14_000), 0.0);
        assert_eq!(target_win_probability(35_000, 14_000), 0.9);
    }

    #[test]
    fn test_probability_always_in_unit_interval() {
        let schedule = WinRateSchedule::standard();
        for balance in (0..60_000).step_by(250) {
            for payout in [0, 2_000, 14_000, u64::MAX] {
                let p = schedule.target_win_probability(balance, payout);
                assert!((0.0..=1.0).contains(&p));
                if balance.saturating_add(payout) > BALANCE_CEILING {
                    assert_eq!(p, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_bernoulli_draw_extremes() {
        let mut draw = BernoulliDraw::from_rng(StdRng::seed_from_u64(7));
        for _ in 0..1_000 {
            assert!(!draw.draw(0.0));
            assert!(draw.draw(1.0));
        }
    }

    #[test]
    fn test_bernoulli_draw_rate() {
        let mut draw = BernoulliDraw::from_rng(StdRng::seed_from_u64(42));
        let wins = (0..10_000).filter(|_| draw.draw(0.8)).count();
        assert!((7_600..=8_400).contains(&wins), "wins = {}", wins);
    }

    #[test]
    fn test_forced_decision_ignores_probability() {
        assert!(ForcedDecision(true).draw(0.0));
        assert!(!ForcedDecision(false).draw(1.0));
    }
}
