//! Per-surface round history and session statistics

use serde::{Deserialize, Serialize};
use shared::{RoundRecord, SurfaceKind, LOW_BALANCE_THRESHOLD};

/// Append-only list of completed rounds
#[derive(Debug, Clone, Default)]
pub struct RoundHistory {
    records: Vec<RoundRecord>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RoundRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, most recent first
    pub fn newest_first(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter().rev()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.last()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_records(self.records.iter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    /// Sum of payouts on winning rounds
    pub amount_won: u64,
    /// Sum of stakes on losing rounds
    pub amount_lost: u64,
    /// Payouts minus all stakes
    pub net: i64,
}

impl SessionStats {
    pub fn from_records<'a>(records: impl Iterator<Item = &'a RoundRecord>) -> Self {
        let mut stats = SessionStats::default();
        let mut staked: i128 = 0;
        let mut paid: i128 = 0;

        for record in records {
            stats.rounds += 1;
            if record.won {
                stats.wins += 1;
                stats.amount_won = stats.amount_won.saturating_add(record.payout);
            } else {
                stats.losses += 1;
                stats.amount_lost = stats.amount_lost.saturating_add(record.wager);
            }
            staked += i128::from(record.wager);
            paid += i128::from(record.payout);
        }

        stats.net = (paid - staked).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        stats
    }

    /// Fraction of rounds won, 0 when nothing was played
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f64 / self.rounds as f64
        }
    }

    /// Merge stats from several surfaces
    pub fn combine(&self, other: &SessionStats) -> SessionStats {
        SessionStats {
            rounds: self.rounds + other.rounds,
            wins: self.wins + other.wins,
            losses: self.losses + other.losses,
            amount_won: self.amount_won.saturating_add(other.amount_won),
            amount_lost: self.amount_lost.saturating_add(other.amount_lost),
            net: self.net.saturating_add(other.net),
        }
    }
}

/// Stats for one surface out of a mixed record stream
pub fn stats_for(records: &[RoundRecord], surface: SurfaceKind) -> SessionStats {
    SessionStats::from_records(records.iter().filter(|r| r.surface == surface))
}

/// True when the balance can no longer cover the minimum stake
pub fn is_low_balance(balance: u64) -> bool {
    balance < LOW_BALANCE_THRESHOLD
}
