//! Timing gate for the signal desk
//!
//! Results on the signal desk are revealed only at fixed seconds of the
//! wall-clock minute. The gate polls a [`Clock`] at a short interval and
//! resolves on the first allowed second, or returns [`GateCancelled`] once
//! its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Signal categories and their reveal cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    /// Buy / sell signals, once a minute
    Trade,
    /// Small / large signals, once a minute
    Size,
    /// 4-way multiplier wheel
    Multiplier,
    /// 2-way high-frequency roulette color
    Roulette,
    /// Generic card signal
    Card,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 5] = [
        SignalCategory::Trade,
        SignalCategory::Size,
        SignalCategory::Multiplier,
        SignalCategory::Roulette,
        SignalCategory::Card,
    ];

    /// Seconds of the minute at which a result may be revealed
    pub fn allowed_seconds(&self) -> &'static [u32] {
        match self {
            SignalCategory::Trade | SignalCategory::Size => &[0],
            SignalCategory::Multiplier => &[35, 5],
            SignalCategory::Roulette => &[45, 25, 5],
            SignalCategory::Card => &[15, 30, 45, 0],
        }
    }
}

impl std::str::FromStr for SignalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trade" => Ok(SignalCategory::Trade),
            "size" => Ok(SignalCategory::Size),
            "multiplier" => Ok(SignalCategory::Multiplier),
            "roulette" => Ok(SignalCategory::Roulette),
            "card" => Ok(SignalCategory::Card),
            other => Err(format!("unknown signal category: {}", other)),
        }
    }
}

/// True when `second` is an allowed reveal second for `category`
pub fn is_reveal_instant(category: SignalCategory, second: u32) -> bool {
    category.allowed_seconds().contains(&second)
}

/// Wall-clock reader
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances with tokio's timer, starting from a fixed instant.
///
/// Under a paused tokio runtime this makes the gate deterministic.
pub struct VirtualClock {
    origin: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl VirtualClock {
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.origin + elapsed
    }
}

/// A specific second of a specific minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealInstant {
    pub minute: i64,
    pub second: u32,
}

impl From<DateTime<Utc>> for RevealInstant {
    fn from(at: DateTime<Utc>) -> Self {
        Self {
            minute: at.timestamp().div_euclid(60),
            second: at.second(),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Reveal wait cancelled")]
pub struct GateCancelled;

pub struct TimingGate {
    category: SignalCategory,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
    last_reveal: Option<RevealInstant>,
}

impl TimingGate {
    pub fn new(category: SignalCategory, poll_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            category,
            poll_interval,
            clock,
            last_reveal: None,
        }
    }

    pub fn category(&self) -> SignalCategory {
        self.category
    }

    pub fn last_reveal(&self) -> Option<RevealInstant> {
        self.last_reveal
    }

    /// Poll until an allowed second arrives.
    ///
    /// An instant that already produced a reveal is never matched again, so a
    /// new round started within the same second waits for the next slot.
    pub async fn wait_for_reveal(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<RevealInstant, GateCancelled> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(category = ?self.category, "Reveal poll cancelled");
                    return Err(GateCancelled);
                }
                _ = ticker.tick() => {
                    let instant = RevealInstant::from(self.clock.now());
                    if is_reveal_instant(self.category, instant.second)
                        && self.last_reveal != Some(instant)
                    {
                        self.last_reveal = Some(instant);
                        tracing::debug!(
                            category = ?self.category,
                            second = instant.second,
                            "Reveal instant reached"
                        );
                        return Ok(instant);
                    }
                }
            }
        }
    }
}
