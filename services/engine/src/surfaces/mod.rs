//! Player-facing surfaces
//!
//! Each surface is a thin wrapper over
//! [`RoundController`](crate::round::RoundController) that fixes the
//! result domain, the reveal policy and the timings of one game.

mod high_low;
mod signal;
mod win_go;

pub use high_low::{HighLowChoice, HighLowTable};
pub use signal::SignalDesk;
pub use win_go::WinGoTable;

use std::time::Duration;

use shared::WagerBounds;

use crate::config::Config;

/// Per-surface limits and delays
#[derive(Debug, Clone, Copy)]
pub struct TableSettings {
    pub bounds: WagerBounds,
    pub reveal_delay: Duration,
    pub presentation_delay: Duration,
}

impl TableSettings {
    pub fn high_low(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            bounds: config.wagers.bounds()?,
            reveal_delay: config.timing.card_reveal(),
            presentation_delay: config.timing.presentation(),
        })
    }

    pub fn win_go(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            bounds: config.wagers.bounds()?,
            reveal_delay: config.timing.wheel_reveal(),
            presentation_delay: config.timing.presentation(),
        })
    }
}
