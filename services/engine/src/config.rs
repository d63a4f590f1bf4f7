use anyhow::Context;
use serde::Deserialize;
use shared::{
    WagerBounds, DEFAULT_CARD_REVEAL_MS, DEFAULT_MAX_WAGER, DEFAULT_MIN_WAGER,
    DEFAULT_PRESENTATION_MS, DEFAULT_SIGNAL_POLL_MS, DEFAULT_WHEEL_REVEAL_MS,
};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::timing::SignalCategory;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub wagers: WagerConfig,
    pub timing: TimingConfig,
    pub session: SessionConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WagerConfig {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimingConfig {
    pub card_reveal_ms: u64,
    pub wheel_reveal_ms: u64,
    pub presentation_ms: u64,
    pub signal_poll_ms: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SessionConfig {
    pub starting_balance: u64,
    pub demo_rounds: u32,
    pub signal_category: SignalCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => anyhow::bail!("unknown LOG_FORMAT: {}", other),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; missing keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            wagers: WagerConfig {
                min: parse_or(&lookup, "LOBBY_MIN_WAGER", DEFAULT_MIN_WAGER)?,
                max: parse_or(&lookup, "LOBBY_MAX_WAGER", DEFAULT_MAX_WAGER)?,
            },
            timing: TimingConfig {
                card_reveal_ms: parse_or(&lookup, "LOBBY_CARD_REVEAL_MS", DEFAULT_CARD_REVEAL_MS)?,
                wheel_reveal_ms: parse_or(&lookup, "LOBBY_WHEEL_REVEAL_MS", DEFAULT_WHEEL_REVEAL_MS)?,
                presentation_ms: parse_or(&lookup, "LOBBY_PRESENTATION_MS", DEFAULT_PRESENTATION_MS)?,
                signal_poll_ms: parse_or(&lookup, "LOBBY_SIGNAL_POLL_MS", DEFAULT_SIGNAL_POLL_MS)?,
            },
            session: SessionConfig {
                starting_balance: parse_or(&lookup, "LOBBY_STARTING_BALANCE", 30_000)?,
                demo_rounds: parse_or(&lookup, "LOBBY_DEMO_ROUNDS", 5)?,
                signal_category: lookup("LOBBY_SIGNAL_CATEGORY")
                    .unwrap_or_else(|| "trade".to_string())
                    .parse()
                    .map_err(anyhow::Error::msg)?,
            },
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "text".to_string())
                .parse()?,
        };

        config.wagers.bounds()?;
        if config.timing.signal_poll_ms == 0 {
            anyhow::bail!("LOBBY_SIGNAL_POLL_MS must be greater than zero");
        }
        Ok(config)
    }
}

impl WagerConfig {
    pub fn bounds(&self) -> anyhow::Result<WagerBounds> {
        WagerBounds::new(self.min, self.max).context("invalid LOBBY_MIN_WAGER / LOBBY_MAX_WAGER")
    }
}

impl TimingConfig {
    pub fn card_reveal(&self) -> Duration {
        Duration::from_millis(self.card_reveal_ms)
    }

    pub fn wheel_reveal(&self) -> Duration {
        Duration::from_millis(self.wheel_reveal_ms)
    }

    pub fn presentation(&self) -> Duration {
        Duration::from_millis(self.presentation_ms)
    }

    pub fn signal_poll(&self) -> Duration {
        Duration::from_millis(self.signal_poll_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
