//! Ledger capability consumed by the round controllers
//!
//! The balance is a single shared cell. Every mutation appends an entry to an
//! append-only transaction log; the round controller issues the stake debit
//! and the payout credit as two separate mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Balance overflow: {balance} + {amount}")]
    Overflow { balance: u64, amount: u64 },

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Stake taken when a wager is placed
    Stake,
    /// Winnings credited on reveal
    Payout,
    /// Play-money granted to a session
    Grant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: u64,
    pub balance_after: u64,
    pub timestamp: DateTime<Utc>,
    pub memo: String,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn balance(&self) -> Result<u64>;

    /// Add `amount` to the balance
    async fn credit(&self, amount: u64, kind: EntryKind, memo: &str) -> Result<u64>;

    /// Remove `amount` from the balance, clamping at zero
    async fn debit(&self, amount: u64, kind: EntryKind, memo: &str) -> Result<u64>;

    /// Transaction log, newest first
    async fn entries(&self) -> Result<Vec<LedgerEntry>>;
}

#[derive(Default)]
struct LedgerState {
    balance: u64,
    entries: Vec<LedgerEntry>,
}

/// Play-money ledger held in memory for the lifetime of a session
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with an opening play-money grant
    pub async fn with_grant(amount: u64) -> Result<Self> {
        let ledger = Self::new();
        if amount > 0 {
            ledger.credit(amount, EntryKind::Grant, "Opening play-money balance").await?;
        }
        Ok(ledger)
    }

    fn entry(kind: EntryKind, amount: u64, balance_after: u64, memo: &str) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            kind,
            amount,
            balance_after,
            timestamp: Utc::now(),
            memo: memo.to_string(),
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance(&self) -> Result<u64> {
        Ok(self.state.read().await.balance)
    }

    async fn credit(&self, amount: u64, kind: EntryKind, memo: &str) -> Result<u64> {
        let mut state = self.state.write().await;
        let balance = state
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                balance: state.balance,
                amount,
            })?;
        state.balance = balance;
        state.entries.push(Self::entry(kind, amount, balance, memo));

        tracing::debug!(amount, balance, ?kind, "Ledger credit");
        Ok(balance)
    }

    async fn debit(&self, amount: u64, kind: EntryKind, memo: &str) -> Result<u64> {
        let mut state = self.state.write().await;
        let balance = state.balance.saturating_sub(amount);
        state.balance = balance;
        if amount > 0 {
            state.entries.push(Self::entry(kind, amount, balance, memo));
        }

        tracing::debug!(amount, balance, ?kind, "Ledger debit");
        Ok(balance)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.state.read().await.entries.iter().rev().cloned().collect())
    }
}
