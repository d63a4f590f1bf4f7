//! Play-money wagering engine: odds table, outcome synthesis, timing gate,
//! round controller and the three lobby surfaces built on it.

pub mod config;
pub mod history;
pub mod ledger;
pub mod odds;
pub mod round;
pub mod surfaces;
pub mod synth;
pub mod timing;

pub use config::Config;
pub use history::{RoundHistory, SessionStats};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use odds::{target_win_probability, BernoulliDraw, DecisionSource, ForcedDecision, WinRateSchedule};
pub use round::{RevealPolicy, RoundController, RoundError, RoundState, SurfaceProfile};
pub use surfaces::{HighLowChoice, HighLowTable, SignalDesk, TableSettings, WinGoTable};
pub use synth::{evaluate, synthesize};
pub use timing::{is_reveal_instant, SignalCategory, TimingGate};
