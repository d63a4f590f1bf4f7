/// Shared constants for the game lobby
///
/// This module centralizes the numeric policy of the outcome engine so that
/// every surface (card table, wheel, signal desk) reads the same values.

/// Balance ceiling for a single round
///
/// A round whose win would lift the balance above this value is never won:
/// the odds table forces its win probability to zero.
pub const BALANCE_CEILING: u64 = 49_000;

/// Payout multiplier for even-money bets (stake included)
///
/// Applies to parity, range, color, trade-direction, size and card bets.
pub const EVEN_MONEY_MULTIPLIER: u64 = 2;

/// Payout multiplier for exact-number wheel bets (stake included)
pub const EXACT_NUMBER_MULTIPLIER: u64 = 14;

/// Lowest number on the wheel
pub const WHEEL_MIN: u8 = 1;

/// Highest number on the wheel
pub const WHEEL_MAX: u8 = 14;

/// Highest wheel number classified as "small" (1..=7 small, 8..=14 big)
pub const WHEEL_SMALL_MAX: u8 = 7;

/// Lowest card rank (Ace)
pub const RANK_MIN: u8 = 1;

/// Highest card rank (King)
pub const RANK_MAX: u8 = 13;

/// Default minimum stake in play-money units
pub const DEFAULT_MIN_WAGER: u64 = 1_000;

/// Default maximum stake in play-money units
pub const DEFAULT_MAX_WAGER: u64 = 1_000_000;

/// Card table reveal delay in milliseconds
pub const DEFAULT_CARD_REVEAL_MS: u64 = 2_000;

/// Wheel reveal delay in milliseconds
pub const DEFAULT_WHEEL_REVEAL_MS: u64 = 3_000;

/// Delay between a reveal and the controller returning to idle
pub const DEFAULT_PRESENTATION_MS: u64 = 1_500;

/// Signal desk timing-gate poll interval in milliseconds
pub const DEFAULT_SIGNAL_POLL_MS: u64 = 100;

/// Below this balance the session is reported as depleted
pub const LOW_BALANCE_THRESHOLD: u64 = 1_000;
