/// Type-safe wrappers for lobby domain primitives
///
/// Cards, wheel numbers and wagers are validated at construction time so the
/// engine never has to re-check a value it received from another surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Wager out of range: {amount} (min: {min}, max: {max})")]
    WagerOutOfRange { amount: u64, min: u64, max: u64 },

    #[error("Wager {amount} exceeds balance {balance}")]
    WagerExceedsBalance { amount: u64, balance: u64 },

    #[error("Invalid wager bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: u64, max: u64 },

    #[error("Wheel number out of range: {0} (expected 1..=14)")]
    WheelNumberOutOfRange(u8),

    #[error("Card rank out of range: {0} (expected 1..=13)")]
    RankOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Hearts and diamonds are red, clubs and spades are black
    pub fn color(&self) -> SuitColor {
        match self {
            Suit::Hearts | Suit::Diamonds => SuitColor::Red,
            Suit::Clubs | Suit::Spades => SuitColor::Black,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitColor {
    Red,
    Black,
}

impl SuitColor {
    pub fn opposite(&self) -> Self {
        match self {
            SuitColor::Red => SuitColor::Black,
            SuitColor::Black => SuitColor::Red,
        }
    }

    pub fn suits(&self) -> [Suit; 2] {
        match self {
            SuitColor::Red => [Suit::Hearts, Suit::Diamonds],
            SuitColor::Black => [Suit::Clubs, Suit::Spades],
        }
    }
}

/// Card rank with comparison value 1..=13 (A=1, J=11, Q=12, K=13)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(RANK_MIN);
    pub const KING: Rank = Rank(RANK_MAX);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(RANK_MIN..=RANK_MAX).contains(&value) {
            return Err(ValidationError::RankOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Every rank in ascending order
    pub fn all() -> impl Iterator<Item = Rank> {
        (RANK_MIN..=RANK_MAX).map(Rank)
    }

    pub fn label(&self) -> &'static str {
        const LABELS: [&str; 13] = [
            "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
        ];
        LABELS[(self.0 - RANK_MIN) as usize]
    }
}

impl TryFrom<u8> for Rank {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn color(&self) -> SuitColor {
        self.suit.color()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelColor {
    Red,
    Green,
}

impl WheelColor {
    pub fn opposite(&self) -> Self {
        match self {
            WheelColor::Red => WheelColor::Green,
            WheelColor::Green => WheelColor::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn opposite(&self) -> Self {
        match self {
            Parity::Odd => Parity::Even,
            Parity::Even => Parity::Odd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelRange {
    Small,
    Big,
}

impl WheelRange {
    pub fn opposite(&self) -> Self {
        match self {
            WheelRange::Small => WheelRange::Big,
            WheelRange::Big => WheelRange::Small,
        }
    }
}

/// A number on the 1..=14 wheel
///
/// Color is fixed by parity: odd numbers are red, even numbers are green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WheelNumber(u8);

impl WheelNumber {
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(WHEEL_MIN..=WHEEL_MAX).contains(&value) {
            return Err(ValidationError::WheelNumberOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = WheelNumber> {
        (WHEEL_MIN..=WHEEL_MAX).map(WheelNumber)
    }

    pub fn parity(&self) -> Parity {
        if self.0 % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn color(&self) -> WheelColor {
        match self.parity() {
            Parity::Odd => WheelColor::Red,
            Parity::Even => WheelColor::Green,
        }
    }

    pub fn range(&self) -> WheelRange {
        if self.0 <= WHEEL_SMALL_MAX {
            WheelRange::Small
        } else {
            WheelRange::Big
        }
    }
}

impl TryFrom<u8> for WheelNumber {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WheelNumber> for u8 {
    fn from(number: WheelNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for WheelNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    pub fn opposite(&self) -> Self {
        match self {
            TradeDirection::Buy => TradeDirection::Sell,
            TradeDirection::Sell => TradeDirection::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Large,
}

impl SizeCategory {
    pub fn opposite(&self) -> Self {
        match self {
            SizeCategory::Small => SizeCategory::Large,
            SizeCategory::Large => SizeCategory::Small,
        }
    }
}

/// Result space a bet is resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultDomain {
    Card,
    Wheel,
    Categorical,
}

/// What the player wagered on
///
/// Card comparisons carry the reference card they are compared against so a
/// bet can be evaluated without any other round state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BetDescriptor {
    Higher { reference: Card },
    Lower { reference: Card },
    RedCard,
    BlackCard,
    Color(WheelColor),
    Parity(Parity),
    Range(WheelRange),
    ExactNumber(WheelNumber),
    TradeDirection(TradeDirection),
    Size(SizeCategory),
}

impl BetDescriptor {
    pub fn domain(&self) -> ResultDomain {
        match self {
            BetDescriptor::Higher { .. }
            | BetDescriptor::Lower { .. }
            | BetDescriptor::RedCard
            | BetDescriptor::BlackCard => ResultDomain::Card,
            BetDescriptor::Color(_)
            | BetDescriptor::Parity(_)
            | BetDescriptor::Range(_)
            | BetDescriptor::ExactNumber(_) => ResultDomain::Wheel,
            BetDescriptor::TradeDirection(_) | BetDescriptor::Size(_) => ResultDomain::Categorical,
        }
    }

    /// Multiplier applied to the stake on a win (stake included)
    pub fn payout_multiplier(&self) -> u64 {
        match self {
            BetDescriptor::ExactNumber(_) => EXACT_NUMBER_MULTIPLIER,
            _ => EVEN_MONEY_MULTIPLIER,
        }
    }

    /// Amount credited if this bet wins with the given stake
    pub fn potential_payout(&self, stake: u64) -> u64 {
        stake.saturating_mul(self.payout_multiplier())
    }
}

impl std::fmt::Display for BetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetDescriptor::Higher { reference } => write!(f, "higher than {}", reference),
            BetDescriptor::Lower { reference } => write!(f, "lower than {}", reference),
            BetDescriptor::RedCard => write!(f, "red card"),
            BetDescriptor::BlackCard => write!(f, "black card"),
            BetDescriptor::Color(color) => write!(f, "color {:?}", color),
            BetDescriptor::Parity(parity) => write!(f, "parity {:?}", parity),
            BetDescriptor::Range(range) => write!(f, "range {:?}", range),
            BetDescriptor::ExactNumber(number) => write!(f, "number {}", number),
            BetDescriptor::TradeDirection(direction) => write!(f, "trade {:?}", direction),
            BetDescriptor::Size(size) => write!(f, "size {:?}", size),
        }
    }
}

/// Concrete revealed value of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Card(Card),
    Wheel(WheelNumber),
    Trade(TradeDirection),
    Size(SizeCategory),
}

impl Outcome {
    pub fn domain(&self) -> ResultDomain {
        match self {
            Outcome::Card(_) => ResultDomain::Card,
            Outcome::Wheel(_) => ResultDomain::Wheel,
            Outcome::Trade(_) | Outcome::Size(_) => ResultDomain::Categorical,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Card(card) => write!(f, "{}", card),
            Outcome::Wheel(number) => write!(f, "{} ({:?})", number, number.color()),
            Outcome::Trade(direction) => write!(f, "{:?}", direction),
            Outcome::Size(size) => write!(f, "{:?}", size),
        }
    }
}

/// Inclusive stake limits for one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerBounds {
    pub min: u64,
    pub max: u64,
}

impl WagerBounds {
    pub fn new(min: u64, max: u64) -> Result<Self, ValidationError> {
        if min == 0 || min > max {
            return Err(ValidationError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Validate a stake against these bounds and the current balance
    pub fn check(&self, amount: u64, balance: u64) -> Result<WagerAmount, ValidationError> {
        if amount == 0 || amount < self.min || amount > self.max {
            return Err(ValidationError::WagerOutOfRange {
                amount,
                min: self.min,
                max: self.max,
            });
        }
        if amount > balance {
            return Err(ValidationError::WagerExceedsBalance { amount, balance });
        }
        Ok(WagerAmount(amount))
    }
}

impl Default for WagerBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WAGER,
            max: DEFAULT_MAX_WAGER,
        }
    }
}

/// Stake that passed [`WagerBounds::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WagerAmount(u64);

impl WagerAmount {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<WagerAmount> for u64 {
    fn from(amount: WagerAmount) -> Self {
        amount.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    HighLow,
    WinGo,
    Signal,
}

impl SurfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceKind::HighLow => "high_low",
            SurfaceKind::WinGo => "win_go",
            SurfaceKind::Signal => "signal",
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result handed back to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: Uuid,
    pub outcome: Outcome,
    pub won: bool,
    pub payout: u64,
}

/// Immutable entry appended to a surface's history when a round completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_id: Uuid,
    pub surface: SurfaceKind,
    pub timestamp: DateTime<Utc>,
    pub wager: u64,
    pub bet: BetDescriptor,
    pub outcome: Outcome,
    pub won: bool,
    pub payout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_validation() {
        assert_eq!(Rank::new(1).unwrap(), Rank::ACE);
        assert_eq!(Rank::new(13).unwrap(), Rank::KING);
        assert!(matches!(Rank::new(0), Err(ValidationError::RankOutOfRange(0))));
        assert!(Rank::new(14).is_err());
        assert_eq!(Rank::all().count(), 13);
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(Rank::ACE.label(), "A");
        assert_eq!(Rank::new(10).unwrap().label(), "10");
        assert_eq!(Rank::new(11).unwrap().label(), "J");
        assert_eq!(Rank::KING.label(), "K");
    }

    #[test]
    fn test_suit_colors() {
        assert_eq!(Suit::Hearts.color(), SuitColor::Red);
        assert_eq!(Suit::Diamonds.color(), SuitColor::Red);
        assert_eq!(Suit::Clubs.color(), SuitColor::Black);
        assert_eq!(Suit::Spades.color(), SuitColor::Black);
        for color in [SuitColor::Red, SuitColor::Black] {
            assert!(color.suits().iter().all(|s| s.color() == color));
        }
    }

    #[test]
    fn test_card_display() {
        let card = Card::new(Rank::new(12).unwrap(), Suit::Diamonds);
        assert_eq!(card.to_string(), "Q♦");
    }

    #[test]
    fn test_wheel_classification() {
        let seven = WheelNumber::new(7).unwrap();
        assert_eq!(seven.parity(), Parity::Odd);
        assert_eq!(seven.color(), WheelColor::Red);
        assert_eq!(seven.range(), WheelRange::Small);

        let eight = WheelNumber::new(8).unwrap();
        assert_eq!(eight.parity(), Parity::Even);
        assert_eq!(eight.color(), WheelColor::Green);
        assert_eq!(eight.range(), WheelRange::Big);

        assert!(WheelNumber::new(0).is_err());
        assert!(WheelNumber::new(15).is_err());
        assert_eq!(WheelNumber::all().count(), 14);
    }

    #[test]
    fn test_payout_multipliers() {
        let exact = BetDescriptor::ExactNumber(WheelNumber::new(7).unwrap());
        assert_eq!(exact.payout_multiplier(), 14);
        assert_eq!(exact.potential_payout(1_000), 14_000);

        let even = BetDescriptor::Parity(Parity::Even);
        assert_eq!(even.potential_payout(1_000), 2_000);

        let card = BetDescriptor::Higher {
            reference: Card::new(Rank::new(5).unwrap(), Suit::Clubs),
        };
        assert_eq!(card.potential_payout(1_000), 2_000);
        assert_eq!(BetDescriptor::Size(SizeCategory::Large).potential_payout(500), 1_000);
    }

    #[test]
    fn test_bet_domains() {
        assert_eq!(BetDescriptor::RedCard.domain(), ResultDomain::Card);
        assert_eq!(BetDescriptor::Range(WheelRange::Big).domain(), ResultDomain::Wheel);
        assert_eq!(
            BetDescriptor::TradeDirection(TradeDirection::Buy).domain(),
            ResultDomain::Categorical
        );
    }

    #[test]
    fn test_wager_bounds() {
        let bounds = WagerBounds::new(1_000, 10_000).unwrap();
        assert_eq!(bounds.check(1_000, 5_000).unwrap().as_u64(), 1_000);
        assert!(matches!(
            bounds.check(999, 5_000),
            Err(ValidationError::WagerOutOfRange { .. })
        ));
        assert!(matches!(
            bounds.check(10_001, 50_000),
            Err(ValidationError::WagerOutOfRange { .. })
        ));
        assert!(matches!(
            bounds.check(6_000, 5_000),
            Err(ValidationError::WagerExceedsBalance { .. })
        ));
        assert!(WagerBounds::new(10, 5).is_err());
        assert!(WagerBounds::new(0, 5).is_err());
    }

    #[test]
    fn test_bet_serialization() {
        let bet = BetDescriptor::ExactNumber(WheelNumber::new(7).unwrap());
        let json = serde_json::to_string(&bet).unwrap();
        assert!(json.contains("exact_number"));
        let back: BetDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bet);

        let bad = r#"{"kind":"exact_number","value":20}"#;
        assert!(serde_json::from_str::<BetDescriptor>(bad).is_err());
    }
}
