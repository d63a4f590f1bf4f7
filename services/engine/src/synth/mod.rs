//! Outcome synthesizer
//!
//! Given a bet and the round's pre-drawn decision, builds a concrete outcome
//! such that `evaluate(&synthesize(bet, decision, rng), bet) == decision`.
//! Each result domain lives in its own module:
//! - `cards`: rank comparison against a reference card, and suit color
//! - `wheel`: color, parity, range and exact number on the 1..=14 wheel
//! - `categorical`: two-valued choices (trade direction, size)
//!
//! The only exception to the invariant is the card comparison at the rank
//! extremes, see [`cards`].

pub mod cards;
pub mod categorical;
pub mod wheel;

use rand::seq::SliceRandom;
use rand::Rng;
use shared::{BetDescriptor, Outcome};
use thiserror::Error;

/// The (bet, decision) pair admits no value in the domain
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Empty admissible set")]
pub struct EmptyAdmissibleSet;

/// Uniform pick from an admissible subset
pub(crate) fn pick_admissible<T: Copy, R: Rng + ?Sized>(
    admissible: &[T],
    rng: &mut R,
) -> Result<T, EmptyAdmissibleSet> {
    admissible.choose(rng).copied().ok_or(EmptyAdmissibleSet)
}

/// Build an outcome consistent with `decision` under `bet`
pub fn synthesize<R: Rng + ?Sized>(bet: &BetDescriptor, decision: bool, rng: &mut R) -> Outcome {
    let outcome = match *bet {
        BetDescriptor::Higher { reference } => {
            Outcome::Card(cards::synthesize_comparison(reference, cards::Direction::Higher, decision, rng))
        }
        BetDescriptor::Lower { reference } => {
            Outcome::Card(cards::synthesize_comparison(reference, cards::Direction::Lower, decision, rng))
        }
        BetDescriptor::RedCard => {
            Outcome::Card(cards::synthesize_color(shared::SuitColor::Red, decision, rng))
        }
        BetDescriptor::BlackCard => {
            Outcome::Card(cards::synthesize_color(shared::SuitColor::Black, decision, rng))
        }
        BetDescriptor::Color(_)
        | BetDescriptor::Parity(_)
        | BetDescriptor::Range(_)
        | BetDescriptor::ExactNumber(_) => Outcome::Wheel(wheel::synthesize(bet, decision, rng)),
        BetDescriptor::TradeDirection(direction) => {
            Outcome::Trade(categorical::resolve(direction, decision, |d| d.opposite()))
        }
        BetDescriptor::Size(size) => {
            Outcome::Size(categorical::resolve(size, decision, |s| s.opposite()))
        }
    };

    tracing::trace!(bet = %bet, decision, outcome = %outcome, "Outcome synthesized");
    outcome
}

/// Did `outcome` satisfy `bet`?
///
/// An outcome from a different result domain never satisfies the bet.
pub fn evaluate(outcome: &Outcome, bet: &BetDescriptor) -> bool {
    match (outcome, bet) {
        (Outcome::Card(card), _) => cards::wins(card, bet),
        (Outcome::Wheel(number), _) => wheel::wins(*number, bet),
        (Outcome::Trade(direction), BetDescriptor::TradeDirection(chosen)) => direction == chosen,
        (Outcome::Size(size), BetDescriptor::Size(chosen)) => size == chosen,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{
        Card, Parity, Rank, SizeCategory, Suit, TradeDirection, WheelColor, WheelNumber,
        WheelRange,
    };

    fn every_bet() -> Vec<BetDescriptor> {
        let mut bets = Vec::new();
        for rank in Rank::all() {
            for suit in Suit::ALL {
                let reference = Card::new(rank, suit);
                bets.push(BetDescriptor::Higher { reference });
                bets.push(BetDescriptor::Lower { reference });
            }
        }
        bets.push(BetDescriptor::RedCard);
        bets.push(BetDescriptor::BlackCard);
        for color in [WheelColor::Red, WheelColor::Green] {
            bets.push(BetDescriptor::Color(color));
        }
        for parity in [Parity::Odd, Parity::Even] {
            bets.push(BetDescriptor::Parity(parity));
        }
        for range in [WheelRange::Small, WheelRange::Big] {
            bets.push(BetDescriptor::Range(range));
        }
        for number in WheelNumber::all() {
            bets.push(BetDescriptor::ExactNumber(number));
        }
        for direction in [TradeDirection::Buy, TradeDirection::Sell] {
            bets.push(BetDescriptor::TradeDirection(direction));
        }
        for size in [SizeCategory::Small, SizeCategory::Large] {
            bets.push(BetDescriptor::Size(size));
        }
        bets
    }

    /// Higher against a King or Lower against an Ace has nothing to draw from
    /// on a win and falls back to an unconstrained card.
    fn is_extreme_win(bet: &BetDescriptor, decision: bool) -> bool {
        decision
            && match bet {
                BetDescriptor::Higher { reference } => reference.rank == Rank::KING,
                BetDescriptor::Lower { reference } => reference.rank == Rank::ACE,
                _ => false,
            }
    }

    #[test]
    fn test_synthesized_outcome_matches_decision() {
        let mut rng = StdRng::seed_from_u64(2024);
        for bet in every_bet() {
            for decision in [true, false] {
                if is_extreme_win(&bet, decision) {
                    continue;
                }
                for _ in 0..50 {
                    let outcome = synthesize(&bet, decision, &mut rng);
                    assert_eq!(outcome.domain(), bet.domain());
                    assert_eq!(
                        evaluate(&outcome, &bet),
                        decision,
                        "bet {:?}, decision {}, outcome {:?}",
                        bet,
                        decision,
                        outcome
                    );
                }
            }
        }
    }

    #[test]
    fn test_evaluate_rejects_foreign_domain() {
        let outcome = Outcome::Trade(TradeDirection::Buy);
        assert!(!evaluate(&outcome, &BetDescriptor::Size(SizeCategory::Small)));
        assert!(!evaluate(&outcome, &BetDescriptor::Parity(Parity::Even)));

        let outcome = Outcome::Wheel(WheelNumber::new(2).unwrap());
        assert!(!evaluate(&outcome, &BetDescriptor::RedCard));
        assert!(!evaluate(&outcome, &BetDescriptor::TradeDirection(TradeDirection::Sell)));
    }

    #[test]
    fn test_pick_admissible_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert_eq!(pick_admissible(&empty, &mut rng), Err(EmptyAdmissibleSet));
        assert_eq!(pick_admissible(&[9u8], &mut rng), Ok(9));
    }
}
