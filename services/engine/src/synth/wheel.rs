//! Numeric wheel domain: integers 1..=14, odd numbers red, even numbers green.

use rand::Rng;
use shared::{BetDescriptor, WheelNumber};

use super::pick_admissible;

/// Does `number` satisfy a wheel bet? Non-wheel bets never match.
pub fn wins(number: WheelNumber, bet: &BetDescriptor) -> bool {
    match bet {
        BetDescriptor::Color(color) => number.color() == *color,
        BetDescriptor::Parity(parity) => number.parity() == *parity,
        BetDescriptor::Range(range) => number.range() == *range,
        BetDescriptor::ExactNumber(chosen) => number == *chosen,
        _ => false,
    }
}

/// Numbers admitted by `bet` under `decision`
pub fn admissible_numbers(bet: &BetDescriptor, decision: bool) -> Vec<WheelNumber> {
    WheelNumber::all()
        .filter(|number| wins(*number, bet) == decision)
        .collect()
}

pub fn synthesize<R: Rng + ?Sized>(bet: &BetDescriptor, decision: bool, rng: &mut R) -> WheelNumber {
    if let (BetDescriptor::ExactNumber(chosen), true) = (bet, decision) {
        return *chosen;
    }

    let admissible = admissible_numbers(bet, decision);
    match pick_admissible(&admissible, rng) {
        Ok(number) => number,
        Err(_) => {
            // Only reachable for non-wheel bets, which the controller rejects
            tracing::debug!(bet = %bet, decision, "No admissible wheel number, drawing freely");
            let all: Vec<WheelNumber> = WheelNumber::all().collect();
            all[rng.gen_range(0..all.len())]
        }
    }
}
