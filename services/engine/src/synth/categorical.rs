//! Two-valued result domains (trade direction, size).
//!
//! The space has exactly two values, so no draw is needed: a win reveals the
//! chosen value and a loss reveals the other one.

pub fn resolve<T: Copy>(chosen: T, decision: bool, opposite: impl Fn(T) -> T) -> T {
    if decision {
        chosen
    } else {
        opposite(chosen)
    }
}
