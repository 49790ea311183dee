//! Truth tables for the primitive gate functions.
//!
//! All functions take any number of inputs and follow Kleene semantics:
//! the result is `Unknown` only when the known inputs cannot decide it.

use crate::signal::Signal;

/// Variadic AND. A single `Low` input forces the result low.
pub fn and(inputs: &[Signal]) -> Signal {
    if inputs.iter().any(|&s| s == Signal::Low) {
        Signal::Low
    } else if inputs.iter().any(|&s| s == Signal::Unknown) {
        Signal::Unknown
    } else {
        Signal::High
    }
}

/// Variadic OR. A single `High` input forces the result high.
pub fn or(inputs: &[Signal]) -> Signal {
    if inputs.iter().any(|&s| s == Signal::High) {
        Signal::High
    } else if inputs.iter().any(|&s| s == Signal::Unknown) {
        Signal::Unknown
    } else {
        Signal::Low
    }
}

/// Variadic XOR: parity of the high inputs. Any `Unknown` input makes
/// the parity unknowable.
pub fn xor(inputs: &[Signal]) -> Signal {
    if inputs.iter().any(|&s| s == Signal::Unknown) {
        return Signal::Unknown;
    }
    let highs = inputs.iter().filter(|&&s| s == Signal::High).count();
    Signal::from(highs % 2 == 1)
}
