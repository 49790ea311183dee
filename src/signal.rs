//! Three-valued logic signals.
//!
//! Every pin and wire in the engine carries a [`Signal`]: driven low,
//! driven high, or unknown. `Unknown` covers both "not yet driven" and
//! "cannot be determined", and the operator impls follow Kleene logic:
//! a result is `Unknown` only when the known operands cannot decide it
//! (`Low & Unknown` is still `Low`, `High | Unknown` is still `High`).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use serde::{Deserialize, Serialize};

/// A logic level on a pin or wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Driven low (logic 0).
    Low,
    /// Driven high (logic 1).
    High,
    /// Undriven or undetermined.
    #[default]
    Unknown,
}

impl Signal {
    /// Parse a signal from host text.
    ///
    /// Accepts `0`/`1`/`x` and a few spelled-out aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "0" | "l" | "low" | "false" => Some(Self::Low),
            "1" | "h" | "high" | "true" => Some(Self::High),
            "x" | "u" | "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Whether this level is driven (not `Unknown`).
    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }

    /// The boolean value of a driven level, `None` for `Unknown`.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Low => Some(false),
            Self::High => Some(true),
            Self::Unknown => None,
        }
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "0"),
            Self::High => write!(f, "1"),
            Self::Unknown => write!(f, "x"),
        }
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
            Self::Unknown => Self::Unknown,
        }
    }
}

impl BitAnd for Signal {
    type Output = Signal;

    fn bitand(self, rhs: Signal) -> Signal {
        // Low dominates: a single 0 decides the result.
        if self == Self::Low || rhs == Self::Low {
            Self::Low
        } else if self == Self::Unknown || rhs == Self::Unknown {
            Self::Unknown
        } else {
            Self::High
        }
    }
}

impl BitOr for Signal {
    type Output = Signal;

    fn bitor(self, rhs: Signal) -> Signal {
        // High dominates: a single 1 decides the result.
        if self == Self::High || rhs == Self::High {
            Self::High
        } else if self == Self::Unknown || rhs == Self::Unknown {
            Self::Unknown
        } else {
            Self::Low
        }
    }
}

impl BitXor for Signal {
    type Output = Signal;

    fn bitxor(self, rhs: Signal) -> Signal {
        // Parity needs both operands known.
        match (self.to_bool(), rhs.to_bool()) {
            (Some(a), Some(b)) => Signal::from(a != b),
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not() {
        assert_eq!(!Signal::Low, Signal::High);
        assert_eq!(!Signal::High, Signal::Low);
        assert_eq!(!Signal::Unknown, Signal::Unknown);
    }

    #[test]
    fn test_and_dominance() {
        assert_eq!(Signal::High & Signal::High, Signal::High);
        assert_eq!(Signal::Low & Signal::High, Signal::Low);
        // A 0 decides the result even against an unknown
        assert_eq!(Signal::Low & Signal::Unknown, Signal::Low);
        assert_eq!(Signal::Unknown & Signal::High, Signal::Unknown);
        assert_eq!(Signal::Unknown & Signal::Unknown, Signal::Unknown);
    }

    #[test]
    fn test_or_dominance() {
        assert_eq!(Signal::Low | Signal::Low, Signal::Low);
        assert_eq!(Signal::Low | Signal::High, Signal::High);
        // A 1 decides the result even against an unknown
        assert_eq!(Signal::High | Signal::Unknown, Signal::High);
        assert_eq!(Signal::Unknown | Signal::Low, Signal::Unknown);
    }

    #[test]
    fn test_xor_needs_both_known() {
        assert_eq!(Signal::Low ^ Signal::High, Signal::High);
        assert_eq!(Signal::High ^ Signal::High, Signal::Low);
        assert_eq!(Signal::High ^ Signal::Unknown, Signal::Unknown);
        assert_eq!(Signal::Unknown ^ Signal::Unknown, Signal::Unknown);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Signal::from_str("0"), Some(Signal::Low));
        assert_eq!(Signal::from_str("1"), Some(Signal::High));
        assert_eq!(Signal::from_str("x"), Some(Signal::Unknown));
        assert_eq!(Signal::from_str("HIGH"), Some(Signal::High));
        assert_eq!(Signal::from_str("2"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signal::Low.to_string(), "0");
        assert_eq!(Signal::High.to_string(), "1");
        assert_eq!(Signal::Unknown.to_string(), "x");
    }
}
