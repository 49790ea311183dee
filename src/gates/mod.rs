//! Gate kinds and their evaluation.
//!
//! [`GateKind`] is the closed set of gate functions the engine knows how
//! to evaluate. Evaluation is pure: it maps current input levels to an
//! output level and never touches the graph.
//!
//! Three kinds are special:
//! - `Input` has no input pins; its output level is imposed by the host
//!   as external stimulus.
//! - `Const` has no input pins and permanently drives its fixed level.
//! - `Output` is a probe: it has an input pin but no output pin, so
//!   nothing can be wired downstream of it.

mod logic;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::signal::Signal;

/// The closed set of gate kinds.
///
/// `And` through `Xnor` are variadic and accept two or more inputs;
/// `Not`, `Buffer` and `Output` take exactly one; `Const` and `Input`
/// take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Not,
    Buffer,
    /// Source permanently driving a fixed level.
    Const(Signal),
    /// External input; its level comes from host stimulus.
    Input,
    /// External probe mirroring its single input.
    Output,
}

impl GateKind {
    /// Whether `arity` is a legal input count for this kind.
    pub fn supports_arity(&self, arity: usize) -> bool {
        match self {
            GateKind::And
            | GateKind::Or
            | GateKind::Xor
            | GateKind::Nand
            | GateKind::Nor
            | GateKind::Xnor => arity >= 2,
            GateKind::Not | GateKind::Buffer | GateKind::Output => arity == 1,
            GateKind::Const(_) | GateKind::Input => arity == 0,
        }
    }

    /// Whether this kind's output is imposed rather than computed.
    /// Source gates are never re-evaluated during propagation.
    pub fn is_source(&self) -> bool {
        matches!(self, GateKind::Const(_) | GateKind::Input)
    }

    /// Whether this kind drives an output pin. `Output` probes do not,
    /// so no wire can start at one.
    pub fn has_output(&self) -> bool {
        !matches!(self, GateKind::Output)
    }

    /// The output level a freshly created gate of this kind starts with.
    ///
    /// Computing gates start `Low`, `Const` starts at its fixed level,
    /// and `Input` starts `Unknown` until the host drives it.
    pub fn initial_output(&self) -> Signal {
        match self {
            GateKind::Const(v) => *v,
            GateKind::Input => Signal::Unknown,
            _ => Signal::Low,
        }
    }

    /// Evaluate the gate function over the given input levels.
    ///
    /// # Arguments
    /// * `inputs` - Current input pin values, in pin order
    ///
    /// # Returns
    /// The output level, or an arity error if `inputs.len()` is not a
    /// legal input count for this kind. For `Input` the result is
    /// `Unknown`: its live level is stimulus, not a function of anything.
    pub fn evaluate(&self, inputs: &[Signal]) -> Result<Signal> {
        match self {
            GateKind::And
            | GateKind::Or
            | GateKind::Xor
            | GateKind::Nand
            | GateKind::Nor
            | GateKind::Xnor => {
                if inputs.len() < 2 {
                    return Err(SimError::UnsupportedArity {
                        kind: *self,
                        arity: inputs.len(),
                    });
                }
            }
            GateKind::Not | GateKind::Buffer | GateKind::Output => {
                if inputs.len() != 1 {
                    return Err(SimError::ArityMismatch {
                        kind: *self,
                        expected: 1,
                        got: inputs.len(),
                    });
                }
            }
            GateKind::Const(_) | GateKind::Input => {
                if !inputs.is_empty() {
                    return Err(SimError::ArityMismatch {
                        kind: *self,
                        expected: 0,
                        got: inputs.len(),
                    });
                }
            }
        }

        Ok(match self {
            GateKind::And => logic::and(inputs),
            GateKind::Or => logic::or(inputs),
            GateKind::Xor => logic::xor(inputs),
            GateKind::Nand => !logic::and(inputs),
            GateKind::Nor => !logic::or(inputs),
            GateKind::Xnor => !logic::xor(inputs),
            GateKind::Not => !inputs[0],
            GateKind::Buffer | GateKind::Output => inputs[0],
            GateKind::Const(v) => *v,
            GateKind::Input => Signal::Unknown,
        })
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::And => write!(f, "AND"),
            GateKind::Or => write!(f, "OR"),
            GateKind::Xor => write!(f, "XOR"),
            GateKind::Nand => write!(f, "NAND"),
            GateKind::Nor => write!(f, "NOR"),
            GateKind::Xnor => write!(f, "XNOR"),
            GateKind::Not => write!(f, "NOT"),
            GateKind::Buffer => write!(f, "BUFFER"),
            GateKind::Const(v) => write!(f, "CONST({v})"),
            GateKind::Input => write!(f, "INPUT"),
            GateKind::Output => write!(f, "OUTPUT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Signal::{High, Low, Unknown};

    #[test]
    fn test_basic_kinds() {
        assert_eq!(GateKind::And.evaluate(&[High, High]).unwrap(), High);
        assert_eq!(GateKind::And.evaluate(&[Low, High]).unwrap(), Low);
        assert_eq!(GateKind::And.evaluate(&[Unknown, High]).unwrap(), Unknown);
        assert_eq!(GateKind::Or.evaluate(&[Low, Low]).unwrap(), Low);
        assert_eq!(GateKind::Xor.evaluate(&[High, Low]).unwrap(), High);
        assert_eq!(GateKind::Not.evaluate(&[Low]).unwrap(), High);
        assert_eq!(GateKind::Not.evaluate(&[High]).unwrap(), Low);
        assert_eq!(GateKind::Not.evaluate(&[Unknown]).unwrap(), Unknown);
        assert_eq!(GateKind::Buffer.evaluate(&[Unknown]).unwrap(), Unknown);
    }

    #[test]
    fn test_negated_kinds() {
        assert_eq!(GateKind::Nand.evaluate(&[High, High]).unwrap(), Low);
        assert_eq!(GateKind::Nand.evaluate(&[Low, Unknown]).unwrap(), High);
        assert_eq!(GateKind::Nor.evaluate(&[Low, Low]).unwrap(), High);
        assert_eq!(GateKind::Nor.evaluate(&[High, Unknown]).unwrap(), Low);
        assert_eq!(GateKind::Xnor.evaluate(&[High, High]).unwrap(), High);
        assert_eq!(GateKind::Xnor.evaluate(&[Unknown, High]).unwrap(), Unknown);
    }

    #[test]
    fn test_source_and_probe_kinds() {
        assert_eq!(GateKind::Const(High).evaluate(&[]).unwrap(), High);
        assert_eq!(GateKind::Input.evaluate(&[]).unwrap(), Unknown);
        assert_eq!(GateKind::Output.evaluate(&[High]).unwrap(), High);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = GateKind::Not.evaluate(&[High, Low]).unwrap_err();
        assert!(matches!(
            err,
            SimError::ArityMismatch {
                expected: 1,
                got: 2,
                ..
            }
        ));

        let err = GateKind::Input.evaluate(&[High]).unwrap_err();
        assert!(matches!(err, SimError::ArityMismatch { expected: 0, .. }));
    }

    #[test]
    fn test_variadic_floor() {
        let err = GateKind::And.evaluate(&[High]).unwrap_err();
        assert!(matches!(err, SimError::UnsupportedArity { arity: 1, .. }));
    }

    #[test]
    fn test_supports_arity() {
        assert!(GateKind::And.supports_arity(2));
        assert!(GateKind::And.supports_arity(5));
        assert!(!GateKind::And.supports_arity(1));
        assert!(GateKind::Not.supports_arity(1));
        assert!(!GateKind::Not.supports_arity(2));
        assert!(GateKind::Input.supports_arity(0));
        assert!(!GateKind::Input.supports_arity(1));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let inputs = [High, Unknown, Low];
        for kind in [GateKind::And, GateKind::Or, GateKind::Xor, GateKind::Nand] {
            let first = kind.evaluate(&inputs).unwrap();
            for _ in 0..10 {
                assert_eq!(kind.evaluate(&inputs).unwrap(), first);
            }
        }
    }
}
