use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

use crate::op::Op;

/// Errors raised while assembling formulas.
///
/// Construction is the only fallible step of the engine: normal forms,
/// simplification and implication checks only ever propagate these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum FormulaError {
    /// An n-ary node would hold more operands than its child count can represent.
    #[error(
        "Cannot build a `{op:?}` node with {count} operands, exceeding the maximum allowed of {max}."
    )]
    CapacityExceeded { op: Op, count: usize, max: usize },

    /// A bounded repetition was requested with its lower bound above its upper bound.
    #[error(
        "Bounded repetition `{op:?}` requested with min = {min} greater than max = {max}. Bounds are never swapped implicitly."
    )]
    InvalidBounds { op: Op, min: u8, max: u8 },
}

/// Convenient alias used across the crate.
pub type FormulaResult<T> = Result<T, FormulaError>;
