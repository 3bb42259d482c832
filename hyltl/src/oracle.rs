//! Boundaries to the semantic deciders used by the simplifier.
//!
//! - [`BooleanOracle`] decides implication between purely Boolean formulas.
//!   [`TruthTableOracle`] is the default implementation.
//! - [`ContainmentOracle`] decides language inclusion between LTL/PSL
//!   formulas. No implementation ships with this crate: it is typically built
//!   by translating both formulas to automata and checking emptiness of a
//!   product.
use std::collections::HashMap;

use crate::{formula::Formula, op::Op};

/// Implication between Boolean formulas.
pub trait BooleanOracle {
    /// Whether `f` implies `g`. Both arguments are Boolean.
    ///
    /// Implementations must be sound; answering `false` is always allowed.
    fn implies(&self, f: &Formula, g: &Formula) -> bool;

    /// Whether `f` and `g` are equivalent.
    fn equivalent(&self, f: &Formula, g: &Formula) -> bool {
        self.implies(f, g) && self.implies(g, f)
    }
}

/// Language containment between temporal formulas.
pub trait ContainmentOracle {
    /// Whether every word satisfying `f` satisfies `g`.
    fn contained(&self, f: &Formula, g: &Formula) -> bool;

    /// Whether `f` and `g` have the same language.
    fn equal(&self, f: &Formula, g: &Formula) -> bool {
        self.contained(f, g) && self.contained(g, f)
    }
}

/// Boolean oracle enumerating every valuation of the atomic propositions.
///
/// Formulas over more than `max_atoms` propositions are never reported as
/// implying each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthTableOracle {
    max_atoms: usize,
}

impl Default for TruthTableOracle {
    fn default() -> Self {
        Self::new(12)
    }
}

impl TruthTableOracle {
    pub fn new(max_atoms: usize) -> Self {
        Self {
            max_atoms: max_atoms.min(63),
        }
    }

    /// Evaluate a Boolean formula, atomic propositions being looked up in
    /// `index` and read from the bits of `valuation`. Returns `None` on a
    /// non-Boolean operator.
    fn eval(f: &Formula, index: &HashMap<Formula, usize>, valuation: u64) -> Option<bool> {
        Some(match f.op() {
            Op::True => true,
            Op::False => false,
            Op::Ap => ((valuation >> *index.get(f)?) & 1) == 1,
            Op::Not => !Self::eval(f.nth(0), index, valuation)?,
            Op::And => {
                let mut acc = true;
                for c in f.children() {
                    acc &= Self::eval(c, index, valuation)?;
                }
                acc
            }
            Op::Or => {
                let mut acc = false;
                for c in f.children() {
                    acc |= Self::eval(c, index, valuation)?;
                }
                acc
            }
            Op::Xor | Op::Implies | Op::Equiv => {
                let a = Self::eval(f.nth(0), index, valuation)?;
                let b = Self::eval(f.nth(1), index, valuation)?;
                match f.op() {
                    Op::Xor => a != b,
                    Op::Implies => !a || b,
                    _ => a == b,
                }
            }
            _ => return None,
        })
    }
}

impl BooleanOracle for TruthTableOracle {
    fn implies(&self, f: &Formula, g: &Formula) -> bool {
        if !f.is_boolean() || !g.is_boolean() {
            return false;
        }
        let mut index: HashMap<Formula, usize> = HashMap::new();
        for ap in f.atomic_props().into_iter().chain(g.atomic_props()) {
            let next = index.len();
            index.entry(ap).or_insert(next);
        }
        if index.len() > self.max_atoms {
            return false;
        }
        (0..1u64 << index.len()).all(|v| {
            match (Self::eval(f, &index, v), Self::eval(g, &index, v)) {
                (Some(a), Some(b)) => !a || b,
                _ => false,
            }
        })
    }
}
