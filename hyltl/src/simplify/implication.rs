//! Syntactic implication between formulas.
//!
//! The rules only look at the shape of both operands. Each rule is sound on
//! its own, so a positive answer is always trustworthy. Boolean pairs are
//! delegated to the Boolean oracle, and non-Boolean pairs may additionally be
//! handed to the containment oracle when the options allow it.
use log::trace;

use crate::{formula::Formula, op::Op};

use super::Simplifier;

impl Simplifier {
    pub(crate) fn implies(&mut self, f: &Formula, g: &Formula) -> bool {
        if f == g || g.is_tt() || f.is_ff() {
            return true;
        }
        if g.is_ff() || f.is_tt() {
            return false;
        }

        let key = (f.clone(), g.clone());
        if let Some(&result) = self.cache.implies.get(&key) {
            return result;
        }

        let result = if f.is_boolean() && g.is_boolean() {
            self.boolean.implies(f, g)
        } else {
            self.implies_right(f, g) || self.implies_left(f, g) || self.implies_contained(f, g)
        };
        trace!("{} => {}: {}", f, g, result);
        self.cache.implies.insert(key, result);
        result
    }

    /// `f ⇒ !g` when `right` is set, `!f ⇒ g` otherwise.
    pub(crate) fn implies_neg(&mut self, f: &Formula, g: &Formula, right: bool) -> bool {
        let sere = |x: &Formula| x.is_sere_formula() && !x.is_boolean();
        if sere(f) || sere(g) {
            return false;
        }

        let key = (f.clone(), g.clone(), right);
        if let Some(&result) = self.cache.implies_neg.get(&key) {
            return result;
        }

        let result = if right {
            match self.nnf(g, true) {
                Ok(ng) => self.implies(f, &ng),
                Err(_) => false,
            }
        } else {
            match self.nnf(f, true) {
                Ok(nf) => self.implies(&nf, g),
                Err(_) => false,
            }
        };
        self.cache.implies_neg.insert(key, result);
        result
    }

    /// Rules decomposing the consequent.
    fn implies_right(&mut self, f: &Formula, g: &Formula) -> bool {
        match g.op() {
            // f ⇒ g1 gives f ⇒ F g1
            Op::F => self.implies(f, g.nth(0)),
            // a universal f holding now holds everywhere
            Op::G => f.is_universal() && self.implies(f, g.nth(0)),
            Op::X => {
                if let Some(f1) = f.get_child_of(Op::X)
                    && self.implies(f1, g.nth(0))
                {
                    return true;
                }
                f.is_universal() && self.implies(f, g.nth(0))
            }
            Op::U => self.implies(f, g.nth(1)),
            Op::W => {
                self.implies(f, g.nth(1)) || (f.is_universal() && self.implies(f, g.nth(0)))
            }
            Op::R => {
                (self.implies(f, g.nth(0)) && self.implies(f, g.nth(1)))
                    || (f.is_universal() && self.implies(f, g.nth(1)))
            }
            Op::M => self.implies(f, g.nth(0)) && self.implies(f, g.nth(1)),
            Op::Or => {
                let operands = g.children().to_vec();
                operands.iter().any(|gi| self.implies(f, gi))
            }
            Op::And => {
                let operands = g.children().to_vec();
                operands.iter().all(|gi| self.implies(f, gi))
            }
            _ => false,
        }
    }

    /// Rules decomposing the antecedent.
    fn implies_left(&mut self, f: &Formula, g: &Formula) -> bool {
        match f.op() {
            Op::G => self.implies(f.nth(0), g),
            Op::F => g.is_eventual() && self.implies(f.nth(0), g),
            Op::X => g.is_eventual() && self.implies(f.nth(0), g),
            Op::U => {
                // f1 U f2 ⇒ g1 U g2 and f1 U f2 ⇒ g1 W g2, operand-wise
                if g.is_any(&[Op::U, Op::W])
                    && self.implies(f.nth(0), g.nth(0))
                    && self.implies(f.nth(1), g.nth(1))
                {
                    return true;
                }
                // f1 U f2 ⇒ F f2, which implies any eventual g implied by f2
                if g.is_eventual() && self.implies(f.nth(1), g) {
                    return true;
                }
                self.implies(f.nth(0), g) && self.implies(f.nth(1), g)
            }
            Op::W => {
                if g.is(Op::W)
                    && self.implies(f.nth(0), g.nth(0))
                    && self.implies(f.nth(1), g.nth(1))
                {
                    return true;
                }
                self.implies(f.nth(0), g) && self.implies(f.nth(1), g)
            }
            Op::R => {
                if g.is(Op::R)
                    && self.implies(f.nth(0), g.nth(0))
                    && self.implies(f.nth(1), g.nth(1))
                {
                    return true;
                }
                self.implies(f.nth(1), g)
            }
            Op::M => {
                if g.is_any(&[Op::M, Op::R])
                    && self.implies(f.nth(0), g.nth(0))
                    && self.implies(f.nth(1), g.nth(1))
                {
                    return true;
                }
                self.implies(f.nth(1), g)
            }
            Op::And => {
                let operands = f.children().to_vec();
                operands.iter().any(|fi| self.implies(fi, g))
            }
            Op::Or => {
                let operands = f.children().to_vec();
                operands.iter().all(|fi| self.implies(fi, g))
            }
            _ => false,
        }
    }

    fn implies_contained(&mut self, f: &Formula, g: &Formula) -> bool {
        if !self.options.containment_checks || !f.is_psl_formula() || !g.is_psl_formula() {
            return false;
        }
        match self.containment() {
            Some(oracle) => oracle.contained(f, g),
            None => false,
        }
    }
}
