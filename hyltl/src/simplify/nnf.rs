//! Negation normal form.
use crate::{error::FormulaResult, formula::Formula, op::Op};

use super::Simplifier;

impl Simplifier {
    /// Push negations down to atomic propositions.
    ///
    /// Results are memoized per `(formula, polarity)`; the negated node
    /// itself cannot serve as a key since the store may fold it.
    pub(crate) fn nnf(&mut self, f: &Formula, negated: bool) -> FormulaResult<Formula> {
        let mut f = f.clone();
        let mut negated = negated;
        while f.is(Op::Not) {
            negated = !negated;
            f = f.nth(0).clone();
        }

        let key = (f.clone(), negated);
        if let Some(result) = self.cache.nnf.get(&key) {
            return Ok(result.clone());
        }

        let candidate = if negated { self.store.not(f.clone()) } else { f.clone() };
        let result = if candidate.is_in_nenoform()
            || (self.options.nenoform_stop_on_boolean && candidate.is_boolean())
        {
            candidate
        } else {
            self.nnf_node(&f, negated)?
        };

        self.cache.nnf.insert(key, result.clone());
        Ok(result)
    }

    fn nnf_node(&mut self, f: &Formula, negated: bool) -> FormulaResult<Formula> {
        let store = self.store.clone();
        Ok(match f.op() {
            Op::False | Op::True | Op::EmptyWord | Op::Ap => {
                if negated {
                    store.not(f.clone())
                } else {
                    f.clone()
                }
            }
            Op::Not => self.nnf(f.nth(0), !negated)?,
            Op::X => store.x(self.nnf(f.nth(0), negated)?),
            Op::F | Op::G => {
                let c = self.nnf(f.nth(0), negated)?;
                match (f.op(), negated) {
                    (Op::F, false) | (Op::G, true) => store.f(c),
                    _ => store.g(c),
                }
            }
            Op::Closure | Op::NegClosure | Op::NegClosureMarked => {
                let r = self.nnf(f.nth(0), false)?;
                let op = match (f.op(), negated) {
                    (Op::Closure, true) => Op::NegClosure,
                    (_, true) => Op::Closure,
                    (op, false) => op,
                };
                store.unop(op, r)
            }
            Op::Xor | Op::Equiv => {
                // a <-> b = (a & b) | (!a & !b)
                // a xor b = (a & !b) | (!a & b)
                let equiv = (f.op() == Op::Equiv) != negated;
                let a = self.nnf(f.nth(0), false)?;
                let na = self.nnf(f.nth(0), true)?;
                let b = self.nnf(f.nth(1), false)?;
                let nb = self.nnf(f.nth(1), true)?;
                let (left, right) = if equiv {
                    (store.and([a, b])?, store.and([na, nb])?)
                } else {
                    (store.and([a, nb])?, store.and([na, b])?)
                };
                store.or([left, right])?
            }
            Op::Implies => {
                if negated {
                    let a = self.nnf(f.nth(0), false)?;
                    let nb = self.nnf(f.nth(1), true)?;
                    store.and([a, nb])?
                } else {
                    let na = self.nnf(f.nth(0), true)?;
                    let b = self.nnf(f.nth(1), false)?;
                    store.or([na, b])?
                }
            }
            Op::U | Op::R | Op::W | Op::M => {
                let a = self.nnf(f.nth(0), negated)?;
                let b = self.nnf(f.nth(1), negated)?;
                let op = match (f.op(), negated) {
                    (op, false) => op,
                    (Op::U, true) => Op::R,
                    (Op::R, true) => Op::U,
                    (Op::W, true) => Op::M,
                    _ => Op::W,
                };
                store.binop(op, a, b)
            }
            Op::EConcat | Op::EConcatMarked | Op::UConcat => {
                let r = self.nnf(f.nth(0), false)?;
                let body = self.nnf(f.nth(1), negated)?;
                let op = match (f.op(), negated) {
                    (op, false) => op,
                    (Op::UConcat, true) => Op::EConcat,
                    _ => Op::UConcat,
                };
                store.binop(op, r, body)
            }
            Op::And | Op::Or => {
                let op = match (f.op(), negated) {
                    (Op::And, true) => Op::Or,
                    (Op::Or, true) => Op::And,
                    (op, _) => op,
                };
                let mut operands = Vec::with_capacity(f.len());
                for c in f.children() {
                    operands.push(self.nnf(c, negated)?);
                }
                store.multop(op, operands)?
            }
            Op::OrRat | Op::AndRat | Op::AndNLM | Op::Concat | Op::Fusion => {
                let mut operands = Vec::with_capacity(f.len());
                for c in f.children() {
                    operands.push(self.nnf(c, false)?);
                }
                let r = store.multop(f.op(), operands)?;
                if negated { store.not(r) } else { r }
            }
            Op::Star | Op::FStar => {
                let c = self.nnf(f.nth(0), false)?;
                let r = store.bunop(f.op(), c, f.min(), f.max())?;
                if negated { store.not(r) } else { r }
            }
        })
    }
}
