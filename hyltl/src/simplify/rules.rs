//! Rewrite rules of one simplification pass.
//!
//! A pass is a bottom-up traversal: operands are rewritten first, then the
//! rules of the enclosing operator are applied once to the rebuilt node.
//! Rules may expose new opportunities higher or lower in the tree; the
//! driver in [`Simplifier::simplify`] runs passes until nothing changes.
use std::collections::HashMap;

use log::trace;

use crate::{error::FormulaResult, formula::Formula, op::Op};

use super::{
    Simplifier,
    split::{OperandSplit, Split},
};

impl Simplifier {
    pub(crate) fn rewrite(&mut self, f: &Formula) -> FormulaResult<Formula> {
        if let Some(result) = self.cache.simplified.get(f) {
            return Ok(result.clone());
        }

        let store = self.store.clone();
        let result = match f.op() {
            Op::False | Op::True | Op::EmptyWord | Op::Ap => f.clone(),
            Op::Not | Op::Closure | Op::NegClosure | Op::NegClosureMarked => {
                let c = self.rewrite(f.nth(0))?;
                store.unop(f.op(), c)
            }
            Op::X => {
                let c = self.rewrite(f.nth(0))?;
                if self.options.event_univ && c.is_eventual_universal() {
                    c
                } else {
                    store.x(c)
                }
            }
            Op::F => {
                let c = self.rewrite(f.nth(0))?;
                self.rewrite_f(c)?
            }
            Op::G => {
                let c = self.rewrite(f.nth(0))?;
                self.rewrite_g(c)?
            }
            Op::U | Op::R | Op::W | Op::M => self.rewrite_until(f)?,
            Op::Xor | Op::Implies | Op::Equiv | Op::EConcat | Op::EConcatMarked | Op::UConcat => {
                let a = self.rewrite(f.nth(0))?;
                let b = self.rewrite(f.nth(1))?;
                store.binop(f.op(), a, b)
            }
            Op::And | Op::Or => self.rewrite_and_or(f)?,
            Op::OrRat | Op::AndRat | Op::AndNLM | Op::Concat | Op::Fusion => {
                let mut operands = Vec::with_capacity(f.len());
                for c in f.children() {
                    operands.push(self.rewrite(c)?);
                }
                store.multop(f.op(), operands)?
            }
            Op::Star | Op::FStar => {
                let c = self.rewrite(f.nth(0))?;
                store.bunop(f.op(), c, f.min(), f.max())?
            }
        };

        if &result != f {
            trace!("Rewrote {} into {}", f, result);
        }
        self.cache.simplified.insert(f.clone(), result.clone());
        Ok(result)
    }

    /// Build `F c` for an already rewritten `c`.
    fn rewrite_f(&mut self, c: Formula) -> FormulaResult<Formula> {
        let store = self.store.clone();
        if self.options.event_univ && c.is_eventual() {
            return Ok(c);
        }
        if self.options.reduce_basics {
            match c.op() {
                // F(a U b) = F(b)
                Op::U => return self.rewrite_f(c.nth(1).clone()),
                // F(a M b) = F(a & b)
                Op::M => {
                    let both = store.and([c.nth(0).clone(), c.nth(1).clone()])?;
                    return self.rewrite_f(both);
                }
                // F(X a) = X(F a)
                Op::X => {
                    let inner = self.rewrite_f(c.nth(0).clone())?;
                    return Ok(store.x(inner));
                }
                // F(a & eu) = F(a) & eu, F(a | eu) = F(a) | eu
                Op::And | Op::Or if self.options.event_univ => {
                    let (eu, rest): (Vec<Formula>, Vec<Formula>) = c
                        .children()
                        .iter()
                        .cloned()
                        .partition(Formula::is_eventual_universal);
                    if !eu.is_empty() && !rest.is_empty() {
                        let rest = store.multop(c.op(), rest)?;
                        let inner = self.rewrite_f(rest)?;
                        return store.multop(c.op(), std::iter::once(inner).chain(eu));
                    }
                }
                _ => {}
            }
        }
        Ok(store.f(c))
    }

    /// Build `G c` for an already rewritten `c`.
    fn rewrite_g(&mut self, c: Formula) -> FormulaResult<Formula> {
        let store = self.store.clone();
        if self.options.event_univ && c.is_universal() {
            return Ok(c);
        }
        if self.options.reduce_basics {
            match c.op() {
                // G(a R b) = G(b)
                Op::R => return self.rewrite_g(c.nth(1).clone()),
                // G(a W b) = G(a | b)
                Op::W => {
                    let either = store.or([c.nth(0).clone(), c.nth(1).clone()])?;
                    return self.rewrite_g(either);
                }
                // G(X a) = X(G a)
                Op::X => {
                    let inner = self.rewrite_g(c.nth(0).clone())?;
                    return Ok(store.x(inner));
                }
                // G(a & eu) = G(a) & eu, G(a | eu) = G(a) | eu
                Op::And | Op::Or if self.options.event_univ => {
                    let (eu, rest): (Vec<Formula>, Vec<Formula>) = c
                        .children()
                        .iter()
                        .cloned()
                        .partition(Formula::is_eventual_universal);
                    if !eu.is_empty() && !rest.is_empty() {
                        let rest = store.multop(c.op(), rest)?;
                        let inner = self.rewrite_g(rest)?;
                        return store.multop(c.op(), std::iter::once(inner).chain(eu));
                    }
                }
                _ => {}
            }
        }
        Ok(store.g(c))
    }

    fn rewrite_until(&mut self, f: &Formula) -> FormulaResult<Formula> {
        let store = self.store.clone();
        let op = f.op();

        let b = self.rewrite(f.nth(1))?;
        if self.options.event_univ
            && ((op == Op::U && b.is_eventual()) || (op == Op::R && b.is_universal()))
        {
            return Ok(b);
        }

        let a = self.rewrite(f.nth(0))?;
        if self.options.event_univ {
            if op == Op::M && a.is_eventual() {
                return store.and([a, b]);
            }
            if op == Op::W && a.is_universal() {
                return store.or([a, b]);
            }
        }

        if self.options.reduce_basics {
            match op {
                Op::U if a.is_tt() => return self.rewrite_f(b),
                Op::R if a.is_ff() => return self.rewrite_g(b),
                Op::W if b.is_ff() => return self.rewrite_g(a),
                Op::M if b.is_tt() => return self.rewrite_f(a),
                _ => {}
            }
            // X a op X b = X(a op b)
            if let (Some(a1), Some(b1)) = (a.get_child_of(Op::X), b.get_child_of(Op::X)) {
                let inner = store.binop(op, a1.clone(), b1.clone());
                return Ok(store.x(inner));
            }
            // a op (a op c) = a op c
            if b.is(op) && b.nth(0) == &a {
                return Ok(b);
            }
        }

        if self.options.synt_impl
            && let Some(result) = self.until_by_implication(op, &a, &b)
        {
            return Ok(result);
        }

        let result = store.binop(op, a, b.clone());
        if self.options.containment_checks_stronger
            && result.is(op)
            && !b.is_boolean()
            && result.is_psl_formula()
            && let Some(oracle) = self.containment()
            && oracle.equal(&result, &b)
        {
            return Ok(b);
        }
        Ok(result)
    }

    /// Absorption rules of the until-like operators that depend on an
    /// implication between the operands.
    fn until_by_implication(&mut self, op: Op, a: &Formula, b: &Formula) -> Option<Formula> {
        let store = self.store.clone();
        match op {
            Op::U => {
                // a ⇒ b: a U b = b
                if self.implies(a, b) {
                    return Some(b.clone());
                }
                // !b ⇒ a: a U b = F b
                if self.implies_neg(b, a, false) {
                    return Some(store.f(b.clone()));
                }
                // a ⇒ b1: a U (b1 U c) = b1 U c, a U (b1 W c) = b1 W c
                if b.is_any(&[Op::U, Op::W]) && self.implies(a, b.nth(0)) {
                    return Some(b.clone());
                }
            }
            Op::R => {
                // b ⇒ a: a R b = b
                if self.implies(b, a) {
                    return Some(b.clone());
                }
                // b ⇒ !a: a R b = G b
                if self.implies_neg(b, a, true) {
                    return Some(store.g(b.clone()));
                }
                if b.is_any(&[Op::R, Op::M]) {
                    // b1 ⇒ a: a R (b1 R c) = b1 R c, a R (b1 M c) = b1 M c
                    if self.implies(b.nth(0), a) {
                        return Some(b.clone());
                    }
                    // a ⇒ b1: a R (b1 R c) = a R c
                    if b.is(Op::R) && self.implies(a, b.nth(0)) {
                        return Some(store.r(a.clone(), b.nth(1).clone()));
                    }
                }
            }
            Op::W => {
                // a ⇒ b: a W b = b
                if self.implies(a, b) {
                    return Some(b.clone());
                }
                // !b ⇒ a: a W b = 1
                if self.implies_neg(b, a, false) {
                    return Some(store.tt());
                }
                // a ⇒ b1: a W (b1 W c) = b1 W c
                if b.is(Op::W) && self.implies(a, b.nth(0)) {
                    return Some(b.clone());
                }
            }
            Op::M => {
                // b ⇒ a: a M b = b
                if self.implies(b, a) {
                    return Some(b.clone());
                }
                // b ⇒ !a: a M b = 0
                if self.implies_neg(b, a, true) {
                    return Some(store.ff());
                }
                if b.is_any(&[Op::M, Op::R]) {
                    // b1 ⇒ a: a M (b1 M c) = b1 M c
                    if b.is(Op::M) && self.implies(b.nth(0), a) {
                        return Some(b.clone());
                    }
                    // a ⇒ b1: a M (b1 M c) = a M c, a M (b1 R c) = a M c
                    if self.implies(a, b.nth(0)) {
                        return Some(store.m(a.clone(), b.nth(1).clone()));
                    }
                }
            }
            _ => {}
        }
        None
    }

    fn rewrite_and_or(&mut self, f: &Formula) -> FormulaResult<Formula> {
        let store = self.store.clone();
        let op = f.op();
        let is_and = op == Op::And;

        let mut operands = Vec::with_capacity(f.len());
        for c in f.children() {
            operands.push(self.rewrite(c)?);
        }
        let rebuilt = store.multop(op, operands)?;
        if !rebuilt.is(op) {
            return Ok(rebuilt);
        }

        if self.options.reduce_basics && !f.is_sere_formula() {
            let merged = if is_and {
                self.merge_and(rebuilt.children().to_vec())?
            } else {
                self.merge_or(rebuilt.children().to_vec())?
            };
            if merged != rebuilt {
                return Ok(merged);
            }
        }

        let mut operands = rebuilt.children().to_vec();
        if self.options.synt_impl {
            self.prune_implied(&mut operands, is_and);
            if f.is_boolean() || !f.is_sere_formula() {
                for i in 0..operands.len() {
                    for j in 0..operands.len() {
                        if i != j && self.implies_neg(&operands[i], &operands[j], is_and) {
                            trace!("Operands of {} are contradictory", f);
                            return Ok(store.constant(!is_and));
                        }
                    }
                }
            }
        }
        if self.options.containment_checks_stronger {
            self.prune_contained(&mut operands, is_and)?;
        }
        store.multop(op, operands)
    }

    /// `a ⇒ b` gives `a | b = b` and `a & b = a`.
    fn prune_implied(&mut self, operands: &mut Vec<Formula>, is_and: bool) {
        'restart: loop {
            for i in 0..operands.len() {
                for j in 0..operands.len() {
                    if i != j && self.implies(&operands[i], &operands[j]) {
                        operands.remove(if is_and { j } else { i });
                        continue 'restart;
                    }
                }
            }
            return;
        }
    }

    /// Drop operands the conjunction (disjunction) of the others entails (is entailed by).
    fn prune_contained(&mut self, operands: &mut Vec<Formula>, is_and: bool) -> FormulaResult<()> {
        let store = self.store.clone();
        let op = if is_and { Op::And } else { Op::Or };
        let mut i = 0;
        while i < operands.len() && operands.len() > 1 {
            let candidate = &operands[i];
            if candidate.is_boolean() || !candidate.is_psl_formula() {
                i += 1;
                continue;
            }
            let others = store.multop(
                op,
                operands
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i)
                    .map(|(_, g)| g.clone()),
            )?;
            let redundant = match self.containment() {
                Some(oracle) if is_and => oracle.contained(&others, candidate),
                Some(oracle) => oracle.contained(candidate, &others),
                None => false,
            };
            if redundant {
                operands.remove(i);
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    fn merge_and(&mut self, operands: Vec<Formula>) -> FormulaResult<Formula> {
        let store = self.store.clone();
        let mode = Split::STRIP_X
            | Split::STRIP_FG
            | Split::STRIP_G
            | Split::SPLIT_F
            | Split::SPLIT_U_OR_W
            | Split::SPLIT_R_OR_M
            | Split::SPLIT_EVENT_UNIV;
        let mut s = OperandSplit::new(mode, operands, self.options.event_univ);

        // FG(a) & FG(b) = FG(a & b)
        let mut all_fg = None;
        if !s.fg.is_empty() {
            all_fg = Some(store.f(store.g(store.and(std::mem::take(&mut s.fg))?)));
        }
        // X(a) & X(b) & FG(c) & eu = X(a & b & FG(c) & eu)
        if !s.x.is_empty() {
            s.x.extend(all_fg.take());
            s.x.append(&mut s.event_univ);
        } else {
            s.other.append(&mut s.event_univ);
        }
        // G(a) & G(b) = G(a & b)
        let all_g = match s.g.is_empty() {
            true => None,
            false => Some(store.g(store.and(std::mem::take(&mut s.g))?)),
        };

        // (a U c) & (b U|W c) = (a & b) U c, (a W c) & (b W c) = (a & b) W c
        let (mut uw, uw_anchors) =
            self.merge_same_anchor(std::mem::take(&mut s.u_or_w), 1, Op::And, Op::U)?;
        // (a R b) & (a R|M c) = a R|M (b & c)
        let (mut rm, rm_anchors) =
            self.merge_same_anchor(std::mem::take(&mut s.r_or_m), 0, Op::And, Op::M)?;

        // F(b) & (a W b) = a U b, F(a) & (a R b) = a M b
        let mut eventually = Vec::with_capacity(s.f.len());
        for item in std::mem::take(&mut s.f) {
            let inner = item.nth(0);
            let mut superfluous = false;
            if let Some(&slot) = uw_anchors.get(inner) {
                superfluous = true;
                if uw[slot].is(Op::W) {
                    uw[slot] = store.u(uw[slot].nth(0).clone(), uw[slot].nth(1).clone());
                }
            }
            if let Some(&slot) = rm_anchors.get(inner) {
                superfluous = true;
                if rm[slot].is(Op::R) {
                    rm[slot] = store.m(rm[slot].nth(0).clone(), rm[slot].nth(1).clone());
                }
            }
            if !superfluous {
                eventually.push(item);
            }
        }

        let mut result = std::mem::take(&mut s.other);
        result.append(&mut eventually);
        result.append(&mut uw);
        result.append(&mut rm);
        if !s.x.is_empty() {
            result.push(store.x(store.and(std::mem::take(&mut s.x))?));
        }
        result.extend(all_g);
        result.extend(all_fg);
        store.and(result)
    }

    fn merge_or(&mut self, operands: Vec<Formula>) -> FormulaResult<Formula> {
        let store = self.store.clone();
        let mode = Split::STRIP_X
            | Split::STRIP_GF
            | Split::STRIP_F
            | Split::SPLIT_G
            | Split::SPLIT_U_OR_W
            | Split::SPLIT_R_OR_M
            | Split::SPLIT_EVENT_UNIV;
        let mut s = OperandSplit::new(mode, operands, self.options.event_univ);

        // GF(a) | GF(b) = GF(a | b)
        let mut all_gf = None;
        if !s.gf.is_empty() {
            all_gf = Some(store.g(store.f(store.or(std::mem::take(&mut s.gf))?)));
        }
        // X(a) | X(b) | GF(c) | eu = X(a | b | GF(c) | eu)
        if !s.x.is_empty() {
            s.x.extend(all_gf.take());
            s.x.append(&mut s.event_univ);
        } else {
            s.other.append(&mut s.event_univ);
        }
        // F(a) | F(b) = F(a | b)
        let all_f = match s.f.is_empty() {
            true => None,
            false => Some(store.f(store.or(std::mem::take(&mut s.f))?)),
        };

        // (a U b) | (a U|W c) = a U|W (b | c)
        let (mut uw, uw_anchors) =
            self.merge_same_anchor(std::mem::take(&mut s.u_or_w), 0, Op::Or, Op::W)?;
        // (a R c) | (b R|M c) = (a | b) R c
        let (mut rm, rm_anchors) =
            self.merge_same_anchor(std::mem::take(&mut s.r_or_m), 1, Op::Or, Op::R)?;

        // G(a) | (a U b) = a W b, G(b) | (a M b) = a R b
        let mut globally = Vec::with_capacity(s.g.len());
        for item in std::mem::take(&mut s.g) {
            let inner = item.nth(0);
            let mut superfluous = false;
            if let Some(&slot) = uw_anchors.get(inner) {
                superfluous = true;
                if uw[slot].is(Op::U) {
                    uw[slot] = store.w(uw[slot].nth(0).clone(), uw[slot].nth(1).clone());
                }
            }
            if let Some(&slot) = rm_anchors.get(inner) {
                superfluous = true;
                if rm[slot].is(Op::M) {
                    rm[slot] = store.r(rm[slot].nth(0).clone(), rm[slot].nth(1).clone());
                }
            }
            if !superfluous {
                globally.push(item);
            }
        }

        let mut result = std::mem::take(&mut s.other);
        result.append(&mut globally);
        result.append(&mut uw);
        result.append(&mut rm);
        if !s.x.is_empty() {
            result.push(store.x(store.or(std::mem::take(&mut s.x))?));
        }
        result.extend(all_f);
        result.extend(all_gf);
        store.or(result)
    }

    /// Merge until-like formulas sharing the operand at position `anchor`.
    ///
    /// The other operands are combined with `combine`; the merged formula
    /// uses `winner` as soon as one of the merged formulas does. The first
    /// formula seen with a given anchor is the one rewritten in place.
    /// Returns the merged formulas and, for each anchor still heading a
    /// merged formula, its index in the returned vector.
    fn merge_same_anchor(
        &self,
        items: Vec<Formula>,
        anchor: usize,
        combine: Op,
        winner: Op,
    ) -> FormulaResult<(Vec<Formula>, HashMap<Formula, usize>)> {
        let store = &self.store;
        let other = 1 - anchor;
        let mut kept: Vec<Formula> = Vec::with_capacity(items.len());
        let mut anchors: HashMap<Formula, usize> = HashMap::new();

        for item in items {
            let key = item.nth(anchor).clone();
            let Some(&slot) = anchors.get(&key) else {
                anchors.insert(key, kept.len());
                kept.push(item);
                continue;
            };

            let first = &kept[slot];
            let op = if first.is(winner) || item.is(winner) {
                winner
            } else {
                first.op()
            };
            let side = store.multop(combine, [first.nth(other).clone(), item.nth(other).clone()])?;
            let merged = match anchor {
                0 => store.binop(op, key.clone(), side),
                _ => store.binop(op, side, key.clone()),
            };
            if !merged.is(op) || merged.nth(anchor) != &key {
                // Folded into another shape, later formulas start afresh.
                anchors.remove(&key);
            }
            kept[slot] = merged;
        }
        Ok((kept, anchors))
    }
}
