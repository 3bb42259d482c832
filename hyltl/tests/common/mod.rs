#![allow(dead_code)]

use std::collections::BTreeSet;

use hyltl::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub const APS: [&str; 3] = ["a", "b", "c"];

/// Ultimately periodic word `prefix · cycle^ω`; each letter is the set of
/// atomic propositions holding at that position.
#[derive(Debug, Clone)]
pub struct Lasso {
    pub prefix: Vec<BTreeSet<&'static str>>,
    pub cycle: Vec<BTreeSet<&'static str>>,
}

impl Lasso {
    fn len(&self) -> usize {
        self.prefix.len() + self.cycle.len()
    }

    fn letter(&self, i: usize) -> &BTreeSet<&'static str> {
        if i < self.prefix.len() {
            &self.prefix[i]
        } else {
            &self.cycle[i - self.prefix.len()]
        }
    }

    fn succ(&self, i: usize) -> usize {
        if i + 1 == self.len() { self.prefix.len() } else { i + 1 }
    }

    /// Whether the word satisfies the LTL formula `f`.
    pub fn satisfies(&self, f: &Formula) -> bool {
        self.eval(f)[0]
    }

    /// Truth value of `f` at every position of the lasso.
    fn eval(&self, f: &Formula) -> Vec<bool> {
        let n = self.len();
        match f.op() {
            Op::True => vec![true; n],
            Op::False => vec![false; n],
            Op::Ap => {
                let name = f.ap_name().unwrap();
                (0..n).map(|i| self.letter(i).contains(name)).collect()
            }
            Op::Not => self.eval(f.nth(0)).into_iter().map(|v| !v).collect(),
            Op::And | Op::Or => {
                let is_and = f.is(Op::And);
                let mut acc = vec![is_and; n];
                for c in f.children() {
                    let v = self.eval(c);
                    for i in 0..n {
                        acc[i] = if is_and { acc[i] && v[i] } else { acc[i] || v[i] };
                    }
                }
                acc
            }
            Op::Xor | Op::Implies | Op::Equiv => {
                let a = self.eval(f.nth(0));
                let b = self.eval(f.nth(1));
                (0..n)
                    .map(|i| match f.op() {
                        Op::Xor => a[i] != b[i],
                        Op::Implies => !a[i] || b[i],
                        _ => a[i] == b[i],
                    })
                    .collect()
            }
            Op::X => {
                let a = self.eval(f.nth(0));
                (0..n).map(|i| a[self.succ(i)]).collect()
            }
            Op::F => self.fixpoint(&vec![true; n], &self.eval(f.nth(0)), Op::U),
            Op::G => self.fixpoint(&vec![false; n], &self.eval(f.nth(0)), Op::R),
            Op::U | Op::R | Op::W | Op::M => {
                let a = self.eval(f.nth(0));
                let b = self.eval(f.nth(1));
                self.fixpoint(&a, &b, f.op())
            }
            op => panic!("no lasso semantics for {:?}", op),
        }
    }

    /// U and M are least fixpoints, R and W greatest ones.
    fn fixpoint(&self, a: &[bool], b: &[bool], op: Op) -> Vec<bool> {
        let n = self.len();
        let least = matches!(op, Op::U | Op::M);
        let mut v = vec![!least; n];
        for _ in 0..=n {
            for i in (0..n).rev() {
                let next = v[self.succ(i)];
                v[i] = match op {
                    Op::U | Op::W => b[i] || (a[i] && next),
                    _ => b[i] && (a[i] || next),
                };
            }
        }
        v
    }
}

pub fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(0x42)
}

fn random_letter(rng: &mut impl Rng) -> BTreeSet<&'static str> {
    APS.iter()
        .copied()
        .filter(|_| rng.random_bool(0.5))
        .collect()
}

pub fn random_lasso(rng: &mut impl Rng) -> Lasso {
    let prefix_len = rng.random_range(0..4);
    let cycle_len = rng.random_range(1..4);
    Lasso {
        prefix: (0..prefix_len).map(|_| random_letter(rng)).collect(),
        cycle: (0..cycle_len).map(|_| random_letter(rng)).collect(),
    }
}

pub fn random_lassos(rng: &mut impl Rng, count: usize) -> Vec<Lasso> {
    (0..count).map(|_| random_lasso(rng)).collect()
}

/// Random LTL formula over [`APS`] with at most `budget` nested operators.
pub fn random_ltl(store: &FormulaStore, rng: &mut impl Rng, budget: usize) -> Formula {
    if budget == 0 || rng.random_bool(0.2) {
        return match rng.random_range(0..=8) {
            0 => store.tt(),
            1 => store.ff(),
            _ => store.ap(APS[rng.random_range(0..APS.len())]),
        };
    }

    match rng.random_range(0..=12) {
        0 => store.not(random_ltl(store, rng, budget - 1)),
        1 => store.x(random_ltl(store, rng, budget - 1)),
        2 => store.f(random_ltl(store, rng, budget - 1)),
        3 => store.g(random_ltl(store, rng, budget - 1)),
        4 | 5 | 6 | 7 => {
            let op = [Op::U, Op::R, Op::W, Op::M][rng.random_range(0..4)];
            let a = random_ltl(store, rng, budget - 1);
            let b = random_ltl(store, rng, budget - 1);
            store.binop(op, a, b)
        }
        8 => {
            let op = [Op::Xor, Op::Implies, Op::Equiv][rng.random_range(0..3)];
            let a = random_ltl(store, rng, budget - 1);
            let b = random_ltl(store, rng, budget - 1);
            store.binop(op, a, b)
        }
        9 | 10 => {
            let count = rng.random_range(2..=3);
            let operands: Vec<Formula> = (0..count)
                .map(|_| random_ltl(store, rng, budget - 1))
                .collect();
            store.and(operands).unwrap()
        }
        _ => {
            let count = rng.random_range(2..=3);
            let operands: Vec<Formula> = (0..count)
                .map(|_| random_ltl(store, rng, budget - 1))
                .collect();
            store.or(operands).unwrap()
        }
    }
}

/// Both formulas agree on every lasso.
pub fn assert_same_language(f: &Formula, g: &Formula, lassos: &[Lasso]) {
    for w in lassos {
        assert_eq!(
            w.satisfies(f),
            w.satisfies(g),
            "{} and {} disagree on {:?}",
            f,
            g,
            w
        );
    }
}
