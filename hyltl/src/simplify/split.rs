//! Sorting of n-ary operands into buckets by their temporal shape.
//!
//! The And/Or rules first distribute the operands of a conjunction or
//! disjunction into buckets (`X` operands, `F` operands, `G` operands, and so
//! on), then rebuild the formula merging the content of each bucket.
use bitflags::bitflags;

use crate::{formula::Formula, op::Op};

bitflags! {
    /// Which buckets are filled, and whether the outer operator is removed
    /// from the formulas stored in them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct Split: u16 {
        /// `X a` is stored as `a`.
        const STRIP_X = 1 << 0;
        const SPLIT_F = 1 << 1;
        /// `F a` is stored as `a`.
        const STRIP_F = (1 << 2) | Self::SPLIT_F.bits();
        const SPLIT_G = 1 << 3;
        /// `G a` is stored as `a`.
        const STRIP_G = (1 << 4) | Self::SPLIT_G.bits();
        const SPLIT_FG = 1 << 5;
        /// `FG a` is stored as `a`.
        const STRIP_FG = (1 << 6) | Self::SPLIT_FG.bits();
        const SPLIT_GF = 1 << 7;
        /// `GF a` is stored as `a`.
        const STRIP_GF = (1 << 8) | Self::SPLIT_GF.bits();
        const SPLIT_U_OR_W = 1 << 9;
        const SPLIT_R_OR_M = 1 << 10;
        const SPLIT_BOOL = 1 << 11;
        const SPLIT_EVENT_UNIV = 1 << 12;
    }
}

/// Buckets of operands, each in the order the operands were seen.
#[derive(Debug, Default)]
pub(crate) struct OperandSplit {
    pub x: Vec<Formula>,
    pub f: Vec<Formula>,
    pub g: Vec<Formula>,
    pub fg: Vec<Formula>,
    pub gf: Vec<Formula>,
    pub u_or_w: Vec<Formula>,
    pub r_or_m: Vec<Formula>,
    pub boolean: Vec<Formula>,
    pub event_univ: Vec<Formula>,
    pub other: Vec<Formula>,
}

impl OperandSplit {
    /// Split `operands` according to `mode`. The event/univ bucket is only
    /// used when `event_univ` is set, so that the corresponding rule family
    /// can be disabled independently.
    pub fn new(mode: Split, operands: impl IntoIterator<Item = Formula>, event_univ: bool) -> Self {
        let mode = if event_univ {
            mode
        } else {
            mode - Split::SPLIT_EVENT_UNIV
        };
        let mut split = Self::default();
        for f in operands {
            split.process(mode, f);
        }
        split
    }

    fn process(&mut self, mode: Split, f: Formula) {
        let eu = mode.contains(Split::SPLIT_EVENT_UNIV) && f.is_eventual_universal();
        match f.op() {
            Op::X if mode.contains(Split::STRIP_X) && !eu => {
                self.x.push(f.nth(0).clone());
                return;
            }
            Op::F => {
                if mode.contains(Split::SPLIT_FG)
                    && f.is_universal()
                    && let Some(inner) = f.get_child_of_chain(&[Op::F, Op::G])
                {
                    let item = if mode.contains(Split::STRIP_FG) { inner.clone() } else { f };
                    self.fg.push(item);
                    return;
                }
                if mode.contains(Split::SPLIT_F) && !eu {
                    let item = if mode.contains(Split::STRIP_F) { f.nth(0).clone() } else { f };
                    self.f.push(item);
                    return;
                }
            }
            Op::G => {
                if mode.contains(Split::SPLIT_GF)
                    && f.is_eventual()
                    && let Some(inner) = f.get_child_of_chain(&[Op::G, Op::F])
                {
                    let item = if mode.contains(Split::STRIP_GF) { inner.clone() } else { f };
                    self.gf.push(item);
                    return;
                }
                if mode.contains(Split::SPLIT_G) && !eu {
                    let item = if mode.contains(Split::STRIP_G) { f.nth(0).clone() } else { f };
                    self.g.push(item);
                    return;
                }
            }
            Op::U | Op::W if mode.contains(Split::SPLIT_U_OR_W) => {
                self.u_or_w.push(f);
                return;
            }
            Op::R | Op::M if mode.contains(Split::SPLIT_R_OR_M) => {
                self.r_or_m.push(f);
                return;
            }
            _ => {
                if mode.contains(Split::SPLIT_BOOL) && f.is_boolean() {
                    self.boolean.push(f);
                    return;
                }
            }
        }
        if eu {
            self.event_univ.push(f);
        } else {
            self.other.push(f);
        }
    }
}
