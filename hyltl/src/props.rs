//! Syntactic properties attached to every node.
//!
//! Properties are computed exactly once, when a node is interned, from the
//! operator and the properties of its already-interned children. Queries are
//! therefore a single bit test, no matter how large the formula is.
//!
//! Every flag is stored in its "positive" form so that the default rule for
//! an operator is simply the intersection of its children's flags; each
//! operator then applies a small correction on top (see [`infer`]).
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{formula::Formula, op::Op, store::UNBOUNDED};

bitflags! {
    /// Bitset of syntactic predicates computed at construction time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Props: u32 {
        /// No temporal nor SERE operator occurs in the formula.
        const BOOLEAN = 1 << 0;
        /// Boolean formula using only `!`, `&` and `|`.
        const SUGAR_FREE_BOOLEAN = 1 << 1;
        /// Negations only appear directly above atomic propositions.
        const IN_NNF = 1 << 2;
        /// Syntactically stutter-invariant (LTL without `X`, siPSL).
        const SYNTACTIC_SI = 1 << 3;
        /// No `F` nor `G` operator.
        const SUGAR_FREE_LTL = 1 << 4;
        /// Only LTL operators.
        const LTL = 1 << 5;
        /// Only PSL operators (LTL is a subset of PSL).
        const PSL = 1 << 6;
        /// Only SERE operators (Boolean formulas are SEREs of length one).
        const SERE = 1 << 7;
        /// Finite SERE, or a Boolean formula under `X` only.
        const FINITE = 1 << 8;
        /// Purely eventual: satisfaction is insensitive to adding a prefix.
        const EVENTUAL = 1 << 9;
        /// Purely universal: satisfaction is insensitive to removing a prefix.
        const UNIVERSAL = 1 << 10;
        /// Syntactic safety class of the temporal hierarchy.
        const SAFETY = 1 << 11;
        /// Syntactic guarantee class.
        const GUARANTEE = 1 << 12;
        /// Syntactic obligation class.
        const OBLIGATION = 1 << 13;
        /// Syntactic recurrence class.
        const RECURRENCE = 1 << 14;
        /// Syntactic persistence class.
        const PERSISTENCE = 1 << 15;
        /// No marked operator (`EConcatMarked`, `NegClosureMarked`) below.
        const NOT_MARKED = 1 << 16;
        /// The SERE accepts the empty word.
        const ACCEPTS_EWORD = 1 << 17;
        /// Every atomic proposition is LBT compatible (`p` followed by digits).
        const LBT_APS = 1 << 18;
        /// Every atomic proposition is a valid Spin identifier.
        const SPIN_APS = 1 << 19;

        /// The five classes of the temporal hierarchy.
        const CLASSES = Self::SAFETY.bits()
            | Self::GUARANTEE.bits()
            | Self::OBLIGATION.bits()
            | Self::RECURRENCE.bits()
            | Self::PERSISTENCE.bits();
    }
}

#[inline]
fn swap_pair(target: &mut Props, from: Props, a: Props, b: Props) {
    target.set(a, from.contains(b));
    target.set(b, from.contains(a));
}

fn is_lbt_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('p') && {
        let rest = chars.as_str();
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
    }
}

fn is_spin_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('a'..='z'))
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Compute the property set of a node about to be interned.
///
/// `name` is only meaningful for [`Op::Ap`], `min`/`max` only for the bounded
/// repetitions. Children must already be canonical.
pub(crate) fn infer(op: Op, name: Option<&str>, children: &[Formula], min: u8, max: u8) -> Props {
    use Props as P;

    let all = children
        .iter()
        .fold(Props::all(), |acc, c| acc & c.props());
    let child = |i: usize| children[i].props();

    let mut p = all;
    match op {
        Op::False | Op::True => {
            p = Props::all() - P::ACCEPTS_EWORD;
        }
        Op::EmptyWord => {
            p = P::SERE
                | P::FINITE
                | P::ACCEPTS_EWORD
                | P::IN_NNF
                | P::SYNTACTIC_SI
                | P::SUGAR_FREE_LTL
                | P::NOT_MARKED
                | P::LBT_APS
                | P::SPIN_APS;
        }
        Op::Ap => {
            let name = name.unwrap_or_default();
            p = Props::all() - P::ACCEPTS_EWORD - P::EVENTUAL - P::UNIVERSAL;
            p.set(P::LBT_APS, is_lbt_name(name));
            p.set(P::SPIN_APS, is_spin_name(name));
        }
        Op::Not => {
            let c = child(0);
            p.set(P::IN_NNF, children[0].op() == Op::Ap);
            p.set(P::SERE, c.contains(P::BOOLEAN));
            swap_pair(&mut p, c, P::EVENTUAL, P::UNIVERSAL);
            swap_pair(&mut p, c, P::SAFETY, P::GUARANTEE);
            swap_pair(&mut p, c, P::RECURRENCE, P::PERSISTENCE);
            p.remove(P::ACCEPTS_EWORD);
        }
        Op::X => {
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::SYNTACTIC_SI
                    | P::SERE
                    | P::ACCEPTS_EWORD,
            );
        }
        Op::F => {
            let c = child(0);
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::SERE
                    | P::FINITE
                    | P::SUGAR_FREE_LTL
                    | P::SAFETY
                    | P::ACCEPTS_EWORD,
            );
            p.insert(P::EVENTUAL);
            p.set(P::OBLIGATION, c.contains(P::GUARANTEE));
            p.set(P::RECURRENCE, c.contains(P::GUARANTEE));
        }
        Op::G => {
            let c = child(0);
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::SERE
                    | P::FINITE
                    | P::SUGAR_FREE_LTL
                    | P::GUARANTEE
                    | P::ACCEPTS_EWORD,
            );
            p.insert(P::UNIVERSAL);
            p.set(P::OBLIGATION, c.contains(P::SAFETY));
            p.set(P::PERSISTENCE, c.contains(P::SAFETY));
        }
        Op::Closure | Op::NegClosure | Op::NegClosureMarked => {
            let finite = child(0).contains(P::FINITE);
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::LTL
                    | P::SERE
                    | P::FINITE
                    | P::EVENTUAL
                    | P::UNIVERSAL
                    | P::ACCEPTS_EWORD,
            );
            p.insert(P::PSL | P::OBLIGATION | P::RECURRENCE | P::PERSISTENCE);
            if op == Op::Closure {
                p.insert(P::SAFETY);
                p.set(P::GUARANTEE, finite);
            } else {
                p.insert(P::GUARANTEE);
                p.set(P::SAFETY, finite);
            }
            if op == Op::NegClosureMarked {
                p.remove(P::NOT_MARKED);
            }
        }
        Op::Xor | Op::Equiv => {
            p.remove(
                P::EVENTUAL
                    | P::UNIVERSAL
                    | P::SUGAR_FREE_BOOLEAN
                    | P::IN_NNF
                    | P::ACCEPTS_EWORD,
            );
            p.set(P::SERE, p.contains(P::BOOLEAN));
            if p.contains(P::OBLIGATION) {
                // Only the intersection of safety and guarantee is closed under these.
                let both = p.contains(P::SAFETY | P::GUARANTEE);
                p.set(P::SAFETY | P::GUARANTEE, both);
            } else {
                p.remove(P::SAFETY | P::GUARANTEE | P::RECURRENCE | P::PERSISTENCE);
            }
        }
        Op::Implies => {
            let (a, b) = (child(0), child(1));
            p.remove(
                P::EVENTUAL
                    | P::UNIVERSAL
                    | P::SUGAR_FREE_BOOLEAN
                    | P::IN_NNF
                    | P::ACCEPTS_EWORD,
            );
            p.set(P::SERE, a.contains(P::BOOLEAN) && b.contains(P::SERE));
            p.set(P::SAFETY, a.contains(P::GUARANTEE) && b.contains(P::SAFETY));
            p.set(P::GUARANTEE, a.contains(P::SAFETY) && b.contains(P::GUARANTEE));
            p.set(
                P::PERSISTENCE,
                a.contains(P::RECURRENCE) && b.contains(P::PERSISTENCE),
            );
            p.set(
                P::RECURRENCE,
                a.contains(P::PERSISTENCE) && b.contains(P::RECURRENCE),
            );
        }
        Op::U | Op::R | Op::W | Op::M => {
            let (a, b) = (child(0), child(1));
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::SERE
                    | P::FINITE
                    | P::ACCEPTS_EWORD,
            );
            match op {
                Op::U => {
                    p.set(P::EVENTUAL, b.contains(P::EVENTUAL));
                    p.remove(P::SAFETY);
                    p.set(
                        P::OBLIGATION,
                        a.contains(P::OBLIGATION) && b.contains(P::GUARANTEE),
                    );
                    p.set(
                        P::RECURRENCE,
                        a.contains(P::RECURRENCE) && b.contains(P::GUARANTEE),
                    );
                }
                Op::R => {
                    p.set(P::UNIVERSAL, b.contains(P::UNIVERSAL));
                    p.remove(P::GUARANTEE);
                    p.set(
                        P::OBLIGATION,
                        a.contains(P::OBLIGATION) && b.contains(P::SAFETY),
                    );
                    p.set(
                        P::PERSISTENCE,
                        a.contains(P::PERSISTENCE) && b.contains(P::SAFETY),
                    );
                }
                Op::W => {
                    p.remove(P::GUARANTEE);
                    let safety = p.contains(P::SAFETY);
                    p.set(P::OBLIGATION | P::PERSISTENCE, safety);
                }
                _ => {
                    p.remove(P::SAFETY);
                    let guarantee = p.contains(P::GUARANTEE);
                    p.set(P::OBLIGATION | P::RECURRENCE, guarantee);
                }
            }
        }
        Op::EConcat | Op::EConcatMarked | Op::UConcat => {
            let (r, f) = (child(0), child(1));
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::LTL
                    | P::SERE
                    | P::FINITE
                    | P::EVENTUAL
                    | P::UNIVERSAL
                    | P::ACCEPTS_EWORD
                    | P::CLASSES,
            );
            p.insert(P::PSL);
            let finite = r.contains(P::FINITE);
            if op == Op::UConcat {
                p.set(P::SAFETY, f.contains(P::SAFETY));
                p.set(P::RECURRENCE, f.contains(P::RECURRENCE));
                if finite {
                    p.set(P::GUARANTEE, f.contains(P::GUARANTEE));
                    p.set(P::OBLIGATION, f.contains(P::OBLIGATION));
                    p.set(P::PERSISTENCE, f.contains(P::PERSISTENCE));
                } else {
                    p.set(P::OBLIGATION | P::PERSISTENCE, f.contains(P::SAFETY));
                }
            } else {
                p.set(P::GUARANTEE, f.contains(P::GUARANTEE));
                p.set(P::PERSISTENCE, f.contains(P::PERSISTENCE));
                if finite {
                    p.set(P::SAFETY, f.contains(P::SAFETY));
                    p.set(P::OBLIGATION, f.contains(P::OBLIGATION));
                    p.set(P::RECURRENCE, f.contains(P::RECURRENCE));
                } else {
                    p.set(P::OBLIGATION | P::RECURRENCE, f.contains(P::GUARANTEE));
                }
            }
            if op == Op::EConcatMarked {
                p.remove(P::NOT_MARKED);
            }
            if r.contains(P::BOOLEAN) {
                p.remove(P::SYNTACTIC_SI);
            }
        }
        Op::And | Op::Or => {
            p.remove(P::ACCEPTS_EWORD);
        }
        Op::OrRat | Op::AndRat | Op::AndNLM | Op::Concat | Op::Fusion => {
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::LTL
                    | P::PSL
                    | P::EVENTUAL
                    | P::UNIVERSAL
                    | P::CLASSES,
            );
            let accepts = match op {
                Op::OrRat => children.iter().any(|c| c.accepts_eword()),
                Op::Fusion => false,
                _ => all.contains(P::ACCEPTS_EWORD),
            };
            p.set(P::ACCEPTS_EWORD, accepts);
            if matches!(op, Op::Concat | Op::Fusion) && children.iter().any(|c| c.is_boolean())
            {
                p.remove(P::SYNTACTIC_SI);
            }
        }
        Op::Star | Op::FStar => {
            let c = child(0);
            p.remove(
                P::BOOLEAN
                    | P::SUGAR_FREE_BOOLEAN
                    | P::LTL
                    | P::PSL
                    | P::EVENTUAL
                    | P::UNIVERSAL
                    | P::CLASSES,
            );
            p.set(P::FINITE, c.contains(P::FINITE) && max != UNBOUNDED);
            let accepts = op == Op::Star && (min == 0 || c.contains(P::ACCEPTS_EWORD));
            p.set(P::ACCEPTS_EWORD, accepts);
            if c.contains(P::BOOLEAN) && !(min <= 1 && max == UNBOUNDED) {
                p.remove(P::SYNTACTIC_SI);
            }
        }
    }

    if !p.contains(P::BOOLEAN) {
        p.remove(P::SUGAR_FREE_BOOLEAN);
    }
    p
}
