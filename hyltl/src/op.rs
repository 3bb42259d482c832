//! Operator enumeration shared by every node of the store.
//!
//! The discriminant order is stable; `Op::from_repr` maps it back.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr, IntoStaticStr};

/// Operator tag of a formula node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Op {
    /// The constant false (`0`).
    False,
    /// The constant true (`1`).
    True,
    /// The empty word of SERE (`[*0]`).
    EmptyWord,
    /// Atomic proposition.
    Ap,
    Not,
    /// Next.
    X,
    /// Eventually.
    F,
    /// Globally.
    G,
    /// Weak closure of a SERE, `{r}`.
    Closure,
    /// Negated closure, `!{r}`.
    NegClosure,
    /// Marked variant of [`Op::NegClosure`] used by translators.
    NegClosureMarked,
    Xor,
    Implies,
    Equiv,
    /// Strong until.
    U,
    /// Weak release.
    R,
    /// Weak until.
    W,
    /// Strong release.
    M,
    /// Existential suffix implication, `{r}<>-> f`.
    EConcat,
    /// Marked variant of [`Op::EConcat`].
    EConcatMarked,
    /// Universal suffix implication, `{r}[]-> f`.
    UConcat,
    Or,
    /// Rational (SERE) disjunction.
    OrRat,
    And,
    /// Length-matching rational conjunction, `r && s`.
    AndRat,
    /// Non-length-matching rational conjunction, `r & s`.
    AndNLM,
    /// SERE concatenation, `r ; s`.
    Concat,
    /// SERE fusion, `r : s`.
    Fusion,
    /// Bounded repetition, `r[*i..j]`.
    Star,
    /// Bounded fusion repetition, `r[:*i..j]`.
    FStar,
}

/// Shape of the children carried by a node of a given operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Constant,
    Atomic,
    Unary,
    Binary,
    Nary,
    Bounded,
}

impl Op {
    /// Shape of the operands expected by this operator.
    pub const fn arity(self) -> Arity {
        use Op::*;
        match self {
            False | True | EmptyWord => Arity::Constant,
            Ap => Arity::Atomic,
            Not | X | F | G | Closure | NegClosure | NegClosureMarked => Arity::Unary,
            Xor | Implies | Equiv | U | R | W | M | EConcat | EConcatMarked | UConcat => {
                Arity::Binary
            }
            Or | OrRat | And | AndRat | AndNLM | Concat | Fusion => Arity::Nary,
            Star | FStar => Arity::Bounded,
        }
    }

    #[inline]
    pub const fn is_constant(self) -> bool {
        matches!(self.arity(), Arity::Constant)
    }

    #[inline]
    pub const fn is_unary(self) -> bool {
        matches!(self.arity(), Arity::Unary)
    }

    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(self.arity(), Arity::Binary)
    }

    #[inline]
    pub const fn is_nary(self) -> bool {
        matches!(self.arity(), Arity::Nary)
    }

    #[inline]
    pub const fn is_bounded(self) -> bool {
        matches!(self.arity(), Arity::Bounded)
    }

    /// Operators whose operand list is kept in canonical order.
    ///
    /// This covers the n-ary conjunctions and disjunctions; the binary
    /// [`Op::Xor`] and [`Op::Equiv`] also have their two operands sorted.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            Op::Or | Op::OrRat | Op::And | Op::AndRat | Op::AndNLM | Op::Xor | Op::Equiv
        )
    }

    /// The four binary temporal operators `U`, `R`, `W` and `M`.
    pub const fn is_until_like(self) -> bool {
        matches!(self, Op::U | Op::R | Op::W | Op::M)
    }

    /// Operators that only make sense inside a SERE.
    pub const fn is_sere_only(self) -> bool {
        matches!(
            self,
            Op::EmptyWord
                | Op::OrRat
                | Op::AndRat
                | Op::AndNLM
                | Op::Concat
                | Op::Fusion
                | Op::Star
                | Op::FStar
        )
    }

    /// Short operator name, as used in debug output.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
