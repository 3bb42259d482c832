//! Hyltl: hash-consed LTL/PSL/SERE formulas and their simplification.
//!
//! Every formula lives in a [`FormulaStore`](store::FormulaStore) that
//! guarantees maximal sharing: structurally identical formulas are the same
//! node, so equality is an id comparison and every derived property is
//! computed once, when the node is created.
//!
//! Layers
//!  - [`store`] builds formulas, folding trivial identities and sorting the
//!    operands of commutative operators into a canonical order.
//!  - [`formula`] exposes the handles and the property queries (Boolean,
//!    LTL, PSL, SERE, eventual, universal, temporal hierarchy classes, ...).
//!  - [`simplify`] rewrites formulas into smaller equivalent ones, and
//!    provides the negation normal form and a syntactic implication check.
//!  - [`pretty`] prints formulas in the usual infix notation.
//!
//! Example
//! ```
//! use hyltl::prelude::*;
//!
//! let store = FormulaStore::new();
//! let (a, b) = (store.ap("a"), store.ap("b"));
//!
//! // !(a U b), then its negation normal form.
//! let f = store.not(store.u(a.clone(), b.clone()));
//! let mut simplifier = Simplifier::new(store.clone(), SimplifierOptions::default());
//! let nnf = simplifier.negative_normal_form(&f, false).unwrap();
//! assert_eq!(nnf, store.r(store.not(a), store.not(b)));
//! assert_eq!(nnf.to_string(), "!a R !b");
//! ```

/// Error types shared by the constructors.
pub mod error;
/// Handles onto interned nodes and their property queries.
pub mod formula;
/// Operator enumeration.
pub mod op;
/// Boolean and containment oracles.
pub mod oracle;
/// Canonical operand order.
pub mod order;
/// Pretty printer.
pub mod pretty;
/// Property flags computed at construction time.
pub mod props;
/// Rewriting engine.
pub mod simplify;
/// The hash-consing store and its constructors.
pub mod store;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::error::{FormulaError, FormulaResult};
    pub use crate::formula::Formula;
    pub use crate::op::Op;
    pub use crate::oracle::{BooleanOracle, ContainmentOracle, TruthTableOracle};
    pub use crate::pretty::PrettyFormula;
    pub use crate::props::Props;
    pub use crate::simplify::{Simplifier, SimplifierOptions};
    pub use crate::store::{FormulaStore, UNBOUNDED};
}
