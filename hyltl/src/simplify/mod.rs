//! Algebraic simplification of formulas.
//!
//! Role
//! - [`Simplifier`] rewrites a formula into an equivalent, usually smaller one.
//!   It owns a cache of every intermediate result, so reusing the same
//!   instance for many formulas built in the same store is cheap.
//! - It also exposes the two services the rewrite rules are built upon: the
//!   negation normal form and a syntactic (sound, incomplete) implication check.
//!
//! Rule families are selected with [`SimplifierOptions`]. Rules that need a
//! semantic decision consult the installed oracles (see [`crate::oracle`]).
//!
//! Example
//! ```rust
//! use hyltl::prelude::*;
//!
//! let store = FormulaStore::new();
//! let (a, b, c) = (store.ap("a"), store.ap("b"), store.ap("c"));
//! let f = store
//!     .and([store.x(a.clone()), store.x(b.clone()), store.g(c.clone())])
//!     .unwrap();
//!
//! // X(a) & X(b) & G(c) becomes X(a & b) & G(c)
//! let mut simplifier = Simplifier::new(store.clone(), SimplifierOptions::default());
//! let simplified = simplifier.simplify(&f).unwrap();
//! let expected = store
//!     .and([store.x(store.and([a, b]).unwrap()), store.g(c)])
//!     .unwrap();
//! assert_eq!(simplified, expected);
//! assert_eq!(simplifier.simplify(&simplified).unwrap(), simplified);
//! ```
use std::collections::HashMap;

use log::{trace, warn};

use crate::{
    error::FormulaResult,
    formula::Formula,
    oracle::{BooleanOracle, ContainmentOracle, TruthTableOracle},
    store::FormulaStore,
};

mod implication;
mod nnf;
mod options;
mod rules;
mod split;

pub use options::SimplifierOptions;

/// Upper bound on the number of rewriting passes of [`Simplifier::simplify`].
const MAX_PASSES: usize = 64;

/// Memoized results, owned by one simplifier.
#[derive(Default)]
struct Cache {
    simplified: HashMap<Formula, Formula>,
    nnf: HashMap<(Formula, bool), Formula>,
    implies: HashMap<(Formula, Formula), bool>,
    implies_neg: HashMap<(Formula, Formula, bool), bool>,
}

impl Cache {
    fn len(&self) -> usize {
        self.simplified.len() + self.nnf.len() + self.implies.len() + self.implies_neg.len()
    }
}

/// Rewriting engine over the formulas of one [`FormulaStore`].
pub struct Simplifier {
    store: FormulaStore,
    options: SimplifierOptions,
    cache: Cache,
    boolean: Box<dyn BooleanOracle>,
    containment: Option<Box<dyn ContainmentOracle>>,
    warned: bool,
}

impl Simplifier {
    /// Create a simplifier using a [`TruthTableOracle`] for Boolean
    /// implications and no containment oracle.
    pub fn new(store: FormulaStore, options: SimplifierOptions) -> Self {
        Self {
            store,
            options,
            cache: Cache::default(),
            boolean: Box::new(TruthTableOracle::default()),
            containment: None,
            warned: false,
        }
    }

    /// Replace the Boolean implication oracle.
    pub fn with_boolean_oracle(mut self, oracle: impl BooleanOracle + 'static) -> Self {
        self.boolean = Box::new(oracle);
        self.cache = Cache::default();
        self
    }

    /// Install the language containment oracle used by the `containment_checks` options.
    pub fn with_containment_oracle(mut self, oracle: impl ContainmentOracle + 'static) -> Self {
        self.containment = Some(Box::new(oracle));
        self.cache = Cache::default();
        self
    }

    #[inline]
    pub fn options(&self) -> &SimplifierOptions {
        &self.options
    }

    #[inline]
    pub fn store(&self) -> &FormulaStore {
        &self.store
    }

    /// Drop every cached result, releasing the handles it holds.
    pub fn clear_cache(&mut self) {
        trace!("Clearing simplifier cache ({} entries)", self.cache.len());
        self.cache = Cache::default();
    }

    /// Containment oracle, if both installed and enabled by the options.
    fn containment(&self) -> Option<&dyn ContainmentOracle> {
        if self.options.containment_checks || self.options.containment_checks_stronger {
            self.containment.as_deref()
        } else {
            None
        }
    }

    #[track_caller]
    fn check_owned(&self, f: &Formula) {
        assert!(
            self.store.owns(f),
            "formula #{} ({}) was not built by the simplifier's store",
            f.id(),
            f
        );
    }

    fn check_oracles(&mut self) {
        let wanted = self.options.containment_checks || self.options.containment_checks_stronger;
        if wanted && self.containment.is_none() && !self.warned {
            warn!("Containment checks requested without a containment oracle; they are disabled.");
            self.warned = true;
        }
    }

    /// Negation normal form of `f`, or of `!f` when `negated` is set.
    ///
    /// The result only has negations directly above atomic propositions
    /// (unless `nenoform_stop_on_boolean` is set, in which case Boolean
    /// subformulas are left untouched).
    ///
    /// # Panics
    /// Panics if `f` belongs to another store, as do the other entry points.
    pub fn negative_normal_form(&mut self, f: &Formula, negated: bool) -> FormulaResult<Formula> {
        self.check_owned(f);
        self.nnf(f, negated)
    }

    /// Simplify `f`.
    ///
    /// Rewriting passes are applied until a fixpoint is reached, so the
    /// result is a fixpoint itself: simplifying it again returns the very
    /// same node.
    pub fn simplify(&mut self, f: &Formula) -> FormulaResult<Formula> {
        self.check_owned(f);
        self.check_oracles();
        let mut current = f.clone();
        for pass in 0..MAX_PASSES {
            let input = if current.is_in_nenoform() {
                current.clone()
            } else {
                self.nnf(&current, false)?
            };
            let next = self.rewrite(&input)?;
            if next == current {
                return Ok(next);
            }
            trace!("Simplification pass {}: {} => {}", pass, current, next);
            current = next;
        }
        warn!(
            "Simplification of {} stopped after {} passes without reaching a fixpoint",
            f, MAX_PASSES
        );
        Ok(current)
    }

    /// Whether `f` syntactically implies `g`.
    ///
    /// A `true` answer is always correct; `false` only means no rule applied.
    pub fn syntactic_implication(&mut self, f: &Formula, g: &Formula) -> bool {
        self.check_owned(f);
        self.check_owned(g);
        self.implies(f, g)
    }

    /// `f ⇒ !g` when `right` is set, `!f ⇒ g` otherwise.
    pub fn syntactic_implication_neg(&mut self, f: &Formula, g: &Formula, right: bool) -> bool {
        self.check_owned(f);
        self.check_owned(g);
        self.implies_neg(f, g, right)
    }
}
