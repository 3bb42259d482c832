#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rule families enabled in a [`Simplifier`](super::Simplifier).
///
/// The default enables the cheap syntactic rules (`reduce_basics`,
/// `synt_impl`, `event_univ`) and leaves the containment-based ones off.
///
/// Example:
/// ```rust
/// # use hyltl::simplify::SimplifierOptions;
/// let opts = SimplifierOptions::default().with_synt_impl(false);
/// assert!(opts.reduce_basics);
/// assert!(!opts.synt_impl);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimplifierOptions {
    /// Trivial identities, `X` pushdown and the And/Or splitting pass.
    pub reduce_basics: bool,
    /// Rewrites justified by the syntactic implication check.
    pub synt_impl: bool,
    /// Absorption of purely eventual and purely universal subformulas.
    pub event_univ: bool,
    /// Strengthen implication checks with the containment oracle.
    pub containment_checks: bool,
    /// Also compare compounds against their own operands with the containment oracle.
    pub containment_checks_stronger: bool,
    /// Leave Boolean subformulas untouched when computing negation normal forms.
    pub nenoform_stop_on_boolean: bool,
}

impl Default for SimplifierOptions {
    fn default() -> Self {
        Self {
            reduce_basics: true,
            synt_impl: true,
            event_univ: true,
            containment_checks: false,
            containment_checks_stronger: false,
            nenoform_stop_on_boolean: false,
        }
    }
}

impl SimplifierOptions {
    /// Every rule family disabled; only normalization remains.
    pub fn none() -> Self {
        Self {
            reduce_basics: false,
            synt_impl: false,
            event_univ: false,
            containment_checks: false,
            containment_checks_stronger: false,
            nenoform_stop_on_boolean: false,
        }
    }

    /// Every rule family enabled.
    pub fn all() -> Self {
        Self {
            reduce_basics: true,
            synt_impl: true,
            event_univ: true,
            containment_checks: true,
            containment_checks_stronger: true,
            nenoform_stop_on_boolean: false,
        }
    }

    pub fn with_reduce_basics(mut self, value: bool) -> Self {
        self.reduce_basics = value;
        self
    }

    pub fn with_synt_impl(mut self, value: bool) -> Self {
        self.synt_impl = value;
        self
    }

    pub fn with_event_univ(mut self, value: bool) -> Self {
        self.event_univ = value;
        self
    }

    pub fn with_containment_checks(mut self, value: bool) -> Self {
        self.containment_checks = value;
        self
    }

    pub fn with_containment_checks_stronger(mut self, value: bool) -> Self {
        self.containment_checks_stronger = value;
        self
    }

    pub fn with_nenoform_stop_on_boolean(mut self, value: bool) -> Self {
        self.nenoform_stop_on_boolean = value;
        self
    }
}
