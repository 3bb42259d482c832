//! Formula handles.
//!
//! Role
//! - [`Formula`] is a cheap, reference-counted handle onto an immutable node
//!   owned by a [`FormulaStore`](crate::store::FormulaStore).
//! - Because nodes are hash-consed, two handles are equal iff they point to
//!   the same node. Handles from different stores are never equal, even when
//!   their ids coincide.
//! - `Formula` does not implement `Ord`; sort by [`Formula::id`] or with
//!   [`canonical_cmp`](crate::order::canonical_cmp) instead.
//!
//! Lifetime
//! - Cloning a handle increments the node's reference count; dropping the
//!   last handle destroys the node and removes it from the store's table.
//!   The three constants are held by the store itself and never go away
//!   while it lives.
use std::{
    hash::{Hash, Hasher},
    ptr,
    sync::{Arc, Weak},
};

use smallvec::SmallVec;

use crate::{
    op::Op,
    props::Props,
    store::{StoreInner, UNBOUNDED},
};

/// Interned node. Never exposed directly, only through [`Formula`].
pub(crate) struct Node {
    pub(crate) op: Op,
    pub(crate) min: u8,
    pub(crate) max: u8,
    pub(crate) id: u64,
    pub(crate) hash: u64,
    pub(crate) props: Props,
    pub(crate) name: Option<Box<str>>,
    pub(crate) children: SmallVec<Formula, 2>,
    pub(crate) store: Weak<StoreInner>,
}

impl Node {
    /// Whether this node has exactly the given canonical key.
    pub(crate) fn has_key(
        &self,
        op: Op,
        name: Option<&str>,
        children: &[Formula],
        min: u8,
        max: u8,
    ) -> bool {
        self.op == op
            && self.min == min
            && self.max == max
            && self.name.as_deref() == name
            && self.children.len() == children.len()
            && self
                .children
                .iter()
                .zip(children)
                .all(|(a, b)| Arc::ptr_eq(&a.0, &b.0))
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Children are released after this returns, outside of the table lock.
        if let Some(store) = self.store.upgrade() {
            store.forget(self.hash, ptr::from_ref(self));
        }
    }
}

/// Handle onto a canonical formula node.
#[derive(Clone)]
pub struct Formula(pub(crate) Arc<Node>);

impl Formula {
    /// Operator of the root node.
    #[inline]
    pub fn op(&self) -> Op {
        self.0.op
    }

    /// Store-wide unique identifier of the node.
    ///
    /// Ids are handed out in creation order and never reused.
    #[inline]
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Ordered operands of the root node.
    #[inline]
    pub fn children(&self) -> &[Formula] {
        &self.0.children
    }

    /// The `i`-th operand.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    #[inline]
    pub fn nth(&self, i: usize) -> &Formula {
        &self.0.children[i]
    }

    /// Number of operands of the root node.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.children.len()
    }

    /// True for constants and atomic propositions.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Lower bound of a bounded repetition, `0` for other nodes.
    #[inline]
    pub fn min(&self) -> u8 {
        self.0.min
    }

    /// Upper bound of a bounded repetition; [`UNBOUNDED`] means no bound.
    #[inline]
    pub fn max(&self) -> u8 {
        self.0.max
    }

    /// Name of an atomic proposition.
    #[inline]
    pub fn ap_name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// The full property set of the node.
    #[inline]
    pub fn props(&self) -> Props {
        self.0.props
    }

    #[inline]
    pub fn is(&self, op: Op) -> bool {
        self.0.op == op
    }

    #[inline]
    pub fn is_any(&self, ops: &[Op]) -> bool {
        ops.contains(&self.0.op)
    }

    #[inline]
    pub fn is_tt(&self) -> bool {
        self.is(Op::True)
    }

    #[inline]
    pub fn is_ff(&self) -> bool {
        self.is(Op::False)
    }

    #[inline]
    pub fn is_eword(&self) -> bool {
        self.is(Op::EmptyWord)
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.0.op.is_constant()
    }

    /// An atomic proposition or the negation of one.
    pub fn is_literal(&self) -> bool {
        self.is(Op::Ap) || (self.is(Op::Not) && self.nth(0).is(Op::Ap))
    }

    /// `r[*]`, i.e. a repetition from zero to unbounded.
    pub fn is_kleene_star(&self) -> bool {
        self.is(Op::Star) && self.min() == 0 && self.max() == UNBOUNDED
    }

    /// Operand of a root node with operator `op`, if any.
    pub fn get_child_of(&self, op: Op) -> Option<&Formula> {
        (self.is(op) && self.len() == 1).then(|| self.nth(0))
    }

    /// Follows a chain of unary operators, e.g. `[F, G]` matches `FG(a)` and returns `a`.
    pub fn get_child_of_chain(&self, ops: &[Op]) -> Option<&Formula> {
        ops.iter().try_fold(self, |cur, &op| cur.get_child_of(op))
    }

    /// Whether the formula starts with the given chain of unary operators.
    pub fn is_op_chain(&self, ops: &[Op]) -> bool {
        self.get_child_of_chain(ops).is_some()
    }

    /// Boolean operands of an n-ary node, in operand order.
    pub fn boolean_operands(&self) -> impl Iterator<Item = &Formula> {
        self.children().iter().filter(|c| c.is_boolean())
    }

    #[inline]
    fn has(&self, flags: Props) -> bool {
        self.0.props.contains(flags)
    }

    pub fn is_boolean(&self) -> bool {
        self.has(Props::BOOLEAN)
    }

    pub fn is_sugar_free_boolean(&self) -> bool {
        self.has(Props::SUGAR_FREE_BOOLEAN)
    }

    /// Negations only appear directly above atomic propositions.
    pub fn is_in_nenoform(&self) -> bool {
        self.has(Props::IN_NNF)
    }

    pub fn is_syntactic_stutter_invariant(&self) -> bool {
        self.has(Props::SYNTACTIC_SI)
    }

    pub fn is_sugar_free_ltl(&self) -> bool {
        self.has(Props::SUGAR_FREE_LTL)
    }

    pub fn is_ltl_formula(&self) -> bool {
        self.has(Props::LTL)
    }

    pub fn is_psl_formula(&self) -> bool {
        self.has(Props::PSL)
    }

    pub fn is_sere_formula(&self) -> bool {
        self.has(Props::SERE)
    }

    pub fn is_finite(&self) -> bool {
        self.has(Props::FINITE)
    }

    /// Purely eventual formula: `f` is equivalent to `F f`.
    pub fn is_eventual(&self) -> bool {
        self.has(Props::EVENTUAL)
    }

    /// Purely universal formula: `f` is equivalent to `G f`.
    pub fn is_universal(&self) -> bool {
        self.has(Props::UNIVERSAL)
    }

    /// Both purely eventual and purely universal.
    pub fn is_eventual_universal(&self) -> bool {
        self.has(Props::EVENTUAL | Props::UNIVERSAL)
    }

    pub fn is_syntactic_safety(&self) -> bool {
        self.has(Props::SAFETY)
    }

    pub fn is_syntactic_guarantee(&self) -> bool {
        self.has(Props::GUARANTEE)
    }

    pub fn is_syntactic_obligation(&self) -> bool {
        self.has(Props::OBLIGATION)
    }

    pub fn is_syntactic_recurrence(&self) -> bool {
        self.has(Props::RECURRENCE)
    }

    pub fn is_syntactic_persistence(&self) -> bool {
        self.has(Props::PERSISTENCE)
    }

    /// A marked operator occurs somewhere in the formula.
    pub fn is_marked(&self) -> bool {
        !self.has(Props::NOT_MARKED)
    }

    pub fn accepts_eword(&self) -> bool {
        self.has(Props::ACCEPTS_EWORD)
    }

    pub fn has_lbt_atomic_props(&self) -> bool {
        self.has(Props::LBT_APS)
    }

    pub fn has_spin_atomic_props(&self) -> bool {
        self.has(Props::SPIN_APS)
    }

    /// Pre-order walk over the syntax tree.
    ///
    /// The visitor returns `false` to skip the children of the visited node.
    /// Shared subterms are visited once per occurrence.
    pub fn walk(&self, mut visit: impl FnMut(&Formula) -> bool) {
        let mut stack: SmallVec<&Formula, 16> = SmallVec::new();
        stack.push(self);
        while let Some(f) = stack.pop() {
            if visit(f) {
                // Reverse so that the leftmost child is visited first.
                stack.extend(f.children().iter().rev());
            }
        }
    }

    /// Number of nodes of the syntax tree, counting shared subterms at each occurrence.
    pub fn size(&self) -> usize {
        let mut n = 0;
        self.walk(|_| {
            n += 1;
            true
        });
        n
    }

    /// Atomic propositions occurring in the formula, ordered by id, without duplicates.
    pub fn atomic_props(&self) -> Vec<Formula> {
        let mut aps = Vec::new();
        self.walk(|f| {
            if f.is(Op::Ap) {
                aps.push(f.clone());
            }
            !f.is_leaf()
        });
        aps.sort_unstable_by_key(Formula::id);
        aps.dedup();
        aps
    }
}

impl PartialEq for Formula {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state)
    }
}

impl std::fmt::Debug for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.id(), self)
    }
}
