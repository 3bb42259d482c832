//! Node store: the hash-consing table behind every [`Formula`].
//!
//! Every constructor goes through the same steps:
//!  1. operator-specific local folding (constants, idempotence, flattening, ...);
//!  2. canonical sorting of commutative operands (see [`crate::order`]);
//!  3. property inference (see [`crate::props`]);
//!  4. lookup in the table, inserting a fresh node with the next id on a miss.
//!
//! The table only keeps weak references: nodes are owned by the handles that
//! point to them and remove themselves from the table when the last handle is
//! dropped. The constants `0`, `1` and `[*0]` are owned by the store and live
//! as long as it does.
//!
//! # A note on concurrency
//! A [`FormulaStore`] is a cheap clonable handle (`Arc`) that can be shared
//! across threads. Lookups and insertions are serialized by a single mutex.
//! Dropping a node also takes that mutex, so the store never drops a handle
//! while holding it.
//!
//! # About hash collisions
//! Buckets are keyed by a 64-bit hash of the canonical key and candidates are
//! compared structurally, so collisions only cost a few extra comparisons.
//! They are reported at `info` level since they are expected to be extremely
//! rare.
use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    ptr,
    sync::{Arc, Weak},
};

use log::{debug, info};
use parking_lot::Mutex;
use smallvec::{SmallVec, smallvec};

use crate::{
    error::{FormulaError, FormulaResult},
    formula::{Formula, Node},
    op::Op,
    order,
    props::infer,
};

/// Upper bound value meaning "no upper bound" for bounded repetitions.
pub const UNBOUNDED: u8 = u8::MAX;

/// Largest number of operands an n-ary node can hold.
pub const MAX_OPERANDS: usize = u16::MAX as usize;

#[derive(Default)]
struct Table {
    buckets: HashMap<u64, SmallVec<Weak<Node>, 1>>,
    next_id: u64,
    live: usize,
}

pub(crate) struct StoreInner {
    table: Mutex<Table>,
    ff: Formula,
    tt: Formula,
    eword: Formula,
}

impl StoreInner {
    /// Remove the table entry of a node being destroyed.
    pub(crate) fn forget(&self, hash: u64, node: *const Node) {
        let mut guard = self.table.lock();
        let Table { buckets, live, .. } = &mut *guard;
        if let Some(bucket) = buckets.get_mut(&hash) {
            let before = bucket.len();
            bucket.retain(|w| !ptr::eq(w.as_ptr(), node));
            *live -= before - bucket.len();
            if bucket.is_empty() {
                buckets.remove(&hash);
            }
        }
    }
}

fn constant(op: Op, id: u64) -> Formula {
    Formula(Arc::new(Node {
        op,
        min: 0,
        max: 0,
        id,
        hash: 0,
        props: infer(op, None, &[], 0, 0),
        name: None,
        children: SmallVec::new(),
        store: Weak::new(),
    }))
}

fn key_hash(op: Op, name: Option<&str>, children: &[Formula], min: u8, max: u8) -> u64 {
    let mut hasher = DefaultHasher::new();
    (op as u8).hash(&mut hasher);
    min.hash(&mut hasher);
    max.hash(&mut hasher);
    name.hash(&mut hasher);
    for c in children {
        c.id().hash(&mut hasher);
    }
    hasher.finish()
}

/// Bounds of `r[*i..j][*k..l]` folded into a single repetition of `r`.
///
/// Counts of `r` reachable with `n` outer iterations form `[n*i, n*j]`. The
/// union over `n` in `k..=l` is an interval iff the first gap closes, that is
/// `i*(k+1) <= j*k + 1`. `None` when it does not, or when a folded bound does
/// not fit.
fn nested_star_bounds(i: u8, j: u8, k: u8, l: u8) -> Option<(u8, u8)> {
    let (i, j, k, l) = (i as u32, j as u32, k as u32, l as u32);
    let unbounded = UNBOUNDED as u32;
    let contiguous = if k == l {
        true
    } else if j == unbounded {
        k >= 1 || i <= 1
    } else {
        i * (k + 1) <= j * k + 1
    };
    if !contiguous {
        return None;
    }
    let lo = i * k;
    let hi = if j == unbounded || l == unbounded {
        unbounded
    } else {
        j * l
    };
    if lo >= unbounded || (hi >= unbounded && j != unbounded && l != unbounded) {
        return None;
    }
    Some((lo as u8, hi as u8))
}

/// Context object owning the unicity table.
///
/// Example:
/// ```rust
/// # use hyltl::prelude::*;
/// let store = FormulaStore::new();
/// let a = store.ap("a");
/// let b = store.ap("b");
/// let f1 = store.and([a.clone(), b.clone()]).unwrap();
/// let f2 = store.and([b, a]).unwrap();
/// assert_eq!(f1, f2);
/// assert_eq!(f1.to_string(), "a & b");
/// ```
#[derive(Clone)]
pub struct FormulaStore {
    inner: Arc<StoreInner>,
}

impl Default for FormulaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaStore {
    /// Create an empty store holding only the three constants.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                table: Mutex::new(Table {
                    next_id: 3,
                    ..Default::default()
                }),
                ff: constant(Op::False, 0),
                tt: constant(Op::True, 1),
                eword: constant(Op::EmptyWord, 2),
            }),
        }
    }

    /// Number of live nodes, constants included.
    pub fn live_nodes(&self) -> usize {
        self.inner.table.lock().live + 3
    }

    /// Whether both handles share the same table.
    pub fn same_store(&self, other: &FormulaStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn tt(&self) -> Formula {
        self.inner.tt.clone()
    }

    pub fn ff(&self) -> Formula {
        self.inner.ff.clone()
    }

    pub fn eword(&self) -> Formula {
        self.inner.eword.clone()
    }

    /// `1` or `0`.
    pub fn constant(&self, value: bool) -> Formula {
        if value { self.tt() } else { self.ff() }
    }

    /// Whether `f` was built by this store (constants included).
    ///
    /// Ids are only unique within one store, so a store never mixes its
    /// nodes with those of another one.
    pub fn owns(&self, f: &Formula) -> bool {
        let inner = &*self.inner;
        ptr::eq(f.0.store.as_ptr(), Arc::as_ptr(&self.inner))
            || Arc::ptr_eq(&f.0, &inner.ff.0)
            || Arc::ptr_eq(&f.0, &inner.tt.0)
            || Arc::ptr_eq(&f.0, &inner.eword.0)
    }

    #[inline]
    #[track_caller]
    fn check_owned(&self, f: &Formula) {
        assert!(self.owns(f), "formula #{} ({}) belongs to another store", f.id(), f);
    }

    fn intern(
        &self,
        op: Op,
        name: Option<&str>,
        children: SmallVec<Formula, 2>,
        min: u8,
        max: u8,
    ) -> Formula {
        let hash = key_hash(op, name, &children, min, max);

        // Candidates upgraded during the lookup are released after the lock.
        let mut released: SmallVec<Formula, 2> = SmallVec::new();
        let mut table = self.inner.table.lock();

        let mut collided = false;
        let mut found = None;
        if let Some(bucket) = table.buckets.get(&hash) {
            for weak in bucket.iter() {
                // Dead entries belong to nodes being dropped right now.
                let Some(node) = weak.upgrade() else {
                    continue;
                };
                if node.has_key(op, name, &children, min, max) {
                    found = Some(node);
                    break;
                }
                collided = true;
                released.push(Formula(node));
            }
        }
        if let Some(node) = found {
            drop(table);
            return Formula(node);
        }

        let id = table.next_id;
        table.next_id += 1;
        let node = Arc::new(Node {
            op,
            min,
            max,
            id,
            hash,
            props: infer(op, name, &children, min, max),
            name: name.map(Box::from),
            children,
            store: Arc::downgrade(&self.inner),
        });
        table.buckets.entry(hash).or_default().push(Arc::downgrade(&node));
        table.live += 1;
        drop(table);

        let formula = Formula(node);
        if collided {
            info!(
                "Detected an hash collision on hash 0x{:016x}. The following formulas collided:\n{}",
                hash,
                released
                    .iter()
                    .chain(std::iter::once(&formula))
                    .map(|f| format!(" - #{} -> {}", f.id(), f))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        } else {
            debug!("New formula #{} registered: {}", id, formula);
        }
        formula
    }

    /// Atomic proposition `name`.
    pub fn ap(&self, name: impl AsRef<str>) -> Formula {
        self.intern(Op::Ap, Some(name.as_ref()), SmallVec::new(), 0, 0)
    }

    /// Unary node.
    ///
    /// Local folding:
    /// - `!1 = 0`, `!0 = 1`, `!!a = a`, `![*0] = 1[+]`
    /// - `X1 = 1`, `X0 = 0`
    /// - `F` and `G` of a constant is that constant, `FFa = Fa`, `GGa = Ga`,
    ///   `F(GFa) = GFa`, `G(FGa) = FGa`
    /// - `{b} = b` for a Boolean `b`, `{[*0]} = 0`
    /// - `!{b} = !b` for a Boolean `b`, `!{[*0]} = 1`
    ///
    /// # Panics
    /// Panics if `op` is not a unary operator, or if `child` belongs to
    /// another store.
    pub fn unop(&self, op: Op, child: Formula) -> Formula {
        assert!(op.is_unary(), "`{op:?}` is not a unary operator");
        self.check_owned(&child);
        match op {
            Op::Not => match child.op() {
                Op::True => return self.ff(),
                Op::False => return self.tt(),
                Op::Not => return child.nth(0).clone(),
                Op::EmptyWord => return self.repeat(Op::Star, self.tt(), 1, UNBOUNDED),
                _ => {}
            },
            Op::X => {
                if child.is_tt() || child.is_ff() {
                    return child;
                }
            }
            Op::F | Op::G => {
                let dual = if op == Op::F { Op::G } else { Op::F };
                if child.is_tt()
                    || child.is_ff()
                    || child.is(op)
                    || child.get_child_of_chain(&[dual, op]).is_some()
                {
                    return child;
                }
            }
            Op::Closure => {
                if child.is_eword() {
                    return self.ff();
                }
                if child.is_boolean() {
                    return child;
                }
            }
            Op::NegClosure | Op::NegClosureMarked => {
                if child.is_eword() {
                    return self.tt();
                }
                if child.is_boolean() {
                    return self.not(child);
                }
            }
            _ => unreachable!(),
        }
        self.intern(op, None, smallvec![child], 0, 0)
    }

    /// Binary node.
    ///
    /// `Xor` and `Equiv` are commutative and have their operands sorted.
    /// Local folding removes constants and equal operands where the result is
    /// obvious, e.g. `e U 1 = 1`, `0 U e = e`, `e R e = e`, `1 <>-> e = e`,
    /// `b []-> e = !b | e` for a Boolean `b`.
    ///
    /// # Panics
    /// Panics if `op` is not a binary operator, or if an operand belongs to
    /// another store.
    pub fn binop(&self, op: Op, left: Formula, right: Formula) -> Formula {
        assert!(op.is_binary(), "`{op:?}` is not a binary operator");
        self.check_owned(&left);
        self.check_owned(&right);
        let (mut a, mut b) = (left, right);
        match op {
            Op::Xor | Op::Equiv => {
                if order::canonical_cmp(&b, &a).is_lt() {
                    std::mem::swap(&mut a, &mut b);
                }
                let equiv = op == Op::Equiv;
                if a.is_tt() {
                    return if equiv { b } else { self.not(b) };
                }
                if a.is_ff() {
                    return if equiv { self.not(b) } else { b };
                }
                if a == b {
                    return self.constant(equiv);
                }
            }
            Op::Implies => {
                if a.is_tt() {
                    return b;
                }
                if a.is_ff() || b.is_tt() || a == b {
                    return self.tt();
                }
                if b.is_ff() {
                    return self.not(a);
                }
            }
            Op::U => {
                if b.is_tt() || b.is_ff() || a.is_ff() || a == b {
                    return b;
                }
            }
            Op::W => {
                if b.is_tt() || a.is_ff() || a == b {
                    return b;
                }
            }
            Op::R => {
                if b.is_tt() || b.is_ff() || a.is_tt() || a == b {
                    return b;
                }
            }
            Op::M => {
                if b.is_ff() || a.is_tt() || a == b {
                    return b;
                }
            }
            Op::EConcat | Op::EConcatMarked => {
                if a.is_tt() {
                    return b;
                }
                if a.is_ff() || a.is_eword() || b.is_ff() {
                    return self.ff();
                }
                if a.is_boolean() {
                    if let Ok(f) = self.multop(Op::And, [a.clone(), b.clone()]) {
                        return f;
                    }
                }
            }
            Op::UConcat => {
                if a.is_tt() {
                    return b;
                }
                if a.is_ff() || a.is_eword() || b.is_tt() {
                    return self.tt();
                }
                if a.is_boolean() {
                    if let Ok(f) = self.multop(Op::Or, [self.not(a.clone()), b.clone()]) {
                        return f;
                    }
                }
            }
            _ => unreachable!(),
        }
        self.intern(op, None, smallvec![a, b], 0, 0)
    }

    /// N-ary node.
    ///
    /// Operands with the same operator are flattened one level, then:
    /// - `And`/`Or`: the absorbing constant wins, the neutral one is dropped;
    /// - `AndRat`/`AndNLM`: `0` is absorbing and `1[*]` is dropped; `AndRat`
    ///   also gathers its Boolean operands under a single `And`;
    /// - `OrRat`: `0` is dropped and Boolean operands are gathered under `Or`;
    /// - `Concat`: `[*0]` is dropped, `0` is absorbing and adjacent
    ///   repetitions of the same operand are merged (`a;a[*2] = a[*3]`);
    /// - `Fusion`: `0` is absorbing.
    ///
    /// Commutative operators are then sorted and deduplicated. An empty list
    /// yields the neutral element of the operator and a single operand is
    /// returned as is.
    ///
    /// # Errors
    /// [`FormulaError::CapacityExceeded`] when more than [`MAX_OPERANDS`]
    /// operands remain.
    ///
    /// # Panics
    /// Panics if `op` is not an n-ary operator, or if an operand belongs to
    /// another store.
    pub fn multop<I>(&self, op: Op, operands: I) -> FormulaResult<Formula>
    where
        I: IntoIterator<Item = Formula>,
    {
        assert!(op.is_nary(), "`{op:?}` is not an n-ary operator");
        let mut flat: Vec<Formula> = Vec::new();
        for f in operands {
            self.check_owned(&f);
            if f.is(op) {
                flat.extend(f.children().iter().cloned());
            } else {
                flat.push(f);
            }
        }

        match op {
            Op::And | Op::Or => {
                let (absorbing, neutral) = if op == Op::And {
                    (Op::False, Op::True)
                } else {
                    (Op::True, Op::False)
                };
                if let Some(f) = flat.iter().find(|f| f.is(absorbing)) {
                    return Ok(f.clone());
                }
                flat.retain(|f| !f.is(neutral));
            }
            Op::AndRat | Op::AndNLM => {
                if flat.iter().any(Formula::is_ff) {
                    return Ok(self.ff());
                }
                flat.retain(|f| !(f.is_kleene_star() && f.nth(0).is_tt()));
                if op == Op::AndRat {
                    flat = self.gather_booleans(Op::And, flat)?;
                }
            }
            Op::OrRat => {
                flat.retain(|f| !f.is_ff());
                flat = self.gather_booleans(Op::Or, flat)?;
            }
            Op::Concat => {
                if flat.iter().any(Formula::is_ff) {
                    return Ok(self.ff());
                }
                flat.retain(|f| !f.is_eword());
                flat = self.merge_repetitions(flat);
            }
            Op::Fusion => {
                if flat.iter().any(Formula::is_ff) {
                    return Ok(self.ff());
                }
            }
            _ => unreachable!(),
        }

        if op.is_commutative() {
            order::canonicalize(&mut flat);
        }

        match flat.len() {
            0 => Ok(self.neutral(op)),
            1 => Ok(flat.swap_remove(0)),
            count if count > MAX_OPERANDS => Err(FormulaError::CapacityExceeded {
                op,
                count,
                max: MAX_OPERANDS,
            }),
            _ => Ok(self.intern(op, None, SmallVec::from_vec(flat), 0, 0)),
        }
    }

    /// Element returned for an empty operand list.
    fn neutral(&self, op: Op) -> Formula {
        match op {
            Op::And | Op::Fusion => self.tt(),
            Op::Or | Op::OrRat => self.ff(),
            Op::Concat => self.eword(),
            _ => self.repeat(Op::Star, self.tt(), 0, UNBOUNDED),
        }
    }

    fn gather_booleans(&self, op: Op, operands: Vec<Formula>) -> FormulaResult<Vec<Formula>> {
        let (booleans, mut rest): (Vec<_>, Vec<_>) =
            operands.into_iter().partition(Formula::is_boolean);
        if booleans.len() < 2 {
            rest.extend(booleans);
            return Ok(rest);
        }
        rest.push(self.multop(op, booleans)?);
        Ok(rest)
    }

    fn merge_repetitions(&self, operands: Vec<Formula>) -> Vec<Formula> {
        fn as_repetition(f: &Formula) -> (&Formula, u8, u8) {
            if f.is(Op::Star) {
                (f.nth(0), f.min(), f.max())
            } else {
                (f, 1, 1)
            }
        }

        let mut merged: Vec<Formula> = Vec::with_capacity(operands.len());
        for f in operands {
            if let Some(last) = merged.last() {
                let (lbase, lmin, lmax) = as_repetition(last);
                let (base, min, max) = as_repetition(&f);
                if lbase == base {
                    let sum_min = lmin as u16 + min as u16;
                    let sum_max = if lmax == UNBOUNDED || max == UNBOUNDED {
                        Some(UNBOUNDED as u16)
                    } else {
                        let s = lmax as u16 + max as u16;
                        (s < UNBOUNDED as u16).then_some(s)
                    };
                    if let (true, Some(sum_max)) = (sum_min < UNBOUNDED as u16, sum_max) {
                        let base = base.clone();
                        let star = self.repeat(Op::Star, base, sum_min as u8, sum_max as u8);
                        if let Some(slot) = merged.last_mut() {
                            *slot = star;
                        }
                        continue;
                    }
                }
            }
            merged.push(f);
        }
        merged
    }

    /// Bounded repetition `child[*min..max]` or `child[:*min..max]`.
    ///
    /// A `max` of [`UNBOUNDED`] means no upper bound. Local folding:
    /// - `0[*0..j] = [*0]`, `0[*i..j] = 0` for `i > 0`, `[*0][*i..j] = [*0]`
    /// - `r[*0] = [*0]`, `r[*1] = r`
    /// - `r[*i..j][*k..l] = r[*ik..jl]` when `i(k+1) <= jk+1`, i.e. when no
    ///   count is skipped (this covers `(r[*])[*i..j] = r[*]`)
    /// - for fusion, `r[:*0] = 1`, `r[:*1] = r`
    ///
    /// # Errors
    /// [`FormulaError::InvalidBounds`] when `min > max`. Bounds are never
    /// swapped.
    ///
    /// # Panics
    /// Panics if `op` is not a bounded repetition operator, or if `child`
    /// belongs to another store.
    pub fn bunop(&self, op: Op, child: Formula, min: u8, max: u8) -> FormulaResult<Formula> {
        assert!(op.is_bounded(), "`{op:?}` is not a bounded repetition");
        if min > max {
            return Err(FormulaError::InvalidBounds { op, min, max });
        }
        Ok(self.repeat(op, child, min, max))
    }

    /// Same as [`Self::bunop`] with already validated bounds.
    fn repeat(&self, op: Op, child: Formula, min: u8, max: u8) -> Formula {
        debug_assert!(min <= max);
        self.check_owned(&child);
        match op {
            Op::Star => {
                if child.is_ff() {
                    return if min == 0 { self.eword() } else { self.ff() };
                }
                if child.is_eword() || max == 0 {
                    return self.eword();
                }
                if min == 1 && max == 1 {
                    return child;
                }
                if child.is(Op::Star) {
                    let (i, j) = (child.min(), child.max());
                    if let Some((lo, hi)) = nested_star_bounds(i, j, min, max) {
                        return self.repeat(Op::Star, child.nth(0).clone(), lo, hi);
                    }
                }
            }
            Op::FStar => {
                if max == 0 {
                    return self.tt();
                }
                if child.is_ff() {
                    return if min == 0 { self.tt() } else { self.ff() };
                }
                if child.is_eword() {
                    return self.eword();
                }
                if min == 1 && max == 1 {
                    return child;
                }
            }
            _ => unreachable!(),
        }
        self.intern(op, None, smallvec![child], min, max)
    }

    /// `b[->min..max]`, the goto repetition, built as `((!b)[*];b)[*min..max]`.
    ///
    /// The usual `b[->]` is `b[->1..]`, i.e. `min = 1` and `max = UNBOUNDED`.
    ///
    /// # Errors
    /// [`FormulaError::InvalidBounds`] when `min > max`.
    ///
    /// # Panics
    /// Panics if `b` is not Boolean.
    pub fn sugar_goto(&self, b: Formula, min: u8, max: u8) -> FormulaResult<Formula> {
        assert!(b.is_boolean(), "goto repetition of the non-Boolean formula {b}");
        let wait = self.kleene(self.not(b.clone()));
        let step = self.multop(Op::Concat, [wait, b])?;
        self.bunop(Op::Star, step, min, max)
    }

    /// `b[=min..max]`, the non-consecutive repetition, built as
    /// `((!b)[*];b)[*min..max];(!b)[*]`.
    ///
    /// The usual `b[=]` is `b[=0..]`.
    ///
    /// # Errors
    /// [`FormulaError::InvalidBounds`] when `min > max`.
    ///
    /// # Panics
    /// Panics if `b` is not Boolean.
    pub fn sugar_equal(&self, b: Formula, min: u8, max: u8) -> FormulaResult<Formula> {
        assert!(b.is_boolean(), "equal repetition of the non-Boolean formula {b}");
        let wait = self.kleene(self.not(b.clone()));
        let step = self.multop(Op::Concat, [wait.clone(), b])?;
        let steps = self.bunop(Op::Star, step, min, max)?;
        self.multop(Op::Concat, [steps, wait])
    }

    /// The n-ary node `f` without its `i`-th operand.
    pub fn all_but(&self, f: &Formula, i: usize) -> FormulaResult<Formula> {
        let rest = f
            .children()
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, c)| c.clone());
        self.multop(f.op(), rest)
    }

    // Shorthands.

    pub fn not(&self, f: Formula) -> Formula {
        self.unop(Op::Not, f)
    }

    pub fn x(&self, f: Formula) -> Formula {
        self.unop(Op::X, f)
    }

    pub fn f(&self, f: Formula) -> Formula {
        self.unop(Op::F, f)
    }

    pub fn g(&self, f: Formula) -> Formula {
        self.unop(Op::G, f)
    }

    pub fn closure(&self, r: Formula) -> Formula {
        self.unop(Op::Closure, r)
    }

    pub fn neg_closure(&self, r: Formula) -> Formula {
        self.unop(Op::NegClosure, r)
    }

    pub fn u(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::U, a, b)
    }

    pub fn r(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::R, a, b)
    }

    pub fn w(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::W, a, b)
    }

    pub fn m(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::M, a, b)
    }

    pub fn implies(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::Implies, a, b)
    }

    pub fn equiv(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::Equiv, a, b)
    }

    pub fn xor(&self, a: Formula, b: Formula) -> Formula {
        self.binop(Op::Xor, a, b)
    }

    pub fn econcat(&self, r: Formula, f: Formula) -> Formula {
        self.binop(Op::EConcat, r, f)
    }

    pub fn uconcat(&self, r: Formula, f: Formula) -> Formula {
        self.binop(Op::UConcat, r, f)
    }

    pub fn and<I: IntoIterator<Item = Formula>>(&self, operands: I) -> FormulaResult<Formula> {
        self.multop(Op::And, operands)
    }

    pub fn or<I: IntoIterator<Item = Formula>>(&self, operands: I) -> FormulaResult<Formula> {
        self.multop(Op::Or, operands)
    }

    pub fn concat<I: IntoIterator<Item = Formula>>(&self, operands: I) -> FormulaResult<Formula> {
        self.multop(Op::Concat, operands)
    }

    /// `r[*]`.
    pub fn kleene(&self, r: Formula) -> Formula {
        self.repeat(Op::Star, r, 0, UNBOUNDED)
    }

    pub fn star(&self, r: Formula, min: u8, max: u8) -> FormulaResult<Formula> {
        self.bunop(Op::Star, r, min, max)
    }
}
