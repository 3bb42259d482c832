//! Canonical operand order of commutative operators.
//!
//! Boolean operands come first. Among them constants lead, then literals
//! (atomic propositions and their negations) sorted by name using a natural
//! order where digit runs compare numerically (`p2 < p10`), a positive literal
//! preceding its negation, then the remaining Boolean compounds. Everything
//! else is ordered by node id, which is also the final tie-break.
use std::cmp::Ordering;

use crate::{formula::Formula, op::Op};

/// Compare two strings, treating digit runs as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let si = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let da = trim_zeros(&a[si..i]);
            let db = trim_zeros(&b[sj..j]);
            let ord = da.len().cmp(&db.len()).then_with(|| da.cmp(db));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ord => return ord,
            }
        }
    }
    (a.len() - i).cmp(&(b.len() - j)).then_with(|| a.cmp(b))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let start = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    &digits[start..]
}

/// Returns the atomic proposition below a literal and whether it is negated.
fn literal(f: &Formula) -> Option<(&str, bool)> {
    match f.op() {
        Op::Ap => f.ap_name().map(|n| (n, false)),
        Op::Not => f.nth(0).ap_name().map(|n| (n, true)),
        _ => None,
    }
}

/// Total order used to sort the operands of commutative operators.
pub fn canonical_cmp(a: &Formula, b: &Formula) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    match (a.is_boolean(), b.is_boolean()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => return a.id().cmp(&b.id()),
        (true, true) => {}
    }

    match (a.is_constant(), b.is_constant()) {
        (true, true) => return a.id().cmp(&b.id()),
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match (literal(a), literal(b)) {
        (Some((na, nega)), Some((nb, negb))) => natural_cmp(na, nb)
            .then(nega.cmp(&negb))
            .then_with(|| a.id().cmp(&b.id())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id().cmp(&b.id()),
    }
}

/// Sort and deduplicate an operand list in canonical order.
pub(crate) fn canonicalize(operands: &mut Vec<Formula>) {
    operands.sort_by(canonical_cmp);
    operands.dedup();
}
