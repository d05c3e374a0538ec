//! Canonical ordering of connective operands.
//!
//! The order is a total order on terms that sees through one layer of
//! negation, so that `p` and `not p` end up next to each other and operand
//! pairs such as `(or p q)` and `(or (not p) (not q))` line up argument by
//! argument. It carries no semantic meaning beyond that.
//!
//! Comparing two distinct terms never yields [`Ordering::Equal`]: every
//! comparison falls back to term identity.

use crate::ast::{TermId, TermManager};
use std::cmp::Ordering;

/// Default structural depth explored before falling back to identity.
pub const DEFAULT_DEPTH: u32 = 4;

/// Depth-bounded, negation-aware comparator.
#[derive(Clone, Copy)]
pub struct TermComparator<'a> {
    tm: &'a TermManager,
    depth: u32,
}

impl<'a> TermComparator<'a> {
    /// Create a comparator exploring `depth` levels of arguments.
    pub fn new(tm: &'a TermManager, depth: u32) -> Self {
        Self { tm, depth }
    }

    /// Create a comparator with [`DEFAULT_DEPTH`].
    pub fn with_default_depth(tm: &'a TermManager) -> Self {
        Self::new(tm, DEFAULT_DEPTH)
    }

    /// Compare two terms.
    pub fn compare(&self, a: TermId, b: TermId) -> Ordering {
        self.compare_at(a, b, self.depth)
    }

    /// Sort `terms` in canonical order.
    pub fn sort(&self, terms: &mut [TermId]) {
        terms.sort_by(|&a, &b| self.compare(a, b));
    }

    fn compare_at(&self, a: TermId, b: TermId, depth: u32) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (a, a_neg) = self.tm.strip_not(a);
        let (b, b_neg) = self.tm.strip_not(b);
        if a == b {
            // Un-negated first.
            return a_neg.cmp(&b_neg);
        }
        self.compare_bare(a, b, depth)
    }

    /// `a` and `b` are distinct.
    fn compare_bare(&self, a: TermId, b: TermId, depth: u32) -> Ordering {
        let tm = self.tm;
        match (is_leaf(tm, a), is_leaf(tm, b)) {
            (true, true) => return a.cmp(&b),
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let by_head = tm
            .decl_id(a)
            .cmp(&tm.decl_id(b))
            .then_with(|| tm.num_args(a).cmp(&tm.num_args(b)));
        if by_head != Ordering::Equal {
            return by_head;
        }
        if depth == 0 {
            return a.cmp(&b);
        }

        let mut neg_order = Ordering::Equal;
        for (x, y) in tm.children(a).into_iter().zip(tm.children(b)) {
            let (x, x_neg) = tm.strip_not(x);
            let (y, y_neg) = tm.strip_not(y);
            if neg_order == Ordering::Equal && x_neg != y_neg {
                // Here the negated side sorts first.
                neg_order = if x_neg { Ordering::Less } else { Ordering::Greater };
            }
            let res = self.compare_at(x, y, depth - 1);
            if res != Ordering::Equal {
                return res;
            }
        }
        neg_order.then_with(|| a.cmp(&b))
    }
}

/// Variables, values and quantifiers are compared by identity only.
fn is_leaf(tm: &TermManager, t: TermId) -> bool {
    tm.is_var(t) || tm.is_value(t) || tm.is_quantifier(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TermManager, TermId, TermId) {
        let mut tm = TermManager::new();
        let b = tm.sorts.bool_sort;
        let p = tm.mk_apply("p", [], b);
        let q = tm.mk_apply("q", [], b);
        (tm, p, q)
    }

    #[test]
    fn test_reflexive() {
        let (mut tm, p, q) = setup();
        let conj = tm.mk_and([p, q]);
        let cmp = TermComparator::with_default_depth(&tm);
        assert_eq!(cmp.compare(conj, conj), Ordering::Equal);
        assert_eq!(cmp.compare(p, p), Ordering::Equal);
    }

    #[test]
    fn test_negation_tie_break() {
        let (mut tm, p, _) = setup();
        let np = tm.mk_not(p);
        let cmp = TermComparator::with_default_depth(&tm);
        assert_eq!(cmp.compare(p, np), Ordering::Less);
        assert_eq!(cmp.compare(np, p), Ordering::Greater);
    }

    #[test]
    fn test_leaves_before_applications() {
        let (mut tm, p, _) = setup();
        let x = tm.mk_var(0, tm.sorts.bool_sort);
        let one = tm.mk_int(1);
        let cmp = TermComparator::with_default_depth(&tm);
        assert_eq!(cmp.compare(x, p), Ordering::Less);
        assert_eq!(cmp.compare(p, one), Ordering::Greater);
        assert_eq!(cmp.compare(x, one), x.cmp(&one));
    }

    #[test]
    fn test_negated_arguments_sort_first() {
        let (mut tm, p, q) = setup();
        let np = tm.mk_not(p);
        let nq = tm.mk_not(q);
        let pos = tm.mk_or([p, q]);
        let neg = tm.mk_or([np, nq]);
        let cmp = TermComparator::with_default_depth(&tm);
        assert_eq!(cmp.compare(neg, pos), Ordering::Less);
        assert_eq!(cmp.compare(pos, neg), Ordering::Greater);
    }

    #[test]
    fn test_sort_groups_literals_by_atom() {
        let (mut tm, p, q) = setup();
        let np = tm.mk_not(p);
        let nq = tm.mk_not(q);
        let mut terms = vec![nq, p, q, np];
        TermComparator::with_default_depth(&tm).sort(&mut terms);

        let p_first = tm.decl_id(p) < tm.decl_id(q);
        let expected = if p_first {
            vec![p, np, q, nq]
        } else {
            vec![q, nq, p, np]
        };
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_depth_zero_uses_identity() {
        let (mut tm, p, q) = setup();
        let a = tm.mk_and([p, q]);
        let b = tm.mk_and([q, p]);
        let cmp = TermComparator::new(&tm, 0);
        assert_eq!(cmp.compare(a, b), a.cmp(&b));
    }

    #[test]
    fn test_antisymmetric_on_mixed_terms() {
        let (mut tm, p, q) = setup();
        let x = tm.mk_var(0, tm.sorts.int_sort);
        let five = tm.mk_int(5);
        let eq = tm.mk_eq(x, five);
        let neq = tm.mk_not(eq);
        let np = tm.mk_not(p);
        let conj = tm.mk_and([np, q]);
        let terms = [p, q, eq, neq, np, conj, x, five];
        let cmp = TermComparator::with_default_depth(&tm);
        for &a in &terms {
            for &b in &terms {
                assert_eq!(cmp.compare(a, b), cmp.compare(b, a).reverse());
                assert_eq!(cmp.compare(a, b) == Ordering::Equal, a == b);
            }
        }
    }
}
