//! Local simplifier.
//!
//! One bottom-up pass of boolean simplification ([`BoolRewriter`]) and
//! integer constant folding. It never reorders arguments.

use super::{BoolRewriter, RewriteStatus, Rewriter, RewriterCfg};
use crate::ast::{TermArgs, TermId, TermKind, TermManager};
use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Simplify `term` with a fresh [`LocalSimplifier`].
pub fn simplify(tm: &mut TermManager, term: TermId) -> TermId {
    Rewriter::new(LocalSimplifier::new()).rewrite(tm, term)
}

/// Reduction step for boolean simplification and integer folding.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSimplifier {
    brw: BoolRewriter,
}

impl LocalSimplifier {
    /// Create a local simplifier.
    pub fn new() -> Self {
        Self::default()
    }

    fn fold_compare(
        &self,
        tm: &mut TermManager,
        lhs: TermId,
        rhs: TermId,
        holds: fn(&BigInt, &BigInt) -> bool,
    ) -> Option<TermId> {
        if lhs == rhs {
            let zero = BigInt::zero();
            return Some(tm.mk_bool(holds(&zero, &zero)));
        }
        let value = holds(tm.int_value(lhs)?, tm.int_value(rhs)?);
        Some(tm.mk_bool(value))
    }

    fn fold_add(&self, tm: &mut TermManager, args: &[TermId]) -> TermId {
        let mut sum = BigInt::zero();
        let mut rest = TermArgs::new();
        for &arg in args {
            match tm.int_value(arg) {
                Some(n) => sum += n,
                None => rest.push(arg),
            }
        }
        if rest.len() + 1 == args.len() && !sum.is_zero() {
            // A single numeral is already folded.
            return tm.mk_add(args.iter().copied());
        }
        if !sum.is_zero() {
            let numeral = tm.mk_int(sum);
            rest.push(numeral);
        }
        tm.mk_add(rest)
    }

    fn fold_mul(&self, tm: &mut TermManager, args: &[TermId]) -> TermId {
        let mut product = BigInt::one();
        let mut rest = TermArgs::new();
        for &arg in args {
            match tm.int_value(arg) {
                Some(n) => product *= n,
                None => rest.push(arg),
            }
        }
        if product.is_zero() {
            return tm.mk_int(0);
        }
        if rest.len() + 1 == args.len() && !product.is_one() {
            return tm.mk_mul(args.iter().copied());
        }
        if !product.is_one() {
            let numeral = tm.mk_int(product);
            rest.push(numeral);
        }
        tm.mk_mul(rest)
    }

    fn fold_sub(&self, tm: &mut TermManager, lhs: TermId, rhs: TermId) -> TermId {
        if lhs == rhs {
            return tm.mk_int(0);
        }
        if let (Some(a), Some(b)) = (tm.int_value(lhs), tm.int_value(rhs)) {
            let diff = a - b;
            return tm.mk_int(diff);
        }
        if tm.int_value(rhs).is_some_and(Zero::is_zero) {
            return lhs;
        }
        tm.mk_sub(lhs, rhs)
    }

    fn fold_neg(&self, tm: &mut TermManager, arg: TermId) -> TermId {
        if let Some(n) = tm.int_value(arg) {
            let negated = -n;
            return tm.mk_int(negated);
        }
        if let TermKind::Neg(inner) = tm.kind(arg) {
            return *inner;
        }
        tm.mk_neg(arg)
    }
}

impl RewriterCfg for LocalSimplifier {
    fn reduce_app(&mut self, tm: &mut TermManager, node: TermId) -> RewriteStatus {
        if let Some(result) = self.brw.reduce(tm, node) {
            return RewriteStatus::Done(result);
        }
        let result = match tm.kind(node).clone() {
            TermKind::Le(a, b) => self.fold_compare(tm, a, b, |x, y| x <= y),
            TermKind::Lt(a, b) => self.fold_compare(tm, a, b, |x, y| x < y),
            TermKind::Ge(a, b) => self.fold_compare(tm, a, b, |x, y| x >= y),
            TermKind::Gt(a, b) => self.fold_compare(tm, a, b, |x, y| x > y),
            TermKind::Add(args) => Some(self.fold_add(tm, &args)),
            TermKind::Mul(args) => Some(self.fold_mul(tm, &args)),
            TermKind::Sub(a, b) => Some(self.fold_sub(tm, a, b)),
            TermKind::Neg(a) => Some(self.fold_neg(tm, a)),
            _ => None,
        };
        match result {
            Some(r) => RewriteStatus::Done(r),
            None => RewriteStatus::Failed,
        }
    }
}
