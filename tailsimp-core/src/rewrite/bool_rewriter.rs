//! Simplifying boolean builders.
//!
//! ## Transformations
//!
//! - `not`: constants fold, double negation cancels.
//! - `and`/`or`: nested connectives of the same kind are flattened, neutral
//!   elements dropped, the dominant constant absorbs, duplicates are removed
//!   keeping the first occurrence, and complementary literals fold to the
//!   dominant constant.
//! - `=`/`iff`: identical sides give `true`, distinct values give `false`,
//!   a boolean constant side reduces to the other side or its negation.
//!
//! Argument order is never changed.

use crate::ast::{TermArgs, TermId, TermKind, TermManager};
use rustc_hash::FxHashSet;

/// Simplifying constructors for boolean connectives.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolRewriter;

impl BoolRewriter {
    /// Create a boolean rewriter.
    pub fn new() -> Self {
        Self
    }

    /// Negation.
    pub fn mk_not(&self, tm: &mut TermManager, arg: TermId) -> TermId {
        if tm.is_true(arg) {
            return tm.mk_false();
        }
        if tm.is_false(arg) {
            return tm.mk_true();
        }
        if let Some(inner) = tm.is_not(arg) {
            return inner;
        }
        tm.mk_not(arg)
    }

    /// Conjunction.
    pub fn mk_and(&self, tm: &mut TermManager, args: &[TermId]) -> TermId {
        self.mk_junction(tm, args, true)
    }

    /// Disjunction.
    pub fn mk_or(&self, tm: &mut TermManager, args: &[TermId]) -> TermId {
        self.mk_junction(tm, args, false)
    }

    fn mk_junction(&self, tm: &mut TermManager, args: &[TermId], is_and: bool) -> TermId {
        // `neutral` disappears from the argument list, `dominant` swallows it.
        let neutral = tm.mk_bool(is_and);
        let dominant = tm.mk_bool(!is_and);

        let mut flat = TermArgs::new();
        for &arg in args {
            let nested = if is_and { tm.is_and(arg) } else { tm.is_or(arg) };
            match nested {
                Some(inner) => flat.extend_from_slice(inner),
                None => flat.push(arg),
            }
        }

        let mut seen = FxHashSet::default();
        let mut result = TermArgs::new();
        for arg in flat {
            if arg == dominant {
                return dominant;
            }
            if arg == neutral || !seen.insert(arg) {
                continue;
            }
            result.push(arg);
        }

        let complementary = result
            .iter()
            .any(|&arg| tm.is_not(arg).is_some_and(|inner| seen.contains(&inner)));
        if complementary {
            return dominant;
        }

        if is_and {
            tm.mk_and(result)
        } else {
            tm.mk_or(result)
        }
    }

    /// Implication, expressed as `or(not lhs, rhs)`.
    pub fn mk_implies(&self, tm: &mut TermManager, lhs: TermId, rhs: TermId) -> TermId {
        let not_lhs = self.mk_not(tm, lhs);
        self.mk_or(tm, &[not_lhs, rhs])
    }

    /// Equality.
    pub fn mk_eq(&self, tm: &mut TermManager, lhs: TermId, rhs: TermId) -> TermId {
        match self.fold_equality(tm, lhs, rhs) {
            Some(folded) => folded,
            None => tm.mk_eq(lhs, rhs),
        }
    }

    /// Biconditional.
    pub fn mk_iff(&self, tm: &mut TermManager, lhs: TermId, rhs: TermId) -> TermId {
        match self.fold_equality(tm, lhs, rhs) {
            Some(folded) => folded,
            None => tm.mk_iff(lhs, rhs),
        }
    }

    fn fold_equality(&self, tm: &mut TermManager, lhs: TermId, rhs: TermId) -> Option<TermId> {
        if lhs == rhs {
            return Some(tm.mk_true());
        }
        if tm.is_value(lhs) && tm.is_value(rhs) {
            return Some(tm.mk_false());
        }
        if !tm.is_bool(lhs) {
            return None;
        }
        for (constant, other) in [(lhs, rhs), (rhs, lhs)] {
            if tm.is_true(constant) {
                return Some(other);
            }
            if tm.is_false(constant) {
                return Some(self.mk_not(tm, other));
            }
        }
        if tm.is_not(lhs) == Some(rhs) || tm.is_not(rhs) == Some(lhs) {
            return Some(tm.mk_false());
        }
        None
    }

    /// Rebuild a boolean connective node with these builders.
    ///
    /// Returns `None` when `node` is not a boolean connective.
    pub fn reduce(&self, tm: &mut TermManager, node: TermId) -> Option<TermId> {
        let result = match tm.kind(node).clone() {
            TermKind::Not(a) => self.mk_not(tm, a),
            TermKind::And(args) => self.mk_and(tm, &args),
            TermKind::Or(args) => self.mk_or(tm, &args),
            TermKind::Implies(a, b) => self.mk_implies(tm, a, b),
            TermKind::Iff(a, b) => self.mk_iff(tm, a, b),
            TermKind::Eq(a, b) => self.mk_eq(tm, a, b),
            _ => return None,
        };
        Some(result)
    }
}
