//! Variable equivalence propagation.
//!
//! Scans the constraint suffix of a rule for literals that force a variable
//! to equal another variable or a value, binds them through a
//! [`RuleSubstitution`] and, if anything was bound, materializes the
//! instantiated rule.
//!
//! Recognized shapes (after stripping one leading `not`):
//!
//! - a boolean variable, bound to `true` (or `false` under `not`);
//! - a positive conjunction, whose operands are scanned in turn;
//! - a biconditional (or equality of booleans) between a variable and a
//!   flexible term, honouring the parity of the negations around either side;
//! - a positive equality between two flexible terms;
//! - a positive `<=`/`>=`, recorded so the reverse inequality can bind both
//!   sides when antisymmetry detection is enabled.
//!
//! Everything else is left alone.

use crate::ast::{TermId, TermManager};
use crate::datalog::rule::{RuleManager, RuleRef};
use crate::datalog::rule_substitution::RuleSubstitution;
use crate::error::Result;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Binds variables forced equal by constraint literals.
#[derive(Debug, Default)]
pub struct VarEquivalencePropagator {
    rule_subst: RuleSubstitution,
    detect_antisymmetry: bool,
    unify_calls: u64,
}

impl VarEquivalencePropagator {
    /// Create a propagator.
    pub fn new(detect_antisymmetry: bool) -> Self {
        Self {
            rule_subst: RuleSubstitution::new(),
            detect_antisymmetry,
            unify_calls: 0,
        }
    }

    /// Number of unification attempts so far.
    pub fn unify_calls(&self) -> u64 {
        self.unify_calls
    }

    /// Reset counters.
    pub fn reset_stats(&mut self) {
        self.unify_calls = 0;
    }

    /// Propagate equivalences in `rule`.
    ///
    /// Returns the reduced rule when at least one variable was bound.
    pub fn propagate(
        &mut self,
        tm: &mut TermManager,
        rm: &RuleManager,
        rule: &RuleRef,
    ) -> Result<Option<RuleRef>> {
        let constraints = rule.interpreted_tail();
        if constraints.is_empty() {
            return Ok(None);
        }
        debug_assert!(constraints.iter().all(|lit| lit.is_positive()));

        let mut todo: Vec<TermId> = constraints.iter().map(|lit| lit.atom).collect();
        self.rule_subst.reset(rule);
        let mut leqs: FxHashSet<TermId> = FxHashSet::default();

        while let Some(t0) = todo.pop() {
            let (t, neg) = tm.strip_not(t0);

            if tm.is_var(t) {
                let value = tm.mk_bool(!neg);
                self.try_unify(tm, t, value);
            } else if !neg && let Some(args) = tm.is_and(t) {
                todo.extend_from_slice(args);
            } else if let Some((lhs, rhs)) = biconditional(tm, t) {
                self.propagate_iff(tm, lhs, rhs, neg);
            } else if !neg
                && let Some((lhs, rhs)) = tm.is_eq(t)
                && tm.is_flexible(lhs)
                && tm.is_flexible(rhs)
            {
                self.try_unify(tm, lhs, rhs);
            } else if self.detect_antisymmetry
                && !neg
                && let Some((lhs, rhs)) = as_leq(tm, t)
            {
                let reverse = tm.mk_sub(rhs, lhs);
                if leqs.contains(&reverse) && tm.is_flexible(lhs) && tm.is_flexible(rhs) {
                    self.try_unify(tm, lhs, rhs);
                } else {
                    let diff = tm.mk_sub(lhs, rhs);
                    leqs.insert(diff);
                }
            }
        }

        if self.rule_subst.num_bindings() == 0 {
            return Ok(None);
        }
        let result = self.rule_subst.get_result(tm, rm, rule)?;
        debug!(
            rule = %rule.display(tm),
            result = %result.display(tm),
            bindings = self.rule_subst.num_bindings(),
            "propagated variable equivalences"
        );
        Ok(Some(result))
    }

    fn propagate_iff(&mut self, tm: &mut TermManager, lhs: TermId, rhs: TermId, neg: bool) {
        let mut neg = neg;
        let mut lhs = lhs;
        let mut rhs = rhs;
        while let Some(inner) = tm.is_not(lhs) {
            lhs = inner;
            neg = !neg;
        }
        while let Some(inner) = tm.is_not(rhs) {
            rhs = inner;
            neg = !neg;
        }
        if !tm.is_var(lhs) {
            std::mem::swap(&mut lhs, &mut rhs);
        }
        if !tm.is_flexible(lhs) || !tm.is_flexible(rhs) || !tm.is_var(lhs) {
            return;
        }
        if !neg {
            self.try_unify(tm, lhs, rhs);
        } else if tm.is_true(rhs) {
            let f = tm.mk_false();
            self.try_unify(tm, lhs, f);
        } else if tm.is_false(rhs) {
            let t = tm.mk_true();
            self.try_unify(tm, lhs, t);
        }
    }

    fn try_unify(&mut self, tm: &mut TermManager, a: TermId, b: TermId) {
        self.unify_calls += 1;
        self.rule_subst.unify(tm, a, b);
    }
}

/// Sides of a biconditional: `iff`, or `=` over booleans.
fn biconditional(tm: &TermManager, t: TermId) -> Option<(TermId, TermId)> {
    if let Some(sides) = tm.is_iff(t) {
        return Some(sides);
    }
    tm.is_eq(t).filter(|&(lhs, _)| tm.is_bool(lhs))
}

/// Sides of `lhs <= rhs`, also for `rhs >= lhs`.
fn as_leq(tm: &TermManager, t: TermId) -> Option<(TermId, TermId)> {
    tm.is_le(t).or_else(|| tm.is_ge(t).map(|(a, b)| (b, a)))
}
