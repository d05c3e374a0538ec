//! Incremental unification over the variables of one rule.

use super::rule::{Literal, RuleManager, RuleRef, remove_duplicate_tails};
use crate::ast::{TermId, TermManager};
use crate::error::{Result, TailsimpError};
use crate::unify::{Substitution, unify};
use std::sync::Arc;
use tracing::trace;

/// Substitution state scoped to a single rule.
///
/// Call [`reset`](Self::reset) before working on a rule, then any number of
/// [`unify`](Self::unify) calls, then [`get_result`](Self::get_result).
#[derive(Debug, Default)]
pub struct RuleSubstitution {
    subst: Substitution,
    rule: Option<RuleRef>,
}

impl RuleSubstitution {
    /// Create an unbound rule substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start working on `rule`, dropping all previous bindings.
    pub fn reset(&mut self, rule: &RuleRef) {
        self.subst.reserve(rule.num_var_slots());
        self.rule = Some(Arc::clone(rule));
    }

    /// Unify `e1` with `e2` under the current bindings.
    ///
    /// Both sides are instantiated first so that successive calls compose.
    /// Returns `true` on success even when no binding was added.
    pub fn unify(&mut self, tm: &mut TermManager, e1: TermId, e2: TermId) -> bool {
        let a = self.subst.apply(tm, e1);
        let b = self.subst.apply(tm, e2);
        self.subst.reset_cache();
        let before = self.subst.num_bindings();
        let unified = unify(tm, a, b, &mut self.subst);
        if unified && self.subst.num_bindings() > before {
            trace!(lhs = %tm.display(a), rhs = %tm.display(b), "unified");
        }
        unified
    }

    /// Instantiate `term` with the current bindings.
    pub fn apply(&mut self, tm: &mut TermManager, term: TermId) -> TermId {
        self.subst.apply(tm, term)
    }

    /// Number of variables bound so far.
    pub fn num_bindings(&self) -> usize {
        self.subst.num_bindings()
    }

    /// Build the instantiated version of `rule`.
    ///
    /// Duplicate body literals are removed, variables renumbered from zero
    /// and the new rule records `rule` as its parent. `rule` must be the rule
    /// passed to the last [`reset`](Self::reset).
    pub fn get_result(
        &mut self,
        tm: &mut TermManager,
        rm: &RuleManager,
        rule: &RuleRef,
    ) -> Result<RuleRef> {
        match &self.rule {
            Some(current) if Arc::ptr_eq(current, rule) => {}
            Some(_) => {
                return Err(TailsimpError::internal(
                    "rule substitution was reset for a different rule",
                ));
            }
            None => {
                return Err(TailsimpError::internal(
                    "rule substitution used before reset",
                ));
            }
        }

        let head = self.subst.apply(tm, rule.head());
        let mut tail: Vec<Literal> = rule
            .tail()
            .iter()
            .map(|lit| Literal {
                atom: self.subst.apply(tm, lit.atom),
                negated: lit.negated,
            })
            .collect();
        remove_duplicate_tails(&mut tail);

        let result = rm.mk(tm, head, tail, Some(Arc::clone(rule)))?;
        Ok(rm.normalize_vars(tm, result))
    }
}
