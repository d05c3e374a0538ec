//! Substitutions and syntactic unification.
//!
//! A [`Substitution`] maps rule-variable indices to terms. Bindings may refer
//! to other bound variables; [`Substitution::apply`] follows such chains to
//! the end, so applying a substitution is idempotent.
//!
//! [`unify`] extends a substitution so that two terms become syntactically
//! equal. It is transactional: on failure every binding it added is undone.

use crate::ast::traversal::free_vars;
use crate::ast::{TermArgs, TermId, TermManager};
use rustc_hash::FxHashMap;

/// Mapping from variable indices to terms.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    bindings: Vec<Option<TermId>>,
    trail: Vec<u32>,
    cache: FxHashMap<TermId, TermId>,
}

impl Substitution {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all bindings and make room for `num_vars` variables.
    pub fn reserve(&mut self, num_vars: usize) {
        self.reset();
        self.bindings.resize(num_vars, None);
    }

    /// Clear all bindings.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.trail.clear();
        self.cache.clear();
    }

    /// Number of variable slots.
    pub fn capacity(&self) -> usize {
        self.bindings.len()
    }

    /// Bind variable `var` to `term`.
    ///
    /// Invalidates the application cache.
    pub fn bind(&mut self, var: u32, term: TermId) {
        let idx = var as usize;
        if idx >= self.bindings.len() {
            self.bindings.resize(idx + 1, None);
        }
        debug_assert!(self.bindings[idx].is_none(), "variable #{var} bound twice");
        self.bindings[idx] = Some(term);
        self.trail.push(var);
        self.cache.clear();
    }

    /// Direct binding of `var`, without following chains.
    pub fn get(&self, var: u32) -> Option<TermId> {
        self.bindings.get(var as usize).copied().flatten()
    }

    /// Is `var` bound?
    pub fn is_bound(&self, var: u32) -> bool {
        self.get(var).is_some()
    }

    /// Number of bound variables.
    pub fn num_bindings(&self) -> usize {
        self.trail.len()
    }

    /// Drop memoised applications.
    pub fn reset_cache(&mut self) {
        self.cache.clear();
    }

    fn mark(&self) -> usize {
        self.trail.len()
    }

    fn undo_to(&mut self, mark: usize) {
        if self.trail.len() == mark {
            return;
        }
        for var in self.trail.drain(mark..) {
            self.bindings[var as usize] = None;
        }
        self.cache.clear();
    }

    /// Apply the substitution to `term`.
    ///
    /// Quantifier bodies are left untouched.
    pub fn apply(&mut self, tm: &mut TermManager, term: TermId) -> TermId {
        if let Some(&cached) = self.cache.get(&term) {
            return cached;
        }
        let result = if let Some(var) = tm.var_index(term) {
            match self.get(var) {
                Some(bound) => self.apply(tm, bound),
                None => term,
            }
        } else if tm.is_quantifier(term) {
            term
        } else {
            let children = tm.children(term);
            if children.is_empty() {
                term
            } else {
                let new_children: TermArgs =
                    children.iter().map(|&c| self.apply(tm, c)).collect();
                tm.rebuild(term, &new_children)
            }
        };
        self.cache.insert(term, result);
        result
    }
}

/// Unify `e1` with `e2`, extending `subst` in place.
///
/// Returns `true` on success, including when the terms were already equal
/// under `subst` and nothing was added. On failure `subst` is left as it
/// was.
pub fn unify(tm: &mut TermManager, e1: TermId, e2: TermId, subst: &mut Substitution) -> bool {
    let mark = subst.mark();
    let unified = unify_rec(tm, e1, e2, subst);
    if !unified {
        subst.undo_to(mark);
    }
    unified
}

fn unify_rec(tm: &mut TermManager, e1: TermId, e2: TermId, subst: &mut Substitution) -> bool {
    let a = subst.apply(tm, e1);
    let b = subst.apply(tm, e2);
    if a == b {
        return true;
    }
    if tm.sort_of(a) != tm.sort_of(b) {
        return false;
    }

    match (tm.var_index(a), tm.var_index(b)) {
        (Some(var), _) => bind_checked(tm, var, b, subst),
        (None, Some(var)) => bind_checked(tm, var, a, subst),
        (None, None) => {
            if tm.is_quantifier(a) || tm.is_quantifier(b) {
                return false;
            }
            if tm.decl_id(a) != tm.decl_id(b) {
                return false;
            }
            let args_a = tm.children(a);
            let args_b = tm.children(b);
            // Distinct leaves with the same head (numerals) never unify.
            if args_a.is_empty() || args_a.len() != args_b.len() {
                return false;
            }
            args_a
                .iter()
                .zip(args_b.iter())
                .all(|(&x, &y)| unify_rec(tm, x, y, subst))
        }
    }
}

fn bind_checked(tm: &TermManager, var: u32, term: TermId, subst: &mut Substitution) -> bool {
    if free_vars(tm, term).contains(&var) {
        return false;
    }
    subst.bind(var, term);
    true
}
