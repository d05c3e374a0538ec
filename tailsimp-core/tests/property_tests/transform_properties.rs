//! Property-based tests for the rule-set transformer
//!
//! Tests:
//! - A second pass never changes anything
//! - Propagation is bounded by the number of variables
//! - Derived facts are preserved over small databases

use super::strategies::{
    atoms, constraint, eval_bool, eval_int, interpretations, Constraint, DOMAIN, NUM_VARS,
};
use proptest::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tailsimp_core::ast::TermId;
use tailsimp_core::datalog::{
    InterpTailSimplifier, Literal, RuleContext, RuleOutcome, RuleRef, RuleSet,
};

struct Generated {
    ctx: RuleContext,
    atoms: Vec<TermId>,
    rule: RuleRef,
}

/// `Q(#0) :- B(#0, #1), B(#2, #3), constraints...`
fn build_rule(constraints: &[Constraint]) -> Generated {
    let mut ctx = RuleContext::new();
    ctx.declare_relation("B");
    ctx.declare_relation("Q");
    let atoms = atoms(&mut ctx.tm);
    let int = ctx.tm.sorts.int_sort;
    let vars: Vec<TermId> = (0..NUM_VARS).map(|i| ctx.tm.mk_var(i, int)).collect();

    let head = ctx.mk_atom("Q", &[vars[0]]);
    let mut tail = vec![
        Literal::positive(ctx.mk_atom("B", &[vars[0], vars[1]])),
        Literal::positive(ctx.mk_atom("B", &[vars[2], vars[3]])),
    ];
    for c in constraints {
        let tm = &mut ctx.tm;
        let lit = match *c {
            Constraint::True => Literal::positive(tm.mk_true()),
            Constraint::EqVar(a, b) => {
                Literal::positive(tm.mk_eq(vars[a as usize], vars[b as usize]))
            }
            Constraint::EqConst(v, n) => {
                let n = tm.mk_int(n);
                Literal::positive(tm.mk_eq(vars[v as usize], n))
            }
            Constraint::NotEqConst(v, n) => {
                let n = tm.mk_int(n);
                Literal::negative(tm.mk_eq(vars[v as usize], n))
            }
            Constraint::Le(v, n) => {
                let n = tm.mk_int(n);
                Literal::positive(tm.mk_le(vars[v as usize], n))
            }
            Constraint::Ge(v, n) => {
                let n = tm.mk_int(n);
                Literal::positive(tm.mk_ge(vars[v as usize], n))
            }
            Constraint::Lt(a, b) => {
                Literal::positive(tm.mk_lt(vars[a as usize], vars[b as usize]))
            }
            Constraint::Atom(i, false) => Literal::positive(atoms[i]),
            Constraint::Atom(i, true) => Literal::positive(tm.mk_not(atoms[i])),
        };
        tail.push(lit);
    }
    let rule = ctx.mk_rule(head, tail).unwrap();
    Generated { ctx, atoms, rule }
}

/// Head values derivable by `rule` from the binary relation `facts`.
fn derive(
    g: &Generated,
    rule: &RuleRef,
    facts: &FxHashSet<(i64, i64)>,
    interp: &FxHashMap<TermId, bool>,
) -> FxHashSet<i64> {
    let tm = &g.ctx.tm;
    let slots = rule.num_var_slots();
    let mut out = FxHashSet::default();
    let mut env = vec![DOMAIN.start; slots];
    loop {
        let body_holds = rule.uninterpreted_tail().iter().all(|lit| {
            let args = tm.children(lit.atom);
            let tuple = (eval_int(tm, args[0], &env), eval_int(tm, args[1], &env));
            match tuple {
                (Some(a), Some(b)) => facts.contains(&(a, b)) != lit.negated,
                _ => false,
            }
        });
        let constraints_hold = rule
            .interpreted_tail()
            .iter()
            .all(|lit| eval_bool(tm, lit.atom, &env, interp) == Some(true));
        if body_holds && constraints_hold {
            let head_arg = tm.children(rule.head())[0];
            if let Some(v) = eval_int(tm, head_arg, &env) {
                out.insert(v);
            }
        }

        // Next assignment, odometer style.
        let mut i = 0;
        loop {
            if i == slots {
                return out;
            }
            env[i] += 1;
            if env[i] < DOMAIN.end {
                break;
            }
            env[i] = DOMAIN.start;
            i += 1;
        }
    }
}

proptest! {
    /// Test that transforming an already transformed rule set changes nothing
    #[test]
    fn transform_is_idempotent(constraints in prop::collection::vec(constraint(), 0..6)) {
        let mut g = build_rule(&constraints);
        let set = RuleSet::from_iter([Arc::clone(&g.rule)]);
        let mut simp = InterpTailSimplifier::new();
        let first = simp.run(&mut g.ctx, &set).unwrap().unwrap_or(set);
        prop_assert!(simp.run(&mut g.ctx, &first).unwrap().is_none());
    }

    /// Test that each propagation eliminates at least one variable
    #[test]
    fn propagation_terminates(constraints in prop::collection::vec(constraint(), 0..8)) {
        let mut g = build_rule(&constraints);
        let v = u64::from(g.rule.max_var_index().unwrap_or(0));
        let mut simp = InterpTailSimplifier::new();
        let outcome = simp.transform_rule(&mut g.ctx, &g.rule).unwrap();

        let stats = simp.interp_stats();
        prop_assert!(stats.propagations <= v + 1);
        prop_assert!(stats.loop_iterations <= v + 2);
        if let RuleOutcome::Keep(rule) = outcome {
            prop_assert!(rule.max_var_index() <= g.rule.max_var_index());
        }
    }

    /// Test that the transformed rule derives the same facts
    #[test]
    fn transform_preserves_derived_facts(
        constraints in prop::collection::vec(constraint(), 0..5),
        facts in prop::collection::hash_set((DOMAIN, DOMAIN), 0..8),
    ) {
        let mut g = build_rule(&constraints);
        let facts: FxHashSet<(i64, i64)> = facts.into_iter().collect();
        let mut simp = InterpTailSimplifier::new();
        let outcome = simp.transform_rule(&mut g.ctx, &g.rule).unwrap();

        for interp in interpretations(&g.atoms) {
            let expected = derive(&g, &g.rule, &facts, &interp);
            let actual = match &outcome {
                RuleOutcome::Keep(rule) => derive(&g, rule, &facts, &interp),
                RuleOutcome::Drop => FxHashSet::default(),
            };
            prop_assert_eq!(&actual, &expected);
        }
    }
}
