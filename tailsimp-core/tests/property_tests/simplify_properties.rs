//! Property-based tests for the simplification pipeline
//!
//! Every rewrite is checked against a truth-table evaluation of the input.

use super::strategies::{atoms, eval_bool, formula, interpretations};
use proptest::prelude::*;
use tailsimp_core::ast::TermManager;
use tailsimp_core::datalog::{ConnectiveNormalizer, InterpTailSimplifier};
use tailsimp_core::rewrite::Rewriter;

proptest! {
    /// Test that local simplification preserves the truth table
    #[test]
    fn simplify_preserves_semantics(f in formula()) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let t = f.build(&mut tm, &atoms);
        let s = tm.simplify(t);
        for interp in interpretations(&atoms) {
            prop_assert_eq!(eval_bool(&tm, t, &[], &interp), eval_bool(&tm, s, &[], &interp));
        }
    }

    /// Test that local simplification is a fixpoint
    #[test]
    fn simplify_idempotent(f in formula()) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let t = f.build(&mut tm, &atoms);
        let once = tm.simplify(t);
        prop_assert_eq!(tm.simplify(once), once);
    }

    /// Test that connective normalization preserves the truth table
    #[test]
    fn normalizer_preserves_semantics(f in formula(), depth in 0u32..6) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let t = f.build(&mut tm, &atoms);
        let n = Rewriter::new(ConnectiveNormalizer::new(depth)).rewrite(&mut tm, t);
        for interp in interpretations(&atoms) {
            prop_assert_eq!(eval_bool(&tm, t, &[], &interp), eval_bool(&tm, n, &[], &interp));
        }
    }

    /// Test that the full pipeline preserves the truth table
    #[test]
    fn pipeline_preserves_semantics(f in formula()) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let t = f.build(&mut tm, &atoms);
        let s = InterpTailSimplifier::new().simplify_expr(&mut tm, t);
        prop_assert!(tm.is_bool(s));
        for interp in interpretations(&atoms) {
            prop_assert_eq!(eval_bool(&tm, t, &[], &interp), eval_bool(&tm, s, &[], &interp));
        }
    }

    /// Test that conjunctions of literals normalize independently of order
    #[test]
    fn pipeline_ignores_conjunct_order(
        lits in prop::collection::vec((0..super::strategies::NUM_ATOMS, any::<bool>()), 1..6)
    ) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let terms: Vec<_> = lits
            .iter()
            .map(|&(i, neg)| if neg { tm.mk_not(atoms[i]) } else { atoms[i] })
            .collect();
        let forward = tm.mk_and(terms.iter().copied());
        let backward = tm.mk_and(terms.iter().rev().copied());

        let mut simp = InterpTailSimplifier::new();
        let a = simp.simplify_expr(&mut tm, forward);
        let b = simp.simplify_expr(&mut tm, backward);
        prop_assert_eq!(a, b);
        prop_assert_eq!(simp.simplify_expr(&mut tm, a), a);
    }
}
