//! Property-based tests for the operand comparator
//!
//! Tests:
//! - Reflexivity and antisymmetry
//! - Transitivity
//! - Sorting is independent of input order

use super::strategies::{atoms, formula, Formula};
use proptest::prelude::*;
use std::cmp::Ordering;
use tailsimp_core::ast::{TermId, TermManager};
use tailsimp_core::datalog::TermComparator;

fn build_all(tm: &mut TermManager, formulas: &[Formula]) -> Vec<TermId> {
    let atoms = atoms(tm);
    let mut terms: Vec<TermId> = formulas.iter().map(|f| f.build(tm, &atoms)).collect();
    // Negations of every term, so the negation tie-break is exercised.
    let negated: Vec<TermId> = terms.iter().map(|&t| tm.mk_not(t)).collect();
    terms.extend(negated);
    terms
}

proptest! {
    /// Test that every term compares equal to itself and only to itself
    #[test]
    fn compare_equal_iff_identical(formulas in prop::collection::vec(formula(), 1..6), depth in 0u32..6) {
        let mut tm = TermManager::new();
        let terms = build_all(&mut tm, &formulas);
        let cmp = TermComparator::new(&tm, depth);
        for &a in &terms {
            for &b in &terms {
                prop_assert_eq!(cmp.compare(a, b) == Ordering::Equal, a == b);
            }
        }
    }

    /// Test that swapping the arguments reverses the result
    #[test]
    fn compare_antisymmetric(formulas in prop::collection::vec(formula(), 1..6), depth in 0u32..6) {
        let mut tm = TermManager::new();
        let terms = build_all(&mut tm, &formulas);
        let cmp = TermComparator::new(&tm, depth);
        for &a in &terms {
            for &b in &terms {
                prop_assert_eq!(cmp.compare(a, b), cmp.compare(b, a).reverse());
            }
        }
    }

    /// Test that the order is transitive
    #[test]
    fn compare_transitive(formulas in prop::collection::vec(formula(), 1..5), depth in 0u32..6) {
        let mut tm = TermManager::new();
        let terms = build_all(&mut tm, &formulas);
        let cmp = TermComparator::new(&tm, depth);
        for &a in &terms {
            for &b in &terms {
                for &c in &terms {
                    if cmp.compare(a, b) == Ordering::Less && cmp.compare(b, c) == Ordering::Less {
                        prop_assert_eq!(cmp.compare(a, c), Ordering::Less);
                    }
                }
            }
        }
    }

    /// Test that a term's negation sorts right after the term
    #[test]
    fn negation_sorts_after_term(f in formula()) {
        let mut tm = TermManager::new();
        let atoms = atoms(&mut tm);
        let t = f.build(&mut tm, &atoms);
        prop_assume!(tm.is_not(t).is_none());
        let nt = tm.mk_not(t);
        let cmp = TermComparator::with_default_depth(&tm);
        prop_assert_eq!(cmp.compare(t, nt), Ordering::Less);
    }

    /// Test that sorting does not depend on the input order
    #[test]
    fn sort_is_canonical(formulas in prop::collection::vec(formula(), 1..8)) {
        let mut tm = TermManager::new();
        let terms = build_all(&mut tm, &formulas);
        let cmp = TermComparator::with_default_depth(&tm);

        let mut forward = terms.clone();
        cmp.sort(&mut forward);
        let mut backward: Vec<TermId> = terms.into_iter().rev().collect();
        cmp.sort(&mut backward);
        prop_assert_eq!(forward, backward);
    }
}
