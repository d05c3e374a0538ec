//! Shared generators and a reference evaluator for terms.

use num_traits::ToPrimitive;
use proptest::prelude::*;
use rustc_hash::FxHashMap;
use tailsimp_core::ast::{TermId, TermKind, TermManager};

/// Number of propositional atoms `p0, p1, ...`.
pub const NUM_ATOMS: usize = 3;

/// Number of rule variables `#0, #1, ...`.
pub const NUM_VARS: u32 = 4;

/// Values rule variables range over.
pub const DOMAIN: std::ops::Range<i64> = 0..4;

/// Propositional formula over `p0..p{NUM_ATOMS-1}`.
#[derive(Debug, Clone)]
pub enum Formula {
    Const(bool),
    Atom(usize),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn build(&self, tm: &mut TermManager, atoms: &[TermId]) -> TermId {
        match self {
            Formula::Const(b) => tm.mk_bool(*b),
            Formula::Atom(i) => atoms[*i],
            Formula::Not(f) => {
                let t = f.build(tm, atoms);
                tm.mk_not(t)
            }
            Formula::And(fs) => {
                let args: Vec<TermId> = fs.iter().map(|f| f.build(tm, atoms)).collect();
                tm.mk_and(args)
            }
            Formula::Or(fs) => {
                let args: Vec<TermId> = fs.iter().map(|f| f.build(tm, atoms)).collect();
                tm.mk_or(args)
            }
            Formula::Implies(a, b) => {
                let a = a.build(tm, atoms);
                let b = b.build(tm, atoms);
                tm.mk_implies(a, b)
            }
            Formula::Iff(a, b) => {
                let a = a.build(tm, atoms);
                let b = b.build(tm, atoms);
                tm.mk_iff(a, b)
            }
        }
    }
}

pub fn formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        4 => (0..NUM_ATOMS).prop_map(Formula::Atom),
        1 => any::<bool>().prop_map(Formula::Const),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| Formula::Not(Box::new(f))),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Formula::And),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Formula::Or),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Formula::Implies(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| Formula::Iff(Box::new(a), Box::new(b))),
        ]
    })
}

/// Intern the atoms `p0..p{NUM_ATOMS-1}`.
pub fn atoms(tm: &mut TermManager) -> Vec<TermId> {
    let b = tm.sorts.bool_sort;
    (0..NUM_ATOMS)
        .map(|i| tm.mk_apply(&format!("p{i}"), [], b))
        .collect()
}

/// Every truth assignment to `atoms`.
pub fn interpretations(atoms: &[TermId]) -> Vec<FxHashMap<TermId, bool>> {
    (0..1u32 << atoms.len())
        .map(|bits| {
            atoms
                .iter()
                .enumerate()
                .map(|(i, &a)| (a, bits & (1 << i) != 0))
                .collect()
        })
        .collect()
}

/// A single constraint literal of a generated rule.
#[derive(Debug, Clone)]
pub enum Constraint {
    True,
    EqVar(u32, u32),
    EqConst(u32, i64),
    NotEqConst(u32, i64),
    Le(u32, i64),
    Ge(u32, i64),
    Lt(u32, u32),
    Atom(usize, bool),
}

pub fn constraint() -> impl Strategy<Value = Constraint> {
    prop_oneof![
        1 => Just(Constraint::True),
        3 => (0..NUM_VARS, 0..NUM_VARS).prop_map(|(a, b)| Constraint::EqVar(a, b)),
        3 => (0..NUM_VARS, 0..6i64).prop_map(|(v, c)| Constraint::EqConst(v, c)),
        1 => (0..NUM_VARS, 0..6i64).prop_map(|(v, c)| Constraint::NotEqConst(v, c)),
        2 => (0..NUM_VARS, 0..6i64).prop_map(|(v, c)| Constraint::Le(v, c)),
        1 => (0..NUM_VARS, 0..6i64).prop_map(|(v, c)| Constraint::Ge(v, c)),
        2 => (0..NUM_VARS, 0..NUM_VARS).prop_map(|(a, b)| Constraint::Lt(a, b)),
        2 => (0..NUM_ATOMS, any::<bool>()).prop_map(|(i, neg)| Constraint::Atom(i, neg)),
    ]
}

/// Evaluate an integer term under `env`, indexed by variable.
pub fn eval_int(tm: &TermManager, t: TermId, env: &[i64]) -> Option<i64> {
    match tm.kind(t) {
        TermKind::IntConst(n) => n.to_i64(),
        TermKind::Var(i) => env.get(*i as usize).copied(),
        TermKind::Add(args) => args.iter().try_fold(0i64, |acc, &a| Some(acc + eval_int(tm, a, env)?)),
        TermKind::Mul(args) => args.iter().try_fold(1i64, |acc, &a| Some(acc * eval_int(tm, a, env)?)),
        TermKind::Sub(a, b) => Some(eval_int(tm, *a, env)? - eval_int(tm, *b, env)?),
        TermKind::Neg(a) => Some(-eval_int(tm, *a, env)?),
        _ => None,
    }
}

/// Evaluate a Boolean term under `env` and a truth assignment to atoms.
pub fn eval_bool(
    tm: &TermManager,
    t: TermId,
    env: &[i64],
    interp: &FxHashMap<TermId, bool>,
) -> Option<bool> {
    let ev = |x: TermId| eval_bool(tm, x, env, interp);
    match tm.kind(t) {
        TermKind::True => Some(true),
        TermKind::False => Some(false),
        TermKind::Var(i) => env.get(*i as usize).map(|&v| v != 0),
        TermKind::Apply { .. } => interp.get(&t).copied(),
        TermKind::Not(a) => Some(!ev(*a)?),
        TermKind::And(args) => args.iter().try_fold(true, |acc, &a| Some(acc & ev(a)?)),
        TermKind::Or(args) => args.iter().try_fold(false, |acc, &a| Some(acc | ev(a)?)),
        TermKind::Implies(a, b) => Some(!ev(*a)? || ev(*b)?),
        TermKind::Iff(a, b) => Some(ev(*a)? == ev(*b)?),
        TermKind::Eq(a, b) if tm.is_bool(*a) => Some(ev(*a)? == ev(*b)?),
        TermKind::Eq(a, b) => Some(eval_int(tm, *a, env)? == eval_int(tm, *b, env)?),
        TermKind::Le(a, b) => Some(eval_int(tm, *a, env)? <= eval_int(tm, *b, env)?),
        TermKind::Lt(a, b) => Some(eval_int(tm, *a, env)? < eval_int(tm, *b, env)?),
        TermKind::Ge(a, b) => Some(eval_int(tm, *a, env)? >= eval_int(tm, *b, env)?),
        TermKind::Gt(a, b) => Some(eval_int(tm, *a, env)? > eval_int(tm, *b, env)?),
        _ => None,
    }
}
