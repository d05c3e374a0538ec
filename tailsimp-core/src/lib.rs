//! Tailsimp - Interpreted Tail Simplification for Datalog Rules
//!
//! This crate simplifies the constraint part of Datalog rules:
//! - Hash-consed terms with efficient [`TermId`](ast::TermId) references
//! - A bottom-up rewrite engine with local Boolean and integer simplification
//! - A canonical, negation-aware ordering of connective operands
//! - Syntactic unification with transactional substitutions
//! - A rule-set transformer that drops infeasible rules and eliminates
//!   variables forced equal by their constraints
//!
//! # Examples
//!
//! ## Simplifying Terms
//!
//! ```
//! use tailsimp_core::ast::TermManager;
//!
//! let mut tm = TermManager::new();
//! let p = tm.mk_apply("p", [], tm.sorts.bool_sort);
//! let np = tm.mk_not(p);
//! let conj = tm.mk_and([p, np]);
//! let f = tm.mk_false();
//! assert_eq!(tm.simplify(conj), f);
//! ```
//!
//! ## Transforming Rules
//!
//! ```
//! use tailsimp_core::datalog::{InterpTailSimplifier, Literal, RuleContext, RuleSet};
//!
//! let mut ctx = RuleContext::new();
//! ctx.declare_relation("A");
//! ctx.declare_relation("Q");
//! let x = ctx.tm.mk_var(0, ctx.tm.sorts.int_sort);
//! let one = ctx.tm.mk_int(1);
//! let two = ctx.tm.mk_int(2);
//! let head = ctx.mk_atom("Q", &[x]);
//! let body = ctx.mk_atom("A", &[x]);
//! let eq1 = ctx.tm.mk_eq(x, one);
//! let eq2 = ctx.tm.mk_eq(x, two);
//! let tail = vec![Literal::positive(body), Literal::positive(eq1), Literal::positive(eq2)];
//! let rule = ctx.mk_rule(head, tail).unwrap();
//!
//! let mut simplifier = InterpTailSimplifier::new();
//! let result = simplifier.run(&mut ctx, &RuleSet::from_iter([rule])).unwrap();
//! // x = 1 and x = 2 cannot both hold.
//! assert!(result.unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod datalog;
pub mod error;
pub mod rewrite;
pub mod sort;
pub mod unify;

pub use ast::{TermId, TermKind, TermManager};
pub use datalog::{
    InterpTailConfig, InterpTailSimplifier, Literal, Rule, RuleContext, RuleRef, RuleSet,
    RuleTransformer, TransformerChain,
};
pub use error::{Result, TailsimpError};
pub use sort::{SortId, SortManager};
