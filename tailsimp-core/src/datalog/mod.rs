//! Datalog rules and rule-set transformations.
//!
//! A [`Rule`] is a head atom and a body of literals. Body literals over
//! declared relations come first; the remaining literals are constraints
//! interpreted by the term language, the rule's *interpreted tail*.
//! [`InterpTailSimplifier`] is a [`RuleTransformer`] that simplifies those
//! constraints, drops rules that can never fire and eliminates variables
//! forced equal.

pub mod context;
pub mod interp_tail;
pub mod rule;
pub mod rule_set;
pub mod rule_substitution;
pub mod transformer;

pub use context::RuleContext;
pub use interp_tail::{
    ConnectiveNormalizer, InterpTailConfig, InterpTailSimplifier, InterpTailStats,
    NormalizerStats, RuleOutcome, TermComparator, VarEquivalencePropagator,
};
pub use rule::{Literal, Rule, RuleDisplay, RuleManager, RuleRef, remove_duplicate_tails};
pub use rule_set::RuleSet;
pub use rule_substitution::RuleSubstitution;
pub use transformer::{RuleTransformer, TransformerChain, TransformerStats};
