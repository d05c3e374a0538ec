//! Rule context.

use super::rule::{Literal, RuleManager, RuleRef};
use crate::ast::{TermId, TermManager};
use crate::error::Result;
use lasso::Spur;

/// Term manager and rule manager bundled for transformers.
#[derive(Debug, Default)]
pub struct RuleContext {
    /// Terms.
    pub tm: TermManager,
    /// Rule construction.
    pub rules: RuleManager,
}

impl RuleContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a relation symbol.
    pub fn declare_relation(&mut self, name: &str) -> Spur {
        self.rules.declare_relation(&mut self.tm, name)
    }

    /// Boolean application `name(args)`.
    pub fn mk_atom(&mut self, name: &str, args: &[TermId]) -> TermId {
        let sort = self.tm.sorts.bool_sort;
        self.tm.mk_apply(name, args.iter().copied(), sort)
    }

    /// Build a rule with its variable numbering as given.
    pub fn mk_rule(&mut self, head: TermId, tail: Vec<Literal>) -> Result<RuleRef> {
        self.rules.mk(&mut self.tm, head, tail, None)
    }
}
