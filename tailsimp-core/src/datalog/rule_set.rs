//! Rule sets.

use super::rule::RuleRef;
use crate::ast::TermManager;
use std::fmt::Write as _;
use std::sync::Arc;

/// An unordered collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleRef>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    pub fn add(&mut self, rule: RuleRef) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleRef> {
        self.rules.iter()
    }

    /// Rule at position `i`.
    pub fn get(&self, i: usize) -> Option<&RuleRef> {
        self.rules.get(i)
    }

    /// Does the set hold this exact rule object?
    pub fn contains(&self, rule: &RuleRef) -> bool {
        self.rules.iter().any(|r| Arc::ptr_eq(r, rule))
    }

    /// Render one rule per line.
    pub fn display(&self, tm: &TermManager) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(out, "{}", rule.display(tm));
        }
        out
    }
}

impl FromIterator<RuleRef> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleRef>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleRef;
    type IntoIter = std::slice::Iter<'a, RuleRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl IntoIterator for RuleSet {
    type Item = RuleRef;
    type IntoIter = std::vec::IntoIter<RuleRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
