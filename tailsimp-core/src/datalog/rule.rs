//! Rules and the rule manager.
//!
//! A rule `head :- l1, ..., ln` is stored with its body split into a
//! relational prefix (literals over declared relations, either polarity)
//! followed by a constraint suffix (theory literals, always positive).
//! Rules are immutable and shared through [`RuleRef`].

use crate::ast::traversal::{collect_free_vars, contains_quantifier, rename_vars};
use crate::ast::{TermId, TermKind, TermManager};
use crate::error::{Result, TailsimpError};
use lasso::Spur;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable rule.
pub type RuleRef = Arc<Rule>;

/// A signed body literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The atom.
    pub atom: TermId,
    /// Whether the literal is negated.
    pub negated: bool,
}

impl Literal {
    /// A positive literal.
    pub fn positive(atom: TermId) -> Self {
        Self {
            atom,
            negated: false,
        }
    }

    /// A negative literal.
    pub fn negative(atom: TermId) -> Self {
        Self {
            atom,
            negated: true,
        }
    }

    /// Is this literal positive?
    pub fn is_positive(&self) -> bool {
        !self.negated
    }
}

/// A Horn rule.
#[derive(Debug)]
pub struct Rule {
    head: TermId,
    tail: Vec<Literal>,
    uninterpreted_len: usize,
    has_quantifiers: bool,
    max_var: Option<u32>,
    parent: Option<RuleRef>,
}

impl Rule {
    /// Head atom.
    pub fn head(&self) -> TermId {
        self.head
    }

    /// All body literals, relational prefix first.
    pub fn tail(&self) -> &[Literal] {
        &self.tail
    }

    /// Number of body literals.
    pub fn tail_len(&self) -> usize {
        self.tail.len()
    }

    /// Length of the relational prefix.
    pub fn uninterpreted_len(&self) -> usize {
        self.uninterpreted_len
    }

    /// Relational prefix of the body.
    pub fn uninterpreted_tail(&self) -> &[Literal] {
        &self.tail[..self.uninterpreted_len]
    }

    /// Constraint suffix of the body.
    pub fn interpreted_tail(&self) -> &[Literal] {
        &self.tail[self.uninterpreted_len..]
    }

    /// Is body literal `i` negated?
    pub fn is_neg_tail(&self, i: usize) -> bool {
        self.tail[i].negated
    }

    /// Does the head or body contain a quantifier?
    pub fn has_quantifiers(&self) -> bool {
        self.has_quantifiers
    }

    /// Largest variable index in the rule, `None` for a ground rule.
    pub fn max_var_index(&self) -> Option<u32> {
        self.max_var
    }

    /// Number of variable slots the rule needs.
    pub fn num_var_slots(&self) -> usize {
        self.max_var.map_or(0, |m| m as usize + 1)
    }

    /// The rule this one was derived from.
    pub fn parent(&self) -> Option<&RuleRef> {
        self.parent.as_ref()
    }

    /// Render as `head :- lit, ..., lit.`.
    pub fn display<'a>(&'a self, tm: &'a TermManager) -> RuleDisplay<'a> {
        RuleDisplay { rule: self, tm }
    }
}

/// Display adapter for [`Rule`].
pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    tm: &'a TermManager,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tm.display(self.rule.head))?;
        for (i, lit) in self.rule.tail.iter().enumerate() {
            let sep = if i == 0 { " :- " } else { ", " };
            let neg = if lit.negated { "not " } else { "" };
            write!(f, "{sep}{neg}{}", self.tm.display(lit.atom))?;
        }
        write!(f, ".")
    }
}

/// Remove duplicate body literals, keeping first occurrences.
///
/// Polarity is part of a literal's identity.
pub fn remove_duplicate_tails(tail: &mut Vec<Literal>) {
    let mut seen = FxHashSet::default();
    tail.retain(|lit| seen.insert(*lit));
}

/// Builds rules and knows which symbols are relations.
#[derive(Debug, Clone, Default)]
pub struct RuleManager {
    relations: FxHashSet<Spur>,
}

impl RuleManager {
    /// Create a rule manager with no relations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` as a relation symbol.
    pub fn declare_relation(&mut self, tm: &mut TermManager, name: &str) -> Spur {
        let sym = tm.intern_name(name);
        self.relations.insert(sym);
        sym
    }

    /// Is `sym` a declared relation?
    pub fn is_relation(&self, sym: Spur) -> bool {
        self.relations.contains(&sym)
    }

    /// Is `atom` an application of a declared relation?
    pub fn is_relational(&self, tm: &TermManager, atom: TermId) -> bool {
        match tm.kind(atom) {
            TermKind::Apply { func, .. } => self.is_relation(*func),
            _ => false,
        }
    }

    /// Build a rule, keeping variable numbering as given.
    ///
    /// Relational literals are moved in front of constraint literals, each
    /// group keeping its order. Negated constraint literals become positive
    /// `not(..)` literals.
    pub fn mk(
        &self,
        tm: &mut TermManager,
        head: TermId,
        tail: Vec<Literal>,
        parent: Option<RuleRef>,
    ) -> Result<RuleRef> {
        if !self.is_relational(tm, head) {
            return Err(TailsimpError::malformed_rule(format!(
                "head {} is not a relation atom",
                tm.display(head)
            )));
        }

        let (mut body, constraints): (Vec<Literal>, Vec<Literal>) = tail
            .into_iter()
            .partition(|lit| self.is_relational(tm, lit.atom));
        let uninterpreted_len = body.len();
        for lit in constraints {
            let atom = match (lit.negated, tm.is_not(lit.atom)) {
                (false, _) => lit.atom,
                (true, Some(inner)) => inner,
                (true, None) => tm.mk_not(lit.atom),
            };
            body.push(Literal::positive(atom));
        }

        let mut vars = Vec::new();
        let mut seen = FxHashSet::default();
        collect_free_vars(tm, head, &mut vars, &mut seen);
        for lit in &body {
            collect_free_vars(tm, lit.atom, &mut vars, &mut seen);
        }
        let has_quantifiers =
            contains_quantifier(tm, head) || body.iter().any(|l| contains_quantifier(tm, l.atom));

        Ok(Arc::new(Rule {
            head,
            tail: body,
            uninterpreted_len,
            has_quantifiers,
            max_var: vars.into_iter().max(),
            parent,
        }))
    }

    /// Build a rule and renumber its variables `0..n` in order of first
    /// occurrence, head first.
    pub fn mk_normalized(
        &self,
        tm: &mut TermManager,
        head: TermId,
        tail: Vec<Literal>,
        parent: Option<RuleRef>,
    ) -> Result<RuleRef> {
        let rule = self.mk(tm, head, tail, parent)?;
        Ok(self.normalize_vars(tm, rule))
    }

    /// Renumber the variables of `rule` contiguously from zero.
    ///
    /// Returns `rule` itself when its numbering is already normal.
    pub fn normalize_vars(&self, tm: &mut TermManager, rule: RuleRef) -> RuleRef {
        let mut vars = Vec::new();
        let mut seen = FxHashSet::default();
        collect_free_vars(tm, rule.head, &mut vars, &mut seen);
        for lit in &rule.tail {
            collect_free_vars(tm, lit.atom, &mut vars, &mut seen);
        }
        if vars.iter().enumerate().all(|(i, &v)| i as u32 == v) {
            return rule;
        }

        let map: FxHashMap<u32, u32> = vars
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new as u32))
            .collect();
        let head = rename_vars(tm, rule.head, &map);
        let tail = rule
            .tail
            .iter()
            .map(|lit| Literal {
                atom: rename_vars(tm, lit.atom, &map),
                negated: lit.negated,
            })
            .collect();

        Arc::new(Rule {
            head,
            tail,
            uninterpreted_len: rule.uninterpreted_len,
            has_quantifiers: rule.has_quantifiers,
            max_var: vars.len().checked_sub(1).map(|m| m as u32),
            parent: rule.parent.clone(),
        })
    }
}
