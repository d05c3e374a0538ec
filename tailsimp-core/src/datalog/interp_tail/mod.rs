//! Interpreted tail simplification.
//!
//! Simplifies the constraint suffix of every rule in a rule set:
//!
//! 1. The constraint literals are conjoined and simplified: local
//!    simplification, then [`ConnectiveNormalizer`], then local
//!    simplification again.
//! 2. A `false` suffix drops the rule; a `true` suffix is removed.
//! 3. Otherwise the suffix is replaced by the single simplified literal and
//!    [`VarEquivalencePropagator`] looks for variables it can eliminate. If
//!    it finds any, the reduced rule goes back to step 1.
//!
//! Each round of step 3 strictly lowers the rule's largest variable index,
//! which bounds the loop. Rules containing quantifiers are left untouched.
//!
//! # Example
//!
//! ```
//! use tailsimp_core::datalog::{InterpTailSimplifier, Literal, RuleContext, RuleSet};
//!
//! let mut ctx = RuleContext::new();
//! ctx.declare_relation("A");
//! ctx.declare_relation("Q");
//! let x = ctx.tm.mk_var(0, ctx.tm.sorts.int_sort);
//! let five = ctx.tm.mk_int(5);
//! let head = ctx.mk_atom("Q", &[x]);
//! let body = ctx.mk_atom("A", &[x]);
//! let eq = ctx.tm.mk_eq(x, five);
//! let rule = ctx
//!     .mk_rule(head, vec![Literal::positive(body), Literal::positive(eq)])
//!     .unwrap();
//!
//! let mut simplifier = InterpTailSimplifier::new();
//! let result = simplifier
//!     .run(&mut ctx, &RuleSet::from_iter([rule]))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(result.display(&ctx.tm), "(Q 5) :- (A 5).\n");
//! ```

pub mod compare;
pub mod normalizer;
pub mod propagate;

pub use compare::{DEFAULT_DEPTH, TermComparator};
pub use normalizer::{ConnectiveNormalizer, NormalizerStats};
pub use propagate::VarEquivalencePropagator;

use super::context::RuleContext;
use super::rule::{Literal, RuleRef};
use super::rule_set::RuleSet;
use super::transformer::{RuleTransformer, TransformerStats};
use crate::ast::{TermId, TermManager};
use crate::error::{Result, TailsimpError};
use crate::rewrite::{Rewriter, simplify};
use std::sync::Arc;
use tracing::debug;

/// Configuration for [`InterpTailSimplifier`].
#[derive(Debug, Clone)]
pub struct InterpTailConfig {
    /// Argument depth explored by the operand comparator.
    pub compare_depth: u32,
    /// Eliminate variables forced equal by constraints.
    pub propagate_equivalences: bool,
    /// Bind `x` and `y` when both `x <= y` and `y <= x` occur.
    pub detect_antisymmetry: bool,
    /// Position in a transformer chain.
    pub priority: u32,
}

impl Default for InterpTailConfig {
    fn default() -> Self {
        Self {
            compare_depth: DEFAULT_DEPTH,
            propagate_equivalences: true,
            detect_antisymmetry: false,
            priority: 40000,
        }
    }
}

impl InterpTailConfig {
    /// Set the comparator depth.
    pub fn with_compare_depth(mut self, depth: u32) -> Self {
        self.compare_depth = depth;
        self
    }

    /// Enable or disable variable equivalence propagation.
    pub fn with_propagate_equivalences(mut self, enabled: bool) -> Self {
        self.propagate_equivalences = enabled;
        self
    }

    /// Enable or disable antisymmetry detection.
    pub fn with_detect_antisymmetry(mut self, enabled: bool) -> Self {
        self.detect_antisymmetry = enabled;
        self
    }

    /// Set the chain priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// Statistics for interpreted tail simplification.
#[derive(Debug, Clone, Default)]
pub struct InterpTailStats {
    /// Rules handed to [`InterpTailSimplifier::transform_rule`].
    pub rules_processed: u64,
    /// Rules dropped as infeasible.
    pub rules_dropped: u64,
    /// Rules replaced by a different rule.
    pub rules_modified: u64,
    /// Constraint suffixes run through the simplification pipeline.
    pub tails_simplified: u64,
    /// Successful equivalence propagations.
    pub propagations: u64,
    /// Iterations of the per-rule simplify/propagate loop.
    pub loop_iterations: u64,
    /// Unification attempts made while propagating.
    pub unify_calls: u64,
}

impl InterpTailStats {
    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of transforming one rule.
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    /// Keep this rule, which is the input rule itself if nothing changed.
    Keep(RuleRef),
    /// The rule can never fire.
    Drop,
}

/// Simplifier for the constraint suffix of rules.
#[derive(Debug)]
pub struct InterpTailSimplifier {
    config: InterpTailConfig,
    stats: InterpTailStats,
    normalizer_stats: NormalizerStats,
    transformer_stats: TransformerStats,
    propagator: VarEquivalencePropagator,
}

impl InterpTailSimplifier {
    /// Create a simplifier with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InterpTailConfig::default())
    }

    /// Create a simplifier with a custom configuration.
    pub fn with_config(config: InterpTailConfig) -> Self {
        let propagator = VarEquivalencePropagator::new(config.detect_antisymmetry);
        Self {
            config,
            stats: InterpTailStats::default(),
            normalizer_stats: NormalizerStats::default(),
            transformer_stats: TransformerStats::default(),
            propagator,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &InterpTailConfig {
        &self.config
    }

    /// Simplification statistics.
    pub fn interp_stats(&self) -> &InterpTailStats {
        &self.stats
    }

    /// Normalization statistics, summed over all pipeline runs.
    pub fn normalizer_stats(&self) -> &NormalizerStats {
        &self.normalizer_stats
    }

    /// Run the simplification pipeline on `term`.
    pub fn simplify_expr(&mut self, tm: &mut TermManager, term: TermId) -> TermId {
        let simplified = simplify(tm, term);
        let mut rewriter = Rewriter::new(ConnectiveNormalizer::new(self.config.compare_depth));
        let normalized = rewriter.rewrite(tm, simplified);

        let run = rewriter.cfg().stats();
        self.normalizer_stats.connectives_sorted += run.connectives_sorted;
        self.normalizer_stats.duplicates_removed += run.duplicates_removed;
        self.normalizer_stats.equivalences_collapsed += run.equivalences_collapsed;
        self.normalizer_stats.negations_pushed += run.negations_pushed;

        simplify(tm, normalized)
    }

    /// Transform a single rule.
    pub fn transform_rule(&mut self, ctx: &mut RuleContext, rule: &RuleRef) -> Result<RuleOutcome> {
        self.stats.rules_processed += 1;
        if rule.has_quantifiers() {
            return Ok(RuleOutcome::Keep(Arc::clone(rule)));
        }

        let mut current = Arc::clone(rule);
        loop {
            self.stats.loop_iterations += 1;

            let constraints = current.interpreted_tail();
            if constraints.is_empty() {
                return Ok(RuleOutcome::Keep(current));
            }
            let mut modified = constraints.len() > 1;
            let conjoined = match constraints {
                [single] => single.atom,
                _ => ctx.tm.mk_and(constraints.iter().map(|lit| lit.atom)),
            };

            let simplified = self.simplify_expr(&mut ctx.tm, conjoined);
            self.stats.tails_simplified += 1;
            modified |= simplified != conjoined;

            if !ctx.tm.is_bool(simplified) {
                return Err(TailsimpError::NonBooleanTail {
                    term: ctx.tm.display(simplified).to_string(),
                });
            }
            let constraint = if ctx.tm.is_app(simplified) {
                simplified
            } else {
                let t = ctx.tm.mk_true();
                ctx.tm.mk_eq(simplified, t)
            };

            if ctx.tm.is_false(constraint) {
                debug!(rule = %current.display(&ctx.tm), "dropping infeasible rule");
                self.stats.rules_dropped += 1;
                return Ok(RuleOutcome::Drop);
            }

            let mut tail: Vec<Literal> = current.uninterpreted_tail().to_vec();
            if ctx.tm.is_true(constraint) {
                modified = true;
            } else {
                tail.push(Literal::positive(constraint));
            }

            let rebuilt = if modified {
                ctx.rules
                    .mk_normalized(&mut ctx.tm, current.head(), tail, Some(Arc::clone(&current)))?
            } else {
                Arc::clone(&current)
            };

            if !self.config.propagate_equivalences {
                return Ok(RuleOutcome::Keep(rebuilt));
            }

            let calls_before = self.propagator.unify_calls();
            let propagated = self.propagator.propagate(&mut ctx.tm, &ctx.rules, &rebuilt)?;
            self.stats.unify_calls += self.propagator.unify_calls() - calls_before;

            match propagated {
                Some(reduced) => {
                    if reduced.max_var_index() >= rebuilt.max_var_index() {
                        return Err(TailsimpError::internal(format!(
                            "propagation did not eliminate a variable: {} became {}",
                            rebuilt.display(&ctx.tm),
                            reduced.display(&ctx.tm)
                        )));
                    }
                    self.stats.propagations += 1;
                    current = reduced;
                }
                None => return Ok(RuleOutcome::Keep(rebuilt)),
            }
        }
    }

    /// Transform every rule of `source`.
    ///
    /// Returns the transformed rules and whether anything changed.
    pub fn transform_rules(
        &mut self,
        ctx: &mut RuleContext,
        source: &RuleSet,
    ) -> Result<(RuleSet, bool)> {
        let mut target = RuleSet::new();
        let mut modified = false;
        for rule in source {
            match self.transform_rule(ctx, rule)? {
                RuleOutcome::Keep(new_rule) => {
                    if !Arc::ptr_eq(&new_rule, rule) {
                        modified = true;
                        self.stats.rules_modified += 1;
                        debug!(
                            old = %rule.display(&ctx.tm),
                            new = %new_rule.display(&ctx.tm),
                            "rule simplified"
                        );
                    }
                    target.add(new_rule);
                }
                RuleOutcome::Drop => modified = true,
            }
        }
        debug!(
            rules_in = source.len(),
            rules_out = target.len(),
            modified,
            "interpreted tail simplification pass finished"
        );
        Ok((target, modified))
    }

    /// Transform `source`, returning `None` when it is empty or unchanged.
    pub fn run(&mut self, ctx: &mut RuleContext, source: &RuleSet) -> Result<Option<RuleSet>> {
        if source.is_empty() {
            return Ok(None);
        }
        let (target, modified) = self.transform_rules(ctx, source)?;
        Ok(modified.then_some(target))
    }
}

impl Default for InterpTailSimplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTransformer for InterpTailSimplifier {
    fn name(&self) -> &str {
        "interp-tail-simplifier"
    }

    fn priority(&self) -> u32 {
        self.config.priority
    }

    fn apply(&mut self, ctx: &mut RuleContext, source: &RuleSet) -> Result<Option<RuleSet>> {
        self.transformer_stats.applications += 1;
        self.transformer_stats.rules_in += source.len() as u64;
        let result = self.run(ctx, source)?;
        match &result {
            Some(target) => {
                self.transformer_stats.modifications += 1;
                self.transformer_stats.rules_out += target.len() as u64;
            }
            None => self.transformer_stats.rules_out += source.len() as u64,
        }
        Ok(result)
    }

    fn reset(&mut self) {
        self.stats.reset();
        self.normalizer_stats.reset();
        self.transformer_stats.reset();
        self.propagator.reset_stats();
    }

    fn stats(&self) -> TransformerStats {
        self.transformer_stats.clone()
    }
}
