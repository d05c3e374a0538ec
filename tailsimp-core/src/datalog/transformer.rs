//! Rule-set transformers.
//!
//! A [`RuleTransformer`] maps a rule set to a new one, or reports that it
//! has nothing to change. A [`TransformerChain`] runs several of them in
//! priority order.

use super::context::RuleContext;
use super::rule_set::RuleSet;
use crate::error::Result;
use std::cmp::Reverse;
use tracing::debug;

/// Statistics for transformer application.
#[derive(Debug, Clone, Default)]
pub struct TransformerStats {
    /// Number of times the transformer was applied.
    pub applications: u64,
    /// Number of applications that changed the rule set.
    pub modifications: u64,
    /// Rules seen on input.
    pub rules_in: u64,
    /// Rules produced on output.
    pub rules_out: u64,
}

impl TransformerStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of applications that changed something.
    pub fn modification_rate(&self) -> f64 {
        if self.applications == 0 {
            0.0
        } else {
            self.modifications as f64 / self.applications as f64
        }
    }
}

/// A transformation over rule sets.
pub trait RuleTransformer {
    /// Name of this transformer.
    fn name(&self) -> &str;

    /// Position in a [`TransformerChain`]; higher runs first.
    fn priority(&self) -> u32 {
        0
    }

    /// Transform `source`.
    ///
    /// Returns `Ok(None)` when nothing changed, so callers can keep using
    /// `source`.
    fn apply(&mut self, ctx: &mut RuleContext, source: &RuleSet) -> Result<Option<RuleSet>>;

    /// Reset internal state and statistics.
    fn reset(&mut self) {
        // Default: no-op
    }

    /// Statistics for this transformer.
    fn stats(&self) -> TransformerStats {
        TransformerStats::default()
    }
}

/// Runs transformers by descending priority.
pub struct TransformerChain {
    transformers: Vec<Box<dyn RuleTransformer>>,
    max_rounds: usize,
}

impl TransformerChain {
    /// Create an empty chain that runs a single round.
    pub fn new() -> Self {
        Self {
            transformers: Vec::new(),
            max_rounds: 1,
        }
    }

    /// Repeat the whole chain until nothing changes, at most `rounds` times.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    /// Register a transformer.
    pub fn register(&mut self, transformer: Box<dyn RuleTransformer>) {
        self.transformers.push(transformer);
        self.transformers.sort_by_key(|t| Reverse(t.priority()));
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Is the chain empty?
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Transformer names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    /// Run the chain over `source`.
    ///
    /// Returns the final rule set and whether any transformer changed it.
    pub fn run(&mut self, ctx: &mut RuleContext, source: RuleSet) -> Result<(RuleSet, bool)> {
        let mut current = source;
        let mut changed = false;
        for round in 0..self.max_rounds {
            let mut round_changed = false;
            for transformer in &mut self.transformers {
                if let Some(next) = transformer.apply(ctx, &current)? {
                    debug!(
                        transformer = transformer.name(),
                        round,
                        rules_before = current.len(),
                        rules_after = next.len(),
                        "rule set transformed"
                    );
                    current = next;
                    round_changed = true;
                }
            }
            if !round_changed {
                break;
            }
            changed = true;
        }
        Ok((current, changed))
    }
}

impl Default for TransformerChain {
    fn default() -> Self {
        Self::new()
    }
}
