//! Term Rewriting Engine.
//!
//! A generic bottom-up rewriter parameterised by a [`RewriterCfg`], which
//! supplies the per-node reduction step. After a node's children have been
//! rewritten the node is rebuilt and handed to
//! [`RewriterCfg::reduce_app`], whose [`RewriteStatus`] tells the engine how
//! much of the result needs another look.
//!
//! # Depth convention
//!
//! Visiting a term at depth `d` reduces `d` levels of it: depth 1 reduces
//! only the root, depth 2 the root and its immediate children, and
//! [`FULL_DEPTH`] the whole term. Only full-depth visits are cached.

pub mod bool_rewriter;
pub mod simplifier;

use crate::ast::{TermArgs, TermId, TermManager};
use rustc_hash::FxHashMap;
use tracing::warn;

pub use bool_rewriter::BoolRewriter;
pub use simplifier::{LocalSimplifier, simplify};

/// Depth marker for an unbounded bottom-up visit.
pub const FULL_DEPTH: u32 = u32::MAX;

/// Outcome of reducing a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStatus {
    /// No rule applied; keep the node.
    Failed,
    /// The node was replaced by a term that needs no further work.
    Done(TermId),
    /// The root of the result must be reduced again.
    Rewrite1(TermId),
    /// The root of the result and its immediate children must be reduced again.
    Rewrite2(TermId),
    /// The whole result must be rewritten again.
    RewriteFull(TermId),
}

impl RewriteStatus {
    /// The resulting term, unless no rule applied.
    pub fn term(&self) -> Option<TermId> {
        match self {
            RewriteStatus::Failed => None,
            RewriteStatus::Done(t)
            | RewriteStatus::Rewrite1(t)
            | RewriteStatus::Rewrite2(t)
            | RewriteStatus::RewriteFull(t) => Some(*t),
        }
    }

    /// Does the engine have to revisit the result?
    pub fn needs_revisit(&self) -> bool {
        matches!(
            self,
            RewriteStatus::Rewrite1(_) | RewriteStatus::Rewrite2(_) | RewriteStatus::RewriteFull(_)
        )
    }
}

/// Per-node reduction step plugged into a [`Rewriter`].
pub trait RewriterCfg {
    /// Reduce `node`, whose children have already been rewritten.
    fn reduce_app(&mut self, tm: &mut TermManager, node: TermId) -> RewriteStatus;
}

/// Statistics for rewriting operations.
#[derive(Debug, Clone, Default)]
pub struct RewriteStats {
    /// Number of terms visited (including unchanged).
    pub terms_visited: u64,
    /// Number of reductions that produced a different term.
    pub terms_rewritten: u64,
    /// Number of cache hits.
    pub cache_hits: u64,
    /// Number of cache misses.
    pub cache_misses: u64,
    /// Number of nodes left unreduced because the step budget ran out.
    pub budget_skips: u64,
}

impl RewriteStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compute cache hit rate.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// Configuration for rewriting.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// Enable caching of full-depth rewrite results.
    pub enable_cache: bool,
    /// Maximum number of reduction steps per call to [`Rewriter::rewrite`].
    pub max_steps: u64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            max_steps: 1_000_000,
        }
    }
}

/// Bottom-up rewriter driven by a [`RewriterCfg`].
#[derive(Debug)]
pub struct Rewriter<C> {
    cfg: C,
    config: RewriteConfig,
    cache: FxHashMap<TermId, TermId>,
    stats: RewriteStats,
    steps: u64,
    budget_warned: bool,
}

impl<C: RewriterCfg> Rewriter<C> {
    /// Create a rewriter with the default configuration.
    pub fn new(cfg: C) -> Self {
        Self::with_config(cfg, RewriteConfig::default())
    }

    /// Create a rewriter with a custom configuration.
    pub fn with_config(cfg: C, config: RewriteConfig) -> Self {
        Self {
            cfg,
            config,
            cache: FxHashMap::default(),
            stats: RewriteStats::default(),
            steps: 0,
            budget_warned: false,
        }
    }

    /// The reduction step.
    pub fn cfg(&self) -> &C {
        &self.cfg
    }

    /// The reduction step, mutably.
    pub fn cfg_mut(&mut self) -> &mut C {
        &mut self.cfg
    }

    /// Consume the rewriter, returning its reduction step.
    pub fn into_cfg(self) -> C {
        self.cfg
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Drop cached results and statistics.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.stats.reset();
        self.steps = 0;
        self.budget_warned = false;
    }

    /// Rewrite `term` bottom-up until every node is stable.
    pub fn rewrite(&mut self, tm: &mut TermManager, term: TermId) -> TermId {
        self.steps = 0;
        self.budget_warned = false;
        self.visit(tm, term, FULL_DEPTH)
    }

    fn visit(&mut self, tm: &mut TermManager, term: TermId, depth: u32) -> TermId {
        if depth == 0 {
            return term;
        }
        self.stats.terms_visited += 1;

        let cacheable = depth == FULL_DEPTH && self.config.enable_cache;
        if cacheable {
            if let Some(&cached) = self.cache.get(&term) {
                self.stats.cache_hits += 1;
                return cached;
            }
            self.stats.cache_misses += 1;
        }

        let result = self.visit_node(tm, term, depth);
        if cacheable {
            self.cache.insert(term, result);
        }
        result
    }

    fn visit_node(&mut self, tm: &mut TermManager, term: TermId, depth: u32) -> TermId {
        let children = tm.children(term);
        let node = if children.is_empty() {
            term
        } else {
            let child_depth = if depth == FULL_DEPTH { FULL_DEPTH } else { depth - 1 };
            let new_children: TermArgs = children
                .iter()
                .map(|&c| self.visit(tm, c, child_depth))
                .collect();
            tm.rebuild(term, &new_children)
        };

        if self.steps >= self.config.max_steps {
            self.stats.budget_skips += 1;
            if !self.budget_warned {
                self.budget_warned = true;
                warn!(
                    max_steps = self.config.max_steps,
                    "rewrite step budget exhausted, leaving remaining nodes unreduced"
                );
            }
            return node;
        }
        self.steps += 1;

        let status = self.cfg.reduce_app(tm, node);
        if let Some(result) = status.term()
            && result != node
        {
            self.stats.terms_rewritten += 1;
        }
        match status {
            RewriteStatus::Failed => node,
            RewriteStatus::Done(result) => result,
            RewriteStatus::Rewrite1(result) => self.visit(tm, result, 1),
            RewriteStatus::Rewrite2(result) => self.visit(tm, result, 2),
            RewriteStatus::RewriteFull(result) => self.visit(tm, result, FULL_DEPTH),
        }
    }
}
