//! Connective normalization.
//!
//! ## Transformations
//!
//! - `not(and(..))` and `not(or(..))` are pushed inward by De Morgan's laws.
//! - `and`/`or` nodes are flattened, their operands sorted with the
//!   [`TermComparator`] and adjacent duplicates removed.
//! - Two operands that are binary connectives of the dual kind and together
//!   encode a biconditional collapse into one equality:
//!   `(p or q) and (not p or not q)` becomes `p = not q`, and
//!   `(p or not q) and (not p or q)` becomes `p = q`. The same holds with
//!   `and`/`or` swapped.

use super::compare::TermComparator;
use crate::ast::{TermArgs, TermId, TermKind, TermManager};
use crate::rewrite::{BoolRewriter, RewriteStatus, RewriterCfg};
use tracing::trace;

/// Statistics for connective normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizerStats {
    /// Connective nodes whose operands were sorted.
    pub connectives_sorted: u64,
    /// Duplicate operands removed.
    pub duplicates_removed: u64,
    /// Operand pairs collapsed into an equality.
    pub equivalences_collapsed: u64,
    /// Negations pushed through a connective.
    pub negations_pushed: u64,
}

impl NormalizerStats {
    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Rewriter step normalizing `and`/`or`/`not` nodes.
#[derive(Debug, Clone)]
pub struct ConnectiveNormalizer {
    compare_depth: u32,
    brw: BoolRewriter,
    stats: NormalizerStats,
}

/// The two operands of a binary connective.
type ArgPair = (TermId, TermId);

impl ConnectiveNormalizer {
    /// Create a normalizer whose comparator explores `compare_depth` levels.
    pub fn new(compare_depth: u32) -> Self {
        Self {
            compare_depth,
            brw: BoolRewriter::new(),
            stats: NormalizerStats::default(),
        }
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &NormalizerStats {
        &self.stats
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn push_negation(&mut self, tm: &mut TermManager, inner: TermId) -> Option<TermId> {
        let (args, was_and): (TermArgs, bool) = match tm.kind(inner) {
            TermKind::And(args) => (args.clone(), true),
            TermKind::Or(args) => (args.clone(), false),
            _ => return None,
        };
        let negated: TermArgs = args.iter().map(|&a| self.brw.mk_not(tm, a)).collect();
        self.stats.negations_pushed += 1;
        Some(if was_and {
            tm.mk_or(negated)
        } else {
            tm.mk_and(negated)
        })
    }

    fn normalize_junction(
        &mut self,
        tm: &mut TermManager,
        node: TermId,
        is_and: bool,
    ) -> RewriteStatus {
        let mut args = TermArgs::new();
        for child in tm.children(node) {
            let nested = if is_and { tm.is_and(child) } else { tm.is_or(child) };
            match nested {
                Some(inner) => args.extend_from_slice(inner),
                None => args.push(child),
            }
        }
        if args.len() < 2 {
            return RewriteStatus::Failed;
        }

        TermComparator::new(tm, self.compare_depth).sort(&mut args);
        self.stats.connectives_sorted += 1;

        let before = args.len();
        args.dedup();
        self.stats.duplicates_removed += (before - args.len()) as u64;

        // Inside an `or` the candidate operands are binary `and`s and vice versa.
        let collapsed = self.detect_equivalences(tm, &mut args, !is_and);

        let result = if args.len() == 1 {
            args[0]
        } else if is_and {
            self.brw.mk_and(tm, &args)
        } else {
            self.brw.mk_or(tm, &args)
        };

        if collapsed {
            RewriteStatus::Rewrite1(result)
        } else {
            RewriteStatus::Done(result)
        }
    }

    /// Replace pairs of operands encoding a biconditional by an equality.
    ///
    /// At most one candidate is pending at a time; an operand that is not a
    /// candidate clears it. Returns whether anything collapsed.
    fn detect_equivalences(
        &mut self,
        tm: &mut TermManager,
        args: &mut TermArgs,
        inside_disjunction: bool,
    ) -> bool {
        let mut out = TermArgs::new();
        let mut pending: Option<(usize, ArgPair)> = None;
        let mut collapsed = false;

        for &arg in args.iter() {
            let pair = if inside_disjunction {
                tm.binary_and(arg)
            } else {
                tm.binary_or(arg)
            };
            let Some(pair) = pair else {
                pending = None;
                out.push(arg);
                continue;
            };
            if let Some((slot, prev)) = pending
                && let Some(eq) = self.detect_equivalence(tm, prev, pair, inside_disjunction)
            {
                trace!(
                    first = %tm.display(out[slot]),
                    second = %tm.display(arg),
                    result = %tm.display(eq),
                    "collapsed operand pair"
                );
                out[slot] = eq;
                pending = None;
                collapsed = true;
                self.stats.equivalences_collapsed += 1;
                continue;
            }
            pending = Some((out.len(), pair));
            out.push(arg);
        }

        *args = out;
        collapsed
    }

    fn detect_equivalence(
        &self,
        tm: &mut TermManager,
        p1: ArgPair,
        p2: ArgPair,
        inside_disjunction: bool,
    ) -> Option<TermId> {
        let first_bare = cross_match(tm, p1.0, p2.0)?;
        let second_bare = cross_match(tm, p1.1, p2.1)?;
        if !tm.is_bool(first_bare) || !tm.is_bool(second_bare) {
            return None;
        }

        let negs_together = tm.is_not(p1.0).is_some() == tm.is_not(p1.1).is_some();
        let rhs = if negs_together == inside_disjunction {
            second_bare
        } else {
            self.brw.mk_not(tm, second_bare)
        };
        Some(self.brw.mk_eq(tm, first_bare, rhs))
    }
}

/// If exactly one of `a`, `b` is the negation of the other, return the
/// un-negated one.
fn cross_match(tm: &TermManager, a: TermId, b: TermId) -> Option<TermId> {
    match (tm.is_not(a), tm.is_not(b)) {
        (Some(inner), None) if inner == b => Some(b),
        (None, Some(inner)) if inner == a => Some(a),
        _ => None,
    }
}

impl RewriterCfg for ConnectiveNormalizer {
    fn reduce_app(&mut self, tm: &mut TermManager, node: TermId) -> RewriteStatus {
        match tm.kind(node) {
            TermKind::Not(inner) => {
                let inner = *inner;
                match self.push_negation(tm, inner) {
                    Some(pushed) => RewriteStatus::Rewrite2(pushed),
                    None => RewriteStatus::Failed,
                }
            }
            TermKind::And(_) => self.normalize_junction(tm, node, true),
            TermKind::Or(_) => self.normalize_junction(tm, node, false),
            _ => RewriteStatus::Failed,
        }
    }
}
