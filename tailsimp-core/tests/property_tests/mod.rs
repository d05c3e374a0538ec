//! Property-based tests for tailsimp-core
//!
//! This module uses proptest to check the operand ordering, the
//! simplification pipeline and the rule-set transformer against brute-force
//! evaluation.

mod comparator_properties;
mod simplify_properties;
mod strategies;
mod transform_properties;
