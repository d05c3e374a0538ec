//! Error types for tailsimp.
//!
//! Only two kinds of outcome exist while simplifying rules: a rule whose
//! constraints are infeasible (a normal result, reported as a dropped rule)
//! and a broken invariant (reported here). Errors marked fatal abort the
//! whole rule-set pass.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TailsimpError>;

/// Errors raised by the simplifier and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TailsimpError {
    /// The constraint suffix of a rule simplified to a non-boolean term.
    ///
    /// Theory literals must always simplify to boolean terms; seeing anything
    /// else means an upstream component built an ill-sorted constraint.
    #[error("simplification of interpreted tail produced non-boolean term {term}")]
    NonBooleanTail {
        /// Rendering of the offending term.
        term: String,
    },

    /// A rule could not be constructed from the given head and body.
    #[error("malformed rule: {0}")]
    MalformedRule(String),

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TailsimpError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TailsimpError::Internal(message.into())
    }

    /// Create a malformed-rule error.
    pub fn malformed_rule(message: impl Into<String>) -> Self {
        TailsimpError::MalformedRule(message.into())
    }

    /// Whether this error signals a bug rather than bad input.
    ///
    /// Fatal errors are never retried and must not be swallowed by callers
    /// iterating over a rule set.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TailsimpError::NonBooleanTail { .. } | TailsimpError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let non_bool = TailsimpError::NonBooleanTail {
            term: "(+ #0 1)".to_string(),
        };
        assert!(non_bool.is_fatal());
        assert!(TailsimpError::internal("broken").is_fatal());
        assert!(!TailsimpError::malformed_rule("bad head").is_fatal());
    }

    #[test]
    fn test_display() {
        let err = TailsimpError::NonBooleanTail {
            term: "5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "simplification of interpreted tail produced non-boolean term 5"
        );
        assert_eq!(
            TailsimpError::internal("oops").to_string(),
            "internal error: oops"
        );
    }
}
