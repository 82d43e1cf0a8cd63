//! Claim-mapping error types.
//!
//! Every failure names the offending claim so administrators can find
//! the broken expression; messages never include claim values.

use thiserror::Error;

/// Errors from compiling or evaluating claim mappings.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Expression source failed to parse.
    #[error("invalid expression for claim '{claim}': {message}")]
    Compile {
        /// Claim whose expression is malformed.
        claim: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Expression references a variable outside the declared input set.
    #[error("expression for claim '{claim}' references undeclared variable '{variable}'")]
    UndeclaredReference {
        /// Claim whose expression is invalid.
        claim: String,
        /// The undeclared variable.
        variable: String,
    },

    /// Expression failed at evaluation time.
    #[error("evaluation failed for claim '{claim}': {message}")]
    Eval {
        /// Claim whose expression failed.
        claim: String,
        /// Evaluator diagnostic.
        message: String,
    },

    /// Expression produced a value that cannot be embedded in a JWT claim.
    #[error("expression for claim '{claim}' produced a value not representable as a JWT claim")]
    UnsupportedType {
        /// Claim whose expression produced the value.
        claim: String,
    },

    /// The shared evaluation context could not be built.
    #[error("failed to build evaluation context: {0}")]
    Context(String),
}

impl ClaimsError {
    /// Creates a compile error for a claim.
    #[must_use]
    pub fn compile(claim: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            claim: claim.into(),
            message: message.into(),
        }
    }

    /// Creates an evaluation error for a claim.
    #[must_use]
    pub fn eval(claim: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Eval {
            claim: claim.into(),
            message: message.into(),
        }
    }

    /// Whether this is a compile-time rejection (as opposed to an
    /// evaluation failure).
    #[must_use]
    pub const fn is_compile(&self) -> bool {
        matches!(self, Self::Compile { .. } | Self::UndeclaredReference { .. })
    }
}

/// Result type for claim-mapping operations.
pub type ClaimsResult<T> = Result<T, ClaimsError>;
