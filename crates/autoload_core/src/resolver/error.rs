//! Error types for pattern resolution.
//!
//! A pattern that matches nothing is not an error; these cover patterns
//! that can't be evaluated at all.

use thiserror::Error;

/// Error raised for a malformed version regex or path pattern.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The version regex doesn't compile.
    #[error("Invalid version regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern has invalid `${...}` placeholder syntax.
    #[error("Malformed pattern '{pattern}': {message}")]
    MalformedPattern { pattern: String, message: String },

    /// The substituted pattern isn't a valid glob.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ResolveError {
    /// Create a malformed pattern error.
    pub fn malformed(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
