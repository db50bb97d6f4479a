//! Value-model error types.

use thiserror::Error;

/// Errors raised by fallible value construction.
#[derive(Debug, Error)]
pub enum ValueError {
    /// A regexp flag outside the recognized set.
    #[error("invalid regular expression flag `{0}`")]
    InvalidRegExpFlag(char),

    /// A regexp flag given more than once.
    #[error("duplicate regular expression flag `{0}`")]
    DuplicateRegExpFlag(char),

    /// The pattern failed to compile.
    #[error("invalid regular expression: {0}")]
    RegExpSyntax(#[from] regex::Error),

    /// A date timestamp that cannot be represented as a calendar instant.
    #[error("invalid time value: {0}")]
    InvalidTimestamp(f64),
}

/// Result type for value-model operations.
pub type ValueResult<T> = std::result::Result<T, ValueError>;
