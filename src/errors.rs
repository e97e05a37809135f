//! Error type for the phispace pipeline.
//!
//! Only the outer surfaces and strict parsing can fail. Undefined associations,
//! empty input and short neighbor lists are regular outcomes, not errors.

use thiserror::Error;

/// Errors produced while reading, configuring or parsing a run.
#[derive(Debug, Error)]
pub enum PhiError {
    /// A raw line did not split into exactly two non-empty tokens.
    #[error("malformed record at line {line}: {reason} ({content:?})")]
    MalformedRecord {
        /// 1-based line number in the input sequence
        line: usize,
        /// The offending raw line
        content: String,
        /// What was wrong with it
        reason: String,
    },

    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {param} = {value} ({constraint})")]
    InvalidConfig {
        param: String,
        value: String,
        constraint: String,
    },

    /// More distinct users than the interaction index can address.
    #[error("too many distinct users: at most {limit} are supported")]
    TooManyUsers { limit: u64 },

    /// JSON configuration could not be decoded, or output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PhiError {
    pub(crate) fn invalid_config(
        param: &str,
        value: impl ToString,
        constraint: &str,
    ) -> Self {
        PhiError::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}
