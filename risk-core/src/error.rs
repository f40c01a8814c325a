//! Error types for the risk core

use crate::rules::RuleId;
use thiserror::Error;

/// Risk core error
#[derive(Debug, Error)]
pub enum Error {
    /// A rule id was requested that is not registered in the catalog.
    /// This is a code/config mismatch, not a runtime condition; callers
    /// must not catch and retry it.
    #[error("unknown rule id: {0:?}")]
    UnknownRule(RuleId),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
