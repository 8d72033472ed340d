//! Unified error types for the ETL pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ETL pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The flattened input carries no session key column at all.
    ///
    /// Raised by the sessionizer when a non-empty batch has no row
    /// with a `ga_session_id`. Rows individually missing the key are
    /// silently excluded; a batch-wide absence means the upstream
    /// extraction is broken and session output would be garbage.
    #[error("no session key: ga_session_id absent from every input row")]
    MissingSessionKey,

    #[error("extract error: {0}")]
    Extract(String),

    #[error("load error: {0}")]
    Load(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extract(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
