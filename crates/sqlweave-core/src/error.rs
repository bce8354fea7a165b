//! Error types for clause building and SQL rendering.

use thiserror::Error;

/// Message used when a sub-query argument is not buildable.
pub const SUBQUERY_SHAPE: &str =
    "a subquery must be one of: query builder, callback, or literal SQL text";

/// Errors raised while building or rendering a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The arguments of a where call match none of the known call shapes.
    #[error("invalid where clause: {0}")]
    Classification(String),

    /// The operator is known neither to the generic set nor to the dialect.
    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    /// The dialect cannot express the requested construct.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid builder configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failed to parse JSON input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Creates a classification error.
    #[must_use]
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }
}

/// Result type alias for query building.
pub type Result<T> = std::result::Result<T, QueryError>;
