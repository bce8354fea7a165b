//! Builder configuration.
//!
//! Applications usually keep the dialect and clause defaults in a JSON
//! document next to the rest of their settings:
//!
//! ```rust
//! use sqlweave_core::config::{BuilderConfig, DialectKind};
//!
//! let config = BuilderConfig::from_json(r#"{"dialect": "sqlite", "connective": "or"}"#).unwrap();
//! assert_eq!(config.dialect, DialectKind::Sqlite);
//! assert_eq!(config.operator, "=");
//! ```

use serde::{Deserialize, Serialize};

use crate::builder::{Connective, WhereOptions, DEFAULT_OFFSET, DEFAULT_OPERATOR};
use crate::error::{QueryError, Result};
use crate::grammar::{Grammar, PostgresGrammar, SqliteGrammar};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// PostgreSQL.
    #[default]
    #[serde(alias = "postgresql")]
    Postgres,
    /// SQLite.
    Sqlite,
}

/// Dialect and where-clause defaults for new builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Target dialect.
    pub dialect: DialectKind,
    /// Operator used when a call omits one.
    pub operator: String,
    /// Connective used when a call omits one.
    pub connective: Connective,
    /// Binding offset used when a call omits one.
    pub offset: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::default(),
            operator: String::from(DEFAULT_OPERATOR),
            connective: Connective::And,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl BuilderConfig {
    /// Parses a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Json`] for malformed input and
    /// [`QueryError::Config`] when the default operator is empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Config`] when the default operator is empty.
    pub fn validate(&self) -> Result<()> {
        if self.operator.trim().is_empty() {
            return Err(QueryError::Config(String::from(
                "default operator cannot be empty",
            )));
        }
        Ok(())
    }

    /// Returns the where-clause defaults.
    #[must_use]
    pub fn where_options(&self) -> WhereOptions {
        WhereOptions {
            operator: self.operator.clone(),
            connective: self.connective,
            offset: self.offset,
        }
    }

    /// Returns the grammar for the configured dialect.
    #[must_use]
    pub fn grammar(&self) -> Box<dyn Grammar> {
        match self.dialect {
            DialectKind::Postgres => Box::new(PostgresGrammar::new()),
            DialectKind::Sqlite => Box::new(SqliteGrammar::new()),
        }
    }
}
