//! Sub-builders and sub-query embedding.
//!
//! Groups and sub-selects are filled on a fresh child builder. Once the
//! child is complete its clauses and bindings are moved into the parent,
//! so no child keeps a reference to the parent.

use std::fmt;

use super::clause::ColumnRef;
use super::query::{Query, QueryBuilder};
use super::value::SqlValue;
use crate::error::{QueryError, Result};

/// A callback that fills a child builder.
pub type Callback<'a> = Box<dyn FnOnce(&mut QueryBuilder) -> Result<()> + 'a>;

/// Everything that can be embedded as a sub-query.
pub enum Subquery<'a> {
    /// Literal SQL text.
    Raw(String),
    /// A callback run against a fresh sub-select builder.
    Callback(Callback<'a>),
    /// A builder filled elsewhere.
    Builder(Box<QueryBuilder>),
}

impl<'a> Subquery<'a> {
    /// Wraps literal SQL text.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Wraps a callback.
    pub fn callback<F>(callback: F) -> Self
    where
        F: FnOnce(&mut QueryBuilder) -> Result<()> + 'a,
    {
        Self::Callback(Box::new(callback))
    }

    /// Wraps a finished builder.
    #[must_use]
    pub fn builder(builder: QueryBuilder) -> Self {
        Self::Builder(Box::new(builder))
    }
}

impl From<QueryBuilder> for Subquery<'_> {
    fn from(builder: QueryBuilder) -> Self {
        Self::builder(builder)
    }
}

impl fmt::Debug for Subquery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(sql) => f.debug_tuple("Raw").field(sql).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Builder(builder) => f.debug_tuple("Builder").field(builder).finish(),
        }
    }
}

/// A sub-query ready to be embedded in a parent clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSub {
    /// The expression standing for the sub-query.
    pub expr: ColumnRef,
    /// The sub-query's own bindings, flattened.
    pub bindings: Vec<SqlValue>,
    /// Bindings the parent already held before this sub-query.
    pub offset: usize,
    /// `offset` plus the sub-query's binding count: the position of the
    /// value compared against the sub-query.
    pub where_offset: usize,
}

impl QueryBuilder {
    /// Creates the child builder for a parenthesized group.
    ///
    /// The child targets the same table and starts with no clauses.
    #[must_use]
    pub fn for_nested_where(&self) -> Self {
        Self {
            query: Query {
                from: self.query.from.clone(),
                ..Query::default()
            },
            options: self.options.clone(),
        }
    }

    /// Creates an independent builder for a sub-select.
    #[must_use]
    pub fn for_sub_query(&self) -> Self {
        Self {
            query: Query::default(),
            options: self.options.clone(),
        }
    }

    /// Builds `sub` if it is a callback, then parses it.
    ///
    /// # Errors
    ///
    /// Propagates errors from the callback and from [`Self::parse_sub`].
    pub fn create_sub(&self, sub: Subquery<'_>) -> Result<ParsedSub> {
        match sub {
            Subquery::Callback(callback) => {
                let mut child = self.for_sub_query();
                callback(&mut child)?;
                self.parse_sub(Subquery::builder(child))
            }
            other => self.parse_sub(other),
        }
    }

    /// Turns a sub-query into an embeddable expression plus its bindings.
    ///
    /// The offsets are computed against this builder's current bindings.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] for empty SQL text.
    pub fn parse_sub(&self, sub: Subquery<'_>) -> Result<ParsedSub> {
        let offset = self.query.bindings.len();
        match sub {
            Subquery::Builder(builder) => {
                let bindings = builder.get_bindings();
                let where_offset = offset + bindings.len();
                Ok(ParsedSub {
                    expr: ColumnRef::Subquery(Box::new(builder.into_query())),
                    bindings,
                    offset,
                    where_offset,
                })
            }
            Subquery::Raw(sql) => {
                if sql.trim().is_empty() {
                    return Err(QueryError::classification("a raw subquery cannot be empty"));
                }
                Ok(ParsedSub {
                    expr: ColumnRef::Raw(format!("({sql})")),
                    bindings: vec![],
                    offset,
                    where_offset: offset,
                })
            }
            Subquery::Callback(callback) => self.create_sub(Subquery::Callback(callback)),
        }
    }
}
