//! The accumulated query and its fluent builder.

use super::args::WhereOptions;
use super::bindings::Bindings;
use super::clause::WhereClause;
use super::value::SqlValue;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::grammar::Grammar;

/// Structured state of a SELECT: target, select list, clause tree, bindings.
///
/// Clauses are only ever appended. Rendering reads the tree, it never
/// rewrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Selected columns; empty means `*`.
    pub columns: Vec<String>,
    /// Target table.
    pub from: Option<String>,
    /// WHERE clause nodes in source order.
    pub wheres: Vec<WhereClause>,
    /// Bound values.
    pub bindings: Bindings,
    /// LIMIT, if any.
    pub limit: Option<u64>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no clause has been added.
    #[must_use]
    pub fn has_wheres(&self) -> bool {
        !self.wheres.is_empty()
    }
}

/// Fluent builder accumulating a [`Query`].
///
/// A builder is not meant to be shared across threads while clauses are
/// being added. Groups and sub-selects are built on independent child
/// builders whose results are moved into this one.
///
/// ```rust
/// use sqlweave_core::builder::QueryBuilder;
/// use sqlweave_core::grammar::PostgresGrammar;
///
/// # fn main() -> sqlweave_core::Result<()> {
/// let mut qb = QueryBuilder::table("users");
/// qb.where_eq("active", true)?
///     .where_group(|q| {
///         q.where_op("age", ">", 18)?.or_where_eq("verified", true)?;
///         Ok(())
///     })?;
///
/// let (sql, params) = qb.to_sql(&PostgresGrammar::new())?;
/// assert_eq!(
///     sql,
///     r#"SELECT * FROM "users" WHERE "active" = $1 AND ("age" > $2 OR "verified" = $3)"#
/// );
/// assert_eq!(params.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) query: Query,
    pub(crate) options: WhereOptions,
}

impl QueryBuilder {
    /// Creates a builder with no target table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder targeting `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        let mut builder = Self::new();
        builder.query.from = Some(String::from(table));
        builder
    }

    /// Creates a builder using the defaults from `config`.
    #[must_use]
    pub fn with_config(config: &BuilderConfig) -> Self {
        Self {
            query: Query::new(),
            options: config.where_options(),
        }
    }

    /// Sets the target table.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.query.from = Some(String::from(table));
        self
    }

    /// Sets the select list.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.query.columns = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Sets LIMIT.
    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.query.limit = Some(n);
        self
    }

    /// Returns the accumulated query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Consumes the builder and returns the accumulated query.
    #[must_use]
    pub fn into_query(self) -> Query {
        self.query
    }

    /// Returns the defaults used when a call omits operator or connective.
    #[must_use]
    pub const fn options(&self) -> &WhereOptions {
        &self.options
    }

    /// Returns the clause tree.
    #[must_use]
    pub fn wheres(&self) -> &[WhereClause] {
        &self.query.wheres
    }

    /// Returns the binding tracker.
    #[must_use]
    pub const fn bindings(&self) -> &Bindings {
        &self.query.bindings
    }

    /// Returns every bound value as one positional list.
    #[must_use]
    pub fn get_bindings(&self) -> Vec<SqlValue> {
        self.query.bindings.flatten()
    }

    /// Clears columns, clauses, bindings and limit so the builder can be reused.
    ///
    /// The target table and defaults are kept.
    pub fn reset(&mut self) -> &mut Self {
        let from = self.query.from.take();
        self.query = Query {
            from,
            ..Query::default()
        };
        self
    }

    /// Renders the query with `grammar` and returns SQL plus positional bindings.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidOperator`](crate::QueryError::InvalidOperator)
    /// when a clause uses an operator the dialect does not know.
    pub fn to_sql(&self, grammar: &dyn Grammar) -> Result<(String, Vec<SqlValue>)> {
        let sql = grammar.compile_select(&self.query)?;
        Ok((sql, self.get_bindings()))
    }
}
