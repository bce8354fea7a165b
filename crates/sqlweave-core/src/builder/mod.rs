//! Fluent WHERE-clause builder.
//!
//! A [`QueryBuilder`] accumulates a clause tree and its bindings. Calls are
//! classified into a [`CallShape`] before anything is appended, so a bad
//! argument combination never leaves a half-built clause behind.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::builder::{Condition, QueryBuilder};
//! use sqlweave_core::grammar::SqliteGrammar;
//!
//! # fn main() -> sqlweave_core::Result<()> {
//! let mut qb = QueryBuilder::table("users");
//! qb.where_all(vec![Condition::op("score", ">", 64.56), Condition::eq("vote", 10)])?
//!     .where_not_null("email");
//!
//! let (sql, params) = qb.to_sql(&SqliteGrammar::new())?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT * FROM "users" WHERE ("score" > ? AND "vote" = ?) AND "email" IS NOT NULL"#
//! );
//! assert_eq!(params.len(), 2);
//! # Ok(())
//! # }
//! ```

mod args;
mod bindings;
mod clause;
mod query;
mod subquery;
pub mod value;
mod where_clause;

pub use args::{
    classify, where_prepare, CallShape, Condition, Operand, Prepared, WhereArg, WhereOptions,
    DEFAULT_OFFSET, DEFAULT_OPERATOR,
};
pub use bindings::{BindingCategory, Bindings};
pub use clause::{ColumnRef, Connective, WhereClause, WhereKind};
pub use query::{Query, QueryBuilder};
pub use subquery::{Callback, ParsedSub, Subquery};
pub use value::{SqlValue, ToSqlValue};
pub use where_clause::{invalid_operator_and_value, IntoColumns};
