//! # sqlweave-core
//!
//! A WHERE-clause builder and a per-dialect schema grammar.
//!
//! This crate provides:
//! - A fluent [`QueryBuilder`] that turns loosely shaped where calls
//!   (value, operator and value, groups, sub-selects, condition lists)
//!   into a clause tree with ordered bindings
//! - [`Grammar`] implementations that render those trees as SELECT
//!   statements with dialect placeholders
//! - Column, index and primary key rendering for schema definition
//!
//! ## Building clauses
//!
//! ```rust
//! use sqlweave_core::{PostgresGrammar, QueryBuilder, SqlValue, Subquery};
//!
//! # fn main() -> sqlweave_core::Result<()> {
//! let mut qb = QueryBuilder::table("orders");
//! qb.where_eq("status", "paid")?.where_query(
//!     Subquery::callback(|q| {
//!         q.from("refunds").select(&["count(*)"]).where_op("amount", ">", 100)?;
//!         Ok(())
//!     }),
//!     "=",
//!     0,
//! )?;
//!
//! let (sql, params) = qb.to_sql(&PostgresGrammar::new())?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT * FROM "orders" WHERE "status" = $1 AND (SELECT count(*) FROM "refunds" WHERE "amount" > $2) = $3"#
//! );
//! assert_eq!(
//!     params,
//!     vec![SqlValue::Text(String::from("paid")), SqlValue::Int(100), SqlValue::Int(0)]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Rendering schema fragments
//!
//! ```rust
//! use sqlweave_core::grammar::{Grammar, PostgresGrammar};
//! use sqlweave_core::schema::ColumnDesc;
//!
//! let id = ColumnDesc::new("orders", "id", "big_integer").auto_increment();
//! assert_eq!(PostgresGrammar::new().render_column(&id), r#""id" BIGSERIAL"#);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod grammar;
pub mod schema;

pub use builder::{Condition, Connective, Query, QueryBuilder, SqlValue, Subquery, WhereArg};
pub use config::{BuilderConfig, DialectKind};
pub use error::{QueryError, Result};
pub use grammar::{Grammar, PostgresGrammar, SqliteGrammar};
pub use schema::{ColumnDesc, DefaultValue, IndexDesc, PrimaryDesc};
