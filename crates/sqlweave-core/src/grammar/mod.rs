//! Dialect-specific SQL generation.
//!
//! A [`Grammar`] renders two things: SELECT statements built by a
//! [`QueryBuilder`](crate::builder::QueryBuilder), and schema-definition
//! fragments for [`ColumnDesc`], [`IndexDesc`] and [`PrimaryDesc`].
//! Dialects supply small lookup hooks (type table, index keywords,
//! placeholders, quoting); the rendering algorithms are default methods.

mod compile;
mod postgres;
mod sqlite;

pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;

use tracing::{debug, warn};

use crate::builder::{Query, WhereClause};
use crate::error::{QueryError, Result};
use crate::schema::{ColumnDesc, DefaultValue, IndexDesc, PrimaryDesc};

/// Placeholder inside a temporal type template, replaced by the column's
/// fractional seconds precision.
pub const PRECISION_SLOT: &str = "{precision}";

/// Resolved type name that triggers enum type synthesis.
pub const ENUM_TYPE: &str = "ENUM";

/// Index keyword rendered as a table-definition fragment instead of a
/// standalone statement.
pub const PRIMARY_KEY: &str = "PRIMARY KEY";

/// Operators every dialect accepts.
pub const GENERIC_OPERATORS: &[&str] = &[
    "=",
    "<",
    ">",
    "<=",
    ">=",
    "<>",
    "!=",
    "<=>",
    "like",
    "like binary",
    "not like",
    "ilike",
    "&",
    "|",
    "^",
    "<<",
    ">>",
    "&~",
    "rlike",
    "not rlike",
    "regexp",
    "not regexp",
    "~",
    "~*",
    "!~",
    "!~*",
    "similar to",
    "not similar to",
    "not ilike",
    "~~*",
    "!~~*",
    "in",
    "not in",
];

/// Trait for dialect-specific SQL generation.
pub trait Grammar {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes a single identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Quotes a possibly qualified name (`schema.table`, `table.column`).
    ///
    /// `*` segments and expressions containing parentheses or spaces are
    /// emitted verbatim.
    fn wrap(&self, name: &str) -> String {
        if name.contains('(') || name.contains(' ') {
            return String::from(name);
        }
        name.split('.')
            .map(|segment| {
                if segment == "*" {
                    String::from(segment)
                } else {
                    self.quote_identifier(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a string literal.
    fn quote_value(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Returns the placeholder for the bound value at 1-based `position`.
    fn placeholder(&self, position: usize) -> String;

    /// Dialect-specific operators, accepted on top of [`GENERIC_OPERATORS`].
    fn operators(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns true if `operator` is known to this dialect.
    fn is_valid_operator(&self, operator: &str) -> bool {
        let operator = operator.to_lowercase();
        GENERIC_OPERATORS.contains(&operator.as_str())
            || self.operators().contains(&operator.as_str())
    }

    /// Fails with [`QueryError::InvalidOperator`] for unknown operators.
    fn validate_operator(&self, operator: &str) -> Result<()> {
        if self.is_valid_operator(operator) {
            Ok(())
        } else {
            Err(QueryError::InvalidOperator(String::from(operator)))
        }
    }

    /// Looks up the SQL type for a semantic type name.
    fn map_type(&self, type_name: &str) -> Option<&'static str>;

    /// Type used when [`Self::map_type`] has no entry.
    fn default_type(&self) -> &'static str {
        "VARCHAR"
    }

    /// Looks up the keyword for a semantic index kind.
    fn index_keyword(&self, kind: &str) -> Option<&'static str>;

    /// Keyword used when [`Self::index_keyword`] has no entry.
    fn default_index_keyword(&self) -> &'static str {
        "KEY"
    }

    /// Returns true for types rendered as `TYPE(precision,scale)`.
    fn is_fixed_point(&self, sql_type: &str) -> bool {
        matches!(sql_type, "NUMERIC" | "DECIMAL")
    }

    /// Returns true if `sql_type` takes a `(length)` suffix.
    fn accepts_length(&self, _sql_type: &str) -> bool {
        true
    }

    /// Returns the type that replaces `sql_type` on auto-increment columns.
    fn auto_increment_type(&self, sql_type: &str) -> String;

    /// Keyword appended to auto-increment columns.
    fn auto_increment_keyword(&self) -> &'static str {
        ""
    }

    /// Returns true if columns of `type_name` always carry a type comment.
    fn type_comment_required(&self, _type_name: &str) -> bool {
        false
    }

    /// Returns true if the dialect supports `COMMENT ON COLUMN`.
    fn supports_column_comments(&self) -> bool {
        true
    }

    /// Renders a boolean literal.
    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Synthesizes the type name of an enumerated column.
    fn enum_type_name(&self, options: &[String]) -> String {
        format!("enum__{}", options.join("_eopt_")).to_lowercase()
    }

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Null => String::from("NULL"),
            DefaultValue::Boolean(b) => String::from(self.bool_literal(*b)),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::String(s) => self.quote_value(s),
            DefaultValue::Expression(expr) => expr.clone(),
        }
    }

    /// Resolves the full SQL type of a column, including its size suffix.
    fn resolve_type(&self, col: &ColumnDesc) -> String {
        let base = self
            .map_type(&col.type_name)
            .unwrap_or_else(|| self.default_type());

        match (col.precision, col.scale) {
            (Some(p), Some(s)) if self.is_fixed_point(base) => return format!("{base}({p},{s})"),
            _ => {}
        }
        if base.contains(PRECISION_SLOT) {
            let precision = col.datetime_precision.unwrap_or(0).to_string();
            return base.replace(PRECISION_SLOT, &precision);
        }
        if base == ENUM_TYPE {
            return self.enum_type_name(&col.options);
        }
        match col.length {
            Some(len) if self.accepts_length(base) => format!("{base}({len})"),
            _ => String::from(base),
        }
    }

    /// Renders a column definition fragment.
    ///
    /// Auto-increment columns drop nullability and default; the dialect
    /// replaces their type.
    fn render_column(&self, col: &ColumnDesc) -> String {
        let mut sql_type = self.resolve_type(col);
        let mut nullable = if col.nullable { "NULL" } else { "NOT NULL" };
        let mut default = col
            .default
            .as_ref()
            .map(|d| format!("DEFAULT {}", self.render_default(d)))
            .unwrap_or_default();
        let mut extra = "";

        if col.is_auto_increment() {
            sql_type = self.auto_increment_type(&sql_type);
            nullable = "";
            default.clear();
            extra = self.auto_increment_keyword();
        }

        let collation = col
            .collation
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| format!("COLLATE {c}"))
            .unwrap_or_default();

        [
            self.quote_identifier(&col.name),
            sql_type,
            String::from(nullable),
            default,
            String::from(extra),
            collation,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Renders the column comment statement, or an empty string.
    fn render_column_comment(&self, col: &ColumnDesc) -> String {
        let comment = col.comment.as_deref().unwrap_or_default();
        let text = if self.type_comment_required(&col.type_name) {
            format!("T:{}|{comment}", col.type_name)
        } else if comment.is_empty() {
            return String::new();
        } else {
            String::from(comment)
        };

        if !self.supports_column_comments() {
            debug!(
                table = %col.table_name,
                column = %col.name,
                dialect = self.name(),
                "dropping column comment"
            );
            return String::new();
        }

        format!(
            "COMMENT ON COLUMN {}.{} IS {};",
            self.quote_identifier(&col.table_name),
            self.quote_identifier(&col.name),
            self.quote_value(&text)
        )
    }

    /// Renders an index.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedFeature`] when the index covers a
    /// JSON column.
    fn try_render_index(&self, idx: &IndexDesc) -> Result<String> {
        if idx.has_json_column() {
            return Err(QueryError::UnsupportedFeature(format!(
                "index {} covers a JSON column",
                idx.name
            )));
        }

        let keyword = self
            .index_keyword(&idx.kind)
            .unwrap_or_else(|| self.default_index_keyword());
        let columns = idx
            .columns
            .iter()
            .map(|c| self.quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(",");

        if keyword == PRIMARY_KEY {
            Ok(format!("{keyword} ({columns})"))
        } else {
            Ok(format!(
                "CREATE {keyword} {} ON {} ({columns})",
                self.quote_identifier(&idx.name),
                self.quote_identifier(&idx.table_name)
            ))
        }
    }

    /// Renders an index, or an empty string when the dialect cannot index it.
    fn render_index(&self, idx: &IndexDesc) -> String {
        match self.try_render_index(idx) {
            Ok(sql) => sql,
            Err(err) => {
                warn!(
                    index = %idx.name,
                    table = %idx.table_name,
                    dialect = self.name(),
                    "skipping index: {err}"
                );
                String::new()
            }
        }
    }

    /// Renders the index comment statement, or an empty string.
    fn render_index_comment(&self, _idx: &IndexDesc) -> String {
        String::new()
    }

    /// Renders a primary key fragment.
    fn render_primary_key(&self, primary: &PrimaryDesc) -> String {
        let columns = primary
            .columns
            .iter()
            .map(|c| self.quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(",");
        format!("{PRIMARY_KEY} ({columns})")
    }

    /// Renders a SELECT statement, numbering placeholders from 1.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidOperator`] for unknown operators.
    fn compile_select(&self, query: &Query) -> Result<String> {
        let mut offset = 0;
        self.compile_select_offset(query, &mut offset)
    }

    /// Renders a SELECT statement after `offset` placeholders were emitted.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidOperator`] for unknown operators.
    fn compile_select_offset(&self, query: &Query, offset: &mut usize) -> Result<String> {
        compile::select(self, query, offset)
    }

    /// Renders a clause list without the `WHERE` keyword.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidOperator`] for unknown operators.
    fn compile_wheres(&self, wheres: &[WhereClause], offset: &mut usize) -> Result<String> {
        compile::wheres(self, wheres, offset)
    }
}
