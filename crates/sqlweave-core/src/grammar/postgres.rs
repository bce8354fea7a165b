//! PostgreSQL grammar.

use super::Grammar;
use crate::schema::IndexDesc;

/// Semantic type stored as an integer and tagged through a column comment.
const IP_ADDRESS: &str = "ip_address";

/// PostgreSQL grammar: `$n` placeholders and `SERIAL` auto-increment types.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGrammar;

impl PostgresGrammar {
    /// Creates a new PostgreSQL grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Grammar for PostgresGrammar {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${position}")
    }

    fn operators(&self) -> &'static [&'static str] {
        &[
            "between",
            "#",
            "<<=",
            ">>=",
            "&&",
            "@>",
            "<@",
            "?",
            "?|",
            "?&",
            "||",
            "-",
            "@?",
            "@@",
            "#-",
            "is distinct from",
            "is not distinct from",
        ]
    }

    fn map_type(&self, type_name: &str) -> Option<&'static str> {
        let sql_type = match type_name {
            "string" => "VARCHAR",
            "char" => "CHAR",
            "text" | "medium_text" | "long_text" => "TEXT",
            "binary" => "BYTEA",
            "boolean" => "BOOLEAN",
            "tiny_integer" | "small_integer" | "year" => "SMALLINT",
            "integer" | "ip_address" => "INTEGER",
            "big_integer" => "BIGINT",
            "float" => "REAL",
            "double" => "DOUBLE PRECISION",
            "decimal" => "NUMERIC",
            "date" => "DATE",
            "time" => "TIME({precision})",
            "time_tz" => "TIME({precision}) WITH TIME ZONE",
            "date_time" | "timestamp" => "TIMESTAMP({precision})",
            "date_time_tz" | "timestamp_tz" => "TIMESTAMP({precision}) WITH TIME ZONE",
            "json" => "JSON",
            "jsonb" => "JSONB",
            "uuid" => "UUID",
            "enum" => "ENUM",
            _ => return None,
        };
        Some(sql_type)
    }

    fn index_keyword(&self, kind: &str) -> Option<&'static str> {
        match kind {
            "primary" => Some("PRIMARY KEY"),
            "unique" => Some("UNIQUE INDEX"),
            "index" | "fulltext" | "spatial" => Some("INDEX"),
            _ => None,
        }
    }

    fn accepts_length(&self, sql_type: &str) -> bool {
        !matches!(
            sql_type,
            "BYTEA"
                | "TEXT"
                | "BOOLEAN"
                | "SMALLINT"
                | "INTEGER"
                | "BIGINT"
                | "REAL"
                | "DOUBLE PRECISION"
                | "DATE"
                | "JSON"
                | "JSONB"
                | "UUID"
        )
    }

    fn auto_increment_type(&self, sql_type: &str) -> String {
        let serial = match sql_type {
            "BIGINT" => "BIGSERIAL",
            "SMALLINT" => "SMALLSERIAL",
            _ => "SERIAL",
        };
        String::from(serial)
    }

    fn type_comment_required(&self, type_name: &str) -> bool {
        type_name == IP_ADDRESS
    }

    fn render_index_comment(&self, idx: &IndexDesc) -> String {
        match idx.comment.as_deref() {
            Some(comment) if !comment.is_empty() && idx.kind != "primary" => format!(
                "COMMENT ON INDEX {} IS {};",
                self.quote_identifier(&idx.name),
                self.quote_value(comment)
            ),
            _ => String::new(),
        }
    }
}
