//! SQLite grammar.

use super::Grammar;

/// SQLite grammar: `?` placeholders, type affinities, no column comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteGrammar;

impl SqliteGrammar {
    /// Creates a new SQLite grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _position: usize) -> String {
        String::from("?")
    }

    fn operators(&self) -> &'static [&'static str] {
        &["glob", "match", "is", "is not"]
    }

    fn map_type(&self, type_name: &str) -> Option<&'static str> {
        // SQLite has dynamic typing with type affinity
        let sql_type = match type_name {
            "string" => "VARCHAR",
            "char" => "CHAR",
            "text" | "medium_text" | "long_text" | "json" | "jsonb" | "uuid" | "enum" => "TEXT",
            "date" | "time" | "time_tz" | "date_time" | "date_time_tz" | "timestamp"
            | "timestamp_tz" => "TEXT",
            "binary" => "BLOB",
            "boolean" | "tiny_integer" | "small_integer" | "integer" | "big_integer"
            | "year" | "ip_address" => "INTEGER",
            "float" | "double" => "REAL",
            "decimal" => "NUMERIC",
            _ => return None,
        };
        Some(sql_type)
    }

    fn index_keyword(&self, kind: &str) -> Option<&'static str> {
        match kind {
            "primary" => Some("PRIMARY KEY"),
            "unique" => Some("UNIQUE INDEX"),
            "index" => Some("INDEX"),
            _ => None,
        }
    }

    fn accepts_length(&self, sql_type: &str) -> bool {
        matches!(sql_type, "VARCHAR" | "CHAR")
    }

    fn auto_increment_type(&self, _sql_type: &str) -> String {
        String::from("INTEGER")
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "PRIMARY KEY AUTOINCREMENT"
    }

    fn supports_column_comments(&self) -> bool {
        false
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDesc, DefaultValue, IndexDesc};

    fn col(name: &str, type_name: &str) -> ColumnDesc {
        ColumnDesc::new("posts", name, type_name)
    }

    #[test]
    fn test_placeholder_is_positional() {
        let g = SqliteGrammar::new();
        assert_eq!(g.placeholder(1), "?");
        assert_eq!(g.placeholder(7), "?");
    }

    #[test]
    fn test_type_affinity() {
        let g = SqliteGrammar::new();
        assert_eq!(
            g.render_column(&col("title", "string").length(120)),
            r#""title" VARCHAR(120) NOT NULL"#
        );
        assert_eq!(
            g.render_column(&col("views", "big_integer").length(20)),
            r#""views" INTEGER NOT NULL"#
        );
        assert_eq!(
            g.render_column(&col("published_at", "timestamp").datetime_precision(6).nullable()),
            r#""published_at" TEXT NULL"#
        );
        assert_eq!(
            g.render_column(&col("price", "decimal").precision(8, 2)),
            r#""price" NUMERIC(8,2) NOT NULL"#
        );
    }

    #[test]
    fn test_boolean_default() {
        let g = SqliteGrammar::new();
        let c = col("draft", "boolean").default_value(DefaultValue::Boolean(false));
        assert_eq!(g.render_column(&c), r#""draft" INTEGER NOT NULL DEFAULT 0"#);
    }

    #[test]
    fn test_auto_increment() {
        let g = SqliteGrammar::new();
        let c = col("id", "big_integer").auto_increment();
        assert_eq!(
            g.render_column(&c),
            r#""id" INTEGER PRIMARY KEY AUTOINCREMENT"#
        );
    }

    #[test]
    fn test_comments_dropped() {
        let g = SqliteGrammar::new();
        assert_eq!(g.render_column_comment(&col("body", "text").comment("markdown")), "");
        assert_eq!(g.render_column_comment(&col("origin", "ip_address")), "");
    }

    #[test]
    fn test_fulltext_falls_back_to_key() {
        let g = SqliteGrammar::new();
        let idx = IndexDesc::new("posts", "body_ft", "fulltext", vec![col("body", "text")]);
        assert_eq!(g.render_index(&idx), r#"CREATE KEY "body_ft" ON "posts" ("body")"#);
    }

    #[test]
    fn test_unique_index() {
        let g = SqliteGrammar::new();
        let idx = IndexDesc::new("posts", "slug_unique", "unique", vec![col("slug", "string")]);
        assert_eq!(
            g.render_index(&idx),
            r#"CREATE UNIQUE INDEX "slug_unique" ON "posts" ("slug")"#
        );
    }
}
