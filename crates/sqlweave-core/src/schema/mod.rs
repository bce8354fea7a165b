//! Column, index and primary key descriptors.
//!
//! Descriptors are plain values produced by schema-definition code and read
//! by a [`Grammar`](crate::grammar::Grammar). They can be built fluently or
//! deserialized from JSON:
//!
//! ```rust
//! use sqlweave_core::schema::ColumnDesc;
//!
//! let col: ColumnDesc = serde_json::from_str(
//!     r#"{"table_name": "products", "name": "price", "type": "decimal",
//!         "precision": 10, "scale": 2}"#,
//! ).unwrap();
//! assert_eq!(col, ColumnDesc::new("products", "price", "decimal").precision(10, 2));
//! ```

use serde::{Deserialize, Serialize};

/// Marker stored in [`ColumnDesc::extra`] for auto-increment columns.
pub const AUTO_INCREMENT: &str = "AutoIncrement";

/// Semantic column types that cannot be indexed directly.
pub const JSON_TYPES: &[&str] = &["json", "jsonb"];

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default, quoted by the grammar.
    String(String),
    /// Raw SQL expression (e.g., `CURRENT_TIMESTAMP`).
    Expression(String),
}

/// Abstract description of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDesc {
    /// Owning table.
    pub table_name: String,
    /// Column name.
    pub name: String,
    /// Semantic type name, resolved through the grammar's type table.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether NULL is allowed.
    #[serde(default)]
    pub nullable: bool,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Length for sized types.
    #[serde(default)]
    pub length: Option<u32>,
    /// Numeric precision.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Numeric scale.
    #[serde(default)]
    pub scale: Option<u32>,
    /// Fractional seconds precision for temporal types.
    #[serde(default)]
    pub datetime_precision: Option<u32>,
    /// Collation.
    #[serde(default)]
    pub collation: Option<String>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Extra marker; non-empty means auto-increment.
    #[serde(default)]
    pub extra: Option<String>,
    /// Legal values of an enumerated type.
    #[serde(default)]
    pub options: Vec<String>,
}

impl ColumnDesc {
    /// Creates a NOT NULL column with no length, default or comment.
    #[must_use]
    pub fn new(table_name: &str, name: &str, type_name: &str) -> Self {
        Self {
            table_name: String::from(table_name),
            name: String::from(name),
            type_name: String::from(type_name),
            nullable: false,
            default: None,
            length: None,
            precision: None,
            scale: None,
            datetime_precision: None,
            collation: None,
            comment: None,
            extra: None,
            options: vec![],
        }
    }

    /// Allows NULL.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets numeric precision and scale.
    #[must_use]
    pub const fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Sets fractional seconds precision.
    #[must_use]
    pub const fn datetime_precision(mut self, precision: u32) -> Self {
        self.datetime_precision = Some(precision);
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collation(mut self, collation: &str) -> Self {
        self.collation = Some(String::from(collation));
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(String::from(comment));
        self
    }

    /// Marks the column as auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.extra = Some(String::from(AUTO_INCREMENT));
        self
    }

    /// Sets the legal values of an enumerated type.
    #[must_use]
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| String::from(*o)).collect();
        self
    }

    /// Returns true when the extra marker is set.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.extra.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Returns true for JSON-typed columns.
    #[must_use]
    pub fn is_json(&self) -> bool {
        JSON_TYPES.contains(&self.type_name.as_str())
    }
}

/// Abstract description of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDesc {
    /// Owning table.
    pub table_name: String,
    /// Index name.
    pub name: String,
    /// Semantic kind: `primary`, `unique`, `index`, `fulltext`, `spatial`, ...
    pub kind: String,
    /// Participating columns in order.
    pub columns: Vec<ColumnDesc>,
    /// Comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl IndexDesc {
    /// Creates an index description.
    #[must_use]
    pub fn new(table_name: &str, name: &str, kind: &str, columns: Vec<ColumnDesc>) -> Self {
        Self {
            table_name: String::from(table_name),
            name: String::from(name),
            kind: String::from(kind),
            columns,
            comment: None,
        }
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(String::from(comment));
        self
    }

    /// Returns true when any participating column is JSON-typed.
    #[must_use]
    pub fn has_json_column(&self) -> bool {
        self.columns.iter().any(ColumnDesc::is_json)
    }
}

/// Abstract description of a primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryDesc {
    /// Owning table.
    pub table_name: String,
    /// Constraint name.
    pub name: String,
    /// Key columns in order.
    pub columns: Vec<ColumnDesc>,
}

impl PrimaryDesc {
    /// Creates a primary key description.
    #[must_use]
    pub fn new(table_name: &str, name: &str, columns: Vec<ColumnDesc>) -> Self {
        Self {
            table_name: String::from(table_name),
            name: String::from(name),
            columns,
        }
    }
}
