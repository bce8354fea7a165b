//! Clause tree nodes.
//!
//! A query's WHERE part is a flat list of [`WhereClause`] nodes. Groups and
//! sub-selects own a complete child [`Query`], so the tree is built by value
//! and never aliases its parent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::query::Query;
use super::value::SqlValue;
use crate::error::QueryError;

/// Boolean combinator joining a clause to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Connective {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns true when `text` names a connective (case-insensitive).
    #[must_use]
    pub fn is_connective(text: &str) -> bool {
        text.parse::<Self>().is_ok()
    }
}

impl FromStr for Connective {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Self::Or)
        } else {
            Err(QueryError::classification(format!(
                "unknown connective '{s}', expected 'and' or 'or'"
            )))
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// The left-hand side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    /// A column name, quoted by the grammar (`users.id` quotes both parts).
    Name(String),
    /// Raw SQL, emitted verbatim.
    Raw(String),
    /// A sub-select used as an expression, rendered as `(SELECT ...)`.
    Subquery(Box<Query>),
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(String::from(name))
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// What a clause node does.
///
/// Range, set-membership, column-to-column, existence, raw and date-part
/// predicates are expected to arrive as further variants.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum WhereKind {
    /// `column operator ?`
    Basic {
        /// Left-hand side.
        column: ColumnRef,
        /// Comparison operator, unvalidated until rendering.
        operator: String,
        /// The bound value.
        value: SqlValue,
        /// Number of bindings that preceded this clause's value when it was
        /// built. Informational only: the compiler numbers placeholders with
        /// its own running counter and never reads this field.
        offset: usize,
    },
    /// `column IS NULL`
    Null {
        /// Checked column.
        column: ColumnRef,
    },
    /// `column IS NOT NULL`
    NotNull {
        /// Checked column.
        column: ColumnRef,
    },
    /// `( ... )` over a child clause list sharing the parent's table.
    Nested {
        /// The group's clauses and bindings.
        query: Box<Query>,
    },
    /// `column operator (SELECT ...)`
    SubqueryCompare {
        /// Left-hand side.
        column: ColumnRef,
        /// Comparison operator.
        operator: String,
        /// The sub-select.
        query: Box<Query>,
    },
}

/// One predicate or predicate group.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// What the node checks.
    pub kind: WhereKind,
    /// How it joins the previous node at the same level.
    pub connective: Connective,
}

impl WhereClause {
    /// Creates a clause node.
    #[must_use]
    pub const fn new(kind: WhereKind, connective: Connective) -> Self {
        Self { kind, connective }
    }

    /// Returns the operator of comparison nodes.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        match &self.kind {
            WhereKind::Basic { operator, .. } | WhereKind::SubqueryCompare { operator, .. } => {
                Some(operator)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connective_parse() {
        assert_eq!("and".parse::<Connective>().unwrap(), Connective::And);
        assert_eq!("OR".parse::<Connective>().unwrap(), Connective::Or);
        assert!("xor".parse::<Connective>().is_err());
        assert!(Connective::is_connective("Or"));
        assert!(!Connective::is_connective(">"));
    }

    #[test]
    fn test_connective_serde() {
        let parsed: Connective = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(parsed, Connective::Or);
        assert_eq!(serde_json::to_string(&Connective::And).unwrap(), "\"and\"");
    }

    #[test]
    fn test_operator_accessor() {
        let clause = WhereClause::new(
            WhereKind::Null {
                column: ColumnRef::from("deleted_at"),
            },
            Connective::And,
        );
        assert_eq!(clause.operator(), None);
    }
}
