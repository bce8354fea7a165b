//! Call shapes and argument normalization for where clauses.
//!
//! Typed entry points on [`QueryBuilder`](super::QueryBuilder) build a
//! [`CallShape`] directly. The dynamic entry takes positional [`WhereArg`]s
//! and classifies them into one with [`where_prepare`] and [`classify`].

use super::clause::{ColumnRef, Connective};
use super::subquery::{Callback, Subquery};
use super::value::{SqlValue, ToSqlValue};
use crate::error::{QueryError, Result, SUBQUERY_SHAPE};

/// Operator used when a call gives only a value.
pub const DEFAULT_OPERATOR: &str = "=";

/// Binding offset used when a call gives none.
pub const DEFAULT_OFFSET: usize = 1;

/// Defaults applied to parts a where call leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereOptions {
    /// Comparison operator, `=` by default.
    pub operator: String,
    /// Connective, `and` by default.
    pub connective: Connective,
    /// Explicit binding offset, `1` by default.
    pub offset: usize,
}

impl Default for WhereOptions {
    fn default() -> Self {
        Self {
            operator: String::from(DEFAULT_OPERATOR),
            connective: Connective::And,
            offset: DEFAULT_OFFSET,
        }
    }
}

/// The right-hand side of a comparison.
pub enum Operand<'a> {
    /// A bound value; [`SqlValue::Null`] selects the null-check path.
    Value(SqlValue),
    /// A sub-select compared against the column.
    Query(Subquery<'a>),
}

impl<'a> Operand<'a> {
    /// Wraps a plain value.
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Returns true for the null sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(SqlValue::Null))
    }
}

impl std::fmt::Debug for Operand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Query(q) => f.debug_tuple("Query").field(q).finish(),
        }
    }
}

/// One positional argument of a dynamic where call.
pub enum WhereArg<'a> {
    /// Text whose meaning depends on position: operator, connective, or value.
    Text(String),
    /// Raw SQL used as the column expression.
    Raw(String),
    /// A bound value.
    Value(SqlValue),
    /// Explicit binding offset.
    Offset(usize),
    /// A sub-query: builder, callback, or SQL text.
    Query(Subquery<'a>),
    /// A list of conditions combined into one nested group.
    Conditions(Vec<Condition<'a>>),
}

impl<'a> WhereArg<'a> {
    /// Raw SQL argument.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Bound value argument.
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Grouping or sub-select callback argument.
    pub fn callback<F>(callback: F) -> Self
    where
        F: FnOnce(&mut super::QueryBuilder) -> Result<()> + 'a,
    {
        Self::Query(Subquery::callback(callback))
    }

    const fn describe(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Raw(_) => "raw SQL",
            Self::Value(_) => "value",
            Self::Offset(_) => "offset",
            Self::Query(_) => "subquery",
            Self::Conditions(_) => "condition list",
        }
    }

    fn into_operand(self) -> Result<Operand<'a>> {
        match self {
            Self::Text(text) => Ok(Operand::Value(SqlValue::Text(text))),
            Self::Value(value) => Ok(Operand::Value(value)),
            Self::Query(query) => Ok(Operand::Query(query)),
            other => Err(QueryError::classification(format!(
                "{} cannot be used as a comparison value",
                other.describe()
            ))),
        }
    }
}

impl From<&str> for WhereArg<'_> {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

impl From<String> for WhereArg<'_> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<SqlValue> for WhereArg<'_> {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for WhereArg<'_> {
    fn from(value: i64) -> Self {
        Self::Value(SqlValue::Int(value))
    }
}

impl From<i32> for WhereArg<'_> {
    fn from(value: i32) -> Self {
        Self::Value(SqlValue::Int(i64::from(value)))
    }
}

impl From<f64> for WhereArg<'_> {
    fn from(value: f64) -> Self {
        Self::Value(SqlValue::Float(value))
    }
}

impl From<bool> for WhereArg<'_> {
    fn from(value: bool) -> Self {
        Self::Value(SqlValue::Bool(value))
    }
}

impl<'a> From<Subquery<'a>> for WhereArg<'a> {
    fn from(query: Subquery<'a>) -> Self {
        Self::Query(query)
    }
}

impl<'a> From<Vec<Condition<'a>>> for WhereArg<'a> {
    fn from(conditions: Vec<Condition<'a>>) -> Self {
        Self::Conditions(conditions)
    }
}

/// A column plus its own trailing arguments, as used in condition lists.
pub struct Condition<'a> {
    /// Column name.
    pub column: String,
    /// Trailing arguments, read with [`where_prepare`].
    pub args: Vec<WhereArg<'a>>,
}

impl<'a> Condition<'a> {
    /// Creates a condition from raw positional arguments.
    #[must_use]
    pub fn new(column: impl Into<String>, args: Vec<WhereArg<'a>>) -> Self {
        Self {
            column: column.into(),
            args,
        }
    }

    /// `column = value`
    pub fn eq<T: ToSqlValue>(column: impl Into<String>, value: T) -> Self {
        Self::new(column, vec![WhereArg::value(value)])
    }

    /// `column operator value`
    pub fn op<T: ToSqlValue>(column: impl Into<String>, operator: &str, value: T) -> Self {
        Self::new(column, vec![WhereArg::from(operator), WhereArg::value(value)])
    }

    /// Joins this condition to the previous one with `OR`.
    #[must_use]
    pub fn or(mut self) -> Self {
        if self.args.len() == 1 {
            self.args.insert(0, WhereArg::from(DEFAULT_OPERATOR));
        }
        self.args.push(WhereArg::from("or"));
        self
    }
}

/// Every recognized way of calling `where`.
pub enum CallShape<'a> {
    /// `where(column, value)`
    Value {
        /// Left-hand side.
        column: ColumnRef,
        /// Compared value.
        value: Operand<'a>,
    },
    /// `where(column, operator, value)`
    OperatorValue {
        /// Left-hand side.
        column: ColumnRef,
        /// Comparison operator.
        operator: String,
        /// Compared value.
        value: Operand<'a>,
    },
    /// `where(column, operator, value, connective, offset)`
    OperatorValueConnective {
        /// Left-hand side.
        column: ColumnRef,
        /// Comparison operator.
        operator: String,
        /// Compared value.
        value: Operand<'a>,
        /// Connective to the previous clause.
        connective: Connective,
        /// Number of bindings preceding the value.
        offset: usize,
    },
    /// `where(callback, connective)`: a parenthesized group.
    Group {
        /// Fills the group.
        callback: Callback<'a>,
        /// Connective to the previous clause.
        connective: Connective,
    },
    /// `where(subquery, operator, value, connective)`
    SubqueryComparison {
        /// Sub-query used as the left-hand side.
        query: Subquery<'a>,
        /// Comparison operator.
        operator: String,
        /// Compared value.
        value: Operand<'a>,
        /// Connective to the previous clause.
        connective: Connective,
    },
    /// `where([[column, args...], ...], connective)`
    Conditions {
        /// One entry per clause inside the group.
        conditions: Vec<Condition<'a>>,
        /// Connective of the whole group.
        connective: Connective,
    },
}

/// Operator, value, connective and offset read from trailing arguments.
#[derive(Debug)]
pub struct Prepared<'a> {
    /// Resolved operator, connective and offset.
    pub options: WhereOptions,
    /// The compared value, if one was given.
    pub value: Option<Operand<'a>>,
    /// Whether the operator was given explicitly.
    pub has_operator: bool,
    /// Whether a connective or offset was given explicitly.
    pub has_tail: bool,
}

/// Reads `(operator, value, connective, offset)` from trailing arguments.
///
/// One argument is the value. Otherwise a leading text argument is the
/// operator and the next argument the value. A later text argument is the
/// connective and a later offset argument the binding offset. Parts left out
/// come from `defaults`.
///
/// # Errors
///
/// Returns [`QueryError::Classification`] when an argument sits where its
/// kind makes no sense, when the connective is neither `and` nor `or`, or
/// when arguments are left over.
pub fn where_prepare<'a>(
    args: Vec<WhereArg<'a>>,
    defaults: &WhereOptions,
) -> Result<Prepared<'a>> {
    let mut prepared = Prepared {
        options: defaults.clone(),
        value: None,
        has_operator: false,
        has_tail: false,
    };

    if args.len() == 1 {
        let value = args.into_iter().next().map(WhereArg::into_operand).transpose()?;
        prepared.value = value;
        return Ok(prepared);
    }

    let mut args = args.into_iter().peekable();

    match args.next() {
        Some(WhereArg::Text(operator)) => {
            prepared.options.operator = operator;
            prepared.has_operator = true;
            prepared.value = args.next().map(WhereArg::into_operand).transpose()?;
        }
        Some(other) => prepared.value = Some(other.into_operand()?),
        None => return Ok(prepared),
    }

    if let Some(WhereArg::Text(_)) = args.peek() {
        if let Some(WhereArg::Text(connective)) = args.next() {
            prepared.options.connective = connective.parse()?;
            prepared.has_tail = true;
        }
    }

    if let Some(WhereArg::Offset(_)) = args.peek() {
        if let Some(WhereArg::Offset(offset)) = args.next() {
            prepared.options.offset = offset;
            prepared.has_tail = true;
        }
    }

    if let Some(extra) = args.next() {
        return Err(QueryError::classification(format!(
            "unexpected {} argument after operator, value and connective",
            extra.describe()
        )));
    }

    Ok(prepared)
}

/// Reads an optional lone connective, as accepted after groups and lists.
fn connective_only(args: Vec<WhereArg<'_>>, default: Connective) -> Result<Connective> {
    let mut args = args.into_iter();
    let connective = match args.next() {
        None => default,
        Some(WhereArg::Text(text)) => text.parse()?,
        Some(other) => {
            return Err(QueryError::classification(format!(
                "expected a connective, found {}",
                other.describe()
            )))
        }
    };
    if args.next().is_some() {
        return Err(QueryError::classification(
            "a group takes at most one connective argument",
        ));
    }
    Ok(connective)
}

/// Classifies a dynamic where call into a [`CallShape`].
///
/// Priority follows the call shapes: condition lists, then grouping
/// callbacks without a comparison, then sub-queries with a comparison, then
/// plain columns.
///
/// # Errors
///
/// Returns [`QueryError::Classification`] when the column or the trailing
/// arguments fit no shape.
pub fn classify<'a>(
    column: WhereArg<'a>,
    args: Vec<WhereArg<'a>>,
    defaults: &WhereOptions,
) -> Result<CallShape<'a>> {
    match column {
        WhereArg::Conditions(conditions) => Ok(CallShape::Conditions {
            conditions,
            connective: connective_only(args, defaults.connective)?,
        }),
        WhereArg::Query(Subquery::Callback(callback)) if is_group_call(&args) => {
            Ok(CallShape::Group {
                callback,
                connective: connective_only(args, defaults.connective)?,
            })
        }
        WhereArg::Query(query) => {
            if args.is_empty() {
                return Err(QueryError::classification(
                    "a subquery column needs an operator and a value",
                ));
            }
            let prepared = where_prepare(args, defaults)?;
            Ok(CallShape::SubqueryComparison {
                query,
                operator: prepared.options.operator,
                value: prepared.value.unwrap_or(Operand::Value(SqlValue::Null)),
                connective: prepared.options.connective,
            })
        }
        WhereArg::Text(name) => column_shape(ColumnRef::Name(name), args, defaults),
        WhereArg::Raw(sql) => column_shape(ColumnRef::Raw(sql), args, defaults),
        WhereArg::Value(_) | WhereArg::Offset(_) => {
            Err(QueryError::classification(SUBQUERY_SHAPE))
        }
    }
}

fn is_group_call(args: &[WhereArg<'_>]) -> bool {
    match args {
        [] => true,
        [WhereArg::Text(text)] => Connective::is_connective(text),
        _ => false,
    }
}

fn column_shape<'a>(
    column: ColumnRef,
    args: Vec<WhereArg<'a>>,
    defaults: &WhereOptions,
) -> Result<CallShape<'a>> {
    let prepared = where_prepare(args, defaults)?;
    let value = prepared.value.unwrap_or(Operand::Value(SqlValue::Null));

    Ok(if prepared.has_tail {
        CallShape::OperatorValueConnective {
            column,
            operator: prepared.options.operator,
            value,
            connective: prepared.options.connective,
            offset: prepared.options.offset,
        }
    } else if prepared.has_operator {
        CallShape::OperatorValue {
            column,
            operator: prepared.options.operator,
            value,
        }
    } else {
        CallShape::Value { column, value }
    })
}
