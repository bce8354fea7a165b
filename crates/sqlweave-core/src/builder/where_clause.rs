//! WHERE clause construction.
//!
//! Every entry point ends in [`QueryBuilder::dispatch`], which resolves a
//! [`CallShape`] in a fixed order: condition lists, grouping callbacks,
//! sub-query comparisons, sub-select values, null checks, and finally basic
//! comparisons.

use tracing::{debug, trace};

use super::args::{classify, CallShape, Condition, Operand, WhereArg};
use super::bindings::BindingCategory;
use super::clause::{ColumnRef, Connective, WhereClause, WhereKind};
use super::query::{Query, QueryBuilder};
use super::subquery::{Callback, Subquery};
use super::value::{SqlValue, ToSqlValue};
use crate::error::{QueryError, Result};

/// Returns true when comparing NULL with `operator` has no meaning.
///
/// Only `=`, `!=` and `<>` can be rewritten into a null check.
#[must_use]
pub fn invalid_operator_and_value(operator: &str, value: &SqlValue) -> bool {
    value.is_null() && !matches!(operator, "=" | "!=" | "<>")
}

/// One or more column names for null checks.
pub trait IntoColumns {
    /// Returns the column names in order.
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![String::from(self)]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|c| String::from(*c)).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|c| String::from(*c)).collect()
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(String::from).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl QueryBuilder {
    /// Adds a where clause from positional arguments.
    ///
    /// This is the dynamic form of the typed entry points below; the
    /// arguments are classified with [`classify`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] when the arguments fit no call
    /// shape, and propagates callback errors.
    pub fn where_args<'a>(
        &mut self,
        column: impl Into<WhereArg<'a>>,
        args: Vec<WhereArg<'a>>,
    ) -> Result<&mut Self> {
        let shape = classify(column.into(), args, &self.options)?;
        self.dispatch(shape)
    }

    /// `column = value`
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] when `value` does not flatten
    /// to exactly one scalar.
    pub fn where_eq<T: ToSqlValue>(&mut self, column: &str, value: T) -> Result<&mut Self> {
        self.dispatch(CallShape::Value {
            column: ColumnRef::from(column),
            value: Operand::value(value),
        })
    }

    /// `column operator value`
    ///
    /// The value fills a single placeholder. A list is accepted only when it
    /// flattens to one scalar, so `in` with several values needs a sub-select
    /// ([`Self::where_sub`]) instead.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] for a NULL value with an
    /// operator other than `=`, `!=` or `<>`, and for a list that does not
    /// flatten to exactly one scalar.
    pub fn where_op<T: ToSqlValue>(
        &mut self,
        column: &str,
        operator: &str,
        value: T,
    ) -> Result<&mut Self> {
        self.dispatch(CallShape::OperatorValue {
            column: ColumnRef::from(column),
            operator: String::from(operator),
            value: Operand::value(value),
        })
    }

    /// `OR column operator value`
    ///
    /// # Errors
    ///
    /// Same as [`Self::where_op`].
    pub fn or_where<T: ToSqlValue>(
        &mut self,
        column: &str,
        operator: &str,
        value: T,
    ) -> Result<&mut Self> {
        let offset = self.options.offset;
        self.dispatch(CallShape::OperatorValueConnective {
            column: ColumnRef::from(column),
            operator: String::from(operator),
            value: Operand::value(value),
            connective: Connective::Or,
            offset,
        })
    }

    /// `OR column = value`
    ///
    /// # Errors
    ///
    /// Same as [`Self::where_eq`].
    pub fn or_where_eq<T: ToSqlValue>(&mut self, column: &str, value: T) -> Result<&mut Self> {
        let operator = self.options.operator.clone();
        self.or_where(column, &operator, value)
    }

    /// `AND ( ... )` filled by `callback`.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `callback`.
    pub fn where_group<'a, F>(&mut self, callback: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()> + 'a,
    {
        self.dispatch(CallShape::Group {
            callback: Box::new(callback),
            connective: Connective::And,
        })
    }

    /// `OR ( ... )` filled by `callback`.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `callback`.
    pub fn or_where_group<'a, F>(&mut self, callback: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()> + 'a,
    {
        self.dispatch(CallShape::Group {
            callback: Box::new(callback),
            connective: Connective::Or,
        })
    }

    /// `(SELECT ...) operator value`
    ///
    /// # Errors
    ///
    /// Propagates sub-query errors; see [`Self::parse_sub`]. A value the
    /// comparison rejects leaves the builder as it was.
    pub fn where_query<'a, T: ToSqlValue>(
        &mut self,
        query: impl Into<Subquery<'a>>,
        operator: &str,
        value: T,
    ) -> Result<&mut Self> {
        let connective = self.options.connective;
        self.dispatch(CallShape::SubqueryComparison {
            query: query.into(),
            operator: String::from(operator),
            value: Operand::value(value),
            connective,
        })
    }

    /// `column operator (SELECT ...)` with the sub-select filled by `callback`.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `callback`.
    pub fn where_sub<'a, F>(
        &mut self,
        column: &str,
        operator: &str,
        callback: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()> + 'a,
    {
        self.dispatch(CallShape::OperatorValue {
            column: ColumnRef::from(column),
            operator: String::from(operator),
            value: Operand::Query(Subquery::callback(callback)),
        })
    }

    /// `AND ( c1 AND c2 ... )` built from a list of conditions.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] when a condition has no
    /// arguments or its arguments fit no call shape.
    pub fn where_all(&mut self, conditions: Vec<Condition<'_>>) -> Result<&mut Self> {
        self.dispatch(CallShape::Conditions {
            conditions,
            connective: Connective::And,
        })
    }

    /// `OR ( c1 AND c2 ... )` built from a list of conditions.
    ///
    /// # Errors
    ///
    /// Same as [`Self::where_all`].
    pub fn or_where_all(&mut self, conditions: Vec<Condition<'_>>) -> Result<&mut Self> {
        self.dispatch(CallShape::Conditions {
            conditions,
            connective: Connective::Or,
        })
    }

    /// Adds the clauses of a finished builder as one nested group.
    pub fn where_nested_query(&mut self, builder: Self, connective: Connective) -> &mut Self {
        self.add_nested_where_query(builder.into_query(), connective)
    }

    /// Resolves a call shape and appends the resulting clause.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Classification`] for invalid argument
    /// combinations and propagates callback errors.
    pub fn dispatch(&mut self, shape: CallShape<'_>) -> Result<&mut Self> {
        match shape {
            CallShape::Conditions {
                conditions,
                connective,
            } => self.add_array_of_wheres(conditions, connective),
            CallShape::Group {
                callback,
                connective,
            } => self.where_nested(callback, connective),
            CallShape::SubqueryComparison {
                query,
                operator,
                value,
                connective,
            } => {
                let parsed = self.create_sub(query)?;
                let mark = self.query.bindings.get(BindingCategory::Where).len();
                self.query
                    .bindings
                    .extend(BindingCategory::Where, parsed.bindings);
                let (expr, offset) = (parsed.expr, parsed.where_offset);
                if let Err(err) = self.compare(expr, operator, value, connective, offset) {
                    self.query.bindings.truncate(BindingCategory::Where, mark);
                    return Err(err);
                }
                Ok(self)
            }
            CallShape::Value { column, value } => {
                let operator = self.options.operator.clone();
                let connective = self.options.connective;
                let offset = self.options.offset;
                self.compare(column, operator, value, connective, offset)
            }
            CallShape::OperatorValue {
                column,
                operator,
                value,
            } => {
                let connective = self.options.connective;
                let offset = self.options.offset;
                self.compare(column, operator, value, connective, offset)
            }
            CallShape::OperatorValueConnective {
                column,
                operator,
                value,
                connective,
                offset,
            } => self.compare(column, operator, value, connective, offset),
        }
    }

    fn compare(
        &mut self,
        column: ColumnRef,
        operator: String,
        value: Operand<'_>,
        connective: Connective,
        offset: usize,
    ) -> Result<&mut Self> {
        let value = match value {
            Operand::Query(sub) => return self.where_sub_query(column, operator, sub, connective),
            Operand::Value(value) => value,
        };

        if value.is_null() {
            if invalid_operator_and_value(&operator, &value) {
                return Err(QueryError::classification(format!(
                    "illegal operator and value combination: {operator} NULL"
                )));
            }
            let negate = operator != "=";
            return Ok(self.push_null(vec![column], connective, negate));
        }

        let Some(binding) = value.clone().single_scalar() else {
            return Err(QueryError::classification(format!(
                "{operator} expects one value, got a list of {}",
                value.flatten().len()
            )));
        };

        trace!(?column, %operator, %connective, offset, "appending basic where clause");
        self.query.wheres.push(WhereClause::new(
            WhereKind::Basic {
                column,
                operator,
                value,
                offset,
            },
            connective,
        ));
        self.query.bindings.add(BindingCategory::Where, binding);
        Ok(self)
    }

    /// Appends `column operator (SELECT ...)`.
    fn where_sub_query(
        &mut self,
        column: ColumnRef,
        operator: String,
        sub: Subquery<'_>,
        connective: Connective,
    ) -> Result<&mut Self> {
        let child = match sub {
            Subquery::Callback(callback) => {
                let mut child = self.for_sub_query();
                callback(&mut child)?;
                child
            }
            Subquery::Builder(builder) => *builder,
            Subquery::Raw(_) => {
                return Err(QueryError::classification(
                    "a sub-select value must be a query builder or a callback",
                ))
            }
        };

        let query = child.into_query();
        trace!(?column, %operator, %connective, "appending sub-select where clause");
        self.query
            .bindings
            .extend(BindingCategory::Where, query.bindings.flatten());
        self.query.wheres.push(WhereClause::new(
            WhereKind::SubqueryCompare {
                column,
                operator,
                query: Box::new(query),
            },
            connective,
        ));
        Ok(self)
    }

    /// Runs `callback` on a nested builder and appends its clauses as a group.
    fn where_nested(
        &mut self,
        callback: Callback<'_>,
        connective: Connective,
    ) -> Result<&mut Self> {
        let mut child = self.for_nested_where();
        callback(&mut child)?;
        Ok(self.add_nested_where_query(child.into_query(), connective))
    }

    /// Appends `query` as a nested group, unless it holds no clause.
    pub fn add_nested_where_query(&mut self, query: Query, connective: Connective) -> &mut Self {
        if !query.has_wheres() {
            debug!(%connective, "dropping empty nested where group");
            return self;
        }

        trace!(clauses = query.wheres.len(), %connective, "appending nested where group");
        self.query
            .bindings
            .extend(BindingCategory::Where, query.bindings.flatten());
        self.query.wheres.push(WhereClause::new(
            WhereKind::Nested {
                query: Box::new(query),
            },
            connective,
        ));
        self
    }

    /// Wraps every condition into a single nested group.
    fn add_array_of_wheres(
        &mut self,
        conditions: Vec<Condition<'_>>,
        connective: Connective,
    ) -> Result<&mut Self> {
        if let Some(empty) = conditions.iter().find(|c| c.args.is_empty()) {
            return Err(QueryError::classification(format!(
                "condition on '{}' has no operator or value",
                empty.column
            )));
        }

        self.where_nested(
            Box::new(move |q: &mut Self| {
                for condition in conditions {
                    let shape = classify(
                        WhereArg::Text(condition.column),
                        condition.args,
                        &q.options,
                    )?;
                    q.dispatch(shape)?;
                }
                Ok(())
            }),
            connective,
        )
    }

    /// `column IS [NOT] NULL`, one clause per column.
    pub fn where_null_with<C: IntoColumns>(
        &mut self,
        columns: C,
        connective: Connective,
        negate: bool,
    ) -> &mut Self {
        let columns = columns.into_columns().into_iter().map(ColumnRef::Name).collect();
        self.push_null(columns, connective, negate)
    }

    /// `AND column IS NULL`
    pub fn where_null<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.where_null_with(columns, Connective::And, false)
    }

    /// `OR column IS NULL`
    pub fn or_where_null<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.where_null_with(columns, Connective::Or, false)
    }

    /// `AND column IS NOT NULL`
    pub fn where_not_null<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.where_null_with(columns, Connective::And, true)
    }

    /// `OR column IS NOT NULL`
    pub fn or_where_not_null<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.where_null_with(columns, Connective::Or, true)
    }

    fn push_null(
        &mut self,
        columns: Vec<ColumnRef>,
        connective: Connective,
        negate: bool,
    ) -> &mut Self {
        for column in columns {
            trace!(?column, %connective, negate, "appending null where clause");
            let kind = if negate {
                WhereKind::NotNull { column }
            } else {
                WhereKind::Null { column }
            };
            self.query.wheres.push(WhereClause::new(kind, connective));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_eq_defaults() {
        let mut qb = QueryBuilder::table("users");
        qb.where_eq("name", "Ken").unwrap();

        let clause = &qb.wheres()[0];
        assert_eq!(clause.connective, Connective::And);
        assert_eq!(clause.operator(), Some("="));
        assert!(matches!(&clause.kind, WhereKind::Basic { offset: 1, .. }));
        assert_eq!(qb.get_bindings(), vec![SqlValue::Text(String::from("Ken"))]);
    }

    #[test]
    fn test_or_where() {
        let mut qb = QueryBuilder::table("users");
        qb.where_op("score", ">", 64.56).unwrap();
        qb.or_where("vote", "<", 10).unwrap();

        assert_eq!(qb.wheres()[1].connective, Connective::Or);
        assert_eq!(qb.wheres()[1].operator(), Some("<"));
        assert_eq!(qb.get_bindings().len(), 2);
    }

    #[test]
    fn test_null_value_becomes_null_check() {
        let mut qb = QueryBuilder::table("users");
        qb.where_eq("deleted_at", None::<i64>).unwrap();
        qb.where_op("email", "!=", SqlValue::Null).unwrap();
        qb.where_op("phone", "<>", SqlValue::Null).unwrap();

        assert!(matches!(qb.wheres()[0].kind, WhereKind::Null { .. }));
        assert!(matches!(qb.wheres()[1].kind, WhereKind::NotNull { .. }));
        assert!(matches!(qb.wheres()[2].kind, WhereKind::NotNull { .. }));
        assert!(qb.bindings().is_empty());
    }

    #[test]
    fn test_null_with_ordering_operator_rejected() {
        let mut qb = QueryBuilder::table("users");
        let err = qb.where_op("age", ">", SqlValue::Null).unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
        assert!(qb.wheres().is_empty());
    }

    #[test]
    fn test_invalid_operator_and_value() {
        assert!(invalid_operator_and_value(">", &SqlValue::Null));
        assert!(!invalid_operator_and_value("=", &SqlValue::Null));
        assert!(!invalid_operator_and_value(">", &SqlValue::Int(1)));
    }

    #[test]
    fn test_single_element_list_binds_its_value() {
        let mut qb = QueryBuilder::table("users");
        qb.where_eq("id", [7]).unwrap();
        assert_eq!(qb.get_bindings(), vec![SqlValue::Int(7)]);
    }

    #[test]
    fn test_multi_value_list_rejected() {
        let mut qb = QueryBuilder::table("users");
        let err = qb.where_op("id", "in", [1, 2, 3]).unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
        assert!(err.to_string().contains("list of 3"));
        assert!(qb.wheres().is_empty());
        assert!(qb.bindings().is_empty());
    }

    #[test]
    fn test_rejected_subquery_comparison_keeps_no_bindings() {
        let mut qb = QueryBuilder::table("users");
        qb.where_eq("active", true).unwrap();

        let null = qb.where_query(
            Subquery::callback(|q| {
                q.from("scores").where_op("score", ">", 5)?;
                Ok(())
            }),
            ">",
            SqlValue::Null,
        );
        assert!(matches!(null, Err(QueryError::Classification(_))));

        let list = qb.where_query(
            Subquery::callback(|q| {
                q.from("scores").where_op("score", "<", 90)?;
                Ok(())
            }),
            "=",
            SqlValue::List(vec![]),
        );
        assert!(matches!(list, Err(QueryError::Classification(_))));

        assert_eq!(qb.wheres().len(), 1);
        assert_eq!(qb.get_bindings(), vec![SqlValue::Bool(true)]);
    }

    #[test]
    fn test_empty_list_rejected() {
        let mut qb = QueryBuilder::table("users");
        let err = qb.where_eq("id", SqlValue::List(vec![])).unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
    }

    #[test]
    fn test_where_null_many_columns() {
        let mut qb = QueryBuilder::table("users");
        qb.where_null_with(["a", "b"], Connective::Or, false);

        assert_eq!(qb.wheres().len(), 2);
        for (clause, name) in qb.wheres().iter().zip(["a", "b"]) {
            assert_eq!(clause.connective, Connective::Or);
            assert_eq!(
                clause.kind,
                WhereKind::Null {
                    column: ColumnRef::from(name)
                }
            );
        }
    }

    #[test]
    fn test_empty_group_dropped() {
        let mut qb = QueryBuilder::table("users");
        qb.where_group(|_| Ok(())).unwrap();
        assert!(qb.wheres().is_empty());
    }

    #[test]
    fn test_group_callback_error_propagates() {
        let mut qb = QueryBuilder::table("users");
        let err = qb
            .where_group(|q| {
                q.where_op("age", ">=", SqlValue::Null)?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
        assert!(qb.wheres().is_empty());
    }

    #[test]
    fn test_condition_without_args_rejected() {
        let mut qb = QueryBuilder::table("users");
        let err = qb
            .where_all(vec![Condition::new("score", vec![])])
            .unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
    }

    #[test]
    fn test_raw_sub_select_value_rejected() {
        let mut qb = QueryBuilder::table("users");
        let err = qb
            .where_args(
                "id",
                vec![WhereArg::from("in"), WhereArg::Query(Subquery::raw("SELECT 1"))],
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::Classification(_)));
    }
}
