//! SELECT and WHERE rendering shared by every dialect.
//!
//! `offset` counts the placeholders already emitted. It is threaded through
//! groups and sub-selects so numbered placeholders stay in binding order.

use super::Grammar;
use crate::builder::{ColumnRef, Query, WhereClause, WhereKind};
use crate::error::Result;

pub(super) fn select<G: Grammar + ?Sized>(
    grammar: &G,
    query: &Query,
    offset: &mut usize,
) -> Result<String> {
    let columns = if query.columns.is_empty() {
        String::from("*")
    } else {
        query
            .columns
            .iter()
            .map(|c| grammar.wrap(c))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sql = format!("SELECT {columns}");
    if let Some(table) = &query.from {
        sql.push_str(" FROM ");
        sql.push_str(&grammar.wrap(table));
    }
    if query.has_wheres() {
        sql.push_str(" WHERE ");
        sql.push_str(&wheres(grammar, &query.wheres, offset)?);
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(sql)
}

pub(super) fn wheres<G: Grammar + ?Sized>(
    grammar: &G,
    clauses: &[WhereClause],
    offset: &mut usize,
) -> Result<String> {
    let mut parts = Vec::with_capacity(clauses.len());
    for (i, clause) in clauses.iter().enumerate() {
        let body = clause_sql(grammar, clause, offset)?;
        if i == 0 {
            parts.push(body);
        } else {
            parts.push(format!("{} {body}", clause.connective.as_sql()));
        }
    }
    Ok(parts.join(" "))
}

fn clause_sql<G: Grammar + ?Sized>(
    grammar: &G,
    clause: &WhereClause,
    offset: &mut usize,
) -> Result<String> {
    match &clause.kind {
        WhereKind::Basic {
            column, operator, ..
        } => {
            grammar.validate_operator(operator)?;
            let column = column_sql(grammar, column, offset)?;
            *offset += 1;
            Ok(format!(
                "{column} {operator} {}",
                grammar.placeholder(*offset)
            ))
        }
        WhereKind::Null { column } => {
            Ok(format!("{} IS NULL", column_sql(grammar, column, offset)?))
        }
        WhereKind::NotNull { column } => Ok(format!(
            "{} IS NOT NULL",
            column_sql(grammar, column, offset)?
        )),
        WhereKind::Nested { query } => {
            Ok(format!("({})", wheres(grammar, &query.wheres, offset)?))
        }
        WhereKind::SubqueryCompare {
            column,
            operator,
            query,
        } => {
            grammar.validate_operator(operator)?;
            let column = column_sql(grammar, column, offset)?;
            let sub = select(grammar, query, offset)?;
            Ok(format!("{column} {operator} ({sub})"))
        }
    }
}

fn column_sql<G: Grammar + ?Sized>(
    grammar: &G,
    column: &ColumnRef,
    offset: &mut usize,
) -> Result<String> {
    match column {
        ColumnRef::Name(name) => Ok(grammar.wrap(name)),
        ColumnRef::Raw(sql) => Ok(sql.clone()),
        ColumnRef::Subquery(query) => Ok(format!("({})", select(grammar, query, offset)?)),
    }
}
