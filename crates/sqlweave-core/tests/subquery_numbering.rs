//! Tests for sub-query embedding: offset threading and placeholder
//! numbering across one, two and three levels of nesting.

mod common;
use common::*;

use sqlweave_core::builder::WhereKind;
use sqlweave_core::{QueryBuilder, SqlValue, Subquery, WhereArg};

#[test]
fn outer_value_offset_counts_subquery_bindings() {
    let mut qb = QueryBuilder::table("users");
    qb.where_eq("active", true).unwrap();

    let mut sub = QueryBuilder::table("scores");
    sub.select(&["max(score)"])
        .where_op("score", ">", 5)
        .unwrap()
        .where_op("score", "<", 90)
        .unwrap();
    qb.where_query(sub, ">", 50).unwrap();

    assert!(matches!(qb.wheres()[1].kind, WhereKind::Basic { offset: 3, .. }));

    let (sql, params) = pg(&qb);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "active" = $1 AND (SELECT max(score) FROM "scores" WHERE "score" > $2 AND "score" < $3) > $4"#
    );
    assert_eq!(
        params,
        vec![
            SqlValue::Bool(true),
            SqlValue::Int(5),
            SqlValue::Int(90),
            SqlValue::Int(50)
        ]
    );
}

#[test]
fn rejected_value_leaves_no_subquery_bindings() {
    let mut qb = QueryBuilder::table("users");
    qb.where_eq("active", true).unwrap();

    let err = qb
        .where_query(
            Subquery::callback(|q| {
                q.from("scores").where_op("score", ">", 5)?;
                Ok(())
            }),
            ">",
            SqlValue::Null,
        )
        .unwrap_err();
    assert!(err.to_string().contains("illegal operator and value combination"));

    let mut sub = QueryBuilder::table("scores");
    sub.where_op("score", "<", 90).unwrap();
    assert!(qb.where_query(sub, "=", [1, 2]).is_err());

    assert_eq!(qb.get_bindings(), vec![SqlValue::Bool(true)]);
    assert_placeholders_line_up(&qb);

    qb.where_query(
        Subquery::callback(|q| {
            q.from("scores").select(&["max(score)"]).where_op("score", ">", 5)?;
            Ok(())
        }),
        ">",
        50,
    )
    .unwrap();
    let (sql, params) = pg(&qb);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "active" = $1 AND (SELECT max(score) FROM "scores" WHERE "score" > $2) > $3"#
    );
    assert_eq!(
        params,
        vec![SqlValue::Bool(true), SqlValue::Int(5), SqlValue::Int(50)]
    );
    assert_placeholders_line_up(&qb);
}

#[test]
fn callback_subquery_column_through_dynamic_entry() {
    let mut qb = QueryBuilder::table("users");
    qb.where_eq("tenant", 7).unwrap();
    qb.where_args(
        WhereArg::callback(|q| {
            q.from("logins").select(&["count(*)"]).where_eq("ok", false)?;
            Ok(())
        }),
        vec![WhereArg::from("<"), WhereArg::from(3)],
    )
    .unwrap();

    let (sql, params) = sqlite(&qb);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "tenant" = ? AND (SELECT count(*) FROM "logins" WHERE "ok" = ?) < ?"#
    );
    assert_eq!(
        params,
        vec![SqlValue::Int(7), SqlValue::Bool(false), SqlValue::Int(3)]
    );
    assert_placeholders_line_up(&qb);
}

#[test]
fn sub_select_value() {
    let mut qb = QueryBuilder::table("users");
    qb.where_sub("id", "in", |q| {
        q.from("orders")
            .select(&["user_id"])
            .where_op("total", ">", 100)?;
        Ok(())
    })
    .unwrap()
    .where_eq("active", true)
    .unwrap();

    let (sql, params) = pg(&qb);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "id" in (SELECT "user_id" FROM "orders" WHERE "total" > $1) AND "active" = $2"#
    );
    assert_eq!(params, vec![SqlValue::Int(100), SqlValue::Bool(true)]);
}

#[test]
fn two_level_nesting() {
    let mut qb = QueryBuilder::table("users");
    qb.where_eq("region", "eu")
        .unwrap()
        .where_sub("id", "in", |q| {
            q.from("orders")
                .select(&["user_id"])
                .where_op("total", ">", 100)?
                .where_sub("product_id", "in", |q| {
                    q.from("products")
                        .select(&["id"])
                        .where_eq("category", "books")?;
                    Ok(())
                })?
                .where_eq("status", "paid")?;
            Ok(())
        })
        .unwrap()
        .where_op("age", ">=", 18)
        .unwrap();

    let (sql, params) = pg(&qb);
    assert_eq!(
        sql,
        concat!(
            r#"SELECT * FROM "users" WHERE "region" = $1 AND "id" in "#,
            r#"(SELECT "user_id" FROM "orders" WHERE "total" > $2 AND "product_id" in "#,
            r#"(SELECT "id" FROM "products" WHERE "category" = $3) AND "status" = $4) "#,
            r#"AND "age" >= $5"#
        )
    );
    assert_eq!(
        params,
        vec![
            text("eu"),
            SqlValue::Int(100),
            text("books"),
            text("paid"),
            SqlValue::Int(18)
        ]
    );
    assert_placeholders_line_up(&qb);
}

#[test]
fn three_level_nesting_inside_group() {
    let mut qb = QueryBuilder::table("accounts");
    qb.where_eq("kind", "business").unwrap();
    qb.or_where_group(|g| {
        g.where_eq("kind", "personal")?.where_query(
            Subquery::callback(|s| {
                s.from("transfers")
                    .select(&["sum(amount)"])
                    .where_op("created_at", ">", "2024-01-01")?
                    .where_sub("account_id", "in", |s| {
                        s.from("owners").select(&["account_id"]).where_query(
                            Subquery::callback(|s| {
                                s.from("flags")
                                    .select(&["count(*)"])
                                    .where_eq("severity", "high")?;
                                Ok(())
                            }),
                            "=",
                            0,
                        )?;
                        Ok(())
                    })?;
                Ok(())
            }),
            ">",
            10_000,
        )?;
        Ok(())
    })
    .unwrap();
    qb.where_eq("closed", false).unwrap();

    let (sql, params) = pg(&qb);
    assert_eq!(
        sql,
        concat!(
            r#"SELECT * FROM "accounts" WHERE "kind" = $1 OR ("kind" = $2 AND "#,
            r#"(SELECT sum(amount) FROM "transfers" WHERE "created_at" > $3 AND "account_id" in "#,
            r#"(SELECT "account_id" FROM "owners" WHERE "#,
            r#"(SELECT count(*) FROM "flags" WHERE "severity" = $4) = $5)) > $6) "#,
            r#"AND "closed" = $7"#
        )
    );
    assert_eq!(
        params,
        vec![
            text("business"),
            text("personal"),
            text("2024-01-01"),
            text("high"),
            SqlValue::Int(0),
            SqlValue::Int(10_000),
            SqlValue::Bool(false),
        ]
    );
    assert_placeholders_line_up(&qb);
}

#[test]
fn sqlite_placeholders_are_positional() {
    let mut qb = QueryBuilder::table("users");
    qb.where_eq("a", 1)
        .unwrap()
        .where_sub("b", "in", |q| {
            q.from("c").select(&["d"]).where_eq("e", 2)?;
            Ok(())
        })
        .unwrap();

    let (sql, params) = sqlite(&qb);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "a" = ? AND "b" in (SELECT "d" FROM "c" WHERE "e" = ?)"#
    );
    assert_eq!(params.len(), 2);
}
