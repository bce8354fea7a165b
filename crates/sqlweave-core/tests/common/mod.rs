#![allow(dead_code)]

use sqlweave_core::schema::ColumnDesc;
use sqlweave_core::{PostgresGrammar, QueryBuilder, SqlValue, SqliteGrammar};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Routes builder and grammar events to the test output.
///
/// Only the first call installs the subscriber.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_target(false)
        .without_time()
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn pg(qb: &QueryBuilder) -> (String, Vec<SqlValue>) {
    qb.to_sql(&PostgresGrammar::new())
        .unwrap_or_else(|e| panic!("Failed to render: {qb:?}\nError: {e:?}"))
}

pub fn sqlite(qb: &QueryBuilder) -> (String, Vec<SqlValue>) {
    qb.to_sql(&SqliteGrammar::new())
        .unwrap_or_else(|e| panic!("Failed to render: {qb:?}\nError: {e:?}"))
}

/// Returns the numbers of every `$n` placeholder, in textual order.
pub fn numbered_placeholders(sql: &str) -> Vec<usize> {
    let mut found = vec![];
    let mut chars = sql.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some((_, d)) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(*d);
                chars.next();
            } else {
                break;
            }
        }
        if let Ok(n) = digits.parse() {
            found.push(n);
        }
    }
    found
}

/// Checks that `$1..$n` appear once each, in order, and match the bindings.
pub fn assert_placeholders_line_up(qb: &QueryBuilder) {
    let (sql, params) = pg(qb);
    let numbers = numbered_placeholders(&sql);
    let expected: Vec<usize> = (1..=params.len()).collect();
    assert_eq!(
        numbers, expected,
        "Placeholder numbering does not follow bindings.\n  SQL:      {sql}\n  Bindings: {params:?}"
    );

    let (lite, lite_params) = sqlite(qb);
    assert_eq!(lite.matches('?').count(), lite_params.len(), "SQL: {lite}");
}

pub fn col(table: &str, name: &str, type_name: &str) -> ColumnDesc {
    ColumnDesc::new(table, name, type_name)
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}
