//! SQL values and parameter handling.
//!
//! Values never appear in generated SQL text. They travel next to it as
//! positional bindings, one per placeholder.

/// A SQL value that can be bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value. Comparing against it turns a clause into a null check.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// A literal list of values, possibly nested.
    List(Vec<SqlValue>),
}

impl SqlValue {
    /// Builds a list value from anything convertible.
    #[must_use]
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToSqlValue,
    {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }

    /// Returns true for the null sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Collapses nested lists into a flat sequence of scalars.
    ///
    /// A scalar flattens to a one-element vector, an empty list to nothing.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Self>) {
        match self {
            Self::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            scalar => out.push(scalar),
        }
    }

    /// Returns the scalar a basic comparison binds.
    ///
    /// A basic comparison owns exactly one placeholder, so the flattened
    /// value must hold exactly one scalar; anything else gives `None`.
    #[must_use]
    pub fn single_scalar(self) -> Option<Self> {
        let mut scalars = self.flatten();
        if scalars.len() == 1 {
            scalars.pop()
        } else {
            None
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl<T: ToSqlValue, const N: usize> ToSqlValue for [T; N] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::list(self)
    }
}
