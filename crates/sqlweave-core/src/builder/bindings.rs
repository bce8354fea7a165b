//! Binding tracker.
//!
//! Bound values are kept per clause category and flattened in the order the
//! categories appear in a rendered statement.

use std::collections::BTreeMap;

use super::value::SqlValue;

/// The clause a binding belongs to.
///
/// Variant order is the order in which categories are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingCategory {
    /// Bindings in the select list.
    Select,
    /// Bindings in the FROM clause.
    From,
    /// Bindings in JOIN conditions.
    Join,
    /// Bindings in the WHERE clause.
    Where,
    /// Bindings in GROUP BY.
    GroupBy,
    /// Bindings in HAVING.
    Having,
    /// Bindings in ORDER BY.
    Order,
    /// Bindings in UNION parts.
    Union,
}

impl BindingCategory {
    /// Returns the category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::From => "from",
            Self::Join => "join",
            Self::Where => "where",
            Self::GroupBy => "groupBy",
            Self::Having => "having",
            Self::Order => "order",
            Self::Union => "union",
        }
    }
}

/// Ordered bound values keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<BindingCategory, Vec<SqlValue>>,
}

impl Bindings {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `category`, collapsing nested lists first.
    pub fn add(&mut self, category: BindingCategory, value: SqlValue) {
        self.values
            .entry(category)
            .or_default()
            .extend(value.flatten());
    }

    /// Appends several values under `category`, preserving their order.
    pub fn extend<I>(&mut self, category: BindingCategory, values: I)
    where
        I: IntoIterator<Item = SqlValue>,
    {
        let slot = self.values.entry(category).or_default();
        for value in values {
            slot.extend(value.flatten());
        }
    }

    /// Returns the values registered under `category`.
    #[must_use]
    pub fn get(&self, category: BindingCategory) -> &[SqlValue] {
        self.values.get(&category).map_or(&[][..], Vec::as_slice)
    }

    /// Returns all values as one positional list.
    #[must_use]
    pub fn flatten(&self) -> Vec<SqlValue> {
        self.values.values().flatten().cloned().collect()
    }

    /// Total number of bound values across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    /// Returns true when nothing has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the first `len` values of `category` and drops the rest.
    pub fn truncate(&mut self, category: BindingCategory, len: usize) {
        if let Some(slot) = self.values.get_mut(&category) {
            slot.truncate(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_flattens_lists() {
        let mut bindings = Bindings::new();
        bindings.add(
            BindingCategory::Where,
            SqlValue::List(vec![SqlValue::Int(1), SqlValue::List(vec![SqlValue::Int(2)])]),
        );
        assert_eq!(
            bindings.get(BindingCategory::Where),
            &[SqlValue::Int(1), SqlValue::Int(2)]
        );
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_flatten_follows_category_order() {
        let mut bindings = Bindings::new();
        bindings.add(BindingCategory::Having, SqlValue::Int(3));
        bindings.add(BindingCategory::Where, SqlValue::Int(2));
        bindings.add(BindingCategory::Select, SqlValue::Int(1));
        assert_eq!(
            bindings.flatten(),
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_truncate_touches_one_category() {
        let mut bindings = Bindings::new();
        bindings.add(BindingCategory::Select, SqlValue::Int(1));
        bindings.extend(
            BindingCategory::Where,
            [SqlValue::Int(2), SqlValue::Int(3), SqlValue::Int(4)],
        );
        bindings.truncate(BindingCategory::Where, 1);
        bindings.truncate(BindingCategory::Having, 0);
        assert_eq!(bindings.flatten(), vec![SqlValue::Int(1), SqlValue::Int(2)]);
    }

    #[test]
    fn test_empty_category() {
        let bindings = Bindings::new();
        assert!(bindings.get(BindingCategory::Join).is_empty());
        assert!(bindings.is_empty());
        assert_eq!(BindingCategory::GroupBy.as_str(), "groupBy");
    }
}
