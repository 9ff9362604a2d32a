//! List Query Builder
//!
//! Filter, ordering and join-expansion descriptions understood by every
//! `TableStore` backend.

use std::cmp::Ordering;

use serde_json::Value;

use crate::domain::Row;

/// Row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`; a `null` value matches missing or null columns
    Eq(String, Value),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) => column,
        }
    }

    /// Whether `row` passes this filter
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(column, expected) => {
                let actual = row.get(column).unwrap_or(&Value::Null);
                values_equal(actual, expected)
            }
        }
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: false }
    }
}

/// Foreign-key embedding: the row referenced by `foreign_key` in `table` is
/// inlined under `alias`, restricted to `columns` (all columns when empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: String,
    pub foreign_key: String,
    pub table: String,
    pub columns: Vec<String>,
}

impl Embed {
    pub fn new(alias: &str, foreign_key: &str, table: &str, columns: &[&str]) -> Self {
        Self {
            alias: alias.to_string(),
            foreign_key: foreign_key.to_string(),
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Copy the requested columns out of the related row
    pub fn project(&self, related: &Row) -> Row {
        if self.columns.is_empty() {
            return related.clone();
        }
        self.columns
            .iter()
            .filter_map(|column| related.get(column).map(|v| (column.clone(), v.clone())))
            .collect()
    }
}

/// Filters, ordering and embeds for one read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub embeds: Vec<Embed>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn asc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy::asc(column));
        self
    }

    pub fn desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy::desc(column));
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Compare two rows by the ordering keys.
    ///
    /// Mirrors PostgreSQL defaults: nulls sort last ascending, first descending.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for key in &self.order {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
            let ordering = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) if key.ascending => Ordering::Greater,
                (true, false) => Ordering::Less,
                (false, true) if key.ascending => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) if key.ascending => compare_values(left, right),
                (false, false) => compare_values(left, right).reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
