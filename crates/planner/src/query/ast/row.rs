//! Column assignments for INSERT and UPDATE statements.

use crate::query::ast::wrapper::QueryWrapper;
use model::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValue {
    /// Bound as `?`.
    Value(Value),

    /// Emitted verbatim, e.g., `hits + 1`.
    Raw { sql: String, params: Vec<Value> },

    /// Emitted as `(SELECT ...)`.
    Query(Box<QueryWrapper>),
}

/// An ordered set of `column = value` assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRow {
    pub entries: Vec<(String, RowValue)>,
}

impl UpdateRow {
    pub fn new() -> Self {
        UpdateRow::default()
    }

    fn put(mut self, column: &str, value: RowValue) -> Self {
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column.to_string(), value)),
        }
        self
    }

    pub fn set(self, column: &str, value: impl Into<Value>) -> Self {
        self.put(column, RowValue::Value(value.into()))
    }

    pub fn set_raw(self, column: &str, sql: &str, params: Vec<Value>) -> Self {
        self.put(
            column,
            RowValue::Raw {
                sql: sql.to_string(),
                params,
            },
        )
    }

    pub fn set_query(self, column: &str, query: QueryWrapper) -> Self {
        self.put(column, RowValue::Query(Box::new(query)))
    }

    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_first_position() {
        let row = UpdateRow::new()
            .set("user_name", "michael")
            .set_raw("hits", "hits + 1", vec![])
            .set("user_name", "joe");
        assert_eq!(row.columns(), vec!["user_name", "hits"]);
        assert_eq!(row.entries[0].1, RowValue::Value(Value::from("joe")));
    }
}
