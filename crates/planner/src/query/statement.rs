use model::core::value::Value;
use serde::{Deserialize, Serialize};

/// Rendered SQL text plus the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Statement {
            sql: sql.into(),
            params,
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// The statement with its parameters inlined; for logs only.
    pub fn to_debug_sql(&self) -> String {
        crate::query::debug::replace_sql_params(&self.sql, &self.params)
    }
}

impl From<(String, Vec<Value>)> for Statement {
    fn from((sql, params): (String, Vec<Value>)) -> Self {
        Statement { sql, params }
    }
}
