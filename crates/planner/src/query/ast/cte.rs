use crate::query::ast::wrapper::QueryWrapper;
use serde::{Deserialize, Serialize};

/// The `WITH [RECURSIVE] ...` preamble of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub recursive: bool,
    pub items: Vec<CommonTableExpr>,
}

impl With {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `name(col_a, col_b) AS (SELECT ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub name: String,
    pub columns: Vec<String>,
    pub query: QueryWrapper,
}
