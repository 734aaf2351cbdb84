use crate::query::ast::{condition::QueryCondition, table::QueryTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    /// A bare `JOIN`.
    Plain,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
            JoinKind::Plain => "JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: QueryTable,
    pub on: Option<QueryCondition>,
    /// A join declared with `when == false` stays in the AST but is neither
    /// rendered nor counted among the query's tables.
    pub effective: bool,
}

impl Join {
    pub fn new(kind: JoinKind, table: QueryTable) -> Self {
        Join {
            kind,
            table,
            on: None,
            effective: true,
        }
    }
}
