use crate::query::ast::column::QueryColumn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nulls {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: QueryColumn,
    pub direction: Option<Direction>,
    pub nulls: Option<Nulls>,
}

impl OrderBy {
    pub fn new(column: QueryColumn, direction: Option<Direction>) -> Self {
        OrderBy {
            column,
            direction,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(Nulls::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(Nulls::Last);
        self
    }
}

/// One ORDER BY entry; raw text has been checked against the safe
/// character set when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderItem {
    Column(OrderBy),
    Raw(String),
}

impl QueryColumn {
    pub fn asc(self) -> OrderBy {
        OrderBy::new(self, Some(Direction::Asc))
    }

    pub fn desc(self) -> OrderBy {
        OrderBy::new(self, Some(Direction::Desc))
    }
}
