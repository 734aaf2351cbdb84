use crate::query::{
    ast::{
        column::QueryColumn,
        condition::QueryCondition,
        join::Join,
        wrapper::QueryWrapper,
    },
    error::QueryError,
    safety,
};

/// A pending join; completing it with an ON condition hands the query back.
#[derive(Debug, Clone)]
#[must_use = "a join is only added once it is completed with `on`, `on_columns` or `finish`"]
pub struct Joiner {
    query: QueryWrapper,
    join: Join,
}

impl Joiner {
    pub(crate) fn new(query: QueryWrapper, join: Join) -> Self {
        Joiner { query, join }
    }

    pub fn as_(mut self, alias: &str) -> Result<Self, QueryError> {
        safety::check_identifier(alias)?;
        self.join.table.alias = Some(alias.to_string());
        Ok(self)
    }

    pub fn on(mut self, condition: QueryCondition) -> QueryWrapper {
        self.join.on = Some(condition);
        self.finish()
    }

    /// `ON left = right`
    pub fn on_columns(self, left: &QueryColumn, right: &QueryColumn) -> QueryWrapper {
        let condition = left.eq_column(right);
        self.on(condition)
    }

    /// Completes the join without an ON condition, as for `CROSS JOIN`.
    pub fn finish(mut self) -> QueryWrapper {
        self.query.joins.push(self.join);
        self.query
    }
}
