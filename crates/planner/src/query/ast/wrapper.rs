//! Defines the root of the query AST.

use crate::query::{
    ast::{
        column::{ColumnKind, QueryColumn},
        condition::{Operand, QueryCondition},
        cte::With,
        join::Join,
        order::OrderItem,
        table::{QueryTable, TableSource},
    },
    error::QueryError,
    safety,
};
use serde::{Deserialize, Serialize};

/// A SELECT statement under construction; also the WHERE source for
/// UPDATE and DELETE by query.
///
/// Each clause lives in its own field and builder methods only ever touch
/// the field they are named after.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryWrapper {
    pub with: With,
    /// Rendered as `/*+ hint */` right after `SELECT`.
    pub hint: Option<String>,
    pub select: Vec<QueryColumn>,
    pub from: Vec<QueryTable>,
    pub joins: Vec<Join>,
    #[serde(rename = "where")]
    pub where_clause: QueryCondition,
    pub group_by: Vec<QueryColumn>,
    pub having: QueryCondition,
    pub order_by: Vec<OrderItem>,
    pub limit_rows: Option<u64>,
    pub limit_offset: Option<u64>,
    pub unions: Vec<Union>,
    /// Emitted verbatim at the end of the statement, e.g., `FOR UPDATE`.
    pub end_fragments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub kind: UnionKind,
    pub query: QueryWrapper,
}

impl QueryWrapper {
    pub fn new() -> Self {
        QueryWrapper::default()
    }

    pub fn included_joins(&self) -> impl Iterator<Item = &Join> {
        self.joins.iter().filter(|join| join.effective)
    }

    /// FROM tables followed by the tables of included joins.
    pub fn query_tables(&self) -> Vec<&QueryTable> {
        self.from
            .iter()
            .chain(self.included_joins().map(|join| &join.table))
            .collect()
    }

    pub fn has_distinct(&self) -> bool {
        self.select.iter().any(QueryColumn::is_distinct)
    }

    pub fn has_limit(&self) -> bool {
        self.limit_rows.is_some() || self.limit_offset.is_some()
    }

    /// Re-checks every identifier and raw ORDER BY text, including those of
    /// nested queries. Builders validate eagerly; this is meant for ASTs that
    /// were deserialized or assembled field by field.
    pub fn validate(&self) -> Result<(), QueryError> {
        for cte in &self.with.items {
            safety::check_identifier(&cte.name)?;
            for column in &cte.columns {
                safety::check_identifier(column)?;
            }
            cte.query.validate()?;
        }
        for column in self.select.iter().chain(&self.group_by) {
            validate_column(column)?;
        }
        for table in &self.from {
            validate_table(table)?;
        }
        for join in &self.joins {
            validate_table(&join.table)?;
            if let Some(on) = &join.on {
                validate_condition(on)?;
            }
        }
        validate_condition(&self.where_clause)?;
        validate_condition(&self.having)?;
        for item in &self.order_by {
            match item {
                OrderItem::Column(order) => validate_column(&order.column)?,
                OrderItem::Raw(text) => safety::check_order_by(text)?,
            }
        }
        for union in &self.unions {
            union.query.validate()?;
        }
        Ok(())
    }
}

fn validate_table(table: &QueryTable) -> Result<(), QueryError> {
    match &table.source {
        TableSource::Named { schema, name } => {
            safety::check_table_name(name)?;
            if let Some(schema) = schema {
                safety::check_identifier(schema)?;
            }
        }
        TableSource::Derived(query) => query.validate()?,
    }
    if let Some(alias) = &table.alias {
        safety::check_identifier(alias)?;
    }
    Ok(())
}

fn validate_column(column: &QueryColumn) -> Result<(), QueryError> {
    if let Some(alias) = &column.alias {
        safety::check_identifier(alias)?;
    }
    match &column.kind {
        ColumnKind::Named { table, name } => {
            if let Some(table) = table {
                safety::check_identifier(table)?;
            }
            safety::check_identifier(name)
        }
        ColumnKind::Function { name, args } => {
            safety::check_identifier(name)?;
            args.iter().try_for_each(validate_column)
        }
        ColumnKind::Distinct(columns) => columns.iter().try_for_each(validate_column),
        ColumnKind::Arithmetic { left, right, .. } => {
            validate_column(left)?;
            validate_column(right)
        }
        ColumnKind::SubSelect(query) => query.validate(),
        ColumnKind::Raw { .. } | ColumnKind::Param(_) => Ok(()),
    }
}

fn validate_condition(condition: &QueryCondition) -> Result<(), QueryError> {
    match condition {
        QueryCondition::Predicate {
            column, operand, ..
        } => {
            validate_column(column)?;
            match operand {
                Operand::Column(other) => validate_column(other),
                Operand::Query(query) => query.validate(),
                _ => Ok(()),
            }
        }
        QueryCondition::Exists { query, .. } => query.validate(),
        QueryCondition::Not(inner) | QueryCondition::Group(inner) => validate_condition(inner),
        QueryCondition::Connector { left, right, .. } => {
            validate_condition(left)?;
            validate_condition(right)
        }
        QueryCondition::Empty | QueryCondition::Raw { .. } => Ok(()),
    }
}
