//! Defines the `Dialect` trait for database-specific SQL syntax.

use crate::query::{
    ast::{row::UpdateRow, table::QueryTable, wrapper::QueryWrapper},
    dialect::{keyword::KeywordWrap, limit::LimitOffset},
    error::QueryError,
    statement::Statement,
};
use std::fmt::Debug;

pub mod keyword;
pub mod limit;
pub mod registry;
pub mod standard;

/// A database's SQL flavor: how identifiers are quoted, how a page of rows
/// is requested, and how each statement kind is laid out.
///
/// Dialects are immutable and shared behind `Arc` across threads.
pub trait Dialect: Send + Sync + Debug {
    /// Returns the name of the dialect (e.g., "mysql", "oracle").
    fn name(&self) -> String;

    /// Quoting policy applied to every table, column and alias name.
    fn keyword_wrap(&self) -> &KeywordWrap;

    /// Paging policy applied to every SELECT.
    fn limit_offset(&self) -> &dyn LimitOffset;

    /// Text between a table and its alias.
    fn table_alias_separator(&self) -> &'static str {
        " AS "
    }

    fn for_select_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError>;

    /// `DELETE FROM ... WHERE ...`; refuses a query without a WHERE condition.
    fn for_delete_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError>;

    /// `UPDATE ... SET ... WHERE ...`; refuses a query without a WHERE condition.
    fn for_update_by_query(
        &self,
        row: &UpdateRow,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError>;

    fn for_insert(&self, table: &QueryTable, row: &UpdateRow) -> Result<Statement, QueryError>;

    /// One statement inserting every row; all rows must set the same columns.
    fn for_insert_batch(
        &self,
        table: &QueryTable,
        rows: &[UpdateRow],
    ) -> Result<Statement, QueryError>;
}
