use crate::query::ast::{column::QueryColumn, table::QueryTable, wrapper::QueryWrapper};

pub mod ast;
pub mod builder;
pub mod debug;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod macros;
pub mod paginate;
pub mod params;
pub mod renderer;
pub mod safety;
pub mod statement;

/// Shorthand for a column reference, accepting `name` or `table.name`.
pub fn column(name: &str) -> QueryColumn {
    QueryColumn::new(name)
}

pub fn table(name: &str) -> QueryTable {
    QueryTable::new(name)
}

pub fn query() -> QueryWrapper {
    QueryWrapper::new()
}
