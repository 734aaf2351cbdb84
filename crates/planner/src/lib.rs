pub use model;

pub mod query;

pub use query::{
    ast::{
        column::QueryColumn, condition::QueryCondition, table::QueryTable,
        wrapper::QueryWrapper,
    },
    dialect::{Dialect, registry::DialectRegistry},
    error::QueryError,
    statement::Statement,
};
