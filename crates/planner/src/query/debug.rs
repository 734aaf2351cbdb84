//! Human-readable SQL with parameters inlined. Output is meant for logs and
//! is never executed.

use crate::query::{
    ast::wrapper::QueryWrapper, dialect::Dialect, error::QueryError, statement::Statement,
};
use model::core::value::Value;

/// Replaces each `?` in `sql`, left to right, with the literal form of the
/// matching parameter. Placeholders without a parameter are left as is.
pub fn replace_sql_params(sql: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter().peekable();
    for ch in sql.chars() {
        match params.next_if(|_| ch == '?') {
            Some(value) => out.push_str(&value.to_debug_literal()),
            None => out.push(ch),
        }
    }
    out
}

impl QueryWrapper {
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<Statement, QueryError> {
        dialect.for_select_by_query(self)
    }

    pub fn to_debug_sql(&self, dialect: &dyn Dialect) -> Result<String, QueryError> {
        Ok(self.to_sql(dialect)?.to_debug_sql())
    }
}
