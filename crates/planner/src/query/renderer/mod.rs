//! Defines the core rendering trait and context for converting AST to SQL.

use model::core::value::Value;

use crate::query::{
    ast::{table::QueryTable, wrapper::QueryWrapper},
    dialect::Dialect,
    error::QueryError,
    safety,
};

pub mod column;
pub mod condition;
pub mod dml;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer) -> Result<(), QueryError>;
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details. Each rendered query
/// pushes the tables it reads from, so column references can be qualified
/// against the innermost query.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    scopes: Vec<Vec<ScopeTable>>,
}

struct ScopeTable {
    name: Option<String>,
    alias: Option<String>,
}

impl ScopeTable {
    fn matches(&self, reference: &str) -> bool {
        [self.alias.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .any(|known| known.eq_ignore_ascii_case(reference))
    }
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            scopes: Vec::new(),
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        self.sql.push('?');
    }

    /// Validates and quotes an identifier; dotted names are quoted per part.
    pub fn wrap(&self, identifier: &str) -> Result<String, QueryError> {
        safety::check_identifier(identifier)?;
        let wrap = self.dialect.keyword_wrap();
        Ok(identifier
            .split('.')
            .map(|part| wrap.wrap(part))
            .collect::<Vec<_>>()
            .join("."))
    }

    pub fn push_identifier(&mut self, identifier: &str) -> Result<(), QueryError> {
        let wrapped = self.wrap(identifier)?;
        self.sql.push_str(&wrapped);
        Ok(())
    }

    /// Renders `[schema.]name` of a named table, without alias.
    pub fn push_table_name(&mut self, table: &QueryTable) -> Result<(), QueryError> {
        let Some(name) = table.name() else {
            return Err(QueryError::MissingTable(
                "a derived table cannot be the target of this statement".to_string(),
            ));
        };
        safety::check_table_name(name)?;
        if let Some(schema) = table.schema() {
            self.push_identifier(schema)?;
            self.sql.push('.');
        }
        self.push_identifier(name)
    }

    pub fn push_scope(&mut self, query: &QueryWrapper) {
        let tables = query
            .query_tables()
            .into_iter()
            .map(|table| ScopeTable {
                name: table.name().map(str::to_string),
                alias: table.alias.clone(),
            })
            .collect();
        self.scopes.push(tables);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// The qualifier to print before a column that references `table`, or
    /// `None` to print the column bare.
    ///
    /// Columns are bare when the innermost query reads from a single table
    /// that the reference resolves to. References to tables outside the
    /// innermost query (correlated sub-queries) keep the name they were
    /// given.
    pub fn qualifier_for(&self, table: &str) -> Option<String> {
        let Some(scope) = self.scopes.last() else {
            return Some(table.to_string());
        };
        match scope.iter().find(|t| t.matches(table)) {
            Some(_) if scope.len() == 1 => None,
            Some(found) => found
                .alias
                .clone()
                .or_else(|| found.name.clone())
                .or_else(|| Some(table.to_string())),
            None => Some(table.to_string()),
        }
    }

    /// Renders each item, separated by `separator`.
    pub fn push_list<T: Render>(&mut self, items: &[T], separator: &str) -> Result<(), QueryError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            item.render(self)?;
        }
        Ok(())
    }
}
