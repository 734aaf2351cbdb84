//! Table sources: named tables and derived (sub-query) tables.

use crate::query::{ast::wrapper::QueryWrapper, error::QueryError, safety};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTable {
    pub source: TableSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSource {
    /// e.g., `tb_account` or `sales.tb_account`
    Named {
        schema: Option<String>,
        name: String,
    },

    /// e.g., `(SELECT ...) AS t`
    Derived(Box<QueryWrapper>),
}

impl QueryTable {
    /// Builds a named table, splitting an optional schema at the first `.`.
    ///
    /// The name is not validated here; use [`QueryTable::parse`] for
    /// caller-supplied text or rely on the check performed at render time.
    pub fn new(name: &str) -> Self {
        match name.split_once('.') {
            Some((schema, table)) if !schema.is_empty() => Self::with_schema(schema, table),
            _ => QueryTable {
                source: TableSource::Named {
                    schema: None,
                    name: name.to_string(),
                },
                alias: None,
            },
        }
    }

    pub fn with_schema(schema: &str, name: &str) -> Self {
        QueryTable {
            source: TableSource::Named {
                schema: Some(schema.to_string()),
                name: name.to_string(),
            },
            alias: None,
        }
    }

    pub fn derived(query: QueryWrapper) -> Self {
        QueryTable {
            source: TableSource::Derived(Box::new(query)),
            alias: None,
        }
    }

    /// Validating counterpart of [`QueryTable::new`].
    pub fn parse(name: &str) -> Result<Self, QueryError> {
        safety::check_table_name(name)?;
        let table = Self::new(name);
        if let TableSource::Named { name, .. } = &table.source {
            safety::check_table_name(name)?;
        }
        Ok(table)
    }

    pub fn as_(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        match &self.source {
            TableSource::Named { name, .. } => Some(name),
            TableSource::Derived(_) => None,
        }
    }

    pub fn schema(&self) -> Option<&str> {
        match &self.source {
            TableSource::Named { schema, .. } => schema.as_deref(),
            TableSource::Derived(_) => None,
        }
    }

    pub fn derived_query(&self) -> Option<&QueryWrapper> {
        match &self.source {
            TableSource::Derived(query) => Some(query),
            TableSource::Named { .. } => None,
        }
    }

    /// The text a column uses to point at this table: the alias if set,
    /// otherwise the table name.
    pub fn qualifier(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.name())
    }

    /// Whether `reference` names this table, either by alias or by name.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        self.alias
            .as_deref()
            .is_some_and(|alias| alias.eq_ignore_ascii_case(reference))
            || self
                .name()
                .is_some_and(|name| name.eq_ignore_ascii_case(reference))
    }

    /// Same schema and name, regardless of alias. Derived tables are never
    /// the same as any other table.
    pub fn is_same_table(&self, other: &QueryTable) -> bool {
        match (&self.source, &other.source) {
            (
                TableSource::Named { schema, name },
                TableSource::Named {
                    schema: other_schema,
                    name: other_name,
                },
            ) => schema == other_schema && name == other_name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_split_at_first_dot() {
        let table = QueryTable::new("TEST.dbo.tb_account");
        assert_eq!(table.schema(), Some("TEST"));
        assert_eq!(table.name(), Some("dbo.tb_account"));
    }

    #[test]
    fn test_same_table_ignores_alias() {
        let a = QueryTable::new("tb_account").as_("a");
        let b = QueryTable::new("tb_account");
        let c = QueryTable::new("sales.tb_account");
        assert!(a.is_same_table(&b));
        assert!(!a.is_same_table(&c));

        let derived = QueryTable::derived(QueryWrapper::new());
        assert!(!derived.is_same_table(&derived.clone()));
    }

    #[test]
    fn test_parse_rejects_blank_and_unsafe_names() {
        assert_eq!(QueryTable::parse(""), Err(QueryError::BlankTableName));
        assert_eq!(QueryTable::parse("sales."), Err(QueryError::BlankTableName));
        assert!(matches!(
            QueryTable::parse("tb;drop"),
            Err(QueryError::UnsafeIdentifier { .. })
        ));
    }

    #[test]
    fn test_referenced_by_alias_or_name() {
        let table = QueryTable::new("tb_article").as_("ar");
        assert!(table.is_referenced_by("AR"));
        assert!(table.is_referenced_by("tb_article"));
        assert!(!table.is_referenced_by("tb_account"));
        assert_eq!(table.qualifier(), Some("ar"));
    }
}
