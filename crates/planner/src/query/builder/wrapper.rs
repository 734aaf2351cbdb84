//! Fluent construction of [`QueryWrapper`].
//!
//! Builders take the wrapper by value and hand it back, so a query reads as
//! one chain. Methods that accept caller-supplied names validate them and
//! return `Result`.

use crate::query::{
    ast::{
        column::QueryColumn,
        condition::QueryCondition,
        cte::CommonTableExpr,
        join::{Join, JoinKind},
        order::{OrderBy, OrderItem},
        table::QueryTable,
        wrapper::{QueryWrapper, Union, UnionKind},
    },
    builder::joiner::Joiner,
    error::QueryError,
    safety,
};
use model::core::value::Value;
use std::collections::BTreeMap;

macro_rules! join_methods {
    ($($kind:ident => $plain:ident, $query:ident, $when:ident;)*) => {
        $(
            pub fn $plain(self, table: &str) -> Result<Joiner, QueryError> {
                let table = QueryTable::parse(table)?;
                Ok(self.join_table(JoinKind::$kind, table, true))
            }

            pub fn $query(self, query: QueryWrapper) -> Joiner {
                self.join_table(JoinKind::$kind, QueryTable::derived(query), true)
            }

            pub fn $when(self, table: &str, when: bool) -> Result<Joiner, QueryError> {
                let table = QueryTable::parse(table)?;
                Ok(self.join_table(JoinKind::$kind, table, when))
            }
        )*
    };
}

impl QueryWrapper {
    /// Appends to the select list; `None` entries are skipped.
    pub fn select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Option<QueryColumn>>,
    {
        self.select
            .extend(columns.into_iter().filter_map(Into::into));
        self
    }

    /// Adds a FROM table given as `name` or `schema.name`.
    pub fn from(self, table: &str) -> Result<Self, QueryError> {
        let table = QueryTable::parse(table)?;
        Ok(self.from_table(table))
    }

    /// Adds a FROM table unless the same table is already present, in which
    /// case the first one (and its alias) wins.
    pub fn from_table(mut self, table: QueryTable) -> Self {
        if !self.from.iter().any(|existing| existing.is_same_table(&table)) {
            self.from.push(table);
        }
        self
    }

    /// Adds a derived table, `(SELECT ...)`; alias it with [`QueryWrapper::as_`].
    pub fn from_query(self, query: QueryWrapper) -> Self {
        self.from_table(QueryTable::derived(query))
    }

    /// Aliases the single FROM table.
    pub fn as_(mut self, alias: &str) -> Result<Self, QueryError> {
        safety::check_identifier(alias)?;
        match self.from.as_mut_slice() {
            [table] => {
                table.alias = Some(alias.to_string());
                Ok(self)
            }
            tables => Err(QueryError::AmbiguousAlias {
                alias: alias.to_string(),
                table_count: tables.len(),
            }),
        }
    }

    /// Replaces the WHERE condition.
    pub fn where_(mut self, condition: QueryCondition) -> Self {
        self.where_clause = condition;
        self
    }

    pub fn and(mut self, condition: QueryCondition) -> Self {
        self.where_clause = std::mem::take(&mut self.where_clause).and(condition);
        self
    }

    pub fn or(mut self, condition: QueryCondition) -> Self {
        self.where_clause = std::mem::take(&mut self.where_clause).or(condition);
        self
    }

    pub fn where_raw(self, sql: &str, params: Vec<Value>) -> Self {
        self.and(QueryCondition::raw(sql, params))
    }

    /// ANDs one `column = value` predicate per entry, in key order.
    pub fn where_map(mut self, filters: BTreeMap<String, Value>) -> Result<Self, QueryError> {
        if filters.is_empty() {
            return Err(QueryError::EmptyFilterMap);
        }
        for (name, value) in filters {
            let column = QueryColumn::new(&name);
            if let Some(table) = column.table() {
                safety::check_identifier(table)?;
            }
            safety::check_identifier(column.name().unwrap_or_default())?;
            self = self.and(column.eq(value));
        }
        Ok(self)
    }

    /// Starts a join of any kind. When `when` is false the join is kept in
    /// the AST but skipped by rendering and by table registration.
    pub fn join_table(self, kind: JoinKind, table: QueryTable, when: bool) -> Joiner {
        let mut join = Join::new(kind, table);
        join.effective = when;
        Joiner::new(self, join)
    }

    join_methods! {
        Plain => join, join_query, join_if;
        Inner => inner_join, inner_join_query, inner_join_if;
        Left => left_join, left_join_query, left_join_if;
        Right => right_join, right_join_query, right_join_if;
        Full => full_join, full_join_query, full_join_if;
        Cross => cross_join, cross_join_query, cross_join_if;
    }

    pub fn group_by(mut self, columns: impl IntoIterator<Item = QueryColumn>) -> Self {
        self.group_by.extend(columns);
        self
    }

    pub fn group_by_names(self, names: &[&str]) -> Result<Self, QueryError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            safety::check_identifier(name)?;
            columns.push(QueryColumn::new(name));
        }
        Ok(self.group_by(columns))
    }

    /// ANDs into the HAVING condition.
    pub fn having(mut self, condition: QueryCondition) -> Self {
        self.having = std::mem::take(&mut self.having).and(condition);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(OrderItem::Column(order));
        self
    }

    /// Raw ORDER BY text such as `id desc, age`; only letters, digits, `_`,
    /// spaces, commas and dots are accepted.
    pub fn order_by_raw(mut self, text: &str) -> Result<Self, QueryError> {
        safety::check_order_by(text)?;
        self.order_by.push(OrderItem::Raw(text.to_string()));
        Ok(self)
    }

    pub fn limit(mut self, rows: impl Into<Option<u64>>) -> Self {
        self.limit_rows = rows.into();
        self
    }

    pub fn offset(mut self, offset: impl Into<Option<u64>>) -> Self {
        self.limit_offset = offset.into();
        self
    }

    pub fn limit_offset(self, offset: Option<u64>, rows: Option<u64>) -> Self {
        self.offset(offset).limit(rows)
    }

    pub fn union(mut self, query: QueryWrapper) -> Self {
        self.unions.push(Union {
            kind: UnionKind::Union,
            query,
        });
        self
    }

    pub fn union_all(mut self, query: QueryWrapper) -> Self {
        self.unions.push(Union {
            kind: UnionKind::UnionAll,
            query,
        });
        self
    }

    /// Adds a common table expression, `name(columns) AS (query)`.
    pub fn with(mut self, name: &str, columns: &[&str], query: QueryWrapper) -> Result<Self, QueryError> {
        safety::check_identifier(name)?;
        for column in columns {
            safety::check_identifier(column)?;
        }
        self.with.items.push(CommonTableExpr {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            query,
        });
        Ok(self)
    }

    /// Same as [`QueryWrapper::with`], marking the preamble `WITH RECURSIVE`.
    pub fn with_recursive(
        mut self,
        name: &str,
        columns: &[&str],
        query: QueryWrapper,
    ) -> Result<Self, QueryError> {
        self.with.recursive = true;
        self.with(name, columns, query)
    }

    pub fn hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn for_update(mut self) -> Self {
        self.end_fragments.push("FOR UPDATE".to_string());
        self
    }

    pub fn for_update_no_wait(mut self) -> Self {
        self.end_fragments.push("FOR UPDATE NOWAIT".to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ast::table::TableSource, column};

    #[test]
    fn test_select_skips_none() {
        let include_age = false;
        let query = QueryWrapper::new().select([
            Some(column("id")),
            include_age.then(|| column("age")),
            Some(column("user_name")),
        ]);
        assert_eq!(query.select.len(), 2);
    }

    #[test]
    fn test_from_deduplicates_keeping_first_alias() {
        let query = QueryWrapper::new()
            .from_table(QueryTable::new("tb_account").as_("a"))
            .from_table(QueryTable::new("tb_account").as_("b"))
            .from("tb_article")
            .unwrap();
        assert_eq!(query.from.len(), 2);
        assert_eq!(query.from[0].alias.as_deref(), Some("a"));
    }

    #[test]
    fn test_from_splits_schema() {
        let query = QueryWrapper::new().from("sales.tb_account").unwrap();
        assert_eq!(
            query.from[0].source,
            TableSource::Named {
                schema: Some("sales".to_string()),
                name: "tb_account".to_string()
            }
        );
    }

    #[test]
    fn test_as_requires_exactly_one_table() {
        let err = QueryWrapper::new().as_("a").unwrap_err();
        assert_eq!(
            err,
            QueryError::AmbiguousAlias {
                alias: "a".to_string(),
                table_count: 0
            }
        );

        let two = QueryWrapper::new()
            .from("tb_account")
            .and_then(|q| q.from("tb_article"))
            .unwrap();
        assert!(matches!(
            two.as_("a"),
            Err(QueryError::AmbiguousAlias { table_count: 2, .. })
        ));
    }

    #[test]
    fn test_blank_and_unsafe_table_names() {
        assert_eq!(
            QueryWrapper::new().from("").unwrap_err(),
            QueryError::BlankTableName
        );
        assert!(matches!(
            QueryWrapper::new().from("tb_account; drop"),
            Err(QueryError::UnsafeIdentifier { .. })
        ));
    }

    #[test]
    fn test_where_map() {
        assert_eq!(
            QueryWrapper::new().where_map(BTreeMap::new()).unwrap_err(),
            QueryError::EmptyFilterMap
        );

        let mut filters = BTreeMap::new();
        filters.insert("age".to_string(), Value::Int(18));
        filters.insert("sex".to_string(), Value::Int(1));
        let query = QueryWrapper::new().where_map(filters).unwrap();
        assert_eq!(query.where_clause, column("age").eq(18).and(column("sex").eq(1)));
    }

    #[test]
    fn test_where_map_rejects_unsafe_keys() {
        let mut filters = BTreeMap::new();
        filters.insert("age=1 or 1".to_string(), Value::Int(18));
        assert!(matches!(
            QueryWrapper::new().where_map(filters),
            Err(QueryError::UnsafeIdentifier { .. })
        ));
    }

    #[test]
    fn test_mutating_one_clause_keeps_the_others() {
        let query = QueryWrapper::new()
            .select([column("id")])
            .from("tb_account")
            .unwrap()
            .where_(column("age").ge(18))
            .order_by(column("id").desc())
            .limit(10)
            .select([column("age")])
            .where_(column("age").ge(21));
        assert_eq!(query.select.len(), 2);
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.limit_rows, Some(10));
    }

    #[test]
    fn test_conditional_join_is_recorded_but_not_included() {
        let query = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .left_join_if("tb_article", false)
            .unwrap()
            .on_columns(&column("tb_article.account_id"), &column("tb_account.id"));
        assert_eq!(query.joins.len(), 1);
        assert_eq!(query.included_joins().count(), 0);
    }

    #[test]
    fn test_with_validates_names() {
        assert!(matches!(
            QueryWrapper::new().with("t; x", &[], QueryWrapper::new()),
            Err(QueryError::UnsafeIdentifier { .. })
        ));
        let query = QueryWrapper::new()
            .with_recursive("tree", &["id", "parent_id"], QueryWrapper::new())
            .unwrap();
        assert!(query.with.recursive);
        assert_eq!(query.with.items[0].columns, vec!["id", "parent_id"]);
    }
}
