//! Collects the values bound by a query tree in placeholder order, without
//! rendering it.

use crate::query::{
    ast::{
        column::{ColumnKind, QueryColumn},
        condition::{Operand, QueryCondition},
        order::OrderItem,
        row::{RowValue, UpdateRow},
        table::{QueryTable, TableSource},
        wrapper::QueryWrapper,
    },
    dialect::{Dialect, limit::LimitOffset},
};
use model::core::value::Value;

/// Walks a tree and gathers its values. With a paging strategy, every
/// query the strategy renders ORDER BY first contributes its ORDER BY
/// values first.
struct ParamCollector<'a> {
    limit: Option<&'a dyn LimitOffset>,
    values: Vec<Value>,
}

impl<'a> ParamCollector<'a> {
    fn new(limit: Option<&'a dyn LimitOffset>) -> Self {
        ParamCollector {
            limit,
            values: Vec::new(),
        }
    }

    fn push(&mut self, value: &Value) {
        self.values.push(value.clone());
    }

    fn extend(&mut self, values: &[Value]) {
        self.values.extend(values.iter().cloned());
    }

    fn orders_first(&self, query: &QueryWrapper) -> bool {
        self.limit.is_some_and(|limit| limit.orders_first(query))
    }
}

impl QueryWrapper {
    /// Every bound value, in the order its `?` appears in the rendered SQL:
    /// CTEs, select list, FROM sources, included joins (source then ON),
    /// WHERE, GROUP BY, HAVING, ORDER BY, then each union partner.
    ///
    /// This is the order of every paging strategy that leaves ORDER BY in
    /// place. [`QueryWrapper::value_array_for`] follows a given dialect.
    pub fn value_array(&self) -> Vec<Value> {
        let mut collector = ParamCollector::new(None);
        self.collect_params(&mut collector);
        collector.values
    }

    /// [`QueryWrapper::value_array`] as laid out by `dialect`. A paged query
    /// under a ROW_NUMBER window (SQL Server 2005) binds its ORDER BY values
    /// right after its CTEs.
    pub fn value_array_for(&self, dialect: &dyn Dialect) -> Vec<Value> {
        let mut collector = ParamCollector::new(Some(dialect.limit_offset()));
        self.collect_params(&mut collector);
        collector.values
    }

    fn collect_params(&self, c: &mut ParamCollector<'_>) {
        for cte in &self.with.items {
            cte.query.collect_params(c);
        }
        let orders_first = c.orders_first(self);
        if orders_first {
            self.collect_order_params(c);
        }
        for column in &self.select {
            column.collect_params(c);
        }
        for table in &self.from {
            table.collect_params(c);
        }
        for join in self.included_joins() {
            join.table.collect_params(c);
            if let Some(on) = &join.on {
                on.collect_params(c);
            }
        }
        self.where_clause.collect_params(c);
        for column in &self.group_by {
            column.collect_params(c);
        }
        self.having.collect_params(c);
        if !orders_first {
            self.collect_order_params(c);
        }
        for union in &self.unions {
            union.query.collect_params(c);
        }
    }

    fn collect_order_params(&self, c: &mut ParamCollector<'_>) {
        for item in &self.order_by {
            if let OrderItem::Column(order) = item {
                order.column.collect_params(c);
            }
        }
    }
}

impl QueryColumn {
    pub fn params(&self) -> Vec<Value> {
        let mut collector = ParamCollector::new(None);
        self.collect_params(&mut collector);
        collector.values
    }

    fn collect_params(&self, c: &mut ParamCollector<'_>) {
        match &self.kind {
            ColumnKind::Named { .. } => {}
            ColumnKind::Function { args, .. } | ColumnKind::Distinct(args) => {
                for arg in args {
                    arg.collect_params(c);
                }
            }
            ColumnKind::Raw { params, .. } => c.extend(params),
            ColumnKind::Param(value) => c.push(value),
            ColumnKind::Arithmetic { left, right, .. } => {
                left.collect_params(c);
                right.collect_params(c);
            }
            ColumnKind::SubSelect(query) => query.collect_params(c),
        }
    }
}

impl QueryCondition {
    /// Pre-order, left to right; empty subtrees contribute nothing.
    pub fn params(&self) -> Vec<Value> {
        let mut collector = ParamCollector::new(None);
        self.collect_params(&mut collector);
        collector.values
    }

    fn collect_params(&self, c: &mut ParamCollector<'_>) {
        let Some(node) = self.effective() else {
            return;
        };
        match node {
            QueryCondition::Predicate {
                column, operand, ..
            } => {
                column.collect_params(c);
                match operand {
                    Operand::None => {}
                    Operand::Value(value) => c.push(value),
                    Operand::List(values) => c.extend(values),
                    Operand::Range(start, end) => {
                        c.push(start);
                        c.push(end);
                    }
                    Operand::Column(other) => other.collect_params(c),
                    Operand::Query(query) => query.collect_params(c),
                }
            }
            QueryCondition::Raw { params, .. } => c.extend(params),
            QueryCondition::Exists { query, .. } => query.collect_params(c),
            QueryCondition::Not(inner) | QueryCondition::Group(inner) => inner.collect_params(c),
            QueryCondition::Connector { left, right, .. } => {
                left.collect_params(c);
                right.collect_params(c);
            }
            QueryCondition::Empty => {}
        }
    }
}

impl QueryTable {
    fn collect_params(&self, c: &mut ParamCollector<'_>) {
        if let TableSource::Derived(query) = &self.source {
            query.collect_params(c);
        }
    }
}

impl UpdateRow {
    /// Values bound by the SET list or VALUES tuple, in column order.
    pub fn params(&self) -> Vec<Value> {
        let mut collector = ParamCollector::new(None);
        for (_, value) in &self.entries {
            match value {
                RowValue::Value(value) => collector.push(value),
                RowValue::Raw { params, .. } => collector.extend(params),
                RowValue::Query(query) => query.collect_params(&mut collector),
            }
        }
        collector.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        column,
        dialect::{Dialect, standard::CommonDialect},
    };

    #[test]
    fn test_value_array_matches_rendered_params() {
        let derived = QueryWrapper::new()
            .select([column("account_id"), QueryColumn::param(7).as_("weight")])
            .from("tb_article")
            .unwrap()
            .where_(column("status").eq(1));
        let query = QueryWrapper::new()
            .with(
                "recent",
                &["id"],
                QueryWrapper::new()
                    .select([column("id")])
                    .from("tb_article")
                    .unwrap()
                    .where_(column("created").gt("2024-01-01")),
            )
            .unwrap()
            .select([
                column("tb_account.id"),
                QueryColumn::raw("IF(age > ?, 1, 0)", vec![Value::Int(60)]).as_("senior"),
            ])
            .from("tb_account")
            .unwrap()
            .left_join_query(derived)
            .as_("t")
            .unwrap()
            .on(column("t.account_id")
                .eq_column(&column("tb_account.id"))
                .and(column("t.weight").gt(2)))
            .where_(column("tb_account.age").between(18, 30))
            .and(column("tb_account.sex").in_list([1, 2]))
            .group_by([column("tb_account.id")])
            .having(QueryColumn::count_all().gt(3))
            .union(
                QueryWrapper::new()
                    .select([column("id"), QueryColumn::param(0)])
                    .from("tb_archive")
                    .unwrap()
                    .where_(column("id").lt(100)),
            );

        let statement = CommonDialect::mysql().for_select_by_query(&query).unwrap();
        assert_eq!(statement.params, query.value_array());
        assert_eq!(statement.placeholder_count(), statement.params.len());
        assert_eq!(statement.params.first(), Some(&Value::String("2024-01-01".to_string())));
        assert_eq!(statement.params.last(), Some(&Value::Int(100)));
    }

    #[test]
    fn test_window_paging_binds_order_values_first() {
        let archived = QueryWrapper::new()
            .select([column("id")])
            .from("tb_archive")
            .unwrap()
            .where_(column("id").lt(100))
            .order_by(QueryColumn::raw("ABS(id - ?)", vec![Value::Int(5)]).asc())
            .limit(3);
        let query = QueryWrapper::new()
            .select([column("id")])
            .from("tb_account")
            .unwrap()
            .where_(column("age").between(7, 18))
            .order_by(
                QueryColumn::raw("CASE WHEN id = ? THEN 0 ELSE 1 END", vec![Value::Int(99)]).asc(),
            )
            .limit_offset(Some(10), Some(10))
            .union(archived);

        let dialect = CommonDialect::sqlserver_2005();
        let statement = dialect.for_select_by_query(&query).unwrap();
        let expected: Vec<Value> = [99, 7, 18, 5, 100].into_iter().map(Value::Int).collect();
        assert_eq!(statement.params, expected);
        assert_eq!(query.value_array_for(&dialect), expected);

        let in_place: Vec<Value> = [7, 18, 99, 100, 5].into_iter().map(Value::Int).collect();
        assert_eq!(query.value_array(), in_place);
        assert_eq!(query.value_array_for(&CommonDialect::mysql()), in_place);
    }

    #[test]
    fn test_excluded_join_contributes_nothing() {
        let query = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .left_join_if("tb_article", false)
            .unwrap()
            .on(column("tb_article.status").eq(5))
            .where_(column("tb_account.id").eq(1));
        assert_eq!(query.value_array(), vec![Value::Int(1)]);
    }

    #[test]
    fn test_condition_params_skip_empty_sides() {
        let cond = column("a")
            .eq(1)
            .and(column("b").eq(None::<i32>))
            .or(column("c").in_list(Vec::<i32>::new()))
            .and(column("d").eq(4));
        assert_eq!(cond.params(), vec![Value::Int(1), Value::Int(4)]);
    }
}
