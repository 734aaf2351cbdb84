//! Statement layouts built on top of the SELECT renderer: SELECT by query,
//! DELETE and UPDATE by query, single and batch INSERT.

use crate::query::{
    ast::{
        row::{RowValue, UpdateRow},
        table::QueryTable,
        wrapper::QueryWrapper,
    },
    dialect::Dialect,
    error::QueryError,
    renderer::{
        Render, Renderer,
        select::{render_join, render_table},
    },
    statement::Statement,
};

pub fn select_statement(dialect: &dyn Dialect, query: &QueryWrapper) -> Result<Statement, QueryError> {
    let mut r = Renderer::new(dialect);
    query.render(&mut r)?;
    Ok(r.finish().into())
}

/// `DELETE FROM t [JOIN ...] WHERE ...`
pub fn delete_statement(dialect: &dyn Dialect, query: &QueryWrapper) -> Result<Statement, QueryError> {
    check_mutation(query, "delete")?;
    let mut r = Renderer::new(dialect);
    r.push_scope(query);
    r.push("DELETE FROM ");
    for (i, table) in query.from.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        render_table(table, &mut r)?;
    }
    render_joins_and_where(query, &mut r)?;
    r.pop_scope();
    Ok(r.finish().into())
}

/// `UPDATE t [JOIN ...] SET a = ?, b = <raw> WHERE ...`
pub fn update_statement(
    dialect: &dyn Dialect,
    row: &UpdateRow,
    query: &QueryWrapper,
) -> Result<Statement, QueryError> {
    let table = check_mutation(query, "update")?;
    if row.is_empty() {
        return Err(QueryError::EmptyRow("update sets no columns".to_string()));
    }
    let mut r = Renderer::new(dialect);
    r.push_scope(query);
    r.push("UPDATE ");
    render_table(table, &mut r)?;
    for join in query.included_joins() {
        r.push(" ");
        render_join(join, &mut r)?;
    }
    r.push(" SET ");
    render_assignments(row, &mut r)?;
    r.push(" WHERE ");
    query.where_clause.render(&mut r)?;
    render_end_fragments(query, &mut r);
    r.pop_scope();
    Ok(r.finish().into())
}

/// `ALTER TABLE t DELETE WHERE ...`
pub fn alter_delete_statement(
    dialect: &dyn Dialect,
    query: &QueryWrapper,
) -> Result<Statement, QueryError> {
    let table = check_mutation(query, "delete")?;
    let mut r = Renderer::new(dialect);
    r.push_scope(query);
    r.push("ALTER TABLE ");
    r.push_table_name(table)?;
    r.push(" DELETE WHERE ");
    query.where_clause.render(&mut r)?;
    r.pop_scope();
    Ok(r.finish().into())
}

/// `ALTER TABLE t UPDATE a = ? WHERE ...`
pub fn alter_update_statement(
    dialect: &dyn Dialect,
    row: &UpdateRow,
    query: &QueryWrapper,
) -> Result<Statement, QueryError> {
    let table = check_mutation(query, "update")?;
    if row.is_empty() {
        return Err(QueryError::EmptyRow("update sets no columns".to_string()));
    }
    let mut r = Renderer::new(dialect);
    r.push_scope(query);
    r.push("ALTER TABLE ");
    r.push_table_name(table)?;
    r.push(" UPDATE ");
    render_assignments(row, &mut r)?;
    r.push(" WHERE ");
    query.where_clause.render(&mut r)?;
    r.pop_scope();
    Ok(r.finish().into())
}

/// `INSERT INTO t(a, b) VALUES (?, ?)`
pub fn insert_statement(
    dialect: &dyn Dialect,
    table: &QueryTable,
    row: &UpdateRow,
) -> Result<Statement, QueryError> {
    if row.is_empty() {
        return Err(QueryError::EmptyRow("insert sets no columns".to_string()));
    }
    let mut r = Renderer::new(dialect);
    render_insert_target(table, row, &mut r)?;
    r.push(" VALUES ");
    render_values(row, &mut r)?;
    Ok(r.finish().into())
}

/// `INSERT INTO t(a, b) VALUES (?, ?), (?, ?)`
pub fn insert_batch_statement(
    dialect: &dyn Dialect,
    table: &QueryTable,
    rows: &[UpdateRow],
) -> Result<Statement, QueryError> {
    let first = check_batch(rows)?;
    let mut r = Renderer::new(dialect);
    render_insert_target(table, first, &mut r)?;
    r.push(" VALUES ");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        render_values(row, &mut r)?;
    }
    Ok(r.finish().into())
}

/// `INSERT ALL INTO t(a) VALUES (?) INTO t(a) VALUES (?) SELECT 1 FROM DUAL`
pub fn insert_all_statement(
    dialect: &dyn Dialect,
    table: &QueryTable,
    rows: &[UpdateRow],
) -> Result<Statement, QueryError> {
    check_batch(rows)?;
    let mut r = Renderer::new(dialect);
    r.push("INSERT ALL");
    for row in rows {
        r.push(" INTO ");
        r.push_table_name(table)?;
        render_column_list(row, &mut r)?;
        r.push(" VALUES ");
        render_values(row, &mut r)?;
    }
    r.push(" SELECT 1 FROM DUAL");
    Ok(r.finish().into())
}

/// Returns the target table of an UPDATE or DELETE by query.
fn check_mutation<'q>(query: &'q QueryWrapper, action: &str) -> Result<&'q QueryTable, QueryError> {
    let Some(table) = query.from.first() else {
        return Err(QueryError::MissingTable(format!("{action} needs a FROM table")));
    };
    if query.where_clause.is_empty() {
        return Err(QueryError::FullTableMutation(action.to_string()));
    }
    Ok(table)
}

fn check_batch(rows: &[UpdateRow]) -> Result<&UpdateRow, QueryError> {
    let Some(first) = rows.first() else {
        return Err(QueryError::InconsistentBatch("no rows to insert".to_string()));
    };
    if first.is_empty() {
        return Err(QueryError::EmptyRow("insert sets no columns".to_string()));
    }
    let columns = first.columns();
    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.columns() != columns {
            return Err(QueryError::InconsistentBatch(format!(
                "row {i} sets [{}], expected [{}]",
                row.columns().join(", "),
                columns.join(", ")
            )));
        }
    }
    Ok(first)
}

fn render_joins_and_where(query: &QueryWrapper, r: &mut Renderer) -> Result<(), QueryError> {
    for join in query.included_joins() {
        r.push(" ");
        render_join(join, r)?;
    }
    r.push(" WHERE ");
    query.where_clause.render(r)?;
    render_end_fragments(query, r);
    Ok(())
}

fn render_end_fragments(query: &QueryWrapper, r: &mut Renderer) {
    for fragment in &query.end_fragments {
        r.push(" ");
        r.push(fragment);
    }
}

fn render_insert_target(table: &QueryTable, row: &UpdateRow, r: &mut Renderer) -> Result<(), QueryError> {
    r.push("INSERT INTO ");
    r.push_table_name(table)?;
    render_column_list(row, r)
}

fn render_column_list(row: &UpdateRow, r: &mut Renderer) -> Result<(), QueryError> {
    r.push("(");
    for (i, (column, _)) in row.entries.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        r.push_identifier(column)?;
    }
    r.push(")");
    Ok(())
}

fn render_values(row: &UpdateRow, r: &mut Renderer) -> Result<(), QueryError> {
    r.push("(");
    for (i, (_, value)) in row.entries.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        value.render(r)?;
    }
    r.push(")");
    Ok(())
}

fn render_assignments(row: &UpdateRow, r: &mut Renderer) -> Result<(), QueryError> {
    for (i, (column, value)) in row.entries.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        r.push_identifier(column)?;
        r.push(" = ");
        value.render(r)?;
    }
    Ok(())
}

impl Render for RowValue {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        match self {
            RowValue::Value(value) => r.add_param(value.clone()),
            RowValue::Raw { sql, params } => {
                r.push(sql);
                r.params.extend(params.iter().cloned());
            }
            RowValue::Query(query) => {
                r.push("(");
                query.render(r)?;
                r.push(")");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        ast::column::QueryColumn,
        column,
        dialect::standard::{ClickHouseDialect, CommonDialect, OracleDialect},
        dialect::limit::OracleLimit,
        table,
    };
    use model::core::value::Value;
    use std::sync::Arc;

    fn adults() -> QueryWrapper {
        QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .where_(column("age").ge(18))
    }

    #[test]
    fn test_delete_by_query() {
        let statement = delete_statement(&CommonDialect::mysql(), &adults()).unwrap();
        assert_eq!(statement.sql, "DELETE FROM `tb_account` WHERE `age` >= ?");
        assert_eq!(statement.params, vec![Value::Int(18)]);
    }

    #[test]
    fn test_mutations_require_where() {
        let everything = QueryWrapper::new().from("tb_account").unwrap();
        let row = UpdateRow::new().set("status", 0);
        assert_eq!(
            delete_statement(&CommonDialect::mysql(), &everything),
            Err(QueryError::FullTableMutation("delete".to_string()))
        );
        assert_eq!(
            update_statement(&CommonDialect::mysql(), &row, &everything),
            Err(QueryError::FullTableMutation("update".to_string()))
        );

        let filtered_out = everything.where_(column("email").eq(None::<String>));
        assert!(matches!(
            delete_statement(&CommonDialect::mysql(), &filtered_out),
            Err(QueryError::FullTableMutation(_))
        ));
        assert!(matches!(
            delete_statement(&CommonDialect::mysql(), &QueryWrapper::new().where_(column("id").eq(1))),
            Err(QueryError::MissingTable(_))
        ));
    }

    #[test]
    fn test_update_by_query_params_follow_set_then_where() {
        let latest = QueryWrapper::new()
            .select([QueryColumn::max(column("id"))])
            .from("tb_article")
            .unwrap()
            .where_(column("status").eq(1));
        let row = UpdateRow::new()
            .set("user_name", "michael")
            .set_raw("hits", "hits + ?", vec![Value::Int(1)])
            .set_query("last_article", latest);
        let statement = update_statement(&CommonDialect::postgresql(), &row, &adults()).unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE \"tb_account\" SET \"user_name\" = ?, \"hits\" = hits + ?, \"last_article\" = \
             (SELECT MAX(\"id\") FROM \"tb_article\" WHERE \"status\" = ?) WHERE \"age\" >= ?"
        );
        assert_eq!(
            statement.params,
            vec![
                Value::String("michael".to_string()),
                Value::Int(1),
                Value::Int(1),
                Value::Int(18)
            ]
        );
    }

    #[test]
    fn test_update_with_join_qualifies_columns() {
        let query = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .left_join("tb_article")
            .unwrap()
            .on_columns(&column("tb_article.account_id"), &column("tb_account.id"))
            .where_(column("tb_article.status").eq(2));
        let row = UpdateRow::new().set("flagged", true);
        let statement = update_statement(&CommonDialect::mysql(), &row, &query).unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE `tb_account` LEFT JOIN `tb_article` ON `tb_article`.`account_id` = `tb_account`.`id` \
             SET `flagged` = ? WHERE `tb_article`.`status` = ?"
        );
    }

    #[test]
    fn test_insert_and_batch() {
        let row = UpdateRow::new().set("user_name", "a").set("age", 20);
        let statement = insert_statement(&CommonDialect::mysql(), &table("tb_account"), &row).unwrap();
        assert_eq!(statement.sql, "INSERT INTO `tb_account`(`user_name`, `age`) VALUES (?, ?)");

        let rows = vec![row.clone(), UpdateRow::new().set("user_name", "b").set("age", 30)];
        let statement =
            insert_batch_statement(&CommonDialect::mysql(), &table("tb_account"), &rows).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO `tb_account`(`user_name`, `age`) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(statement.params.len(), 4);
    }

    #[test]
    fn test_batch_rejects_mismatched_rows() {
        let rows = vec![
            UpdateRow::new().set("user_name", "a").set("age", 20),
            UpdateRow::new().set("user_name", "b"),
        ];
        assert!(matches!(
            insert_batch_statement(&CommonDialect::mysql(), &table("tb_account"), &rows),
            Err(QueryError::InconsistentBatch(_))
        ));
        assert!(matches!(
            insert_batch_statement(&CommonDialect::mysql(), &table("tb_account"), &[]),
            Err(QueryError::InconsistentBatch(_))
        ));
        assert!(matches!(
            insert_statement(&CommonDialect::mysql(), &table("tb_account"), &UpdateRow::new()),
            Err(QueryError::EmptyRow(_))
        ));
    }

    #[test]
    fn test_oracle_insert_all() {
        let dialect = OracleDialect::new("oracle", Arc::new(OracleLimit));
        let rows = vec![
            UpdateRow::new().set("user_name", "a"),
            UpdateRow::new().set("user_name", "b"),
        ];
        let statement = dialect.for_insert_batch(&table("tb_account"), &rows).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT ALL INTO tb_account(user_name) VALUES (?) INTO tb_account(user_name) VALUES (?) \
             SELECT 1 FROM DUAL"
        );
    }

    #[test]
    fn test_clickhouse_mutations() {
        let dialect = ClickHouseDialect::new();
        let statement = dialect.for_delete_by_query(&adults()).unwrap();
        assert_eq!(statement.sql, "ALTER TABLE tb_account DELETE WHERE age >= ?");

        let row = UpdateRow::new().set("status", 0);
        let statement = dialect.for_update_by_query(&row, &adults()).unwrap();
        assert_eq!(statement.sql, "ALTER TABLE tb_account UPDATE status = ? WHERE age >= ?");
    }
}
