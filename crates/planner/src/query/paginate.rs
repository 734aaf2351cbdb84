//! Page queries: count derivation and the count-then-fetch flow.

use crate::query::{
    ast::{
        column::{ColumnKind, QueryColumn},
        condition::{Operand, QueryCondition},
        join::JoinKind,
        table::QueryTable,
        wrapper::QueryWrapper,
    },
    dialect::Dialect,
    error::QueryError,
    executor::{ExecutorError, StatementExecutor},
    statement::Statement,
};
use model::{
    pagination::page::{Page, PageRequest, total_pages},
    records::row::Row,
};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginateError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginateState {
    Init,
    HasKnownTotal,
    NeedsCount,
    Counted,
    EmptyTerminal,
    FetchPage,
    Done,
}

impl fmt::Display for PaginateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaginateState::Init => "init",
            PaginateState::HasKnownTotal => "has_known_total",
            PaginateState::NeedsCount => "needs_count",
            PaginateState::Counted => "counted",
            PaginateState::EmptyTerminal => "empty_terminal",
            PaginateState::FetchPage => "fetch_page",
            PaginateState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Derives the statement that counts the rows `query` would return without
/// its paging. The input is left untouched.
///
/// DISTINCT, GROUP BY and UNION queries (or any query when `optimize` is
/// off) are counted through a sub-query. Otherwise a query whose first select
/// column already is a `COUNT` keeps its select list, and any other query has
/// its select list replaced by `COUNT(*)`, with LEFT joins that the WHERE
/// clause does not mention dropped.
pub fn derive_count_query(query: &QueryWrapper, optimize: bool) -> QueryWrapper {
    let mut count = query.clone();
    count.order_by.clear();
    count.limit_rows = None;
    count.limit_offset = None;

    if !optimize || query.has_distinct() || !query.group_by.is_empty() || !query.unions.is_empty() {
        return wrap_in_count(count);
    }

    if query.select.first().is_some_and(|column| column.is_function("COUNT")) {
        return count;
    }

    count.select = vec![QueryColumn::count_all()];
    count.end_fragments.clear();
    if can_drop_joins(query) {
        count.joins.clear();
    }
    count
}

/// `SELECT COUNT(*) FROM (<inner>) AS t`, with the inner CTEs hoisted so they
/// still lead the statement.
fn wrap_in_count(mut inner: QueryWrapper) -> QueryWrapper {
    let with = std::mem::take(&mut inner.with);
    inner.end_fragments.clear();
    let mut outer = QueryWrapper::new()
        .select([QueryColumn::count_all()])
        .from_table(QueryTable::derived(inner).as_("t"));
    outer.with = with;
    outer
}

fn can_drop_joins(query: &QueryWrapper) -> bool {
    let mut joins = query.included_joins().peekable();
    if joins.peek().is_none() {
        return false;
    }
    joins.all(|join| {
        join.kind == JoinKind::Left && !condition_references(&query.where_clause, &join.table)
    })
}

fn condition_references(condition: &QueryCondition, table: &QueryTable) -> bool {
    match condition {
        QueryCondition::Empty => false,
        QueryCondition::Predicate {
            column, operand, ..
        } => {
            column_references(column, table)
                || match operand {
                    Operand::Column(other) => column_references(other, table),
                    Operand::Query(query) => query_references(query, table),
                    _ => false,
                }
        }
        QueryCondition::Raw { sql, .. } => raw_references(sql, table),
        QueryCondition::Exists { query, .. } => query_references(query, table),
        QueryCondition::Not(inner) | QueryCondition::Group(inner) => {
            condition_references(inner, table)
        }
        QueryCondition::Connector { left, right, .. } => {
            condition_references(left, table) || condition_references(right, table)
        }
    }
}

fn column_references(column: &QueryColumn, table: &QueryTable) -> bool {
    match &column.kind {
        ColumnKind::Named { table: owner, .. } => owner
            .as_deref()
            .is_some_and(|owner| table.is_referenced_by(owner)),
        ColumnKind::Function { args, .. } | ColumnKind::Distinct(args) => {
            args.iter().any(|arg| column_references(arg, table))
        }
        ColumnKind::Raw { sql, .. } => raw_references(sql, table),
        ColumnKind::Param(_) => false,
        ColumnKind::Arithmetic { left, right, .. } => {
            column_references(left, table) || column_references(right, table)
        }
        ColumnKind::SubSelect(query) => query_references(query, table),
    }
}

fn query_references(query: &QueryWrapper, table: &QueryTable) -> bool {
    query.select.iter().any(|column| column_references(column, table))
        || condition_references(&query.where_clause, table)
        || condition_references(&query.having, table)
        || query
            .included_joins()
            .filter_map(|join| join.on.as_ref())
            .any(|on| condition_references(on, table))
}

fn raw_references(sql: &str, table: &QueryTable) -> bool {
    let sql = sql.to_ascii_lowercase();
    [table.alias.as_deref(), table.name()]
        .into_iter()
        .flatten()
        .any(|name| sql.contains(&name.to_ascii_lowercase()))
}

/// Runs page requests against an executor: counts when the total is
/// unknown, then fetches the requested page.
#[derive(Debug, Clone)]
pub struct Paginator {
    dialect: Arc<dyn Dialect>,
    log_sql: bool,
}

impl Paginator {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Paginator {
            dialect,
            log_sql: false,
        }
    }

    /// Logs every executed statement with its parameters inlined.
    pub fn with_sql_logging(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn count_statement(
        &self,
        request: &PageRequest,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError> {
        let count = derive_count_query(query, request.optimize_count_query);
        self.dialect.for_select_by_query(&count)
    }

    pub fn page_statement(
        &self,
        request: &PageRequest,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError> {
        let page = query
            .clone()
            .limit_offset(Some(request.offset()), Some(request.page_size));
        self.dialect.for_select_by_query(&page)
    }

    pub async fn paginate<E>(
        &self,
        executor: &E,
        request: &PageRequest,
        query: &QueryWrapper,
    ) -> Result<Page<Row>, PaginateError>
    where
        E: StatementExecutor + ?Sized,
    {
        let mut state = PaginateState::Init;
        let mut total_row = 0;
        let mut records = Vec::new();

        loop {
            let next = match state {
                PaginateState::Init => {
                    if request.page_number == 0 {
                        return Err(QueryError::InvalidPage(
                            "page numbers start at 1".to_string(),
                        )
                        .into());
                    }
                    match request.known_total() {
                        Some(total) => {
                            total_row = total;
                            PaginateState::HasKnownTotal
                        }
                        None => PaginateState::NeedsCount,
                    }
                }
                PaginateState::NeedsCount => {
                    let statement = self.count_statement(request, query)?;
                    self.log_statement("count", &statement);
                    total_row = executor.query_count(&statement).await?;
                    PaginateState::Counted
                }
                PaginateState::HasKnownTotal | PaginateState::Counted => {
                    let pages = total_pages(total_row, request.page_size);
                    if total_row == 0 || request.page_number > pages {
                        PaginateState::EmptyTerminal
                    } else {
                        PaginateState::FetchPage
                    }
                }
                PaginateState::FetchPage => {
                    let statement = self.page_statement(request, query)?;
                    self.log_statement("page", &statement);
                    records = executor.query_rows(&statement).await?;
                    PaginateState::Done
                }
                PaginateState::EmptyTerminal => {
                    return Ok(Page::empty(
                        request.page_number,
                        request.page_size,
                        total_row,
                    ));
                }
                PaginateState::Done => {
                    return Ok(Page::new(
                        records,
                        request.page_number,
                        request.page_size,
                        total_row,
                    ));
                }
            };
            debug!(
                "Pagination state {state} -> {next} (page {}, size {}, total {total_row})",
                request.page_number, request.page_size
            );
            state = next;
        }
    }

    fn log_statement(&self, kind: &str, statement: &Statement) {
        if self.log_sql {
            info!("[{}] {kind} SQL: {}", self.dialect.name(), statement.to_debug_sql());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{column, dialect::standard::CommonDialect};

    fn mysql_sql(query: &QueryWrapper) -> String {
        CommonDialect::mysql().for_select_by_query(query).unwrap().sql
    }

    fn accounts_with_articles() -> QueryWrapper {
        QueryWrapper::new()
            .select([column("tb_account.id"), column("tb_article.title")])
            .from("tb_account")
            .unwrap()
            .left_join("tb_article")
            .unwrap()
            .on_columns(&column("tb_article.account_id"), &column("tb_account.id"))
            .where_(column("tb_account.age").ge(18))
            .order_by(column("tb_account.id").desc())
            .limit(10)
    }

    #[test]
    fn test_unreferenced_left_joins_are_dropped() {
        let query = accounts_with_articles();
        let count = derive_count_query(&query, true);
        assert_eq!(
            mysql_sql(&count),
            "SELECT COUNT(*) FROM `tb_account` WHERE `age` >= ?"
        );
        assert_eq!(query, accounts_with_articles());
    }

    #[test]
    fn test_referenced_join_is_kept() {
        let query = accounts_with_articles().and(column("tb_article.status").eq(1));
        let count = derive_count_query(&query, true);
        assert_eq!(count.joins.len(), 1);

        let raw = accounts_with_articles().where_raw("tb_article.status = ?", vec![1.into()]);
        assert_eq!(derive_count_query(&raw, true).joins.len(), 1);
    }

    #[test]
    fn test_inner_join_is_kept() {
        let query = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .inner_join("tb_article")
            .unwrap()
            .on_columns(&column("tb_article.account_id"), &column("tb_account.id"));
        assert_eq!(derive_count_query(&query, true).joins.len(), 1);
    }

    #[test]
    fn test_group_by_uses_sub_query() {
        let query = QueryWrapper::new()
            .select([column("sex"), QueryColumn::count_all()])
            .from("tb_account")
            .unwrap()
            .group_by([column("sex")])
            .order_by(column("sex").asc());
        assert_eq!(
            mysql_sql(&derive_count_query(&query, true)),
            "SELECT COUNT(*) FROM (SELECT `sex`, COUNT(*) FROM `tb_account` GROUP BY `sex`) AS `t`"
        );
    }

    #[test]
    fn test_unoptimized_count_hoists_ctes() {
        let query = QueryWrapper::new()
            .with("adults", &[], QueryWrapper::new().from("tb_account").unwrap())
            .unwrap()
            .from("adults")
            .unwrap()
            .limit(5);
        assert_eq!(
            mysql_sql(&derive_count_query(&query, false)),
            "WITH `adults` AS (SELECT * FROM `tb_account`) SELECT COUNT(*) FROM (SELECT * FROM `adults`) AS `t`"
        );
    }

    #[test]
    fn test_existing_count_is_kept() {
        let query = QueryWrapper::new()
            .select([QueryColumn::count(column("id")).as_("n")])
            .from("tb_account")
            .unwrap()
            .limit(1);
        assert_eq!(
            mysql_sql(&derive_count_query(&query, true)),
            "SELECT COUNT(`id`) AS `n` FROM `tb_account`"
        );
    }

    #[test]
    fn test_grouped_count_is_still_wrapped() {
        let query = QueryWrapper::new()
            .select([QueryColumn::count_all(), column("sex")])
            .from("tb_account")
            .unwrap()
            .group_by([column("sex")]);
        assert_eq!(
            mysql_sql(&derive_count_query(&query, true)),
            "SELECT COUNT(*) FROM (SELECT COUNT(*), `sex` FROM `tb_account` GROUP BY `sex`) AS `t`"
        );
    }

    #[test]
    fn test_state_names() {
        assert_eq!(PaginateState::NeedsCount.to_string(), "needs_count");
        assert_eq!(PaginateState::EmptyTerminal.to_string(), "empty_terminal");
    }
}
