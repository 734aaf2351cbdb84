//! Concrete dialects and the mapping from database type to dialect.

use crate::query::{
    ast::{row::UpdateRow, table::QueryTable, wrapper::QueryWrapper},
    dialect::{
        Dialect,
        keyword::KeywordWrap,
        limit::{
            Db2105Limit, DerbyLimit, InformixLimit, LimitOffset, MySqlLimit, OracleLimit,
            PostgresLimit, SinoDbLimit, SqlServer2005Limit, SqlServerLimit, SybaseLimit,
        },
    },
    error::QueryError,
    renderer::dml,
    statement::Statement,
};
use model::core::db_type::DbType;
use std::sync::Arc;
use tracing::warn;

/// A dialect fully described by its quoting and paging policies.
#[derive(Debug, Clone)]
pub struct CommonDialect {
    name: String,
    keyword_wrap: KeywordWrap,
    limit: Arc<dyn LimitOffset>,
}

impl CommonDialect {
    pub fn new(name: &str, keyword_wrap: KeywordWrap, limit: Arc<dyn LimitOffset>) -> Self {
        CommonDialect {
            name: name.to_string(),
            keyword_wrap,
            limit,
        }
    }

    pub fn mysql() -> Self {
        Self::new("mysql", KeywordWrap::back_quote(), Arc::new(MySqlLimit))
    }

    pub fn postgresql() -> Self {
        Self::new("postgresql", KeywordWrap::double_quotation(), Arc::new(PostgresLimit))
    }

    pub fn sqlserver() -> Self {
        Self::new("sqlserver", KeywordWrap::square_brackets(), Arc::new(SqlServerLimit))
    }

    pub fn sqlserver_2005() -> Self {
        Self::new(
            "sqlserver_2005",
            KeywordWrap::square_brackets(),
            Arc::new(SqlServer2005Limit),
        )
    }
}

impl Dialect for CommonDialect {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn keyword_wrap(&self) -> &KeywordWrap {
        &self.keyword_wrap
    }

    fn limit_offset(&self) -> &dyn LimitOffset {
        self.limit.as_ref()
    }

    fn for_select_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::select_statement(self, query)
    }

    fn for_delete_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::delete_statement(self, query)
    }

    fn for_update_by_query(
        &self,
        row: &UpdateRow,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError> {
        dml::update_statement(self, row, query)
    }

    fn for_insert(&self, table: &QueryTable, row: &UpdateRow) -> Result<Statement, QueryError> {
        dml::insert_statement(self, table, row)
    }

    fn for_insert_batch(
        &self,
        table: &QueryTable,
        rows: &[UpdateRow],
    ) -> Result<Statement, QueryError> {
        dml::insert_batch_statement(self, table, rows)
    }
}

/// Oracle family: no `AS` before table aliases and `INSERT ALL` batches.
#[derive(Debug, Clone)]
pub struct OracleDialect {
    inner: CommonDialect,
}

impl OracleDialect {
    pub fn new(name: &str, limit: Arc<dyn LimitOffset>) -> Self {
        OracleDialect {
            inner: CommonDialect::new(name, KeywordWrap::oracle(), limit),
        }
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn keyword_wrap(&self) -> &KeywordWrap {
        self.inner.keyword_wrap()
    }

    fn limit_offset(&self) -> &dyn LimitOffset {
        self.inner.limit_offset()
    }

    fn table_alias_separator(&self) -> &'static str {
        " "
    }

    fn for_select_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::select_statement(self, query)
    }

    fn for_delete_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::delete_statement(self, query)
    }

    fn for_update_by_query(
        &self,
        row: &UpdateRow,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError> {
        dml::update_statement(self, row, query)
    }

    fn for_insert(&self, table: &QueryTable, row: &UpdateRow) -> Result<Statement, QueryError> {
        dml::insert_statement(self, table, row)
    }

    fn for_insert_batch(
        &self,
        table: &QueryTable,
        rows: &[UpdateRow],
    ) -> Result<Statement, QueryError> {
        dml::insert_all_statement(self, table, rows)
    }
}

/// ClickHouse: mutations are `ALTER TABLE` statements.
#[derive(Debug, Clone)]
pub struct ClickHouseDialect {
    inner: CommonDialect,
}

impl ClickHouseDialect {
    pub fn new() -> Self {
        ClickHouseDialect {
            inner: CommonDialect::new("clickhouse", KeywordWrap::none(), Arc::new(MySqlLimit)),
        }
    }
}

impl Default for ClickHouseDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for ClickHouseDialect {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn keyword_wrap(&self) -> &KeywordWrap {
        self.inner.keyword_wrap()
    }

    fn limit_offset(&self) -> &dyn LimitOffset {
        self.inner.limit_offset()
    }

    fn for_select_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::select_statement(self, query)
    }

    fn for_delete_by_query(&self, query: &QueryWrapper) -> Result<Statement, QueryError> {
        dml::alter_delete_statement(self, query)
    }

    fn for_update_by_query(
        &self,
        row: &UpdateRow,
        query: &QueryWrapper,
    ) -> Result<Statement, QueryError> {
        dml::alter_update_statement(self, row, query)
    }

    fn for_insert(&self, table: &QueryTable, row: &UpdateRow) -> Result<Statement, QueryError> {
        dml::insert_statement(self, table, row)
    }

    fn for_insert_batch(
        &self,
        table: &QueryTable,
        rows: &[UpdateRow],
    ) -> Result<Statement, QueryError> {
        dml::insert_batch_statement(self, table, rows)
    }
}

/// Builds the dialect for a database type. Unknown products get the MySQL
/// flavor.
pub fn create_dialect(db_type: DbType) -> Arc<dyn Dialect> {
    use DbType::*;

    let name = db_type.name();
    let (wrap, limit): (KeywordWrap, Arc<dyn LimitOffset>) = match db_type {
        ClickHouse => return Arc::new(ClickHouseDialect::new()),
        Oracle => return Arc::new(OracleDialect::new(name, Arc::new(OracleLimit))),
        Oracle12c => return Arc::new(OracleDialect::new(name, Arc::new(DerbyLimit))),
        MySql | MariaDb | H2 | GBase | Oscar | Xugu | OceanBase | Cubrid | Goldilocks | CsiiDb
        | Hive | Doris | GoldenDb | SunDb | YasDb => (KeywordWrap::back_quote(), Arc::new(MySqlLimit)),
        GBase8s => (KeywordWrap::none(), Arc::new(MySqlLimit)),
        Dm => (KeywordWrap::dm(), Arc::new(MySqlLimit)),
        Gauss => (KeywordWrap::double_quotation(), Arc::new(OracleLimit)),
        PostgreSql | Sqlite | Hsql | KingbaseEs | Phoenix | SapHana | Impala | HighGo | Vertica
        | Redshift | OpenGauss | UxDb | Lealone | DuckDb | GBase8c | GBase8sPg | Vastbase
        | Trino | Presto => (KeywordWrap::double_quotation(), Arc::new(PostgresLimit)),
        TDengine => (KeywordWrap::back_quote(), Arc::new(PostgresLimit)),
        Firebird | Db2 | Derby => (KeywordWrap::none(), Arc::new(DerbyLimit)),
        Db2V1005 => (KeywordWrap::none(), Arc::new(Db2105Limit)),
        SqlServer => (KeywordWrap::square_brackets(), Arc::new(SqlServerLimit)),
        SqlServer2005 => (KeywordWrap::square_brackets(), Arc::new(SqlServer2005Limit)),
        Informix => (KeywordWrap::none(), Arc::new(InformixLimit)),
        SinoDb => (KeywordWrap::double_quotation(), Arc::new(SinoDbLimit)),
        Sybase => (KeywordWrap::double_quotation(), Arc::new(SybaseLimit)),
        Other => {
            warn!("No dedicated dialect for database type '{name}', using the MySQL flavor");
            (KeywordWrap::back_quote(), Arc::new(MySqlLimit))
        }
    };
    Arc::new(CommonDialect::new(name, wrap, limit))
}
