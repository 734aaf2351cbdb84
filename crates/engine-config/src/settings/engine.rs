use crate::{env::EnvManager, error::SettingsError};
use model::{core::db_type::DbType, pagination::page::PageRequest};
use planner::query::{dialect::registry::DialectRegistry, paginate::Paginator};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

pub const ENV_DB_TYPE: &str = "SQLFLEX_DB_TYPE";
pub const ENV_OPTIMIZE_COUNT: &str = "SQLFLEX_OPTIMIZE_COUNT";
pub const ENV_LOG_SQL: &str = "SQLFLEX_LOG_SQL";

/// Immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Database type used when a call does not name one
    pub default_db_type: DbType,
    /// Whether count queries may drop unreferenced LEFT joins
    pub optimize_count_query: bool,
    /// Whether executed statements are logged with parameters inlined
    pub log_sql: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettingsBuilder::default().build()
    }
}

impl EngineSettings {
    pub fn builder() -> EngineSettingsBuilder {
        EngineSettingsBuilder::default()
    }

    pub fn from_builder(builder: EngineSettingsBuilder) -> Self {
        Self {
            default_db_type: builder.default_db_type.unwrap_or(DbType::MySql),
            optimize_count_query: builder.optimize_count_query.unwrap_or(true),
            log_sql: builder.log_sql.unwrap_or(false),
        }
    }

    /// Reads `SQLFLEX_*` variables; unset variables keep their defaults.
    pub fn from_env(env: &EnvManager) -> Result<Self, SettingsError> {
        let mut builder = EngineSettingsBuilder::default();
        if let Some(db_type) = env.get(ENV_DB_TYPE) {
            builder = builder.default_db_type(db_type.parse()?);
        }
        if let Some(optimize) = env.get_bool(ENV_OPTIMIZE_COUNT)? {
            builder = builder.optimize_count_query(optimize);
        }
        if let Some(log_sql) = env.get_bool(ENV_LOG_SQL)? {
            builder = builder.log_sql(log_sql);
        }
        Ok(builder.build())
    }

    /// Reads a JSON object with any of the settings fields.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let builder: EngineSettingsBuilder = serde_json::from_str(&content)?;
        info!("Loaded engine settings from {}", path.display());
        Ok(builder.build())
    }

    /// A dialect registry defaulting to the configured database type.
    pub fn registry(&self) -> DialectRegistry {
        DialectRegistry::new(self.default_db_type)
    }

    pub fn paginator(&self, registry: &DialectRegistry, db_type: Option<DbType>) -> Paginator {
        let dialect = registry.dialect_for(db_type.unwrap_or(self.default_db_type));
        Paginator::new(dialect).with_sql_logging(self.log_sql)
    }

    pub fn page_request(&self, page_number: u64, page_size: u64) -> PageRequest {
        PageRequest::new(page_number, page_size).with_optimize_count_query(self.optimize_count_query)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettingsBuilder {
    pub default_db_type: Option<DbType>,
    pub optimize_count_query: Option<bool>,
    pub log_sql: Option<bool>,
}

impl EngineSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_db_type(mut self, db_type: DbType) -> Self {
        self.default_db_type = Some(db_type);
        self
    }

    pub fn optimize_count_query(mut self, optimize: bool) -> Self {
        self.optimize_count_query = Some(optimize);
        self
    }

    pub fn log_sql(mut self, log_sql: bool) -> Self {
        self.log_sql = Some(log_sql);
        self
    }

    pub fn build(self) -> EngineSettings {
        EngineSettings::from_builder(self)
    }
}
