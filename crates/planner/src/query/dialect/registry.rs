//! Process-wide dialect lookup by database type.

use crate::query::dialect::{Dialect, standard::create_dialect};
use lazy_static::lazy_static;
use model::core::db_type::DbType;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{debug, info};

lazy_static! {
    static ref GLOBAL_REGISTRY: DialectRegistry = DialectRegistry::new(DbType::MySql);
}

/// Selects the database type for one rendering call. Without a type the
/// registry's default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialectContext {
    pub db_type: Option<DbType>,
}

impl DialectContext {
    pub fn new(db_type: DbType) -> Self {
        DialectContext {
            db_type: Some(db_type),
        }
    }
}

/// Caches one dialect per database type; registered dialects replace the
/// built-in ones.
pub struct DialectRegistry {
    dialects: RwLock<HashMap<DbType, Arc<dyn Dialect>>>,
    default_db_type: RwLock<DbType>,
}

impl DialectRegistry {
    pub fn new(default_db_type: DbType) -> Self {
        DialectRegistry {
            dialects: RwLock::new(HashMap::new()),
            default_db_type: RwLock::new(default_db_type),
        }
    }

    pub fn global() -> &'static DialectRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn register(&self, db_type: DbType, dialect: Arc<dyn Dialect>) {
        info!("Registering dialect '{}' for {db_type}", dialect.name());
        self.dialects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(db_type, dialect);
    }

    pub fn set_default_db_type(&self, db_type: DbType) {
        *self
            .default_db_type
            .write()
            .unwrap_or_else(|e| e.into_inner()) = db_type;
    }

    pub fn default_db_type(&self) -> DbType {
        *self
            .default_db_type
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn dialect(&self, ctx: &DialectContext) -> Arc<dyn Dialect> {
        let db_type = ctx.db_type.unwrap_or_else(|| self.default_db_type());
        self.dialect_for(db_type)
    }

    pub fn dialect_for(&self, db_type: DbType) -> Arc<dyn Dialect> {
        if let Some(dialect) = self
            .dialects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&db_type)
        {
            return Arc::clone(dialect);
        }

        let mut dialects = self.dialects.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(dialects.entry(db_type).or_insert_with(|| {
            debug!("Creating dialect for {db_type}");
            create_dialect(db_type)
        }))
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        DialectRegistry::new(DbType::MySql)
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("default_db_type", &self.default_db_type())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialect::{keyword::KeywordWrap, limit::NoLimit, standard::CommonDialect};
    use std::thread;
    use tracing_test::traced_test;

    #[test]
    fn test_dialects_are_cached() {
        let registry = DialectRegistry::default();
        let first = registry.dialect_for(DbType::PostgreSql);
        let second = registry.dialect_for(DbType::PostgreSql);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_context_falls_back_to_default() {
        let registry = DialectRegistry::new(DbType::SqlServer);
        assert_eq!(registry.dialect(&DialectContext::default()).name(), "sqlserver");
        assert_eq!(
            registry.dialect(&DialectContext::new(DbType::Oracle)).name(),
            "oracle"
        );

        registry.set_default_db_type(DbType::PostgreSql);
        assert_eq!(registry.dialect(&DialectContext::default()).name(), "postgresql");
    }

    #[test]
    #[traced_test]
    fn test_register_overrides_builtin() {
        let registry = DialectRegistry::default();
        registry.dialect_for(DbType::MySql);
        registry.register(
            DbType::MySql,
            Arc::new(CommonDialect::new("in_memory", KeywordWrap::none(), Arc::new(NoLimit))),
        );
        assert_eq!(registry.dialect_for(DbType::MySql).name(), "in_memory");
        assert!(logs_contain("Registering dialect 'in_memory'"));
    }

    #[test]
    fn test_concurrent_lookups_share_one_instance() {
        let registry = Arc::new(DialectRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.dialect_for(DbType::Db2))
            })
            .collect();
        let dialects: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(dialects.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
