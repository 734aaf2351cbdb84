use async_trait::async_trait;
use model::records::row::Row;
use planner::{
    Statement,
    query::executor::{ExecutorError, StatementExecutor},
};
use std::sync::Mutex;
use tracing::info;

/// Executor that never touches a database: counts report a fixed total,
/// row fetches return nothing, and every statement is kept for printing.
#[derive(Debug)]
pub struct DryRunExecutor {
    total: u64,
    statements: Mutex<Vec<(&'static str, Statement)>>,
}

impl DryRunExecutor {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn into_statements(self) -> Vec<(&'static str, Statement)> {
        self.statements
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, kind: &'static str, statement: &Statement) {
        info!("Dry run {kind}: {}", statement.sql);
        self.statements
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((kind, statement.clone()));
    }
}

#[async_trait]
impl StatementExecutor for DryRunExecutor {
    async fn query_count(&self, statement: &Statement) -> Result<u64, ExecutorError> {
        self.record("count", statement);
        Ok(self.total)
    }

    async fn query_rows(&self, statement: &Statement) -> Result<Vec<Row>, ExecutorError> {
        self.record("page", statement);
        Ok(Vec::new())
    }
}
