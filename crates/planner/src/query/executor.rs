//! The seam between rendered statements and a database driver.

use crate::query::statement::Statement;
use async_trait::async_trait;
use model::records::row::Row;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Failed to decode result: {0}")]
    Decode(String),
}

/// Runs statements produced by a dialect. Implementations own connections
/// and driver specifics; the planner never retries a failed call.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Runs a `SELECT COUNT(...)` statement and returns the single count.
    async fn query_count(&self, statement: &Statement) -> Result<u64, ExecutorError>;

    async fn query_rows(&self, statement: &Statement) -> Result<Vec<Row>, ExecutorError>;
}
