use thiserror::Error;

/// Errors raised while building or rendering a query.
///
/// Every variant is raised synchronously at the point of mutation or
/// rendering; no partial SQL is ever handed out alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Table name must not be blank")]
    BlankTableName,

    #[error("Unsafe identifier `{identifier}`: {reason}")]
    UnsafeIdentifier { identifier: String, reason: String },

    #[error("Cannot alias `{alias}`: expected exactly one table, found {table_count}")]
    AmbiguousAlias { alias: String, table_count: usize },

    #[error("Filter map must not be empty")]
    EmptyFilterMap,

    #[error("Unsafe ORDER BY text: {0}")]
    UnsafeOrderBy(String),

    #[error("Table `{0}` is used more than once without a distinguishing alias")]
    DuplicateTable(String),

    #[error("Statement needs a target table: {0}")]
    MissingTable(String),

    #[error("Refusing to {0} every row: the query has no WHERE condition")]
    FullTableMutation(String),

    #[error("Inconsistent batch: {0}")]
    InconsistentBatch(String),

    #[error("Nothing to write: {0}")]
    EmptyRow(String),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),
}

impl QueryError {
    pub fn unsafe_identifier(identifier: &str, reason: impl Into<String>) -> Self {
        QueryError::UnsafeIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}
