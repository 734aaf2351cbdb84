use engine_config::error::SettingsError;
use model::core::db_type::UnknownDbType;
use planner::query::{error::QueryError, paginate::PaginateError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize the query file as JSON: {0}")]
    QueryDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    UnknownDbType(#[from] UnknownDbType),

    #[error("Failed to render the query: {0}")]
    Query(#[from] QueryError),

    #[error("Pagination failed: {0}")]
    Paginate(#[from] PaginateError),
}
