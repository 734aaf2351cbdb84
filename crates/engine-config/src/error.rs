use model::core::db_type::UnknownDbType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading engine settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A `.env` file could not be parsed.
    #[error("Invalid env file: {0}")]
    EnvFile(String),

    /// A setting had a value of the wrong shape, e.g. `SQLFLEX_LOG_SQL=maybe`.
    #[error("Invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    UnknownDbType(#[from] UnknownDbType),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
}
