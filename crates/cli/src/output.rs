use crate::error::CliError;
use model::core::value::Value;
use planner::Statement;
use serde::Serialize;

/// A rendered statement as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct StatementReport {
    pub dialect: String,
    pub sql: String,
    pub params: Vec<Value>,
    pub debug_sql: String,
}

impl StatementReport {
    pub fn new(dialect: String, statement: &Statement) -> Self {
        StatementReport {
            dialect,
            debug_sql: statement.to_debug_sql(),
            sql: statement.sql.clone(),
            params: statement.params.clone(),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

/// Writes to `path` when given, stdout otherwise.
pub async fn emit(content: String, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(path) => tokio::fs::write(path, content).await?,
        None => println!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_carries_debug_sql() {
        let statement = Statement::new("SELECT * FROM `t` WHERE `a` = ?", vec![Value::Int(3)]);
        let report = StatementReport::new("mysql".to_string(), &statement);
        assert_eq!(report.debug_sql, "SELECT * FROM `t` WHERE `a` = 3");

        let json = to_json(&report).unwrap();
        assert!(json.contains("\"dialect\": \"mysql\""));
    }

    #[tokio::test]
    async fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        emit("{}".to_string(), path.to_str()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
