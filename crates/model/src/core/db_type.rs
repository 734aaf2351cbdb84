use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown database type: {0}")]
pub struct UnknownDbType(pub String);

macro_rules! db_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Database products the engine knows how to render SQL for.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum DbType {
            $($variant),*
        }

        impl DbType {
            const ALL: &'static [DbType] = &[$(DbType::$variant),*];

            /// Canonical lowercase name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(DbType::$variant => $name),*
                }
            }
        }
    };
}

db_types! {
    MySql => "mysql",
    MariaDb => "mariadb",
    H2 => "h2",
    GBase => "gbase",
    Oscar => "oscar",
    Xugu => "xugu",
    OceanBase => "oceanbase",
    Cubrid => "cubrid",
    Goldilocks => "goldilocks",
    CsiiDb => "csiidb",
    Hive => "hive",
    Doris => "doris",
    GoldenDb => "goldendb",
    SunDb => "sundb",
    YasDb => "yasdb",
    ClickHouse => "clickhouse",
    GBase8s => "gbase_8s",
    Dm => "dm",
    Oracle => "oracle",
    Oracle12c => "oracle_12c",
    Gauss => "gauss",
    PostgreSql => "postgresql",
    Sqlite => "sqlite",
    Hsql => "hsql",
    KingbaseEs => "kingbasees",
    Phoenix => "phoenix",
    SapHana => "sap_hana",
    Impala => "impala",
    HighGo => "highgo",
    Vertica => "vertica",
    Redshift => "redshift",
    OpenGauss => "opengauss",
    UxDb => "uxdb",
    Lealone => "lealone",
    DuckDb => "duckdb",
    GBase8c => "gbase_8c",
    GBase8sPg => "gbase_8s_pg",
    Vastbase => "vastbase",
    Trino => "trino",
    Presto => "presto",
    TDengine => "tdengine",
    Firebird => "firebird",
    Db2 => "db2",
    Db2V1005 => "db2_1005",
    SqlServer => "sqlserver",
    SqlServer2005 => "sqlserver_2005",
    Informix => "informix",
    SinoDb => "sinodb",
    Sybase => "sybase",
    Derby => "derby",
    Other => "other",
}

lazy_static! {
    static ref DB_TYPE_MAP: HashMap<String, DbType> = build_db_type_map();
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn build_db_type_map() -> HashMap<String, DbType> {
    let mut map: HashMap<String, DbType> = DbType::ALL
        .iter()
        .map(|db| (normalize(db.name()), *db))
        .collect();

    for (alias, db) in [
        ("postgres", DbType::PostgreSql),
        ("pg", DbType::PostgreSql),
        ("mssql", DbType::SqlServer),
        ("mssql2005", DbType::SqlServer2005),
        ("kingbase", DbType::KingbaseEs),
        ("hana", DbType::SapHana),
        ("hsqldb", DbType::Hsql),
        ("dameng", DbType::Dm),
    ] {
        map.insert(alias.to_string(), db);
    }

    map
}

impl DbType {
    pub fn all() -> &'static [DbType] {
        Self::ALL
    }
}

impl FromStr for DbType {
    type Err = UnknownDbType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DB_TYPE_MAP
            .get(normalize(s).as_str())
            .copied()
            .ok_or_else(|| UnknownDbType(s.to_string()))
    }
}

impl TryFrom<String> for DbType {
    type Error = UnknownDbType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DbType> for String {
    fn from(db: DbType) -> Self {
        db.name().to_string()
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!("MySQL".parse::<DbType>(), Ok(DbType::MySql));
        assert_eq!("SQL_SERVER_2005".parse::<DbType>(), Ok(DbType::SqlServer2005));
        assert_eq!("gbase-8s-pg".parse::<DbType>(), Ok(DbType::GBase8sPg));
        assert_eq!("postgres".parse::<DbType>(), Ok(DbType::PostgreSql));
    }

    #[test]
    fn test_unknown_name() {
        let err = "mongo".parse::<DbType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown database type: mongo");
    }

    #[test]
    fn test_every_name_round_trips() {
        for db in DbType::all() {
            assert_eq!(db.to_string().parse::<DbType>(), Ok(*db));
        }
        assert_eq!(DbType::all().len(), 51);
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&DbType::Db2V1005).unwrap();
        assert_eq!(json, "\"db2_1005\"");
        let back: DbType = serde_json::from_str("\"Oracle12c\"").unwrap();
        assert_eq!(back, DbType::Oracle12c);
    }
}
