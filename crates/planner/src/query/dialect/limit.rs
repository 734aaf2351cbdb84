//! Paging strategies: how each database family asks for `rows` rows
//! starting after `offset` rows.
//!
//! Most strategies only contribute a fragment, either right after `SELECT`
//! ([`LimitOffset::head`]) or after `ORDER BY` ([`LimitOffset::tail`]).
//! Databases without such syntax wrap the whole SELECT instead and override
//! [`LimitOffset::render`].

use crate::query::{
    ast::wrapper::QueryWrapper,
    error::QueryError,
    renderer::{
        Renderer,
        select::{SelectHead, SelectOptions, outer_select_list, render_core, render_ctes, render_standard},
    },
};
use std::fmt::Debug;

/// The paging window of a query. Values are emitted as integer literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub offset: Option<u64>,
    pub rows: u64,
}

impl Paging {
    /// `None` when the query has no row limit; an offset alone is ignored.
    pub fn of(query: &QueryWrapper) -> Option<Paging> {
        query.limit_rows.map(|rows| Paging {
            offset: query.limit_offset,
            rows,
        })
    }

    pub fn first_row(&self) -> u64 {
        self.offset.unwrap_or(0).saturating_add(1)
    }

    pub fn last_row(&self) -> u64 {
        self.offset.unwrap_or(0).saturating_add(self.rows)
    }
}

pub trait LimitOffset: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn head(&self, _paging: Paging) -> Option<SelectHead> {
        None
    }

    fn tail(&self, _paging: Paging) -> Option<String> {
        None
    }

    /// Whether `query` renders with its ORDER BY ahead of the select list, so
    /// ORDER BY values bind before every other value of the query.
    fn orders_first(&self, _query: &QueryWrapper) -> bool {
        false
    }

    /// Renders the SELECT (CTE preamble included, unions and end fragments
    /// excluded) with paging applied.
    fn render(&self, query: &QueryWrapper, r: &mut Renderer) -> Result<(), QueryError> {
        let paging = Paging::of(query);
        let options = SelectOptions {
            head: paging.and_then(|p| self.head(p)),
            row_number_alias: None,
        };
        render_standard(query, r, &options)?;
        if let Some(tail) = paging.and_then(|p| self.tail(p)) {
            r.push(" ");
            r.push(&tail);
        }
        Ok(())
    }
}

/// `LIMIT o, r`
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlLimit;

impl LimitOffset for MySqlLimit {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn tail(&self, paging: Paging) -> Option<String> {
        Some(match paging.offset {
            Some(offset) => format!("LIMIT {offset}, {}", paging.rows),
            None => format!("LIMIT {}", paging.rows),
        })
    }
}

/// `LIMIT r OFFSET o`
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresLimit;

impl LimitOffset for PostgresLimit {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn tail(&self, paging: Paging) -> Option<String> {
        Some(match paging.offset {
            Some(offset) => format!("LIMIT {} OFFSET {offset}", paging.rows),
            None => format!("LIMIT {}", paging.rows),
        })
    }
}

/// `OFFSET o ROWS FETCH NEXT r ROWS ONLY`, or `SELECT TOP r` without an
/// offset. The OFFSET form needs an ORDER BY to be valid SQL Server syntax;
/// that is left to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerLimit;

impl LimitOffset for SqlServerLimit {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn head(&self, paging: Paging) -> Option<SelectHead> {
        match paging.offset {
            Some(_) => None,
            None => Some(SelectHead {
                text: format!("TOP {}", paging.rows),
                after_distinct: true,
            }),
        }
    }

    fn tail(&self, paging: Paging) -> Option<String> {
        paging
            .offset
            .map(|offset| format!("OFFSET {offset} ROWS FETCH NEXT {} ROWS ONLY", paging.rows))
    }
}

/// `ROW_NUMBER()` window inside a `temp_datas` CTE.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer2005Limit;

impl LimitOffset for SqlServer2005Limit {
    fn name(&self) -> &'static str {
        "sqlserver_2005"
    }

    fn orders_first(&self, query: &QueryWrapper) -> bool {
        Paging::of(query).is_some()
    }

    fn render(&self, query: &QueryWrapper, r: &mut Renderer) -> Result<(), QueryError> {
        let Some(paging) = Paging::of(query) else {
            return render_standard(query, r, &SelectOptions::default());
        };

        if render_ctes(query, r)? {
            r.push(", ");
        } else {
            r.push("WITH ");
        }
        r.push("temp_datas AS (");
        let options = SelectOptions {
            head: None,
            row_number_alias: Some("__rn"),
        };
        render_core(query, r, &options)?;
        r.push(") SELECT ");
        r.push(&outer_select_list(query));
        r.push(&format!(
            " FROM temp_datas WHERE __rn BETWEEN {} AND {} ORDER BY __rn",
            paging.first_row(),
            paging.last_row()
        ));
        Ok(())
    }
}

/// ROWNUM filtering around the whole query.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleLimit;

impl LimitOffset for OracleLimit {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn render(&self, query: &QueryWrapper, r: &mut Renderer) -> Result<(), QueryError> {
        let Some(paging) = Paging::of(query) else {
            return render_standard(query, r, &SelectOptions::default());
        };
        r.push("SELECT * FROM (SELECT TEMP_DATAS.*, ROWNUM RN FROM (");
        render_standard(query, r, &SelectOptions::default())?;
        r.push(&format!(
            ") TEMP_DATAS WHERE ROWNUM <= {}) WHERE RN > {}",
            paging.last_row(),
            paging.offset.unwrap_or(0)
        ));
        Ok(())
    }
}

/// SQL:2008 row limiting, as used by DB2, Derby, Firebird and Oracle 12c.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerbyLimit;

impl LimitOffset for DerbyLimit {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn tail(&self, paging: Paging) -> Option<String> {
        Some(match paging.offset {
            Some(offset) => format!("OFFSET {offset} ROWS FETCH NEXT {} ROWS ONLY", paging.rows),
            None => format!("FETCH FIRST {} ROWS ONLY", paging.rows),
        })
    }
}

/// `ROWNUMBER() OVER()` window for DB2 10.5.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2105Limit;

impl LimitOffset for Db2105Limit {
    fn name(&self) -> &'static str {
        "db2_1005"
    }

    fn render(&self, query: &QueryWrapper, r: &mut Renderer) -> Result<(), QueryError> {
        let Some(paging) = Paging::of(query) else {
            return render_standard(query, r, &SelectOptions::default());
        };
        r.push("SELECT * FROM (SELECT TEMP_DATAS.*, ROWNUMBER() OVER() AS RN FROM (");
        render_standard(query, r, &SelectOptions::default())?;
        r.push(&format!(
            ") AS TEMP_DATAS) WHERE RN BETWEEN {} AND {}",
            paging.first_row(),
            paging.last_row()
        ));
        Ok(())
    }
}

/// `SELECT SKIP o FIRST r`
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixLimit;

impl LimitOffset for InformixLimit {
    fn name(&self) -> &'static str {
        "informix"
    }

    fn head(&self, paging: Paging) -> Option<SelectHead> {
        let text = match paging.offset {
            Some(offset) => format!("SKIP {offset} FIRST {}", paging.rows),
            None => format!("FIRST {}", paging.rows),
        };
        Some(SelectHead {
            text,
            after_distinct: false,
        })
    }
}

/// `SELECT SKIP o LIMIT r`
#[derive(Debug, Clone, Copy, Default)]
pub struct SinoDbLimit;

impl LimitOffset for SinoDbLimit {
    fn name(&self) -> &'static str {
        "sinodb"
    }

    fn head(&self, paging: Paging) -> Option<SelectHead> {
        let text = match paging.offset {
            Some(offset) => format!("SKIP {offset} LIMIT {}", paging.rows),
            None => format!("LIMIT {}", paging.rows),
        };
        Some(SelectHead {
            text,
            after_distinct: false,
        })
    }
}

/// `SELECT TOP r START AT o+1`
#[derive(Debug, Clone, Copy, Default)]
pub struct SybaseLimit;

impl LimitOffset for SybaseLimit {
    fn name(&self) -> &'static str {
        "sybase"
    }

    fn head(&self, paging: Paging) -> Option<SelectHead> {
        let text = match paging.offset {
            Some(_) => format!("TOP {} START AT {}", paging.rows, paging.first_row()),
            None => format!("TOP {}", paging.rows),
        };
        Some(SelectHead {
            text,
            after_distinct: true,
        })
    }
}

/// Renders no paging at all; the caller truncates the result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLimit;

impl LimitOffset for NoLimit {
    fn name(&self) -> &'static str {
        "none"
    }
}
