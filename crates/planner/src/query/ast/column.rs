//! Select-list items and column references.

use crate::query::ast::wrapper::QueryWrapper;
use model::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryColumn {
    pub kind: ColumnKind,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// A column of a table, e.g., `id` or `tb_account.id`. The table is the
    /// referenced table's name or alias; `name` may be `*`.
    Named { table: Option<String>, name: String },

    /// A function call, e.g., `COUNT(*)` or `MAX(age)`.
    Function { name: String, args: Vec<QueryColumn> },

    /// `DISTINCT a, b`
    Distinct(Vec<QueryColumn>),

    /// Caller-supplied SQL emitted verbatim, with its own bound values.
    Raw { sql: String, params: Vec<Value> },

    /// A bound value used as a column, rendered as `?`.
    Param(Value),

    /// e.g., `price * quantity`
    Arithmetic {
        left: Box<QueryColumn>,
        op: ArithmeticOp,
        right: Box<QueryColumn>,
    },

    /// A scalar sub-query, e.g., `(SELECT MAX(id) FROM tb_article)`.
    SubSelect(Box<QueryWrapper>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

impl QueryColumn {
    fn of_kind(kind: ColumnKind) -> Self {
        QueryColumn { kind, alias: None }
    }

    /// `name` or `table.name`, split at the last `.`.
    pub fn new(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((table, column)) if !table.is_empty() => Self::of(table, column),
            _ => Self::of_kind(ColumnKind::Named {
                table: None,
                name: name.to_string(),
            }),
        }
    }

    pub fn of(table: &str, name: &str) -> Self {
        Self::of_kind(ColumnKind::Named {
            table: Some(table.to_string()),
            name: name.to_string(),
        })
    }

    /// `*`
    pub fn all() -> Self {
        Self::new("*")
    }

    /// `table.*`
    pub fn all_of(table: &str) -> Self {
        Self::of(table, "*")
    }

    pub fn function(name: &str, args: Vec<QueryColumn>) -> Self {
        Self::of_kind(ColumnKind::Function {
            name: name.to_string(),
            args,
        })
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Self::function("COUNT", vec![Self::all()])
    }

    pub fn count(column: QueryColumn) -> Self {
        Self::function("COUNT", vec![column])
    }

    pub fn max(column: QueryColumn) -> Self {
        Self::function("MAX", vec![column])
    }

    pub fn min(column: QueryColumn) -> Self {
        Self::function("MIN", vec![column])
    }

    pub fn sum(column: QueryColumn) -> Self {
        Self::function("SUM", vec![column])
    }

    pub fn avg(column: QueryColumn) -> Self {
        Self::function("AVG", vec![column])
    }

    pub fn distinct(columns: Vec<QueryColumn>) -> Self {
        Self::of_kind(ColumnKind::Distinct(columns))
    }

    pub fn raw(sql: &str, params: Vec<Value>) -> Self {
        Self::of_kind(ColumnKind::Raw {
            sql: sql.to_string(),
            params,
        })
    }

    pub fn param(value: impl Into<Value>) -> Self {
        Self::of_kind(ColumnKind::Param(value.into()))
    }

    pub fn sub_select(query: QueryWrapper) -> Self {
        Self::of_kind(ColumnKind::SubSelect(Box::new(query)))
    }

    fn arithmetic(self, op: ArithmeticOp, right: QueryColumn) -> Self {
        Self::of_kind(ColumnKind::Arithmetic {
            left: Box::new(self),
            op,
            right: Box::new(right),
        })
    }

    pub fn add(self, right: QueryColumn) -> Self {
        self.arithmetic(ArithmeticOp::Add, right)
    }

    pub fn subtract(self, right: QueryColumn) -> Self {
        self.arithmetic(ArithmeticOp::Sub, right)
    }

    pub fn multiply(self, right: QueryColumn) -> Self {
        self.arithmetic(ArithmeticOp::Mul, right)
    }

    pub fn divide(self, right: QueryColumn) -> Self {
        self.arithmetic(ArithmeticOp::Div, right)
    }

    pub fn as_(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// The bare column name for named columns.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Named { table, .. } => table.as_deref(),
            _ => None,
        }
    }

    /// The name a result column is known by outside the statement.
    pub fn alias_or_name(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.name())
    }

    pub fn is_wildcard(&self) -> bool {
        self.name() == Some("*")
    }

    pub fn is_distinct(&self) -> bool {
        matches!(self.kind, ColumnKind::Distinct(_))
    }

    /// Whether this is a call of the given SQL function, ignoring case.
    pub fn is_function(&self, function: &str) -> bool {
        matches!(&self.kind, ColumnKind::Function { name, .. } if name.eq_ignore_ascii_case(function))
    }
}

impl From<&str> for QueryColumn {
    fn from(name: &str) -> Self {
        QueryColumn::new(name)
    }
}
