//! The predicate tree used by WHERE, HAVING and join ON clauses.

use crate::query::ast::{column::QueryColumn, wrapper::QueryWrapper};
use model::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum QueryCondition {
    /// Contributes nothing to the rendered SQL.
    #[default]
    Empty,

    Predicate {
        column: QueryColumn,
        operator: Operator,
        operand: Operand,
    },

    /// Caller-supplied SQL emitted verbatim, with its own bound values.
    Raw { sql: String, params: Vec<Value> },

    /// `EXISTS (SELECT ...)` or `NOT EXISTS (SELECT ...)`
    Exists {
        negated: bool,
        query: Box<QueryWrapper>,
    },

    /// `NOT (...)`
    Not(Box<QueryCondition>),

    /// Explicit parentheses.
    Group(Box<QueryCondition>),

    Connector {
        left: Box<QueryCondition>,
        op: Connector,
        right: Box<QueryCondition>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    None,
    Value(Value),
    List(Vec<Value>),
    Range(Value, Value),
    Column(QueryColumn),
    Query(Box<QueryWrapper>),
}

impl QueryCondition {
    pub fn leaf(column: QueryColumn, operator: Operator, operand: Operand) -> Self {
        QueryCondition::Predicate {
            column,
            operator,
            operand,
        }
    }

    pub fn raw(sql: &str, params: Vec<Value>) -> Self {
        QueryCondition::Raw {
            sql: sql.to_string(),
            params,
        }
    }

    pub fn exists(query: QueryWrapper) -> Self {
        QueryCondition::Exists {
            negated: false,
            query: Box::new(query),
        }
    }

    pub fn not_exists(query: QueryWrapper) -> Self {
        QueryCondition::Exists {
            negated: true,
            query: Box::new(query),
        }
    }

    fn connect(self, op: Connector, other: QueryCondition) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (false, true) => self,
            (false, false) => QueryCondition::Connector {
                left: Box::new(self),
                op,
                right: Box::new(other),
            },
        }
    }

    pub fn and(self, other: QueryCondition) -> Self {
        self.connect(Connector::And, other)
    }

    pub fn or(self, other: QueryCondition) -> Self {
        self.connect(Connector::Or, other)
    }

    pub fn not(self) -> Self {
        if self.is_empty() {
            return self;
        }
        QueryCondition::Not(Box::new(self))
    }

    pub fn group(self) -> Self {
        if self.is_empty() {
            return self;
        }
        QueryCondition::Group(Box::new(self))
    }

    /// Keeps the condition only when `effective` holds.
    pub fn when(self, effective: bool) -> Self {
        if effective { self } else { QueryCondition::Empty }
    }

    /// The node that actually renders, looking through connectors that
    /// have one empty side. `None` when nothing renders at all.
    pub fn effective(&self) -> Option<&QueryCondition> {
        match self {
            QueryCondition::Empty => None,
            QueryCondition::Not(inner) | QueryCondition::Group(inner) => {
                inner.effective().map(|_| self)
            }
            QueryCondition::Connector { left, right, .. } => {
                match (left.effective(), right.effective()) {
                    (None, None) => None,
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (Some(_), Some(_)) => Some(self),
                }
            }
            _ => Some(self),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effective().is_none()
    }

    /// The connector this node renders with, if it renders as one.
    pub fn top_connector(&self) -> Option<Connector> {
        match self.effective() {
            Some(QueryCondition::Connector { op, .. }) => Some(*op),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(name: &str, value: i64) -> QueryCondition {
        QueryCondition::leaf(QueryColumn::new(name), Operator::Eq, Operand::Value(Value::Int(value)))
    }

    #[test]
    fn test_empty_sides_collapse() {
        let cond = QueryCondition::Empty.and(eq("id", 1)).or(QueryCondition::Empty);
        assert_eq!(cond, eq("id", 1));
    }

    #[test]
    fn test_effective_looks_through_empty_connector_sides() {
        let cond = QueryCondition::Connector {
            left: Box::new(QueryCondition::Empty),
            op: Connector::And,
            right: Box::new(eq("age", 18)),
        };
        assert_eq!(cond.effective(), Some(&eq("age", 18)));
        assert_eq!(cond.top_connector(), None);
        assert!(QueryCondition::Group(Box::new(QueryCondition::Empty)).is_empty());
    }

    #[test]
    fn test_when_false_is_empty() {
        assert!(eq("id", 1).when(false).is_empty());
        assert!(!eq("id", 1).when(true).is_empty());
    }

    #[test]
    fn test_connector_is_left_associated() {
        let cond = eq("a", 1).and(eq("b", 2)).or(eq("c", 3));
        assert_eq!(cond.top_connector(), Some(Connector::Or));
        if let QueryCondition::Connector { left, .. } = cond {
            assert_eq!(left.top_connector(), Some(Connector::And));
        } else {
            panic!("expected a connector");
        }
    }
}
