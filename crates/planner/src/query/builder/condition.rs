//! Predicate constructors on [`QueryColumn`].
//!
//! A comparison against a NULL value, or an IN list without values, yields
//! an empty condition so that optional filters can be chained without
//! branching. Use [`QueryColumn::is_null`] to test for NULL.

use crate::query::ast::{
    column::QueryColumn,
    condition::{Operand, Operator, QueryCondition},
    wrapper::QueryWrapper,
};
use model::core::value::Value;
use std::fmt::Display;

impl QueryColumn {
    fn compare(&self, operator: Operator, value: Value) -> QueryCondition {
        if value.is_null() {
            return QueryCondition::Empty;
        }
        QueryCondition::leaf(self.clone(), operator, Operand::Value(value))
    }

    pub fn eq(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Eq, value.into())
    }

    pub fn ne(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Ne, value.into())
    }

    pub fn gt(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Gt, value.into())
    }

    pub fn ge(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Ge, value.into())
    }

    pub fn lt(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Lt, value.into())
    }

    pub fn le(&self, value: impl Into<Value>) -> QueryCondition {
        self.compare(Operator::Le, value.into())
    }

    /// `LIKE '%value%'`
    pub fn like(&self, value: impl Display) -> QueryCondition {
        self.compare(Operator::Like, Value::String(format!("%{value}%")))
    }

    /// `LIKE 'value%'`
    pub fn like_left(&self, value: impl Display) -> QueryCondition {
        self.compare(Operator::Like, Value::String(format!("{value}%")))
    }

    /// `LIKE '%value'`
    pub fn like_right(&self, value: impl Display) -> QueryCondition {
        self.compare(Operator::Like, Value::String(format!("%{value}")))
    }

    /// `NOT LIKE '%value%'`
    pub fn not_like(&self, value: impl Display) -> QueryCondition {
        self.compare(Operator::NotLike, Value::String(format!("%{value}%")))
    }

    fn list(&self, operator: Operator, values: Vec<Value>) -> QueryCondition {
        if values.is_empty() {
            return QueryCondition::Empty;
        }
        QueryCondition::leaf(self.clone(), operator, Operand::List(values))
    }

    pub fn in_list<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> QueryCondition {
        self.list(Operator::In, values.into_iter().map(Into::into).collect())
    }

    pub fn not_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> QueryCondition {
        self.list(Operator::NotIn, values.into_iter().map(Into::into).collect())
    }

    pub fn in_query(&self, query: QueryWrapper) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::In, Operand::Query(Box::new(query)))
    }

    pub fn not_in_query(&self, query: QueryWrapper) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::NotIn, Operand::Query(Box::new(query)))
    }

    fn range(&self, operator: Operator, start: Value, end: Value) -> QueryCondition {
        if start.is_null() || end.is_null() {
            return QueryCondition::Empty;
        }
        QueryCondition::leaf(self.clone(), operator, Operand::Range(start, end))
    }

    pub fn between(&self, start: impl Into<Value>, end: impl Into<Value>) -> QueryCondition {
        self.range(Operator::Between, start.into(), end.into())
    }

    pub fn not_between(&self, start: impl Into<Value>, end: impl Into<Value>) -> QueryCondition {
        self.range(Operator::NotBetween, start.into(), end.into())
    }

    pub fn is_null(&self) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::IsNull, Operand::None)
    }

    pub fn is_not_null(&self) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::IsNotNull, Operand::None)
    }

    /// Column-to-column equality, as used in join conditions.
    pub fn eq_column(&self, other: &QueryColumn) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::Eq, Operand::Column(other.clone()))
    }

    pub fn ne_column(&self, other: &QueryColumn) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::Ne, Operand::Column(other.clone()))
    }

    /// Compares against a scalar sub-query, e.g., `age = (SELECT MAX(age) ...)`.
    pub fn eq_query(&self, query: QueryWrapper) -> QueryCondition {
        QueryCondition::leaf(self.clone(), Operator::Eq, Operand::Query(Box::new(query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_comparisons_are_empty() {
        let age = QueryColumn::new("age");
        assert!(age.eq(None::<i32>).is_empty());
        assert!(age.between(1, Value::Null).is_empty());
        assert!(!age.eq(Some(18)).is_empty());
    }

    #[test]
    fn test_empty_in_list_is_empty() {
        let id = QueryColumn::new("id");
        assert!(id.in_list(Vec::<i64>::new()).is_empty());
        assert!(!id.in_list([1, 2]).is_empty());
    }

    #[test]
    fn test_like_patterns() {
        let name = QueryColumn::new("user_name");
        let operand = |cond: QueryCondition| match cond {
            QueryCondition::Predicate {
                operand: Operand::Value(v),
                ..
            } => v,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(operand(name.like("mi")), Value::from("%mi%"));
        assert_eq!(operand(name.like_left("mi")), Value::from("mi%"));
        assert_eq!(operand(name.like_right("mi")), Value::from("%mi"));
    }
}
