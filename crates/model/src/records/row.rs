use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// A single result record as returned by a statement executor.
///
/// Columns keep the order in which the database returned them; lookups by
/// name ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Replaces the value of an existing column or appends a new one.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self
            .columns
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
        {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn get_value(&self, column: &str) -> Value {
        self.get(column).cloned().unwrap_or(Value::Null)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            let name: String = name.into();
            row.set(&name, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let row = Row::new().with("user_name", "michael").with("Age", 18);
        assert_eq!(row.get("USER_NAME"), Some(&Value::from("michael")));
        assert_eq!(row.get_value("age"), Value::Int(18));
        assert_eq!(row.get_value("missing"), Value::Null);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut row: Row = vec![("id", 1), ("age", 2)].into_iter().collect();
        row.set("ID", 9);
        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["id", "age"]);
        assert_eq!(row.get_value("id"), Value::Int(9));
        assert_eq!(row.len(), 2);
    }
}
