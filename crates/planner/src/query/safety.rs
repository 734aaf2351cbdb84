//! Guards that keep caller-supplied names from smuggling SQL into
//! generated statements.

use crate::query::error::QueryError;

const UNSAFE_CHARS: &[char] = &['\'', '`', '"', '<', '>', '&', '+', '=', '#', '-', ';'];

/// Accepts a table, column, alias or function name.
///
/// Names are rejected when blank, when they contain whitespace, or when they
/// contain a quote, angle bracket, ampersand, plus, equals, hash, hyphen or
/// semicolon.
pub fn check_identifier(name: &str) -> Result<(), QueryError> {
    if name.trim().is_empty() {
        return Err(QueryError::unsafe_identifier(name, "identifier is blank"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(QueryError::unsafe_identifier(name, "contains whitespace"));
    }
    if let Some(c) = name.chars().find(|c| UNSAFE_CHARS.contains(c)) {
        return Err(QueryError::unsafe_identifier(
            name,
            format!("contains unsafe character `{c}`"),
        ));
    }
    Ok(())
}

/// Same as [`check_identifier`], but a blank name is a [`QueryError::BlankTableName`].
pub fn check_table_name(name: &str) -> Result<(), QueryError> {
    if name.trim().is_empty() {
        return Err(QueryError::BlankTableName);
    }
    check_identifier(name)
}

/// Raw ORDER BY text may only hold letters, digits, `_`, spaces, commas and dots.
pub fn check_order_by(text: &str) -> Result<(), QueryError> {
    let valid = !text.trim().is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | ',' | '.'));
    if valid {
        Ok(())
    } else {
        Err(QueryError::UnsafeOrderBy(text.to_string()))
    }
}
