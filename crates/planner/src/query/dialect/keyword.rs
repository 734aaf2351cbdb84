//! Identifier quoting policies.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref ORACLE_KEYWORDS: HashSet<&'static str> = [
        "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY",
        "CHAR", "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMPRESS", "CONNECT", "CREATE",
        "CURRENT", "DATE", "DECIMAL", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE",
        "EXCLUSIVE", "EXISTS", "FILE", "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING",
        "IDENTIFIED", "IMMEDIATE", "IN", "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER",
        "INTERSECT", "INTO", "IS", "LEVEL", "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS",
        "MLSLABEL", "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOT", "NOWAIT", "NULL", "NUMBER",
        "OF", "OFFLINE", "ON", "ONLINE", "OPTION", "OR", "ORDER", "PCTFREE", "PRIOR", "PUBLIC",
        "RAW", "RENAME", "RESOURCE", "REVOKE", "ROW", "ROWID", "ROWNUM", "ROWS", "SELECT",
        "SESSION", "SET", "SHARE", "SIZE", "SMALLINT", "START", "SUCCESSFUL", "SYNONYM",
        "SYSDATE", "TABLE", "THEN", "TO", "TRIGGER", "UID", "UNION", "UNIQUE", "UPDATE", "USER",
        "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER", "WHERE", "WITH",
    ]
    .into_iter()
    .collect();

    static ref DM_KEYWORDS: HashSet<&'static str> = ORACLE_KEYWORDS
        .iter()
        .copied()
        .chain([
            "CONTEXT", "DOMAIN", "LIMIT", "OFFSET", "REFERENCE", "TOP", "TYPE", "VERIFY",
            "SECTION", "INTERVAL", "CATALOG",
        ])
        .collect();
}

/// How a dialect quotes table, column and alias names.
///
/// Unconditional policies quote every identifier. Keyword-aware policies
/// quote only reserved words, optionally upper-casing them, and leave every
/// other identifier bare.
#[derive(Debug, Clone)]
pub struct KeywordWrap {
    prefix: &'static str,
    suffix: &'static str,
    keywords: Option<&'static HashSet<&'static str>>,
    keywords_to_upper: bool,
}

impl KeywordWrap {
    const fn always(prefix: &'static str, suffix: &'static str) -> Self {
        KeywordWrap {
            prefix,
            suffix,
            keywords: None,
            keywords_to_upper: false,
        }
    }

    pub fn none() -> Self {
        Self::always("", "")
    }

    /// `` `name` ``
    pub fn back_quote() -> Self {
        Self::always("`", "`")
    }

    /// `"name"`
    pub fn double_quotation() -> Self {
        Self::always("\"", "\"")
    }

    /// `[name]`
    pub fn square_brackets() -> Self {
        Self::always("[", "]")
    }

    /// Quotes only Oracle reserved words, upper-cased: `"ORDER"`.
    pub fn oracle() -> Self {
        KeywordWrap {
            prefix: "\"",
            suffix: "\"",
            keywords: Some(&*ORACLE_KEYWORDS),
            keywords_to_upper: true,
        }
    }

    pub fn dm() -> Self {
        KeywordWrap {
            prefix: "\"",
            suffix: "\"",
            keywords: Some(&*DM_KEYWORDS),
            keywords_to_upper: true,
        }
    }

    /// Quotes a single identifier segment. `*` and empty text pass through.
    pub fn wrap(&self, identifier: &str) -> String {
        if identifier.is_empty() || identifier == "*" || self.prefix.is_empty() {
            return identifier.to_string();
        }

        match self.keywords {
            None => format!("{}{identifier}{}", self.prefix, self.suffix),
            Some(keywords) => {
                let upper = identifier.to_ascii_uppercase();
                if !keywords.contains(upper.as_str()) {
                    return identifier.to_string();
                }
                let text = if self.keywords_to_upper {
                    upper.as_str()
                } else {
                    identifier
                };
                format!("{}{text}{}", self.prefix, self.suffix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconditional_policies() {
        assert_eq!(KeywordWrap::back_quote().wrap("id"), "`id`");
        assert_eq!(KeywordWrap::double_quotation().wrap("id"), "\"id\"");
        assert_eq!(KeywordWrap::square_brackets().wrap("id"), "[id]");
        assert_eq!(KeywordWrap::none().wrap("id"), "id");
    }

    #[test]
    fn test_wildcard_is_never_quoted() {
        assert_eq!(KeywordWrap::back_quote().wrap("*"), "*");
        assert_eq!(KeywordWrap::square_brackets().wrap("*"), "*");
    }

    #[test]
    fn test_oracle_quotes_only_keywords() {
        let wrap = KeywordWrap::oracle();
        assert_eq!(wrap.wrap("user_name"), "user_name");
        assert_eq!(wrap.wrap("order"), "\"ORDER\"");
        assert_eq!(wrap.wrap("Level"), "\"LEVEL\"");
    }

    #[test]
    fn test_dm_extends_oracle_keywords() {
        assert_eq!(KeywordWrap::dm().wrap("limit"), "\"LIMIT\"");
        assert_eq!(KeywordWrap::oracle().wrap("limit"), "limit");
    }
}
