//! Rendered SQL text with its bound parameters.

use super::mapping::MappingKey;
use crate::value::SqlValue;

/// A `?` placeholder in rendered SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    /// Logical member (or surrogate) the value belongs to.
    pub key: MappingKey,
    /// Column of that member this placeholder covers; `0` starts a new
    /// occurrence of the member.
    pub column: usize,
    /// Value fixed at compile time, if any. Parameters without one are
    /// supplied per execution.
    pub value: Option<SqlValue>,
}

impl BoundParameter {
    /// A parameter supplied per execution.
    #[must_use]
    pub const fn deferred(key: MappingKey, column: usize) -> Self {
        Self {
            key,
            column,
            value: None,
        }
    }

    /// A parameter whose value is fixed at compile time.
    #[must_use]
    pub const fn fixed(key: MappingKey, value: SqlValue) -> Self {
        Self {
            key,
            column: 0,
            value: Some(value),
        }
    }
}

/// SQL text accumulated strictly left to right together with the
/// parameters its placeholders stand for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlText {
    /// The SQL string.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<BoundParameter>,
}

impl SqlText {
    /// Creates empty text.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Appends raw SQL.
    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a placeholder and records its parameter.
    pub fn push_param(&mut self, param: BoundParameter) {
        self.sql.push('?');
        self.params.push(param);
    }

    /// Returns whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Counts the `?` placeholders outside of string literals and
    /// quoted identifiers.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        for ch in self.sql.chars() {
            match (quote, ch) {
                (None, '\'' | '"' | '`') => quote = Some(ch),
                (None, '[') => quote = Some(']'),
                (None, '?') => count += 1,
                (Some(q), c) if c == q => quote = None,
                _ => {}
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_param_numbers_left_to_right() {
        let mut text = SqlText::new();
        text.push_str("A = ");
        text.push_param(BoundParameter::deferred(MappingKey::Member(0), 0));
        text.push_str(" AND B = ");
        text.push_param(BoundParameter::fixed(MappingKey::SoftDelete, SqlValue::Bool(false)));
        assert_eq!(text.sql, "A = ? AND B = ?");
        assert_eq!(text.params.len(), 2);
        assert_eq!(text.params[1].key, MappingKey::SoftDelete);
    }

    #[test]
    fn test_placeholder_count_ignores_literals() {
        let text = SqlText {
            sql: String::from("SELECT '?' FROM \"T?\" WHERE A = ? AND [B?] = ?"),
            params: Vec::new(),
        };
        assert_eq!(text.placeholder_count(), 2);
    }
}
