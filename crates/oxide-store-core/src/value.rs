//! SQL values bound to statement parameters or read back from result rows.

use core::fmt;
use core::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// A datastore value.
///
/// Values travel in both directions: they are bound to `?` placeholders
/// when a statement executes and they are produced when a result row is
/// decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    Timestamp(NaiveDateTime),
    /// UUID value.
    Uuid(Uuid),
}

impl SqlValue {
    /// Returns whether this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// `boolean_literals` selects `TRUE`/`FALSE` over `1`/`0` for vendors
    /// without a boolean literal.
    #[must_use]
    pub fn to_sql_inline(&self, boolean_literals: bool) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => match (boolean_literals, *b) {
                (true, true) => String::from("TRUE"),
                (true, false) => String::from("FALSE"),
                (false, true) => String::from("1"),
                (false, false) => String::from("0"),
            },
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let mut sql = String::with_capacity(b.len() * 2 + 3);
                sql.push_str("X'");
                for byte in b {
                    let _ = write!(sql, "{byte:02X}");
                }
                sql.push('\'');
                sql
            }
            Self::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            Self::Timestamp(ts) => format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::Uuid(u) => format!("'{}'", u.hyphenated()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Self::Date(d) => write!(f, "{d}"),
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_to_sql_value_int {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )+
    };
}

impl_to_sql_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Date(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for Uuid {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Uuid(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_boolean_by_vendor_style() {
        assert_eq!(SqlValue::Bool(true).to_sql_inline(true), "TRUE");
        assert_eq!(SqlValue::Bool(false).to_sql_inline(false), "0");
    }

    #[test]
    fn test_inline_text_escaping() {
        let value = SqlValue::Text(String::from("'; DROP TABLE users; --"));
        assert_eq!(value.to_sql_inline(true), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn test_inline_temporal() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(SqlValue::Date(date).to_sql_inline(true), "DATE '2024-02-29'");
        let ts = date.and_hms_opt(13, 5, 0).unwrap();
        assert_eq!(
            SqlValue::Timestamp(ts).to_sql_inline(true),
            "TIMESTAMP '2024-02-29 13:05:00'"
        );
    }

    #[test]
    fn test_inline_blob_is_hex() {
        let value = vec![0x00_u8, 0xAB, 0x7f].to_sql_value();
        assert_eq!(value.to_sql_inline(true), "X'00AB7F'");
        assert_eq!(value.to_string(), "<3 bytes>");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(7_u8.to_sql_value(), SqlValue::Int(7));
        assert_eq!(None::<i64>.to_sql_value(), SqlValue::Null);
        assert_eq!("x".to_sql_value(), SqlValue::Text(String::from("x")));
        assert!(SqlValue::Null.is_null());
    }
}
