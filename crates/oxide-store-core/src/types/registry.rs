//! Static per-vendor type registration.
//!
//! The first candidate listed for a logical type is its default.

use super::{SqlTypeCode as C, SqlTypeInfo, TypeCandidate, TypeMappingEntry};
use crate::dialect::{Vendor, Version};

type Entries = Vec<(&'static str, Vec<SqlTypeInfo>)>;

fn f(name: &str, code: C) -> SqlTypeInfo {
    SqlTypeInfo::fixed(name, code)
}

fn s(name: &str, code: C, length: u32) -> SqlTypeInfo {
    SqlTypeInfo::sized(name, code, length)
}

fn d(name: &str, code: C, precision: u32) -> SqlTypeInfo {
    SqlTypeInfo::scaled(name, code, precision)
}

fn base() -> Entries {
    vec![
        ("bool", vec![f("BOOLEAN", C::Boolean), f("SMALLINT", C::SmallInt)]),
        ("i8", vec![f("SMALLINT", C::SmallInt)]),
        ("i16", vec![f("SMALLINT", C::SmallInt)]),
        ("i32", vec![f("INTEGER", C::Integer)]),
        ("i64", vec![f("BIGINT", C::BigInt), d("NUMERIC", C::Numeric, 38)]),
        ("f32", vec![f("REAL", C::Real), f("FLOAT", C::Float)]),
        ("f64", vec![f("DOUBLE PRECISION", C::Double), f("FLOAT", C::Float)]),
        ("decimal", vec![d("DECIMAL", C::Decimal, 38), d("NUMERIC", C::Numeric, 38)]),
        (
            "string",
            vec![s("VARCHAR", C::VarChar, 255), s("CHAR", C::Char, 255), f("CLOB", C::Clob)],
        ),
        ("char", vec![s("CHAR", C::Char, 1)]),
        ("text", vec![f("CLOB", C::Clob), s("VARCHAR", C::VarChar, 4000)]),
        ("bytes", vec![f("BLOB", C::Blob), s("VARBINARY", C::VarBinary, 255)]),
        ("date", vec![f("DATE", C::Date)]),
        ("time", vec![f("TIME", C::Time)]),
        ("timestamp", vec![f("TIMESTAMP", C::Timestamp)]),
        ("uuid", vec![s("CHAR", C::Char, 36)]),
        ("json", vec![f("CLOB", C::Clob)]),
    ]
}

fn overrides(vendor: Vendor, version: Version) -> Entries {
    match vendor {
        Vendor::Generic => Vec::new(),
        Vendor::PostgreSql => postgresql(),
        Vendor::MySql => mysql(),
        Vendor::Sqlite => sqlite(),
        Vendor::SqlServer => sqlserver(),
        Vendor::Oracle => oracle(),
        Vendor::Derby => derby(version),
        Vendor::H2 => h2(),
        Vendor::Db2 => db2(),
    }
}

fn postgresql() -> Entries {
    vec![
        ("string", vec![s("VARCHAR", C::VarChar, 255), f("TEXT", C::LongVarChar)]),
        ("text", vec![f("TEXT", C::LongVarChar), s("VARCHAR", C::VarChar, 4000)]),
        ("bytes", vec![f("BYTEA", C::LongVarBinary)]),
        (
            "timestamp",
            vec![f("TIMESTAMP", C::Timestamp), f("TIMESTAMPTZ", C::TimestampWithTimezone)],
        ),
        ("uuid", vec![f("UUID", C::Other), s("CHAR", C::Char, 36)]),
        (
            "json",
            vec![f("JSONB", C::Other), f("JSON", C::Other), f("TEXT", C::LongVarChar)],
        ),
    ]
}

fn mysql() -> Entries {
    vec![
        ("bool", vec![f("BIT", C::Bit), f("TINYINT", C::TinyInt)]),
        ("i8", vec![f("TINYINT", C::TinyInt), f("SMALLINT", C::SmallInt)]),
        ("i32", vec![f("INT", C::Integer), f("INTEGER", C::Integer)]),
        ("f64", vec![f("DOUBLE", C::Double), f("FLOAT", C::Float)]),
        (
            "text",
            vec![
                f("LONGTEXT", C::LongVarChar),
                f("MEDIUMTEXT", C::LongVarChar),
                f("TEXT", C::LongVarChar),
            ],
        ),
        (
            "bytes",
            vec![f("LONGBLOB", C::LongVarBinary), f("BLOB", C::LongVarBinary)],
        ),
        ("timestamp", vec![f("DATETIME", C::Timestamp), f("TIMESTAMP", C::Timestamp)]),
        ("json", vec![f("JSON", C::LongVarChar), f("LONGTEXT", C::LongVarChar)]),
    ]
}

fn sqlite() -> Entries {
    vec![
        ("bool", vec![f("INTEGER", C::Integer), f("BOOLEAN", C::Boolean)]),
        ("i8", vec![f("INTEGER", C::Integer)]),
        ("i16", vec![f("INTEGER", C::Integer)]),
        ("i64", vec![f("INTEGER", C::Integer), f("BIGINT", C::BigInt)]),
        ("f32", vec![f("REAL", C::Real)]),
        ("f64", vec![f("REAL", C::Real), f("DOUBLE", C::Double)]),
        ("decimal", vec![f("NUMERIC", C::Numeric)]),
        ("string", vec![f("TEXT", C::VarChar), s("VARCHAR", C::VarChar, 255)]),
        ("text", vec![f("TEXT", C::VarChar)]),
        ("bytes", vec![f("BLOB", C::Blob)]),
        ("timestamp", vec![f("DATETIME", C::Timestamp), f("TIMESTAMP", C::Timestamp)]),
        ("uuid", vec![f("TEXT", C::VarChar)]),
        ("json", vec![f("TEXT", C::VarChar)]),
    ]
}

fn sqlserver() -> Entries {
    vec![
        ("bool", vec![f("BIT", C::Bit)]),
        ("f64", vec![f("FLOAT", C::Double), f("REAL", C::Real)]),
        (
            "string",
            vec![s("NVARCHAR", C::NVarChar, 255), s("VARCHAR", C::VarChar, 255)],
        ),
        ("char", vec![s("NCHAR", C::NChar, 1), s("CHAR", C::Char, 1)]),
        (
            "text",
            vec![f("NVARCHAR(MAX)", C::LongNVarChar), f("TEXT", C::LongVarChar)],
        ),
        (
            "bytes",
            vec![f("VARBINARY(MAX)", C::LongVarBinary), f("IMAGE", C::LongVarBinary)],
        ),
        (
            "timestamp",
            vec![
                f("DATETIME2", C::Timestamp),
                f("DATETIME", C::Timestamp),
                f("DATETIMEOFFSET", C::TimestampWithTimezone),
            ],
        ),
        ("uuid", vec![f("UNIQUEIDENTIFIER", C::Char)]),
        ("json", vec![f("NVARCHAR(MAX)", C::LongNVarChar)]),
    ]
}

fn oracle() -> Entries {
    vec![
        ("bool", vec![f("NUMBER(1)", C::Numeric), s("CHAR", C::Char, 1)]),
        ("i8", vec![f("NUMBER(3)", C::Numeric)]),
        ("i16", vec![f("NUMBER(5)", C::Numeric)]),
        ("i32", vec![f("NUMBER(10)", C::Numeric)]),
        ("i64", vec![f("NUMBER(19)", C::Numeric)]),
        ("f32", vec![f("BINARY_FLOAT", C::Real)]),
        ("f64", vec![f("BINARY_DOUBLE", C::Double), f("FLOAT", C::Float)]),
        ("decimal", vec![d("NUMBER", C::Numeric, 38)]),
        (
            "string",
            vec![
                s("VARCHAR2", C::VarChar, 255),
                s("NVARCHAR2", C::NVarChar, 255),
                f("CLOB", C::Clob),
            ],
        ),
        ("char", vec![s("CHAR", C::Char, 1), s("NCHAR", C::NChar, 1)]),
        ("text", vec![f("CLOB", C::Clob), f("NCLOB", C::NClob)]),
        ("bytes", vec![f("BLOB", C::Blob), s("RAW", C::VarBinary, 2000)]),
        ("time", vec![f("TIMESTAMP", C::Timestamp)]),
        (
            "timestamp",
            vec![
                f("TIMESTAMP", C::Timestamp),
                f("TIMESTAMP WITH TIME ZONE", C::TimestampWithTimezone),
            ],
        ),
        ("uuid", vec![s("VARCHAR2", C::VarChar, 36)]),
    ]
}

fn derby(version: Version) -> Entries {
    let boolean = if version.at_least(10, 7) {
        vec![f("BOOLEAN", C::Boolean), f("SMALLINT", C::SmallInt)]
    } else {
        vec![f("SMALLINT", C::SmallInt)]
    };
    vec![
        ("bool", boolean),
        ("f64", vec![f("DOUBLE", C::Double)]),
        ("decimal", vec![d("DECIMAL", C::Decimal, 31)]),
    ]
}

fn h2() -> Entries {
    vec![
        ("i8", vec![f("TINYINT", C::TinyInt)]),
        ("text", vec![f("CLOB", C::Clob), s("VARCHAR", C::VarChar, 4000)]),
        ("bytes", vec![f("BLOB", C::Blob), s("VARBINARY", C::VarBinary, 255)]),
        ("uuid", vec![f("UUID", C::Binary), s("CHAR", C::Char, 36)]),
        ("json", vec![f("JSON", C::Other), f("CLOB", C::Clob)]),
    ]
}

fn db2() -> Entries {
    vec![
        ("bool", vec![f("SMALLINT", C::SmallInt), f("BOOLEAN", C::Boolean)]),
        ("f64", vec![f("DOUBLE", C::Double)]),
        ("decimal", vec![d("DECIMAL", C::Decimal, 31), f("DECFLOAT", C::Decimal)]),
    ]
}
/// Builds the registration of `vendor` at `version`.
pub(super) fn registration(vendor: Vendor, version: Version) -> Vec<TypeMappingEntry> {
    let overridden = overrides(vendor, version);
    base()
        .into_iter()
        .map(|(logical, candidates)| {
            let candidates = overridden
                .iter()
                .find(|(name, _)| *name == logical)
                .map_or(candidates, |(_, replacement)| replacement.clone());
            TypeMappingEntry {
                logical_type: logical.to_string(),
                candidates: candidates
                    .into_iter()
                    .enumerate()
                    .map(|(i, info)| TypeCandidate {
                        info,
                        default: i == 0,
                        from_driver: false,
                    })
                    .collect(),
            }
        })
        .collect()
}
