//! Correction of driver-reported types.
//!
//! Some drivers report vendor extension types under a generic code
//! (`OTHER`, `BIT`, ...). The rules below rewrite those reports before
//! the type is looked up or learned.

use super::{DriverTypeInfo, SqlTypeCode, SqlTypeInfo};
use crate::dialect::Vendor;

/// Oracle's vendor code for `TIMESTAMP WITH TIME ZONE`.
const ORACLE_TIMESTAMP_TZ: i32 = -101;
/// Oracle's vendor code for `TIMESTAMP WITH LOCAL TIME ZONE`.
const ORACLE_TIMESTAMP_LTZ: i32 = -102;
/// Oracle's vendor codes for `BINARY_FLOAT` and `BINARY_DOUBLE`.
const ORACLE_BINARY_FLOAT: i32 = 100;
const ORACLE_BINARY_DOUBLE: i32 = 101;
/// SQL Server's vendor code for `datetimeoffset`.
const SQLSERVER_DATETIMEOFFSET: i32 = -155;
/// DB2's vendor code for `DECFLOAT`.
const DB2_DECFLOAT: i32 = -360;

/// Normalizes a driver-reported type for `vendor`.
#[must_use]
pub fn normalize_driver_type(vendor: Vendor, raw: &DriverTypeInfo) -> SqlTypeInfo {
    let name = raw.type_name.trim();
    let upper = name.to_ascii_uppercase();
    let reported = SqlTypeCode::from_code(raw.code);
    let code = match (vendor, upper.as_str(), raw.code) {
        (Vendor::PostgreSql, "BOOL" | "BOOLEAN", _) | (Vendor::SqlServer, "BIT", _) => {
            SqlTypeCode::Boolean
        }
        (Vendor::PostgreSql, "TIMESTAMPTZ", _)
        | (Vendor::Oracle, _, ORACLE_TIMESTAMP_TZ | ORACLE_TIMESTAMP_LTZ)
        | (Vendor::SqlServer, _, SQLSERVER_DATETIMEOFFSET) => SqlTypeCode::TimestampWithTimezone,
        (Vendor::PostgreSql, "BYTEA", _) => SqlTypeCode::LongVarBinary,
        (Vendor::PostgreSql, "TEXT", _) => SqlTypeCode::LongVarChar,
        (Vendor::Oracle, "NVARCHAR2", _) => SqlTypeCode::NVarChar,
        (Vendor::Oracle, "NCHAR", _) => SqlTypeCode::NChar,
        (Vendor::Oracle, "NCLOB", _) => SqlTypeCode::NClob,
        (Vendor::Oracle, _, ORACLE_BINARY_FLOAT) => SqlTypeCode::Real,
        (Vendor::Oracle, _, ORACLE_BINARY_DOUBLE) => SqlTypeCode::Double,
        (Vendor::MySql, "BIT" | "TINYINT", _) if raw.precision.is_some_and(|p| p <= 1) => {
            SqlTypeCode::Boolean
        }
        (Vendor::Db2, "DECFLOAT", _) | (Vendor::Db2, _, DB2_DECFLOAT) => SqlTypeCode::Decimal,
        _ => reported,
    };
    let params = raw.create_params.as_deref().unwrap_or_default();
    SqlTypeInfo {
        type_name: name.to_string(),
        code,
        max_precision: raw.precision,
        accepts_length: params.contains('(') || params.contains("length"),
        accepts_scale: params.contains(',') || params.contains("scale"),
        default_length: None,
    }
}
