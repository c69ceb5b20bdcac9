//! # oxide-store-core
//!
//! Vendor-neutral SQL generation for a relational object store.
//!
//! This crate provides:
//! - Dialect profiles: version-gated capabilities, reserved words,
//!   identifier policy, pagination, identity, sequence and lock syntax
//! - A type mapping table from logical types to ranked SQL types,
//!   augmented from driver-reported type information
//! - A schema and key/constraint model with DDL generation
//! - A typed SQL expression tree and SELECT builder whose composite
//!   expressions are resolved through a per-vendor method registry
//! - Statement mapping indices describing the result-column and
//!   parameter layout of compiled statements
//!
//! ## Pagination
//!
//! ```rust
//! use oxide_store_core::dialect::{DialectProfile, Vendor, Version};
//!
//! let mysql = DialectProfile::new(Vendor::MySql, Version::new(8, 0, 36));
//! assert_eq!(mysql.pagination_clause(10, 5, true), "LIMIT 10,5");
//!
//! let mssql = DialectProfile::new(Vendor::SqlServer, Version::new(16, 0, 0));
//! assert_eq!(
//!     mssql.pagination_clause(10, 5, true),
//!     "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
//! );
//! ```
//!
//! ## Expressions
//!
//! ```rust
//! use oxide_store_core::dialect::{DialectProfile, Vendor, Version};
//! use oxide_store_core::expr::{ClauseKind, CompileContext, SqlExpression};
//! use oxide_store_core::statement::{SelectStatement, SqlTable};
//!
//! let profile = DialectProfile::new(Vendor::SqlServer, Version::new(16, 0, 0));
//! let ctx = CompileContext::new(&profile, ClauseKind::Where);
//! let mut select = SelectStatement::new("PERSON");
//! let name = SqlExpression::column(select.table(), "NAME", "string");
//! let length = name.invoke(&ctx, "length", vec![]).unwrap();
//! select.where_and(length.gt(SqlExpression::literal(3), &ctx).unwrap());
//!
//! assert_eq!(
//!     select.render(&profile, false).sql,
//!     "SELECT 1 FROM PERSON A0 WHERE LEN(A0.NAME) > 3"
//! );
//! ```

pub mod config;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod key;
pub mod schema;
pub mod statement;
pub mod types;
pub mod value;

pub use config::{ProfileConfig, SchemaConfig};
pub use ddl::SchemaWriter;
pub use dialect::{Capability, DialectProfile, Vendor, Version};
pub use error::{CoreError, Result};
pub use expr::{ClauseKind, CompileContext, ExprCategory, SqlExpression};
pub use key::{ForeignKeyAction, Key, KeyKind};
pub use schema::{Column, Table};
pub use statement::{
    MappingKey, SelectStatement, SqlTable, SqlText, StatementClassMapping, StatementMappingIndex,
};
pub use types::{SqlTypeInfo, TypeMappingTable};
pub use value::{SqlValue, ToSqlValue};
