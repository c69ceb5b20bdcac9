//! Error types for dialect resolution, schema modelling and statement building.
//!
//! Everything reported here is a configuration or usage error detected
//! while building SQL. None of these errors are retryable.

use thiserror::Error;

/// Build-time errors raised by the core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A key ordinal was assigned twice.
    #[error("key '{key}' already has a column at position {ordinal}")]
    DuplicateOrdinal {
        /// Key name (or a generated description).
        key: String,
        /// Zero-based ordinal.
        ordinal: usize,
    },

    /// A column was added to a key or table it does not belong to.
    #[error("column '{column}' belongs to table '{column_table}', not '{table}'")]
    ColumnNotInTable {
        /// Column name.
        column: String,
        /// Table the column actually belongs to.
        column_table: String,
        /// Table the caller tried to attach it to.
        table: String,
    },

    /// A key still has unset ordinals where a complete key is required.
    #[error("key '{0}' has unset column positions")]
    IncompleteKey(String),

    /// Sequence DDL was requested without a sequence name.
    #[error("sequence name is required")]
    MissingSequenceName,

    /// The vendor has no syntax for the requested operation.
    #[error("{vendor} does not support {operation}")]
    Unsupported {
        /// Vendor name.
        vendor: &'static str,
        /// Description of the operation.
        operation: String,
    },

    /// No SQL method is registered for the receiver/name pair.
    #[error("no SQL method '{method}' for receiver {receiver}")]
    UnknownMethod {
        /// Receiver category, or `*` for the wildcard bucket.
        receiver: String,
        /// Method name.
        method: String,
    },

    /// A SQL method was invoked with an invalid receiver or arguments.
    #[error("invalid call to '{method}': {reason}")]
    InvalidMethodCall {
        /// Method name.
        method: String,
        /// What was wrong with the call.
        reason: String,
    },

    /// Two expressions cannot be compared.
    #[error("cannot compare {left} with {right} using '{op}'")]
    InvalidComparison {
        /// Left operand category.
        left: String,
        /// Operator.
        op: &'static str,
        /// Right operand category.
        right: String,
    },

    /// No type mapping exists for the logical type.
    #[error("no SQL type mapping for logical type '{0}'")]
    UnknownLogicalType(String),

    /// A logical type has no candidate of the requested SQL type.
    #[error("logical type '{logical_type}' cannot be stored as '{sql_type}'")]
    NoTypeCandidate {
        /// Logical type name.
        logical_type: String,
        /// Requested SQL type name.
        sql_type: String,
    },

    /// No column of that name exists.
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A version string could not be parsed.
    #[error("invalid version string '{0}'")]
    InvalidVersion(String),

    /// A vendor name could not be recognised.
    #[error("unknown database vendor '{0}'")]
    UnknownVendor(String),

    /// A capability key could not be recognised.
    #[error("unknown capability '{0}'")]
    UnknownCapability(String),
}

impl CoreError {
    /// Creates an unsupported-operation error.
    #[must_use]
    pub fn unsupported(vendor: &'static str, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            vendor,
            operation: operation.into(),
        }
    }

    /// Creates an invalid-method-call error.
    #[must_use]
    pub fn invalid_call(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMethodCall {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
