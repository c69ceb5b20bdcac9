//! Error types for fetch compilation and execution.

use std::error::Error as StdError;

use oxide_store_core::CoreError;
use thiserror::Error;

/// One link of a chained vendor error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", render_codes(.code.as_deref(), .sql_state.as_deref()))]
pub struct VendorError {
    /// Vendor-specific error code.
    pub code: Option<String>,
    /// SQLSTATE, when the driver reports one.
    pub sql_state: Option<String>,
    pub message: String,
}

impl VendorError {
    /// A link carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            sql_state: None,
            message: message.into(),
        }
    }
}

fn render_codes(code: Option<&str>, sql_state: Option<&str>) -> String {
    match (code, sql_state) {
        (Some(code), Some(state)) => format!(" (code {code}, state {state})"),
        (Some(code), None) => format!(" (code {code})"),
        (None, Some(state)) => format!(" (state {state})"),
        (None, None) => String::new(),
    }
}

/// A failure reported by the datastore, with every nested vendor error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", render_chain(.chain), render_statement(.sql.as_deref()))]
pub struct DatastoreError {
    /// Statement being executed, if any.
    pub sql: Option<String>,
    /// Vendor errors, outermost first.
    pub chain: Vec<VendorError>,
}

impl DatastoreError {
    /// Wraps a chain of vendor errors.
    #[must_use]
    pub const fn new(sql: Option<String>, chain: Vec<VendorError>) -> Self {
        Self { sql, chain }
    }

    /// Converts an sqlx error, walking its source chain.
    #[must_use]
    pub fn from_sqlx(err: &sqlx::Error, sql: Option<&str>) -> Self {
        let first = err.as_database_error().map_or_else(
            || VendorError::message(err.to_string()),
            |db| VendorError {
                code: db.code().map(std::borrow::Cow::into_owned),
                sql_state: None,
                message: db.message().to_string(),
            },
        );
        let mut chain = vec![first];
        let mut source = err.source();
        while let Some(cause) = source {
            let message = cause.to_string();
            if chain.last().map(|last| &last.message) != Some(&message) {
                chain.push(VendorError::message(message));
            }
            source = cause.source();
        }
        Self {
            sql: sql.map(str::to_string),
            chain,
        }
    }

    /// Returns whether any link satisfies `pred`.
    #[must_use]
    pub fn any(&self, pred: impl Fn(&VendorError) -> bool) -> bool {
        self.chain.iter().any(pred)
    }
}

fn render_chain(links: &[VendorError]) -> String {
    if links.is_empty() {
        return String::from("unknown datastore error");
    }
    links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; caused by: ")
}

fn render_statement(sql: Option<&str>) -> String {
    sql.map(|sql| format!(" [{sql}]")).unwrap_or_default()
}

/// Fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Statement building failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No row matched the object's identity.
    #[error("no {class} object with identity ({identity})")]
    NotFound {
        /// Class being fetched.
        class: String,
        /// Identity values, comma separated.
        identity: String,
    },

    /// The datastore reported an error.
    #[error("datastore error: {0}")]
    Datastore(#[source] DatastoreError),

    /// The statement was cancelled or timed out.
    #[error("statement cancelled: {0}")]
    Cancelled(#[source] DatastoreError),

    /// Class metadata is inconsistent.
    #[error("metadata error: {0}")]
    Metadata(String),
}

impl FetchError {
    /// Returns whether this is the not-found condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns whether the statement was cancelled or timed out.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
