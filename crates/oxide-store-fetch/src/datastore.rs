//! Connection and lock contracts a fetch executes through.

use async_trait::async_trait;
use oxide_store_core::SqlValue;

use crate::error::DatastoreError;

/// A connection able to run one parameterized query.
#[async_trait]
pub trait DatastoreConnection: Send {
    /// Executes `sql` with positional `params` and returns the first row,
    /// one value per result column.
    ///
    /// `result_types` holds the logical type of each result column as far
    /// as it is known; columns beyond it are decoded as the driver reports
    /// them.
    ///
    /// # Errors
    ///
    /// Returns the vendor error chain, with `sql` attached, when the
    /// statement fails or a column cannot be decoded.
    async fn query_first(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        result_types: &[String],
    ) -> Result<Option<Vec<SqlValue>>, DatastoreError>;
}

/// A pool handing out connections for the duration of one call.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Takes a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns the vendor error chain when no connection can be opened.
    async fn acquire(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError>;

    /// Returns a connection to the pool.
    async fn release(&self, connection: Box<dyn DatastoreConnection>);
}

/// Row locking requested for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    #[default]
    None,
    /// Lock the row until the transaction ends.
    Pessimistic,
}

/// Decides per call whether an object is read with a row lock.
pub trait LockManager: Send + Sync {
    fn lock_mode(&self, identity: &[SqlValue]) -> LockMode;
}

/// Never locks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocks;

impl LockManager for NoLocks {
    fn lock_mode(&self, _identity: &[SqlValue]) -> LockMode {
        LockMode::None
    }
}
