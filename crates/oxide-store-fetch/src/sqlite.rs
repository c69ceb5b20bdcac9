//! SQLite connections through sqlx.

use async_trait::async_trait;
use oxide_store_core::SqlValue;
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, TypeInfo, ValueRef};
use tracing::debug;
use uuid::Uuid;

use crate::datastore::{ConnectionProvider, DatastoreConnection};
use crate::error::DatastoreError;

/// Hands out connections of an sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionProvider for SqliteProvider {
    async fn acquire(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError> {
        let connection = self
            .pool
            .acquire()
            .await
            .map_err(|err| DatastoreError::from_sqlx(&err, None))?;
        Ok(Box::new(SqliteConnection { connection }))
    }

    async fn release(&self, connection: Box<dyn DatastoreConnection>) {
        // Dropping a pooled connection returns it to the pool.
        drop(connection);
    }
}

/// A pooled SQLite connection.
#[derive(Debug)]
pub struct SqliteConnection {
    connection: PoolConnection<Sqlite>,
}

#[async_trait]
impl DatastoreConnection for SqliteConnection {
    async fn query_first(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        result_types: &[String],
    ) -> Result<Option<Vec<SqlValue>>, DatastoreError> {
        debug!(sql = %sql, params = params.len(), "executing query");
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value.clone());
        }
        let row = query
            .fetch_optional(&mut *self.connection)
            .await
            .map_err(|err| DatastoreError::from_sqlx(&err, Some(sql)))?;
        row.as_ref()
            .map(|row| decode_row(row, result_types))
            .transpose()
            .map_err(|err| DatastoreError::from_sqlx(&err, Some(sql)))
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
        SqlValue::Date(d) => query.bind(d),
        SqlValue::Timestamp(ts) => query.bind(ts),
        SqlValue::Uuid(u) => query.bind(u.hyphenated().to_string()),
    }
}

fn decode_row(row: &SqliteRow, result_types: &[String]) -> Result<Vec<SqlValue>, sqlx::Error> {
    (0..row.len())
        .map(|i| decode_column(row, i, result_types.get(i).map_or("", String::as_str)))
        .collect()
}

/// Decodes by logical type where SQLite has no storage class for it, by
/// the storage class of the value otherwise.
fn decode_column(
    row: &SqliteRow,
    index: usize,
    logical_type: &str,
) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let storage = raw.type_info().name().to_ascii_uppercase();
    Ok(match (logical_type, storage.as_str()) {
        ("bool", _) => SqlValue::Bool(row.try_get(index)?),
        ("date", _) => SqlValue::Date(row.try_get(index)?),
        ("timestamp", _) => SqlValue::Timestamp(row.try_get(index)?),
        ("uuid", "BLOB") => {
            let bytes: &[u8] = row.try_get(index)?;
            SqlValue::Uuid(Uuid::from_slice(bytes).map_err(|err| sqlx::Error::Decode(err.into()))?)
        }
        ("uuid", _) => {
            let text: &str = row.try_get(index)?;
            SqlValue::Uuid(Uuid::parse_str(text).map_err(|err| sqlx::Error::Decode(err.into()))?)
        }
        (_, "INTEGER" | "BOOLEAN") => SqlValue::Int(row.try_get(index)?),
        (_, "REAL") => SqlValue::Float(row.try_get(index)?),
        (_, "BLOB") => SqlValue::Blob(row.try_get(index)?),
        _ => SqlValue::Text(row.try_get(index)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn provider() -> SqliteProvider {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        SqliteProvider::new(pool)
    }

    #[tokio::test]
    async fn test_round_trip_values() {
        let provider = provider().await;
        let mut connection = provider.acquire().await.unwrap();
        let row = connection
            .query_first(
                "SELECT ?, ?, ?, ?, ?",
                &[
                    SqlValue::Int(7),
                    SqlValue::Float(1.5),
                    SqlValue::Text(String::from("seven")),
                    SqlValue::Null,
                    SqlValue::Bool(true),
                ],
                &[],
            )
            .await
            .unwrap()
            .unwrap();
        provider.release(connection).await;
        assert_eq!(
            row,
            vec![
                SqlValue::Int(7),
                SqlValue::Float(1.5),
                SqlValue::Text(String::from("seven")),
                SqlValue::Null,
                SqlValue::Int(1),
            ]
        );
    }

    #[tokio::test]
    async fn test_logical_types_decode() {
        let provider = provider().await;
        let mut connection = provider.acquire().await.unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let timestamp = date.and_hms_milli_opt(13, 45, 7, 250).unwrap();
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let types = ["date", "timestamp", "uuid", "bool", "uuid", "string"].map(String::from);
        let row = connection
            .query_first(
                "SELECT ?, ?, ?, ?, ?, ?",
                &[
                    SqlValue::Date(date),
                    SqlValue::Timestamp(timestamp),
                    SqlValue::Uuid(id),
                    SqlValue::Bool(false),
                    SqlValue::Null,
                    SqlValue::Text(String::from("2024-02-29")),
                ],
                &types,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            row,
            vec![
                SqlValue::Date(date),
                SqlValue::Timestamp(timestamp),
                SqlValue::Uuid(id),
                SqlValue::Bool(false),
                SqlValue::Null,
                SqlValue::Text(String::from("2024-02-29")),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_an_error() {
        let provider = provider().await;
        let mut connection = provider.acquire().await.unwrap();
        let err = connection
            .query_first("SELECT 'not-a-uuid'", &[], &[String::from("uuid")])
            .await
            .unwrap_err();
        assert_eq!(err.sql.as_deref(), Some("SELECT 'not-a-uuid'"));
    }

    #[tokio::test]
    async fn test_no_rows() {
        let provider = provider().await;
        let mut connection = provider.acquire().await.unwrap();
        let row = connection
            .query_first("SELECT 1 WHERE 1 = 0", &[], &[])
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_errors_carry_sql() {
        let provider = provider().await;
        let mut connection = provider.acquire().await.unwrap();
        let err = connection
            .query_first("SELECT * FROM missing_table", &[], &[])
            .await
            .unwrap_err();
        assert_eq!(err.sql.as_deref(), Some("SELECT * FROM missing_table"));
        assert!(err.chain[0].message.contains("missing_table"));
        assert!(err.chain[0].code.is_some());
    }
}
