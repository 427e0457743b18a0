//! # docket-db
//!
//! libSQL document store operations for Docket.
//!
//! Handles all persisted records: attorney profiles (partitioned by
//! seniority) and public data sources (partitioned by jurisdiction).
//! Nested lists are stored as JSON columns; per-item writes are strongly
//! consistent and no cross-item transactions are required.
//!
//! Transient backend errors are retried internally with bounded exponential
//! backoff (see [`retry`]) before surfacing as
//! [`error::DatabaseError::Transient`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use error::{DatabaseError, classify};
use libsql::Builder;
use retry::{RetryConfig, is_transient_error};

/// Central database handle for all Docket store operations.
///
/// Wraps a libSQL database and connection. Provides ID generation and the
/// retrying execute/query primitives the repos are built on.
pub struct DocketDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryConfig,
}

impl DocketDb {
    /// Open a local-only database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let docket_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
        };
        docket_db.run_migrations().await?;
        Ok(docket_db)
    }

    /// Open a remote database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        let docket_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
        };
        docket_db.run_migrations().await?;
        Ok(docket_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"att-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query("id generation returned no row".to_string()))?;
        Ok(row.get::<String>(0)?)
    }

    /// Execute a statement once. Errors are classified but not retried; use
    /// [`Self::execute_with`] for write paths that should survive transient
    /// backend errors.
    ///
    /// # Errors
    ///
    /// Returns the classified `DatabaseError`.
    pub async fn execute(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<u64, DatabaseError> {
        self.conn.execute(sql, params).await.map_err(classify)
    }

    /// Run a query once. Errors are classified but not retried.
    ///
    /// # Errors
    ///
    /// Returns the classified `DatabaseError`.
    pub async fn query(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        self.conn.query(sql, params).await.map_err(classify)
    }

    /// Execute a statement, retrying transient backend errors with bounded
    /// exponential backoff. The parameter closure is re-invoked per attempt.
    ///
    /// # Errors
    ///
    /// Returns the classified `DatabaseError` once retries are exhausted or a
    /// non-transient error occurs.
    pub async fn execute_with<P, F>(&self, sql: &str, make_params: F) -> Result<u64, DatabaseError>
    where
        P: libsql::params::IntoParams,
        F: Fn() -> P,
    {
        let mut delay = self.retry.base_delay;
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, make_params()).await {
                Ok(affected) => return Ok(affected),
                Err(e) if is_transient_error(&e) && attempt < self.retry.max_attempts => {
                    tracing::warn!(attempt, error = %e, "transient store error, retrying");
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.retry.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(classify(e)),
            }
        }
    }

    /// Run a query, retrying transient backend errors with bounded exponential
    /// backoff. The parameter closure is re-invoked per attempt.
    ///
    /// # Errors
    ///
    /// Returns the classified `DatabaseError` once retries are exhausted or a
    /// non-transient error occurs.
    pub async fn query_with<P, F>(
        &self,
        sql: &str,
        make_params: F,
    ) -> Result<libsql::Rows, DatabaseError>
    where
        P: libsql::params::IntoParams,
        F: Fn() -> P,
    {
        let mut delay = self.retry.base_delay;
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, make_params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if is_transient_error(&e) && attempt < self.retry.max_attempts => {
                    tracing::warn!(attempt, error = %e, "transient store error, retrying");
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.retry.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(classify(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> DocketDb {
        DocketDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["attorneys", "public_sources"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("att").await.unwrap();
        assert_eq!(id.len(), "att-".len() + 8);
        assert!(id.starts_with("att-"));
        assert!(id["att-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(seen.insert(id), "ids must be unique");
        }
    }

    #[tokio::test]
    async fn execute_classifies_conflict() {
        let db = test_db().await;
        db.execute(
            "INSERT INTO attorneys (id, name, email, seniority, years_of_experience, created_at, updated_at)
             VALUES ('att-1', 'A', 'a@b.example', 'partner', 5, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            (),
        )
        .await
        .unwrap();

        let result = db
            .execute(
                "INSERT INTO attorneys (id, name, email, seniority, years_of_experience, created_at, updated_at)
                 VALUES ('att-2', 'B', 'a@b.example', 'partner', 5, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
                (),
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::Conflict(_))));
    }
}
