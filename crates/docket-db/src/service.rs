//! Service layer for document store operations.
//!
//! `DocketService` wraps `DocketDb` (raw database access). All repo methods
//! are implemented as `impl DocketService` blocks in [`crate::repos`].

use docket_config::DatabaseConfig;

use crate::DocketDb;
use crate::error::DatabaseError;

/// Orchestrates document store reads and writes for attorneys and public
/// sources.
pub struct DocketService {
    db: DocketDb,
}

impl DocketService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DocketDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service backed by a remote database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = DocketDb::open_remote(url, auth_token).await?;
        Ok(Self { db })
    }

    /// Open remote when the config carries remote credentials, local otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store cannot be opened.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(&config.path).await
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DocketDb {
        &self.db
    }
}
