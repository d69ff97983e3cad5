use std::sync::Arc;
use std::time::Duration;

use sqlx::{Connection, PgConnection};
use thiserror::Error;
use tracing::{debug, warn};

use crate::secrets::{SecretError, SecretProvider, CONNECTION_STRING_SECRET};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection string unavailable: {0}")]
    Secret(#[from] SecretError),

    #[error("Connecting to the database timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens one Postgres connection per operation.
///
/// The connection string is read from the secret store every time a
/// connection is opened; nothing is pooled or cached.
#[derive(Clone)]
pub struct ConnectionManager {
    secrets: Arc<dyn SecretProvider>,
    connect_timeout: Duration,
}

impl ConnectionManager {
    pub fn new(secrets: Arc<dyn SecretProvider>, connect_timeout: Duration) -> Self {
        Self {
            secrets,
            connect_timeout,
        }
    }

    /// Fetch the connection string and open a fresh connection.
    pub async fn open(&self) -> Result<PgConnection, DatabaseError> {
        let connection_string = self.secrets.get(CONNECTION_STRING_SECRET).await?;

        let conn = tokio::time::timeout(
            self.connect_timeout,
            PgConnection::connect(&connection_string),
        )
        .await
        .map_err(|_| DatabaseError::ConnectTimeout(self.connect_timeout))??;

        debug!("Opened database connection");
        Ok(conn)
    }

    /// Close a connection opened by [`ConnectionManager::open`]. A failed
    /// close is logged; the socket is dropped either way.
    pub async fn release(&self, conn: PgConnection) {
        if let Err(e) = conn.close().await {
            warn!("Error closing database connection: {}", e);
        }
    }

    /// Connectivity probe used by operators; not called on the request path.
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let mut conn = self.open().await?;
        let outcome = sqlx::query("SELECT 1").execute(&mut conn).await;
        self.release(conn).await;
        outcome?;
        Ok(())
    }
}
