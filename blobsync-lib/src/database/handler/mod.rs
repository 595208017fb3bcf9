//! Database table handlers.
//!
//! The only table, `blobs`, can be further inspected in the `sql/blobs.sql` or `schema.rs` file.

pub mod blob;

use crate::config::DatabaseConfig;
use crate::database::handler::blob::BlobHandler;
use crate::database::BLOBS_TABLE;
use crate::error::Error;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use diesel::PgConnection;
use diesel::RunQueryDsl;
use log::info;
use std::time::Duration;

/// How long a checkout waits for a (re-)established connection before giving up on the current cycle.
const CONNECTION_TIMEOUT: u64 = 5;

/// Database client, providing all table handlers.
///
/// Holds a single-connection pool rather than a bare connection; connections are validated on checkout, so
/// a connection dropped by a database restart is replaced on the next call instead of failing forever.
pub struct DatabaseClient {
    connection: Pool<ConnectionManager<PgConnection>>,
}

impl DatabaseClient {
    /// Returns a new database client connected to the configured PostgreSQL instance.
    pub fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        DatabaseClient::establish(&config.connection_string())
    }

    /// Returns a new database client given either a libpq connection string or a `postgres://` URL; fails if
    /// no connection can be established within [`CONNECTION_TIMEOUT`] seconds.
    pub fn establish(database_url: &str) -> Result<Self, Error> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT))
            .build(manager)
            .map_err(Error::DatabaseConnect)?;

        Ok(DatabaseClient { connection: pool })
    }

    /// Verifies the database is reachable by issuing a `SELECT 1`.
    pub fn ping(&self) -> Result<(), Error> {
        let connection = self.connection.get().map_err(Error::DatabaseUnavailable)?;
        diesel::sql_query("SELECT 1").execute(&connection).map_err(Error::DatabasePing)?;

        Ok(())
    }

    /// Creates the `blobs` table unless it already exists; calling this repeatedly is a no-op.
    pub fn ensure_schema(&self) -> Result<(), Error> {
        let connection = self.connection.get().map_err(Error::DatabaseUnavailable)?;
        diesel::sql_query(BLOBS_TABLE).execute(&connection).map_err(Error::DatabaseSchema)?;
        info!("Table 'blobs' ensured");

        Ok(())
    }

    /// Returns a handler for the `blobs` table.
    pub fn blob(&self) -> BlobHandler {
        BlobHandler::new(&self.connection)
    }
}
