//! Database connection management and migrations.

use diesel::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::prelude::*;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

use super::config::DbConfig;

/// Per-connection SQLite settings, applied whenever the pool opens a connection.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> core::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Database connection pool wrapper.
///
/// Cloning is cheap and every clone shares the same pool; this is the handle
/// passed into every model operation.
#[derive(Debug, Clone)]
pub struct DbConnection {
    /// SQLite connection pool.
    pub pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbConnection {
    /// Create a new database connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use pim_models::db::{connection::DbConnection, config::DbConfig};
    ///
    /// # fn example() -> pim_models::prelude::Result<()> {
    /// let db = DbConnection::new(&DbConfig::new("pim.db"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &DbConfig) -> Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(manager)?;
        Ok(Self { pool })
    }

    /// Run pending migrations and return the connection.
    pub fn setup(self) -> Result<Self> {
        info!("Running Database Migrations");
        let applied = self
            .pool
            .get()?
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| Error::Migration(err.to_string()))?
            .len();
        info!("Applied {applied} migration(s)");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use diesel::sql_types::Integer;

    use super::*;

    #[derive(QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    #[test]
    fn setup_is_idempotent_and_enables_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("pim.db").to_string_lossy().into_owned();
        let db = DbConnection::new(&DbConfig::new(url).with_pool_size(2))
            .unwrap()
            .setup()
            .unwrap()
            .setup()
            .unwrap();

        let conn = &mut db.pool.get().unwrap();
        let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
            .get_result(conn)
            .unwrap();
        assert_eq!(pragma.foreign_keys, 1);
    }
}
