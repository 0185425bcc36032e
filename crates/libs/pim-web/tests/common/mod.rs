#![allow(dead_code)]

use diesel::connection::SimpleConnection;
use pim_models::db::{config::DbConfig, connection::DbConnection};
use pim_web::auth::AuthService;
use tempfile::TempDir;

/// A migrated database in a private temporary directory.
///
/// The directory, and with it the database, is removed on drop.
pub struct TestContext {
    pub auth: AuthService,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let url = dir.path().join("pim.db").to_string_lossy().into_owned();
        let db = DbConnection::new(&DbConfig::new(url))
            .expect("Failed to open database")
            .setup()
            .expect("Failed to run database migrations");

        Self {
            auth: AuthService::new(db),
            _dir: dir,
        }
    }

    pub fn connection(&self) -> &DbConnection {
        self.auth.connection()
    }

    /// Registers `username` and returns its id together with a live token.
    pub fn user_with_session(&self, username: &str, password: &str) -> (i32, String) {
        let id = self
            .auth
            .register(username, password)
            .expect("Failed to register user");
        let session = self
            .auth
            .login(username, password)
            .expect("Failed to log in");
        (id, session.token)
    }

    /// Drops `table` so that every later query on it fails in the store.
    pub fn drop_table(&self, table: &str) {
        self.connection()
            .pool
            .get()
            .expect("Failed to get pooled connection")
            .batch_execute(&format!("DROP TABLE {table}"))
            .expect("Failed to drop table");
    }
}
