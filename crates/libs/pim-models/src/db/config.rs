//! Database configuration management.

use std::fmt::Display;

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite database path or URI.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout_ms: u32,
}

impl DbConfig {
    pub const DEFAULT_POOL_SIZE: u32 = 8;
    pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

    /// Creates a configuration with the default pool settings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pim_models::db::config::DbConfig;
    ///
    /// let config = DbConfig::new("pim.db");
    /// assert_eq!(config.pool_size, DbConfig::DEFAULT_POOL_SIZE);
    /// ```
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: Self::DEFAULT_POOL_SIZE,
            busy_timeout_ms: Self::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }
}

impl Display for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "REDACTED")
    }
}
