//! Service configuration read from the environment.

use std::{fmt, net::SocketAddr, str::FromStr};

use chrono::TimeDelta;
use pim_models::db::config::DbConfig;

use crate::prelude::*;

pub const DEFAULT_DATABASE_URL: &str = "pim.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 7200;

pub struct PimdConfig {
    pub db: DbConfig,
    pub bind_addr: SocketAddr,
    pub session_lifetime: TimeDelta,
    pub admin_key: Option<String>,
}

impl PimdConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value. Unset and empty variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let pool_size = parse_or(
            var("DATABASE_POOL_SIZE"),
            "DATABASE_POOL_SIZE",
            DbConfig::DEFAULT_POOL_SIZE,
        )?;
        if pool_size == 0 {
            return Err(Error::Config(String::from(
                "DATABASE_POOL_SIZE must be positive",
            )));
        }
        let bind_addr = match var("PIMD_BIND_ADDR") {
            Some(value) => parse(&value, "PIMD_BIND_ADDR")?,
            None => parse(DEFAULT_BIND_ADDR, "PIMD_BIND_ADDR")?,
        };
        let lifetime_secs = parse_or(
            var("PIMD_SESSION_LIFETIME_SECS"),
            "PIMD_SESSION_LIFETIME_SECS",
            DEFAULT_SESSION_LIFETIME_SECS,
        )?;
        let session_lifetime = TimeDelta::try_seconds(lifetime_secs)
            .filter(|lifetime| *lifetime > TimeDelta::zero())
            .ok_or_else(|| {
                Error::Config(format!(
                    "PIMD_SESSION_LIFETIME_SECS out of range: {lifetime_secs}"
                ))
            })?;

        Ok(Self {
            db: DbConfig::new(database_url).with_pool_size(pool_size),
            bind_addr,
            session_lifetime,
            admin_key: var("PIMD_ADMIN_KEY"),
        })
    }
}

fn parse<T: FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} has an invalid value: {value}")))
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T> {
    value.map_or(Ok(default), |value| parse(&value, name))
}

impl fmt::Display for PimdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "db: {}, bind: {}, session lifetime: {}s, admin key: {}",
            self.db,
            self.bind_addr,
            self.session_lifetime.num_seconds(),
            if self.admin_key.is_some() { "set" } else { "unset" }
        )
    }
}
