//! Database models and ORM layer for the PIM API.
//!
//! Provides Diesel-based models, queries, and connection management for
//! users, sessions, and particles.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pim_models::{auth::pim_user::PimUser, db::{config::DbConfig, connection::DbConnection}};
//!
//! # fn example() -> pim_models::prelude::Result<()> {
//! let config = DbConfig::new("pim.db");
//! let conn = DbConnection::new(&config)?.setup()?;
//!
//! if let Some(user) = PimUser::fetch_by_username("alice", &conn)? {
//!     println!("alice has id {}", user.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod particle;
pub mod prelude;
mod schema;
