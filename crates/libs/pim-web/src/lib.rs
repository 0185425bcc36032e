//! Service layer and web utilities for the PIM API.
//!
//! [`auth::AuthService`] implements registration, login, session validation
//! and account maintenance on top of the credential and session stores.
//! [`particles`] holds the owner-scoped note operations, and [`ctx`] /
//! [`mw_auth`] resolve and enforce sessions for HTTP handlers.

pub mod auth;
pub mod ctx;
pub mod error;
pub mod mw_auth;
pub mod particles;
pub mod prelude;
pub mod user;
