//! Authentication primitives for the PIM API.
//!
//! - [`secret_hash`]: salted Argon2 password hashing and verification.
//! - [`session_token`]: random bearer tokens and the digest stored in place of them.
//! - [`auth_body`]: the login response handed back to clients.

pub mod auth_body;
pub mod error;
pub mod prelude;
pub mod secret_hash;
pub mod session_token;

pub const CONNECTION_TOKEN_TYPE: &str = "Bearer";
pub const AUTH_HEADER: &str = "Authorization";
pub const AUTH_HEADER_PREFIX: &str = "Bearer ";
