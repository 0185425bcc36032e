//! Credential and session models.
//!
//! This module contains the stores backing authentication: the `auth` table
//! of usernames and password hashes, and the `sessions` table of hashed
//! session tokens.

pub mod pim_session;
pub mod pim_user;
