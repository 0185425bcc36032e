//! User request and response payloads.

use std::fmt;

use pim_models::auth::pim_user::PimUser;
use serde::{Deserialize, Serialize};

/// Public view of a user. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PimUserApi {
    pub id: i32,
    pub username: String,
}

/// Username and password, as sent to register, login and delete.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PimCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub new_password: String,
}

impl From<PimUser> for PimUserApi {
    fn from(value: PimUser) -> Self {
        Self {
            id: value.id,
            username: value.username,
        }
    }
}

impl PimCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Display for PimUserApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User '{}' (ID: {})", self.username, self.id)
    }
}
