//! Login response structure.

use serde::{Deserialize, Serialize};

use super::CONNECTION_TOKEN_TYPE;

/// Login response carrying the raw session token.
///
/// This is the only place the raw token is ever shown.
///
/// # JSON Format
///
/// ```json
/// {
///   "access_token": "9f2c0a...",
///   "token_type": "Bearer",
///   "expires_at": 1735693200
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthBody {
    /// The raw session token.
    pub access_token: String,
    /// The token type (always "Bearer").
    pub token_type: String,
    /// Unix timestamp after which the session is no longer accepted.
    pub expires_at: i64,
}

impl AuthBody {
    /// Creates a new login response.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pim_auth::auth_body::AuthBody;
    ///
    /// let response = AuthBody::new("some_token".to_string(), 1_700_000_000);
    /// assert_eq!(response.token_type, "Bearer");
    /// ```
    pub fn new(access_token: String, expires_at: i64) -> Self {
        Self {
            access_token,
            token_type: String::from(CONNECTION_TOKEN_TYPE),
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_bearer_type() {
        let body = AuthBody::new(String::from("abc"), 42);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_at"], 42);
    }
}
