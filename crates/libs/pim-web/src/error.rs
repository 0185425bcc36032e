//! Main Crate Error

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::{debug, error};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The store could not be reached or rejected the query.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] pim_models::error::Error),

    #[error(transparent)]
    Auth(#[from] pim_auth::error::Error),

    #[error("Username already exists")]
    DuplicateUser,

    /// Unknown user and wrong password are deliberately the same error.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired session")]
    InvalidOrExpiredSession,

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Session token missing")]
    TokenMissing,

    #[error("Context Missing")]
    CtxMissing,

    #[error("Particle not found")]
    ParticleNotFound,

    #[error("No fields to update")]
    EmptyUpdate,

    #[error("Search term must not be empty")]
    EmptySearchTerm,

    #[error("API Forbidden")]
    ApiForbidden,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials
            | Error::InvalidOrExpiredSession
            | Error::TokenMissing
            | Error::CtxMissing => StatusCode::UNAUTHORIZED,
            Error::UserNotFound | Error::ParticleNotFound => StatusCode::NOT_FOUND,
            Error::DuplicateUser => StatusCode::CONFLICT,
            Error::InvalidUsername
            | Error::MissingCredentials
            | Error::EmptyUpdate
            | Error::EmptySearchTerm => StatusCode::BAD_REQUEST,
            Error::ApiForbidden => StatusCode::FORBIDDEN,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Creating API error response for error: {:?}", self);
            String::from("Internal server error")
        } else {
            debug!("Rejecting request: {self}");
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "status": status.as_u16()
            }
        }));
        (status, body).into_response()
    }
}
