//! Context resolver extracting the session from HTTP requests.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pim_auth::{AUTH_HEADER, AUTH_HEADER_PREFIX, auth_body::AuthBody};
use tower_cookies::{Cookie, Cookies};

use crate::{auth::AuthService, ctx::Ctx, prelude::*, user::PimCredentials};

/// The name of the cookie used to carry the session token.
pub const AUTH_TOKEN_COOKIE: &str = "pim-session";

/// Why no context could be attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtxError {
    TokenMissing,
    InvalidOrExpiredSession,
}

impl From<CtxError> for Error {
    fn from(value: CtxError) -> Self {
        match value {
            CtxError::TokenMissing => Error::TokenMissing,
            CtxError::InvalidOrExpiredSession => Error::InvalidOrExpiredSession,
        }
    }
}

/// Reads the raw session token from the `Authorization` header, falling
/// back to the session cookie when no bearer token is sent.
pub fn session_token(cookies: &Cookies, headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| {
        cookies
            .get(AUTH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(AUTH_HEADER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Middleware resolving the request context from the session token.
///
/// The outcome is stored in the request extensions either way; routes that
/// need a user reject the request later through [`Ctx`] extraction. A store
/// failure ends the request here instead of being reported as a bad session.
#[axum::debug_middleware]
pub async fn mw_ctx_resolver(
    State(auth): State<AuthService>,
    cookies: Cookies,
    headers: HeaderMap,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = match session_token(&cookies, &headers) {
        None => Err(CtxError::TokenMissing),
        Some(token) => match auth.validate_session(&token) {
            Ok(user_id) => Ok(Ctx::new(user_id)),
            Err(Error::InvalidOrExpiredSession) => Err(CtxError::InvalidOrExpiredSession),
            Err(err) => return err.into_response(),
        },
    };

    if ctx == Err(CtxError::InvalidOrExpiredSession) {
        cookies.remove(Cookie::from(AUTH_TOKEN_COOKIE));
    }
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

/// Logs a user in and sets the session cookie.
pub fn login_user(
    auth: &AuthService,
    credentials: &PimCredentials,
    cookies: &Cookies,
) -> Result<AuthBody> {
    let session = auth.login(&credentials.username, &credentials.password)?;

    let mut cookie = Cookie::new(AUTH_TOKEN_COOKIE, session.token.clone());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);

    Ok(session.into())
}

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Ok(parts
            .extensions
            .get::<core::result::Result<Ctx, CtxError>>()
            .ok_or(Error::CtxMissing)?
            .clone()?)
    }
}
