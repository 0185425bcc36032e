//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use pim_auth::session_token::session_token_digest;

use crate::{ctx::Ctx, prelude::*};

/// Header carrying the administrative key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Middleware that requires a valid session for a route.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use pim_web::mw_auth::mw_require_auth;
///
/// let app: Router<()> = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(axum::middleware::from_fn(mw_require_auth));
///
/// async fn protected_handler() -> &'static str {
///     "This requires a session"
/// }
/// ```
pub async fn mw_require_auth(ctx: Result<Ctx>, req: Request, next: Next) -> Result<Response> {
    ctx?;
    Ok(next.run(req).await)
}

/// Key guarding administrative routes.
///
/// Only the digest of the configured key is kept. With no key configured
/// every request is refused.
#[derive(Debug, Clone, Default)]
pub struct AdminKey {
    digest: Option<String>,
}

impl AdminKey {
    /// # Examples
    ///
    /// ```rust
    /// use pim_web::mw_auth::AdminKey;
    ///
    /// let key = AdminKey::new(Some("s3cret"));
    /// assert!(key.accepts("s3cret"));
    /// assert!(!key.accepts("guess"));
    /// assert!(!AdminKey::new(None).accepts(""));
    /// ```
    pub fn new(key: Option<&str>) -> Self {
        Self {
            digest: key.filter(|k| !k.is_empty()).map(session_token_digest),
        }
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        self.digest
            .as_deref()
            .is_some_and(|digest| digest == session_token_digest(candidate))
    }
}

/// Middleware that requires the administrative key header.
pub async fn mw_require_admin_key(
    State(admin_key): State<AdminKey>,
    headers: HeaderMap,
    req: Request,
    next: Next,
) -> Result<Response> {
    let presented = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    if !admin_key.accepts(presented) {
        return Err(Error::ApiForbidden);
    }
    Ok(next.run(req).await)
}
