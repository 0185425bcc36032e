//! Authentication service.
//!
//! Every call goes straight to the stores: nothing about users or sessions
//! is cached here, so a concurrent change by another request or process is
//! seen on the next call.

use std::sync::LazyLock;

use chrono::{TimeDelta, Utc};
use pim_auth::{
    auth_body::AuthBody,
    secret_hash::{generate_secret_hash, is_secret_valid},
    session_token::{generate_session_token, session_token_digest},
};
use pim_models::{
    auth::{
        pim_session::{PimSession, PimSessionCreate},
        pim_user::{PimUser, PimUserCreate},
    },
    db::connection::DbConnection,
};
use tracing::{debug, error, info, warn};

use crate::prelude::*;
use crate::user::PimUserApi;

/// Verified against when the username is unknown, so that a failed login
/// costs the same whether or not the account exists.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| match generate_secret_hash("pim-dummy-password") {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to generate dummy password hash: {err}");
            String::new()
        }
    });

/// A freshly issued session.
///
/// `token` is the raw bearer token. It is returned to the caller once and
/// only its digest is persisted.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub user_id: i32,
    pub expires_at: i64,
}

impl From<SessionToken> for AuthBody {
    fn from(value: SessionToken) -> Self {
        AuthBody::new(value.token, value.expires_at)
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    connection: DbConnection,
    session_lifetime: TimeDelta,
}

impl AuthService {
    pub const DEFAULT_SESSION_LIFETIME: TimeDelta = TimeDelta::minutes(120);

    pub fn new(connection: DbConnection) -> Self {
        Self {
            connection,
            session_lifetime: Self::DEFAULT_SESSION_LIFETIME,
        }
    }

    pub fn with_session_lifetime(mut self, session_lifetime: TimeDelta) -> Self {
        self.session_lifetime = session_lifetime;
        self
    }

    pub fn connection(&self) -> &DbConnection {
        &self.connection
    }

    pub fn session_lifetime(&self) -> TimeDelta {
        self.session_lifetime
    }

    /// Creates a user and returns its id.
    ///
    /// Uniqueness is decided by the store's constraint, not by a lookup
    /// beforehand, so of two concurrent registrations for one name exactly
    /// one succeeds.
    pub fn register(&self, username: &str, password: &str) -> Result<i32> {
        if username.is_empty() {
            return Err(Error::InvalidUsername);
        }
        if password.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let hash = generate_secret_hash(password)?;
        match PimUserCreate::new(username, hash).save(&self.connection) {
            Ok(user) => {
                info!("Registered user {} ({})", user.username, user.id);
                Ok(user.id)
            }
            Err(err) if err.is_unique_violation() => {
                debug!("Username {username} already taken");
                Err(Error::DuplicateUser)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Checks the credentials and opens a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let user = self.authenticate(username, password)?;

        let token = generate_session_token();
        let expires_at = Utc::now()
            .timestamp()
            .saturating_add(self.session_lifetime.num_seconds());
        PimSessionCreate::new(session_token_digest(&token), user.id, expires_at)
            .save(&self.connection)?;

        info!("User {} logged in", user.id);
        Ok(SessionToken {
            token,
            user_id: user.id,
            expires_at,
        })
    }

    /// Resolves a raw session token to the id of its user.
    pub fn validate_session(&self, token: &str) -> Result<i32> {
        let digest = session_token_digest(token);
        let now = Utc::now().timestamp();

        PimSession::fetch_live(&digest, now, &self.connection)?
            .map(|session| session.user_id)
            .ok_or(Error::InvalidOrExpiredSession)
    }

    /// Replaces the password after checking the current one.
    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if new_password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        let user = self.authenticate(username, old_password)?;

        let hash = generate_secret_hash(new_password)?;
        if !PimUser::update_hash_by_id(user.id, &hash, &self.connection)? {
            return Err(Error::InvalidCredentials);
        }
        info!("User {} changed their password", user.id);
        Ok(())
    }

    /// Administrative password replacement; no current password needed.
    pub fn reset_password(&self, username: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let hash = generate_secret_hash(new_password)?;
        if !PimUser::update_hash(username, &hash, &self.connection)? {
            return Err(Error::UserNotFound);
        }
        warn!("Password of user {username} was reset");
        Ok(())
    }

    /// Deletes the account and every session it holds.
    pub fn delete_user(&self, username: &str, password: &str) -> Result<()> {
        let user = self.authenticate(username, password)?;

        if !user.delete(&self.connection)? {
            return Err(Error::InvalidCredentials);
        }
        info!("Deleted user {} ({})", user.username, user.id);
        Ok(())
    }

    pub fn get_user(&self, username: &str) -> Result<PimUserApi> {
        PimUser::fetch_by_username(username, &self.connection)?
            .map(PimUserApi::from)
            .ok_or(Error::UserNotFound)
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<PimUser> {
        match PimUser::fetch_by_username(username, &self.connection)? {
            Some(user) if is_secret_valid(password, &user.hash) => Ok(user),
            Some(_) => Err(Error::InvalidCredentials),
            None => {
                let _ = is_secret_valid(password, &DUMMY_HASH);
                Err(Error::InvalidCredentials)
            }
        }
    }
}
