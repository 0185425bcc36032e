//! Session store.
//!
//! Rows are keyed by the digest of the session token; the raw token never
//! reaches this table. Expired rows are left in place and filtered out on
//! every read.

use crate::prelude::*;
use crate::{db::connection::DbConnection, schema::sessions::dsl::*};
use diesel::prelude::*;

/// A persisted login session.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(primary_key(token))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PimSession {
    /// SHA-256 digest of the raw session token.
    pub token: String,
    /// Owner of the session.
    pub user_id: i32,
    /// Unix timestamp (seconds) after which the session is dead.
    pub expiry: i64,
}

/// Data for opening a session.
#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sessions)]
pub struct PimSessionCreate {
    pub token: String,
    pub user_id: i32,
    pub expiry: i64,
}

impl PimSessionCreate {
    pub fn new(digest: impl Into<String>, owner: i32, expires_at: i64) -> Self {
        Self {
            token: digest.into(),
            user_id: owner,
            expiry: expires_at,
        }
    }

    pub fn save(self, connection: &DbConnection) -> Result<PimSession> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::insert_into(sessions)
            .values(&self)
            .returning(PimSession::as_returning())
            .get_result(conn)?)
    }
}

impl PimSession {
    /// Fetches the session with this digest if it is still alive at `now`.
    pub fn fetch_live(digest: &str, now: i64, connection: &DbConnection) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(sessions
            .filter(token.eq(digest))
            .filter(expiry.gt(now))
            .select(PimSession::as_select())
            .get_result(conn)
            .optional()?)
    }

    /// Fetches every session row of a user, expired ones included.
    pub fn fetch_by_user(owner: i32, connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(sessions
            .filter(user_id.eq(owner))
            .select(PimSession::as_select())
            .load(conn)?)
    }
}
