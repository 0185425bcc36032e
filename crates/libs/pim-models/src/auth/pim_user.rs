//! Credential store.

use crate::prelude::*;
use crate::{db::connection::DbConnection, schema::auth::dsl::*};
use diesel::prelude::*;

/// A registered user as stored in the `auth` table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::auth)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PimUser {
    /// Unique user ID.
    pub id: i32,
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Password hash in PHC string format.
    #[diesel(column_name = password)]
    pub hash: String,
}

/// Data for registering a user.
#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::auth)]
pub struct PimUserCreate {
    pub username: String,
    #[diesel(column_name = password)]
    pub hash: String,
}

impl PimUserCreate {
    pub fn new(name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: name.into(),
            hash: password_hash.into(),
        }
    }

    /// Inserts the user.
    ///
    /// A taken username surfaces as a unique violation from the store; see
    /// [`Error::is_unique_violation`].
    pub fn save(self, connection: &DbConnection) -> Result<PimUser> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::insert_into(auth)
            .values(&self)
            .returning(PimUser::as_returning())
            .get_result(conn)?)
    }
}

impl PimUser {
    pub fn fetch_by_id(target: i32, connection: &DbConnection) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(PimUser::by_id(target)
            .select(PimUser::as_select())
            .get_result(conn)
            .optional()?)
    }

    pub fn fetch_by_username(target: &str, connection: &DbConnection) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(PimUser::by_username(target)
            .select(PimUser::as_select())
            .get_result(conn)
            .optional()?)
    }

    /// Replaces the stored hash of the user named `target`.
    ///
    /// Returns `false` when no such user exists.
    pub fn update_hash(target: &str, new_hash: &str, connection: &DbConnection) -> Result<bool> {
        let conn = &mut connection.pool.get()?;

        let updated = diesel::update(PimUser::by_username(target))
            .set(password.eq(new_hash))
            .execute(conn)?;
        Ok(updated > 0)
    }

    /// Replaces the stored hash of the user with id `target`.
    ///
    /// Returns `false` when that user no longer exists, even if the same
    /// username has since been registered again.
    pub fn update_hash_by_id(
        target: i32,
        new_hash: &str,
        connection: &DbConnection,
    ) -> Result<bool> {
        let conn = &mut connection.pool.get()?;

        let updated = diesel::update(PimUser::by_id(target))
            .set(password.eq(new_hash))
            .execute(conn)?;
        Ok(updated > 0)
    }

    /// Deletes this user together with all of their sessions.
    ///
    /// Returns `false` when the row was already gone.
    pub fn delete(&self, connection: &DbConnection) -> Result<bool> {
        use crate::schema::sessions;

        let conn = &mut connection.pool.get()?;
        conn.immediate_transaction(|conn| {
            diesel::delete(sessions::table.filter(sessions::user_id.eq(self.id)))
                .execute(conn)?;
            let deleted = diesel::delete(PimUser::by_id(self.id)).execute(conn)?;
            Ok(deleted > 0)
        })
    }
}

impl PimUser {
    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_id(target: i32) -> _ {
        crate::schema::auth::dsl::auth.filter(id.eq(target))
    }

    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_username(target: &str) -> _ {
        crate::schema::auth::dsl::auth.filter(username.eq(target))
    }
}
