//! Particle store.
//!
//! Every query is scoped to the owning user, so a particle id on its own
//! never grants access to someone else's note.

use crate::prelude::*;
use crate::{db::connection::DbConnection, schema::particles::dsl::*};
use diesel::prelude::*;

/// A user-owned note.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::particles)]
#[diesel(primary_key(article_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PimParticle {
    pub article_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub views: i32,
}

/// Data for creating a particle.
#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::particles)]
pub struct PimParticleCreate {
    pub user_id: i32,
    pub title: String,
    pub content: String,
}

/// Set of optional field updates applied to a particle.
///
/// Fields left as `None` are not touched. The statement is always the same
/// parameterized `UPDATE`; only the bound columns vary.
#[derive(AsChangeset, Default, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::particles)]
pub struct PimParticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PimParticleUpdate {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl PimParticleCreate {
    pub fn new(owner: i32, new_title: impl Into<String>, new_content: impl Into<String>) -> Self {
        Self {
            user_id: owner,
            title: new_title.into(),
            content: new_content.into(),
        }
    }

    pub fn save(self, connection: &DbConnection) -> Result<PimParticle> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::insert_into(particles)
            .values(&self)
            .returning(PimParticle::as_returning())
            .get_result(conn)?)
    }
}

impl PimParticle {
    pub fn fetch_by_owner(owner: i32, connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(particles
            .filter(user_id.eq(owner))
            .order(article_id.asc())
            .select(PimParticle::as_select())
            .load(conn)?)
    }

    pub fn fetch_owned(owner: i32, target: i32, connection: &DbConnection) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(PimParticle::owned(owner, target)
            .select(PimParticle::as_select())
            .get_result(conn)
            .optional()?)
    }

    /// Substring search over title and content.
    ///
    /// `%`, `_` and `\` in `term` match literally.
    pub fn search(owner: i32, term: &str, connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;
        let pattern = format!("%{}%", escape_like(term));

        Ok(particles
            .filter(user_id.eq(owner))
            .filter(
                title
                    .like(&pattern)
                    .escape('\\')
                    .or(content.like(&pattern).escape('\\')),
            )
            .order(article_id.asc())
            .select(PimParticle::as_select())
            .load(conn)?)
    }

    /// Applies `changes` to an owned particle and returns the new row.
    pub fn update(
        owner: i32,
        target: i32,
        changes: &PimParticleUpdate,
        connection: &DbConnection,
    ) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::update(PimParticle::owned(owner, target))
            .set(changes)
            .returning(PimParticle::as_returning())
            .get_result(conn)
            .optional()?)
    }

    pub fn delete(owner: i32, target: i32, connection: &DbConnection) -> Result<bool> {
        let conn = &mut connection.pool.get()?;

        let deleted = diesel::delete(PimParticle::owned(owner, target)).execute(conn)?;
        Ok(deleted > 0)
    }

    /// Increments the view counter and returns the new count.
    pub fn add_view(owner: i32, target: i32, connection: &DbConnection) -> Result<Option<i32>> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::update(PimParticle::owned(owner, target))
            .set(views.eq(views + 1))
            .returning(views)
            .get_result(conn)
            .optional()?)
    }
}

impl PimParticle {
    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn owned(owner: i32, target: i32) -> _ {
        crate::schema::particles::dsl::particles
            .filter(user_id.eq(owner))
            .filter(article_id.eq(target))
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
