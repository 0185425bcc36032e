//! Particle (note) operations.
//!
//! All operations act on behalf of `owner`, the user of a validated session.
//! A particle that exists but belongs to someone else is reported exactly
//! like one that does not exist.

use pim_models::{
    db::connection::DbConnection,
    particle::pim_particle::{PimParticle, PimParticleCreate, PimParticleUpdate},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleApi {
    pub article_id: i32,
    pub title: String,
    pub content: String,
    pub views: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticlePost {
    pub title: String,
    pub content: String,
}

/// Fields to change on a particle; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleList {
    pub items: Vec<ParticleApi>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleViews {
    pub article_id: i32,
    pub views: i32,
}

impl From<PimParticle> for ParticleApi {
    fn from(value: PimParticle) -> Self {
        Self {
            article_id: value.article_id,
            title: value.title,
            content: value.content,
            views: value.views,
        }
    }
}

impl From<ParticlePatch> for PimParticleUpdate {
    fn from(value: ParticlePatch) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

impl From<Vec<PimParticle>> for ParticleList {
    fn from(value: Vec<PimParticle>) -> Self {
        let items: Vec<ParticleApi> = value.into_iter().map(ParticleApi::from).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}

pub fn create_particle(
    owner: i32,
    payload: ParticlePost,
    connection: &DbConnection,
) -> Result<ParticleApi> {
    let particle = PimParticleCreate::new(owner, payload.title, payload.content).save(connection)?;
    info!("User {owner} created particle {}", particle.article_id);
    Ok(particle.into())
}

pub fn list_particles(owner: i32, connection: &DbConnection) -> Result<ParticleList> {
    Ok(PimParticle::fetch_by_owner(owner, connection)?.into())
}

pub fn search_particles(owner: i32, term: &str, connection: &DbConnection) -> Result<ParticleList> {
    if term.is_empty() {
        return Err(Error::EmptySearchTerm);
    }
    Ok(PimParticle::search(owner, term, connection)?.into())
}

pub fn edit_particle(
    owner: i32,
    article_id: i32,
    patch: ParticlePatch,
    connection: &DbConnection,
) -> Result<ParticleApi> {
    let changes = PimParticleUpdate::from(patch);
    if changes.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    PimParticle::update(owner, article_id, &changes, connection)?
        .map(ParticleApi::from)
        .ok_or(Error::ParticleNotFound)
}

pub fn delete_particle(owner: i32, article_id: i32, connection: &DbConnection) -> Result<()> {
    if !PimParticle::delete(owner, article_id, connection)? {
        return Err(Error::ParticleNotFound);
    }
    info!("User {owner} deleted particle {article_id}");
    Ok(())
}

/// Counts one view of a particle and returns the updated total.
pub fn record_view(owner: i32, article_id: i32, connection: &DbConnection) -> Result<ParticleViews> {
    PimParticle::add_view(owner, article_id, connection)?
        .map(|views| ParticleViews { article_id, views })
        .ok_or(Error::ParticleNotFound)
}

pub fn fetch_particle(owner: i32, article_id: i32, connection: &DbConnection) -> Result<ParticleApi> {
    PimParticle::fetch_owned(owner, article_id, connection)?
        .map(ParticleApi::from)
        .ok_or(Error::ParticleNotFound)
}
