//! Particle (note) models.

pub mod pim_particle;
