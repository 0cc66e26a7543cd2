//! Simulation state and mechanics.
//!
//! - [`SimConfig`] - immutable per-run configuration snapshot
//! - [`Genotype`] / [`MovementBehavior`] / [`VelocityComponent`] - the
//!   evolvable behavior parameter tree
//! - [`Particle`] - a flocking agent with a double-buffered kinematic state
//! - [`ResourceParticle`] - a stationary mineral deposit or home base
//! - [`World`] - the periodic arena driving compute-all-then-commit-all ticks
//! - [`WorldSeed`] - seed for deterministic world construction
//!
//! # Simulation Flow
//!
//! 1. Build a [`World`] from a config, two genotypes, and a seed
//! 2. Call [`World::tick`] once per discrete timestep
//! 3. Read team performance from the home base stashes
//!
//! Within a tick every particle plans its next position, velocity, and state
//! against the previous tick's committed snapshot; only once all particles
//! have planned are the new values committed.

pub use self::{
    behavior::*, config::*, particle::*, resource::*, seed::*, world::*,
};

mod behavior;
mod config;
mod particle;
mod resource;
mod seed;
mod world;
