//! Swarm simulation engine: particles flocking and gathering resources on a
//! periodic 2-D arena.
//!
//! The engine is split into two layers:
//!
//! - [`core`] - the geometry kernel ([`Vec2`])
//! - [`engine`] - behavior configuration, particles, resources, and the
//!   [`World`] that drives synchronized tick updates
//!
//! A simulation is fully determined by a [`SimConfig`] snapshot, the two team
//! [`Genotype`]s, and a [`WorldSeed`]; ticking the world never consults any
//! process-global state.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Errors raised while evaluating a particle's movement behavior.
///
/// These indicate a misconfigured genotype, not a transient condition; a run
/// that raises one is failed rather than scored.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SimulationError {
    /// A `seek`/`homing` component was evaluated while the particle had no
    /// target set.
    #[display("{kind} component requires a target, but none is set")]
    MissingTarget { kind: ComponentKind },
    /// A neighbor-driven component was configured with an unbounded radius.
    #[display("{kind} component requires a finite radius")]
    UnboundedRadius { kind: ComponentKind },
}
