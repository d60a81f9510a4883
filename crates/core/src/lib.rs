#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod events;
pub mod input;
pub mod snapshot;
pub mod tuning;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use events::{HitEvent, SimEvent};
pub use input::{PlayerInput, ShotRequest};
pub use snapshot::{EntitySnapshot, ProjectileSnapshot, TickSnapshot};

/// Entity identifier (players, enemies). Assigned by the session, never reused.
pub type EntityId = u64;

/// Fixed tick type (30 TPS => ~33 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Helper to derive a reproducible RNG scoped to a world seed and entity.
///
/// Spawn-point selection and other per-entity randomness must go through this
/// so two sessions with the same seed place entities identically.
pub fn scoped_rng(world_seed: u64, entity_id: EntityId) -> StdRng {
    let seed = world_seed ^ entity_id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed)
}
