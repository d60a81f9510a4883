//! Events emitted by the simulation and consumed by observers.

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// A projectile struck an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Entity that was hit.
    pub target: EntityId,
    /// Entity that fired the projectile.
    pub shooter: EntityId,
    /// Damage applied.
    pub damage: f32,
    /// Impact X.
    pub x: f64,
    /// Impact Y.
    pub y: f64,
    /// Impact Z.
    pub z: f64,
    /// Whether the hit reduced the target to zero health.
    pub killed: bool,
}

/// Simulation event stream, drained by observers once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// An entity entered the registry.
    Joined {
        /// The new entity.
        id: EntityId,
    },
    /// An entity left the registry.
    Left {
        /// The departed entity.
        id: EntityId,
    },
    /// A projectile hit an entity.
    Hit(HitEvent),
    /// A shot was accepted and a projectile spawned.
    Shot {
        /// Shooter.
        shooter: EntityId,
        /// Muzzle origin X.
        x: f64,
        /// Muzzle origin Y.
        y: f64,
        /// Muzzle origin Z.
        z: f64,
        /// Initial velocity X.
        vel_x: f64,
        /// Initial velocity Y.
        vel_y: f64,
        /// Initial velocity Z.
        vel_z: f64,
    },
    /// A reload was accepted.
    Reloaded {
        /// Reloading entity.
        id: EntityId,
        /// Clip contents after the reload.
        ammo: u32,
        /// Reserve remaining after the reload.
        reserve: u32,
    },
}
