//! Post-tick snapshot records exposed to observers.
//!
//! Observers (rendering, network broadcast) read these copies; they never
//! touch live entities or projectiles.

use crate::{EntityId, SimTick};
use serde::{Deserialize, Serialize};

/// Observer-facing copy of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity identifier.
    pub id: EntityId,
    /// World X.
    pub x: f64,
    /// World Y.
    pub y: f64,
    /// World Z.
    pub z: f64,
    /// Heading (radians).
    pub yaw: f64,
    /// Look elevation (radians).
    pub pitch: f64,
    /// Velocity X.
    pub vel_x: f64,
    /// Velocity Y.
    pub vel_y: f64,
    /// Velocity Z.
    pub vel_z: f64,
    /// Current health.
    pub health: f32,
    /// Whether the entity is alive.
    pub alive: bool,
    /// Last input sequence applied, for client reconciliation.
    pub input_sequence: u32,
}

/// Observer-facing copy of one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Stable projectile identifier (slot + generation).
    pub id: u64,
    /// World X.
    pub x: f64,
    /// World Y.
    pub y: f64,
    /// World Z.
    pub z: f64,
    /// Velocity X.
    pub vel_x: f64,
    /// Velocity Y.
    pub vel_y: f64,
    /// Velocity Z.
    pub vel_z: f64,
    /// Whether the projectile is still live.
    pub active: bool,
}

/// Consistent post-tick snapshot of the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// Tick this snapshot was taken after.
    pub tick: SimTick,
    /// All registered entities, in id order.
    pub entities: Vec<EntitySnapshot>,
    /// All live projectiles, in slot order.
    pub projectiles: Vec<ProjectileSnapshot>,
}
