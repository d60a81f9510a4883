//! Player entity state.

use crate::combat::{apply_damage, Weapon};
use serde::{Deserialize, Serialize};
use voxelstrike_core::tuning::{DROWN_DAMAGE, DROWN_INTERVAL, MAX_HEALTH, PLAYER_SPEED};
use voxelstrike_core::{EntityId, EntitySnapshot, PlayerInput};
use voxelstrike_physics::{step_body, Body};
use voxelstrike_world::TerrainSampler;

/// A connected player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Entity identifier.
    pub id: EntityId,
    /// Kinematic state.
    pub body: Body,
    /// Current health, clamped to [0, MAX_HEALTH].
    pub health: f32,
    /// Alive flag; cleared exactly when health reaches zero.
    pub alive: bool,
    /// Weapon state.
    pub weapon: Weapon,
    /// Latest accepted input, applied every tick until replaced.
    pub input: PlayerInput,
    /// Sequence number of the latest accepted input.
    pub input_sequence: u32,
    submerged: bool,
    next_drown_at: f64,
}

impl Player {
    /// Spawn a player at a position (eye height).
    pub fn spawn(id: EntityId, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            body: Body::at(x, y, z),
            health: MAX_HEALTH,
            alive: true,
            weapon: Weapon::new(),
            input: PlayerInput::idle(),
            input_sequence: 0,
            submerged: false,
            next_drown_at: 0.0,
        }
    }

    /// Accept a new input record; stale sequence numbers are ignored.
    pub fn apply_input(&mut self, input: PlayerInput) {
        if self.input_sequence != 0 && input.sequence <= self.input_sequence {
            return;
        }
        self.input_sequence = input.sequence;
        self.input = input;
    }

    /// Apply damage; returns whether this killed the player.
    pub fn damage(&mut self, amount: f32) -> bool {
        apply_damage(&mut self.health, &mut self.alive, amount)
    }

    /// Advance the player one tick.
    pub fn step(&mut self, terrain: &TerrainSampler, dt: f64) {
        if !self.alive {
            return;
        }
        // Jump is edge-triggered: once consumed while grounded it must not
        // retrigger on landing from the same held input.
        let consumed_jump = self.input.jump && self.body.grounded;
        step_body(terrain, &mut self.body, &self.input, PLAYER_SPEED, dt);
        if consumed_jump {
            self.input.jump = false;
        }
    }

    /// Wall-clock drowning check; returns whether damage was applied.
    ///
    /// An entity whose eye cell is fluid takes periodic damage. The timer is
    /// re-validated against the current clock on every call, so drift in the
    /// tick cadence does not change the damage rate.
    pub fn update_drowning(&mut self, terrain: &TerrainSampler, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        let eye_cell = terrain.classify(self.body.x, self.body.y, self.body.z);
        if !eye_cell.is_fluid() {
            self.submerged = false;
            return false;
        }
        if !self.submerged {
            self.submerged = true;
            self.next_drown_at = now + DROWN_INTERVAL;
            return false;
        }
        if now >= self.next_drown_at {
            self.next_drown_at = now + DROWN_INTERVAL;
            self.damage(DROWN_DAMAGE);
            return true;
        }
        false
    }

    /// Observer-facing copy of this player.
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            x: self.body.x,
            y: self.body.y,
            z: self.body.z,
            yaw: self.body.yaw,
            pitch: self.body.pitch,
            vel_x: self.body.vel_x,
            vel_y: self.body.vel_y,
            vel_z: self.body.vel_z,
            health: self.health,
            alive: self.alive,
            input_sequence: self.input_sequence,
        }
    }
}
