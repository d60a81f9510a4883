//! The unified entity registry value: players and enemies are siblings
//! keyed by the same identifier space.

use crate::enemy::Enemy;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use voxelstrike_core::{EntityId, EntitySnapshot};
use voxelstrike_physics::Body;

/// A registered combat participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    /// A connected player.
    Player(Player),
    /// A hostile entity.
    Enemy(Enemy),
}

impl Entity {
    /// Entity identifier.
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Player(p) => p.id,
            Entity::Enemy(e) => e.id,
        }
    }

    /// Kinematic state.
    pub fn body(&self) -> &Body {
        match self {
            Entity::Player(p) => &p.body,
            Entity::Enemy(e) => &e.body,
        }
    }

    /// Current health.
    pub fn health(&self) -> f32 {
        match self {
            Entity::Player(p) => p.health,
            Entity::Enemy(e) => e.health,
        }
    }

    /// Whether the entity is alive.
    pub fn alive(&self) -> bool {
        match self {
            Entity::Player(p) => p.alive,
            Entity::Enemy(e) => e.alive,
        }
    }

    /// Apply damage; returns whether this killed the entity.
    pub fn damage(&mut self, amount: f32) -> bool {
        match self {
            Entity::Player(p) => p.damage(amount),
            Entity::Enemy(e) => e.damage(amount),
        }
    }

    /// Observer-facing copy.
    pub fn snapshot(&self) -> EntitySnapshot {
        match self {
            Entity::Player(p) => p.snapshot(),
            Entity::Enemy(e) => e.snapshot(),
        }
    }

    /// Player view, if this entity is one.
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(p) => Some(p),
            Entity::Enemy(_) => None,
        }
    }

    /// Mutable player view, if this entity is one.
    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(p) => Some(p),
            Entity::Enemy(_) => None,
        }
    }
}
