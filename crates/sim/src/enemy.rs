//! Enemy entity state and chase/attack behavior.
//!
//! Behavior is deterministic: wander decisions derive from the tick counter
//! and the enemy's own position, never ambient RNG, so identical sessions
//! stay identical.

use crate::combat::apply_damage;
use serde::{Deserialize, Serialize};
use voxelstrike_core::tuning::{
    ENEMY_ATTACK_COOLDOWN, ENEMY_ATTACK_RANGE, ENEMY_DAMAGE, ENEMY_DETECTION_RANGE, ENEMY_HEALTH,
    ENEMY_SPEED,
};
use voxelstrike_core::{EntityId, EntitySnapshot, PlayerInput};
use voxelstrike_physics::{step_body, Body};
use voxelstrike_world::TerrainSampler;

/// Horizontal impulse applied when an enemy is shot.
pub const KNOCKBACK_STRENGTH: f64 = 6.0;

/// Small hop applied with knockback.
pub const KNOCKBACK_LIFT: f64 = 3.0;

/// Behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Standing still.
    Idle,
    /// Walking in a tick-derived direction.
    Wandering,
    /// Closing on a detected player.
    Chasing,
    /// In melee range.
    Attacking,
}

/// A melee attack produced by an enemy update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyAttack {
    /// Enemy landing the attack.
    pub attacker: EntityId,
    /// Player being struck.
    pub target: EntityId,
    /// Damage dealt.
    pub damage: f32,
}

/// A hostile entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Entity identifier.
    pub id: EntityId,
    /// Kinematic state.
    pub body: Body,
    /// Current health.
    pub health: f32,
    /// Alive flag.
    pub alive: bool,
    /// Behavior state.
    pub state: EnemyState,
    ai_timer: u32,
    wander_yaw: f64,
    next_attack_at: f64,
}

impl Enemy {
    /// Spawn an enemy at a position (eye height).
    pub fn spawn(id: EntityId, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            body: Body::at(x, y, z),
            health: ENEMY_HEALTH,
            alive: true,
            state: EnemyState::Idle,
            ai_timer: 0,
            wander_yaw: 0.0,
            next_attack_at: 0.0,
        }
    }

    /// Apply damage; returns whether this killed the enemy.
    pub fn damage(&mut self, amount: f32) -> bool {
        apply_damage(&mut self.health, &mut self.alive, amount)
    }

    /// Shove the enemy away from a damage source.
    pub fn apply_knockback(&mut self, dx: f64, dz: f64, strength: f64) {
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > 0.0 {
            self.body.vel_x = (dx / dist) * strength;
            self.body.vel_z = (dz / dist) * strength;
            self.body.vel_y = KNOCKBACK_LIFT;
            self.body.grounded = false;
        }
    }

    /// Advance the enemy one tick.
    ///
    /// `target` is the nearest live player, if any. Returns a melee attack
    /// when one lands this tick.
    pub fn update(
        &mut self,
        terrain: &TerrainSampler,
        target: Option<(EntityId, f64, f64, f64)>,
        tick: u64,
        now: f64,
        dt: f64,
    ) -> Option<EnemyAttack> {
        if !self.alive {
            return None;
        }

        let mut input = PlayerInput::idle();
        input.yaw = self.body.yaw;
        let mut attack = None;

        let engaged = match target {
            Some((target_id, tx, ty, tz)) => {
                let distance = self.body.distance_to(tx, ty, tz);
                if distance <= ENEMY_ATTACK_RANGE {
                    self.state = EnemyState::Attacking;
                    self.ai_timer = 0;
                    input.yaw = (tx - self.body.x).atan2(tz - self.body.z);
                    if now >= self.next_attack_at {
                        self.next_attack_at = now + ENEMY_ATTACK_COOLDOWN;
                        attack = Some(EnemyAttack {
                            attacker: self.id,
                            target: target_id,
                            damage: ENEMY_DAMAGE,
                        });
                    }
                    true
                } else if distance <= ENEMY_DETECTION_RANGE {
                    self.state = EnemyState::Chasing;
                    self.ai_timer = 0;
                    input.yaw = (tx - self.body.x).atan2(tz - self.body.z);
                    input.forward = true;
                    true
                } else {
                    false
                }
            }
            None => false,
        };

        if !engaged {
            match self.state {
                EnemyState::Chasing | EnemyState::Attacking => {
                    self.state = EnemyState::Idle;
                    self.ai_timer = 0;
                }
                EnemyState::Idle => {
                    let idle_duration = 40 + ((tick + self.body.x.abs() as u64) % 40);
                    if u64::from(self.ai_timer) >= idle_duration {
                        self.state = EnemyState::Wandering;
                        self.ai_timer = 0;
                        let angle = ((tick
                            + self.body.x.abs() as u64
                            + self.body.z.abs() as u64)
                            % 360) as f64;
                        self.wander_yaw = angle.to_radians();
                    }
                }
                EnemyState::Wandering => {
                    let wander_duration = 20 + ((tick + self.body.z.abs() as u64) % 40);
                    if u64::from(self.ai_timer) >= wander_duration {
                        self.state = EnemyState::Idle;
                        self.ai_timer = 0;
                    } else {
                        input.yaw = self.wander_yaw;
                        input.forward = true;
                    }
                }
            }
            self.ai_timer += 1;
        }

        step_body(terrain, &mut self.body, &input, ENEMY_SPEED, dt);
        attack
    }

    /// Observer-facing copy of this enemy.
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
            input_sequence: 0,
        }
    }
}
