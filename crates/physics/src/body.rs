//! Kinematic body state and the per-tick movement integrator.

use crate::Aabb;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use voxelstrike_core::tuning::{
    GRAVITY, GROUND_FRICTION, IDLE_DAMPING, JUMP_VELOCITY, PLAYER_HEIGHT,
};
use voxelstrike_core::PlayerInput;
use voxelstrike_world::TerrainSampler;

/// Half-width of an entity's collision footprint.
pub const BODY_RADIUS: f64 = 0.4;

/// Ledge height an entity walks up without jumping.
pub const STEP_HEIGHT: f64 = 1.05;

/// Kinematic state shared by players and enemies.
///
/// `y` is eye height: a grounded body satisfies
/// `y == surface_height_at(x, z) + PLAYER_HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World X.
    pub x: f64,
    /// World Y (eye height).
    pub y: f64,
    /// World Z.
    pub z: f64,
    /// Velocity X.
    pub vel_x: f64,
    /// Velocity Y.
    pub vel_y: f64,
    /// Velocity Z.
    pub vel_z: f64,
    /// Heading around the vertical axis (radians).
    pub yaw: f64,
    /// Look elevation (radians).
    pub pitch: f64,
    /// Whether the body rests on terrain.
    pub grounded: bool,
}

impl Body {
    /// Body at rest at a position.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            vel_x: 0.0,
            vel_y: 0.0,
            vel_z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            grounded: false,
        }
    }

    /// Position as a vector.
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Collision box for the body.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            DVec3::new(self.x - BODY_RADIUS, self.y - PLAYER_HEIGHT, self.z - BODY_RADIUS),
            DVec3::new(self.x + BODY_RADIUS, self.y, self.z + BODY_RADIUS),
        )
    }

    /// Horizontal speed.
    pub fn horizontal_speed(&self) -> f64 {
        (self.vel_x * self.vel_x + self.vel_z * self.vel_z).sqrt()
    }

    /// Euclidean distance to a point.
    pub fn distance_to(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        let dz = self.z - z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Whether a body centered at (x, eye_y, z) overlaps solid terrain.
///
/// Probes the footprint corners from just above step height to eye level, so
/// single-block ledges stay walkable while taller walls block.
pub fn body_collides(terrain: &TerrainSampler, x: f64, eye_y: f64, z: f64) -> bool {
    let feet = eye_y - PLAYER_HEIGHT;
    let aabb = Aabb::new(
        DVec3::new(x - BODY_RADIUS, feet, z - BODY_RADIUS),
        DVec3::new(x + BODY_RADIUS, eye_y, z + BODY_RADIUS),
    );

    for (cx, cz) in aabb.footprint_corners() {
        let mut probe = feet + STEP_HEIGHT;
        while probe < eye_y {
            if terrain.classify(cx, probe, cz).is_solid() {
                return true;
            }
            probe += 1.0;
        }
        if terrain.classify(cx, eye_y, cz).is_solid() {
            return true;
        }
    }
    false
}

/// Advance a body one tick.
///
/// Executed in a fixed order every tick: jump gate, gravity, input-driven
/// horizontal velocity, axis-separated integration against terrain, ground
/// snap, friction. `max_speed` is the horizontal cap for this entity
/// (players and enemies share the integrator). Never fails; out-of-range
/// values clamp.
pub fn step_body(
    terrain: &TerrainSampler,
    body: &mut Body,
    input: &PlayerInput,
    max_speed: f64,
    dt: f64,
) {
    body.yaw = input.yaw;
    body.pitch = input.pitch;

    // Jump is edge-triggered: only honored while grounded this tick.
    if input.jump && body.grounded {
        body.vel_y = JUMP_VELOCITY;
        body.grounded = false;
    }

    body.vel_y += GRAVITY * dt;

    if input.has_move() {
        // Project movement keys onto the heading; normalize so diagonal
        // input does not exceed the speed cap.
        let forward = DVec3::new(body.yaw.sin(), 0.0, body.yaw.cos());
        let right = DVec3::new(forward.z, 0.0, -forward.x);

        let mut dir = DVec3::ZERO;
        if input.forward {
            dir += forward;
        }
        if input.backward {
            dir -= forward;
        }
        if input.right {
            dir += right;
        }
        if input.left {
            dir -= right;
        }

        if dir.length_squared() > 0.0 {
            let dir = dir.normalize();
            body.vel_x = dir.x * max_speed;
            body.vel_z = dir.z * max_speed;
        }
    } else {
        // Damp toward zero instead of resetting; an instant stop reads as a
        // velocity discontinuity on the client.
        body.vel_x -= body.vel_x * IDLE_DAMPING * dt;
        body.vel_z -= body.vel_z * IDLE_DAMPING * dt;
    }

    // Horizontal integration: combined move first, then axis-separated
    // sliding along whichever axes stay clear.
    let new_x = body.x + body.vel_x * dt;
    let new_z = body.z + body.vel_z * dt;

    if !body_collides(terrain, new_x, body.y, new_z) {
        body.x = new_x;
        body.z = new_z;
    } else {
        if !body_collides(terrain, new_x, body.y, body.z) {
            body.x = new_x;
        } else {
            body.vel_x = 0.0;
        }
        if !body_collides(terrain, body.x, body.y, new_z) {
            body.z = new_z;
        } else {
            body.vel_z = 0.0;
        }
    }

    // Vertical integration and ground snap.
    body.y += body.vel_y * dt;
    let ground = terrain.surface_height_at(body.x, body.z) as f64 + PLAYER_HEIGHT;
    if body.y <= ground {
        body.y = ground;
        body.vel_y = 0.0;
        body.grounded = true;
    } else {
        body.grounded = false;
    }

    if body.grounded {
        body.vel_x *= GROUND_FRICTION;
        body.vel_z *= GROUND_FRICTION;
    }
}
