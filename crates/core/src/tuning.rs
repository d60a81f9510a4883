//! Simulation tuning constants.
//!
//! Every number the client and server must agree on lives here. Terrain
//! thresholds live next to the terrain sampler in the world crate.

/// World seed both sides generate terrain from.
pub const WORLD_SEED: i64 = 42;

/// Vertical world extent; projectiles despawn above `WORLD_HEIGHT + DESPAWN_MARGIN`.
pub const WORLD_HEIGHT: f64 = 64.0;

/// Extra headroom above the world before a projectile is discarded.
pub const DESPAWN_MARGIN: f64 = 50.0;

/// Downward acceleration applied to entities (units/s^2).
pub const GRAVITY: f64 = -25.0;

/// Maximum horizontal speed from movement input (units/s).
pub const PLAYER_SPEED: f64 = 10.0;

/// Vertical velocity set by a jump.
pub const JUMP_VELOCITY: f64 = 9.0;

/// Eye height; entities rest at `surface_height + PLAYER_HEIGHT`.
pub const PLAYER_HEIGHT: f64 = 1.8;

/// Exponential damping factor for horizontal velocity with no input.
pub const IDLE_DAMPING: f64 = 10.0;

/// Horizontal velocity multiplier applied each tick while grounded.
pub const GROUND_FRICTION: f64 = 0.85;

/// Muzzle speed of a fired bullet (units/s).
pub const BULLET_SPEED: f64 = 50.0;

/// Downward acceleration applied to bullets (units/s^2).
pub const BULLET_GRAVITY: f64 = -9.8;

/// Terrain impacts a bullet survives before deactivating.
pub const MAX_BOUNCES: u32 = 3;

/// Vertical velocity retention on a bullet bounce.
pub const BOUNCE_DAMPENING: f64 = 0.4;

/// Seconds a bullet lives without hitting anything.
pub const BULLET_LIFETIME: f64 = 3.0;

/// Euclidean distance at which a bullet hits an entity.
pub const HIT_RADIUS: f64 = 1.0;

/// Step spacing for swept terrain sampling along a bullet path.
pub const SWEEP_SPACING: f64 = 0.75;

/// Maximum entity health.
pub const MAX_HEALTH: f32 = 100.0;

/// Damage dealt by the rifle per hit.
pub const RIFLE_DAMAGE: f32 = 25.0;

/// Minimum seconds between accepted shots.
pub const FIRE_INTERVAL: f64 = 0.12;

/// Rounds per clip.
pub const CLIP_SIZE: u32 = 30;

/// Starting reserve ammunition.
pub const RESERVE_AMMO: u32 = 90;

/// Seconds the weapon is fire-locked after a reload.
pub const RELOAD_TIME: f64 = 1.5;

/// Damage per drowning check while submerged.
pub const DROWN_DAMAGE: f32 = 5.0;

/// Seconds between drowning checks.
pub const DROWN_INTERVAL: f64 = 1.0;

/// Fixed simulation timestep (seconds). The driver never steps a partial dt.
pub const TICK_DT: f64 = 1.0 / 30.0;

/// Minimum seconds between accepted input records per client.
pub const INPUT_MIN_INTERVAL: f64 = 0.016;

/// Enemy maximum health.
pub const ENEMY_HEALTH: f32 = 50.0;

/// Damage dealt by an enemy melee attack.
pub const ENEMY_DAMAGE: f32 = 10.0;

/// Seconds between enemy attacks.
pub const ENEMY_ATTACK_COOLDOWN: f64 = 1.2;

/// Enemy movement speed while chasing (units/s).
pub const ENEMY_SPEED: f64 = 4.0;

/// Distance at which an enemy notices a live player.
pub const ENEMY_DETECTION_RANGE: f64 = 25.0;

/// Distance at which an enemy can land a melee attack.
pub const ENEMY_ATTACK_RANGE: f64 = 2.0;
