//! Projectile ballistics and the slot arena.
//!
//! Projectiles live in an arena of preallocated slots with a free-list.
//! Slots are reused, but a reused slot carries a bumped generation: once a
//! projectile goes inactive it is never reactivated, only replaced by a
//! fresh logical instance under a new id.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::trace;
use voxelstrike_core::tuning::{
    BOUNCE_DAMPENING, BULLET_GRAVITY, BULLET_LIFETIME, BULLET_SPEED, DESPAWN_MARGIN, HIT_RADIUS,
    MAX_BOUNCES, RIFLE_DAMAGE, SWEEP_SPACING, WORLD_HEIGHT,
};
use voxelstrike_core::{EntityId, ProjectileSnapshot};
use voxelstrike_physics::sweep_terrain;
use voxelstrike_world::TerrainSampler;

/// Stable projectile identifier: slot index plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    fn new(slot: u32, generation: u32) -> Self {
        Self((u64::from(generation) << 32) | u64::from(slot))
    }

    /// Arena slot index.
    pub fn slot(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }

    /// Slot generation at creation time.
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw id for wire records.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// An entity position a projectile can hit this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Entity identifier.
    pub id: EntityId,
    /// World X.
    pub x: f64,
    /// World Y.
    pub y: f64,
    /// World Z.
    pub z: f64,
}

/// An entity struck by a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitContact {
    /// Entity that was struck.
    pub target: EntityId,
    /// Impact X.
    pub x: f64,
    /// Impact Y.
    pub y: f64,
    /// Impact Z.
    pub z: f64,
}

/// A bullet in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Stable identifier.
    pub id: ProjectileId,
    /// Entity that fired this bullet; excluded from its own hits.
    pub owner: EntityId,
    /// Previous world X (for the per-tick collision sweep).
    pub prev_x: f64,
    /// Previous world Y.
    pub prev_y: f64,
    /// Previous world Z.
    pub prev_z: f64,
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
    /// Damage dealt on hit.
    pub damage: f32,
    /// Seconds of lifetime remaining.
    pub life: f64,
    /// Terrain impacts absorbed so far.
    pub bounces: u32,
    /// Whether the projectile is live.
    pub active: bool,
}

impl Projectile {
    fn new(id: ProjectileId, owner: EntityId, origin: DVec3, direction: DVec3) -> Self {
        let velocity = direction * BULLET_SPEED;
        Self {
            id,
            owner,
            prev_x: origin.x,
            prev_y: origin.y,
            prev_z: origin.z,
            x: origin.x,
            y: origin.y,
            z: origin.z,
            vel_x: velocity.x,
            vel_y: velocity.y,
            vel_z: velocity.z,
            damage: RIFLE_DAMAGE,
            life: BULLET_LIFETIME,
            bounces: 0,
            active: true,
        }
    }

    /// Advance one tick.
    ///
    /// Order: gravity and integration, swept terrain collision (bounce or
    /// deactivate), bounds check, lifetime, entity hit test. Returns the
    /// struck entity when one was hit; callers read `active` afterwards to
    /// evict dead projectiles.
    pub fn step(
        &mut self,
        terrain: &TerrainSampler,
        dt: f64,
        targets: &[Target],
    ) -> Option<HitContact> {
        if !self.active {
            return None;
        }

        self.prev_x = self.x;
        self.prev_y = self.y;
        self.prev_z = self.z;

        self.vel_y += BULLET_GRAVITY * dt;
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.z += self.vel_z * dt;

        // Sample the interpolated path, not just the endpoint: a fast bullet
        // must not tunnel through thin geometry.
        let from = DVec3::new(self.prev_x, self.prev_y, self.prev_z);
        let to = DVec3::new(self.x, self.y, self.z);
        if let Some(impact) = sweep_terrain(terrain, from, to, SWEEP_SPACING) {
            if self.bounces < MAX_BOUNCES {
                self.bounces += 1;
                self.vel_y = -self.vel_y * BOUNCE_DAMPENING;
                self.x = impact.x;
                self.z = impact.z;
                self.y = terrain.surface_height_at(impact.x, impact.z) as f64;
                trace!(id = self.id.raw(), bounces = self.bounces, "bullet bounce");
            } else {
                self.active = false;
                return None;
            }
        }

        if self.y > WORLD_HEIGHT + DESPAWN_MARGIN {
            self.active = false;
            return None;
        }

        self.life -= dt;
        if self.life <= 0.0 {
            self.active = false;
            return None;
        }

        for target in targets {
            if target.id == self.owner {
                continue;
            }
            let dx = self.x - target.x;
            let dy = self.y - target.y;
            let dz = self.z - target.z;
            if (dx * dx + dy * dy + dz * dz).sqrt() < HIT_RADIUS {
                self.active = false;
                return Some(HitContact {
                    target: target.id,
                    x: self.x,
                    y: self.y,
                    z: self.z,
                });
            }
        }

        None
    }

    /// Observer-facing copy of this projectile.
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id.raw(),
            x: self.x,
            y: self.y,
            z: self.z,
            vel_x: self.vel_x,
            vel_y: self.vel_y,
            vel_z: self.vel_z,
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    projectile: Option<Projectile>,
}

/// Arena of projectile slots with a free-list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectilePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ProjectilePool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a bullet; reuses a free slot when one exists.
    pub fn spawn(&mut self, owner: EntityId, origin: DVec3, direction: DVec3) -> ProjectileId {
        if let Some(slot_index) = self.free.pop() {
            let slot = &mut self.slots[slot_index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            let id = ProjectileId::new(slot_index, slot.generation);
            slot.projectile = Some(Projectile::new(id, owner, origin, direction));
            id
        } else {
            let slot_index = self.slots.len() as u32;
            let id = ProjectileId::new(slot_index, 0);
            self.slots.push(Slot {
                generation: 0,
                projectile: Some(Projectile::new(id, owner, origin, direction)),
            });
            id
        }
    }

    /// Look up a live projectile; stale ids (reused slots) resolve to None.
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        let slot = self.slots.get(id.slot() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.projectile.as_ref()
    }

    /// Step every live projectile in slot order, retiring the ones that went
    /// inactive. `on_hit` receives each entity contact as it happens.
    pub fn step_all<F>(
        &mut self,
        terrain: &TerrainSampler,
        dt: f64,
        targets: &[Target],
        mut on_hit: F,
    ) where
        F: FnMut(&Projectile, HitContact),
    {
        for slot_index in 0..self.slots.len() {
            let slot = &mut self.slots[slot_index];
            let Some(projectile) = slot.projectile.as_mut() else {
                continue;
            };

            let contact = projectile.step(terrain, dt, targets);
            if let Some(contact) = contact {
                on_hit(projectile, contact);
            }
            if !projectile.active {
                slot.projectile = None;
                self.free.push(slot_index as u32);
            }
        }
    }

    /// Live projectiles in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter_map(|slot| slot.projectile.as_ref())
    }

    /// Number of live projectiles.
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Total slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
