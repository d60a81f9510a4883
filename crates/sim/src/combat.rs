//! Damage application and weapon cooldown gates.
//!
//! All combat timers are wall-clock-gated and re-validated against the
//! current clock on every attempted action, so they stay correct if the tick
//! cadence drifts. The clock domain is non-negative seconds since session
//! start.

use serde::{Deserialize, Serialize};
use voxelstrike_core::tuning::{CLIP_SIZE, FIRE_INTERVAL, RELOAD_TIME, RESERVE_AMMO};

/// Subtract `amount` from `health`, clamping at zero.
///
/// Returns `true` exactly once: when the damage brought a live entity to
/// zero. Further damage against a dead entity is a no-op.
pub fn apply_damage(health: &mut f32, alive: &mut bool, amount: f32) -> bool {
    if !*alive {
        return false;
    }
    *health = (*health - amount).max(0.0);
    if *health <= 0.0 {
        *health = 0.0;
        *alive = false;
        return true;
    }
    false
}

/// Clip + reserve state with fire-rate and reload gates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Rounds in the clip.
    pub ammo: u32,
    /// Rounds in reserve.
    pub reserve: u32,
    /// Clock time of the last accepted shot.
    pub last_shot_time: f64,
    /// The weapon is fire-locked until this clock time after a reload.
    pub reload_locked_until: f64,
}

impl Weapon {
    /// Full weapon at session start.
    pub fn new() -> Self {
        Self {
            ammo: CLIP_SIZE,
            reserve: RESERVE_AMMO,
            last_shot_time: -FIRE_INTERVAL,
            reload_locked_until: 0.0,
        }
    }

    /// Attempt a shot at clock time `now`.
    ///
    /// Accepted only if the fire interval has elapsed, no reload lockout is
    /// pending, and the clip is not empty. An empty clip is a normal
    /// rejected-action outcome, not an error.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if now < self.reload_locked_until {
            return false;
        }
        if now - self.last_shot_time < FIRE_INTERVAL {
            return false;
        }
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        self.last_shot_time = now;
        true
    }

    /// Attempt a reload at clock time `now`.
    ///
    /// Transfers `min(capacity deficit, reserve)` into the clip immediately
    /// and fire-locks the weapon for the reload duration. Rejected while
    /// already reloading, when the clip is full, or when the reserve is
    /// empty. Returns the new (clip, reserve) on success.
    pub fn try_reload(&mut self, now: f64) -> Option<(u32, u32)> {
        if now < self.reload_locked_until {
            return None;
        }
        if self.ammo >= CLIP_SIZE || self.reserve == 0 {
            return None;
        }
        let transfer = (CLIP_SIZE - self.ammo).min(self.reserve);
        self.ammo += transfer;
        self.reserve -= transfer;
        self.reload_locked_until = now + RELOAD_TIME;
        Some((self.ammo, self.reserve))
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new()
    }
}
