//! Swept terrain sampling.
//!
//! Fast projectiles must not tunnel through thin geometry, so terrain is
//! sampled along the interpolated path between two positions rather than at
//! the endpoint alone.

use glam::DVec3;
use voxelstrike_world::TerrainSampler;

/// Sample terrain along `from -> to` at roughly `spacing` world units.
///
/// Returns the first sample point whose cell is non-passable (solid: not air,
/// not water), or `None` if the whole path is clear. The endpoint is always
/// sampled.
pub fn sweep_terrain(
    terrain: &TerrainSampler,
    from: DVec3,
    to: DVec3,
    spacing: f64,
) -> Option<DVec3> {
    debug_assert!(spacing > 0.0);
    let delta = to - from;
    let distance = delta.length();
    if distance <= f64::EPSILON {
        return terrain.classify(to.x, to.y, to.z).is_solid().then_some(to);
    }

    let dir = delta / distance;
    let steps = (distance / spacing).ceil() as usize;
    for i in 1..=steps {
        let travelled = (i as f64 * spacing).min(distance);
        let point = from + dir * travelled;
        if terrain.classify(point.x, point.y, point.z).is_solid() {
            return Some(point);
        }
    }
    None
}
