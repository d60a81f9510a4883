//! Deterministic spawn-point selection.

use rand::Rng;
use voxelstrike_core::tuning::PLAYER_HEIGHT;
use voxelstrike_core::{scoped_rng, EntityId};
use voxelstrike_world::{TerrainSampler, WATER_LEVEL};

/// Half-width of the square spawn region around the origin.
const SPAWN_RADIUS: f64 = 40.0;

/// Candidate columns examined before settling for a wet spawn.
const SPAWN_ATTEMPTS: u32 = 32;

/// Pick a spawn position for an entity.
///
/// Derived from the world seed and the entity id through the scoped RNG, so
/// every session places the same entity at the same point. Prefers dry,
/// treeless land; if no candidate qualifies the last one is used regardless.
pub fn spawn_point(terrain: &TerrainSampler, entity_id: EntityId) -> (f64, f64, f64) {
    let mut rng = scoped_rng(terrain.seed() as u64, entity_id);

    let mut x = 0.0;
    let mut z = 0.0;
    for _ in 0..SPAWN_ATTEMPTS {
        x = rng.gen_range(-SPAWN_RADIUS..SPAWN_RADIUS);
        z = rng.gen_range(-SPAWN_RADIUS..SPAWN_RADIUS);
        if terrain.surface_height(x, z) > WATER_LEVEL && !terrain.tree_at(x, z) {
            break;
        }
    }

    let y = terrain.surface_height_at(x, z) as f64 + PLAYER_HEIGHT;
    (x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelstrike_core::tuning::WORLD_SEED;

    #[test]
    fn test_spawn_is_deterministic() {
        let terrain = TerrainSampler::new(WORLD_SEED);
        assert_eq!(spawn_point(&terrain, 5), spawn_point(&terrain, 5));
    }

    #[test]
    fn test_different_entities_spawn_apart() {
        let terrain = TerrainSampler::new(WORLD_SEED);
        let a = spawn_point(&terrain, 1);
        let b = spawn_point(&terrain, 2);
        assert_ne!((a.0, a.2), (b.0, b.2));
    }

    #[test]
    fn test_spawn_rests_on_surface() {
        let terrain = TerrainSampler::new(WORLD_SEED);
        for id in 1..20 {
            let (x, y, z) = spawn_point(&terrain, id);
            assert_eq!(y, terrain.surface_height_at(x, z) as f64 + PLAYER_HEIGHT);
        }
    }
}
