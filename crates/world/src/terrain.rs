//! Block classification from noise fields.
//!
//! `TerrainSampler` is a pure function of (seed, world coordinates): it is
//! queried, never mutated, and must answer identically on the client and the
//! server. Nothing here touches ambient RNG; tree decoration is derived from
//! a position hash so repeated queries always agree.

use crate::noise::NoiseGenerator;
use serde::{Deserialize, Serialize};

/// Base surface elevation; the height noise swings the surface around this.
pub const SURFACE_BASE: f64 = 20.0;

/// Amplitude of the surface height swing.
pub const SURFACE_VARIATION: f64 = 20.0;

/// Highest y at which water fills the column above the surface.
pub const WATER_LEVEL: i64 = 15;

/// Columns are air once y exceeds the surface by this margin.
pub const AIR_MARGIN: i64 = 10;

/// Depth of the dirt band under the surface block.
pub const DIRT_DEPTH: i64 = 3;

/// Everything at or below this y is stone regardless of the surface.
pub const DEEP_STONE_TOP: i64 = 5;

/// Trunk height of a decoration tree.
pub const TREE_HEIGHT: i64 = 4;

/// A column carries a tree when its position hash lands in this residue.
const TREE_DENSITY_MODULUS: u64 = 97;

/// Block classification for a world cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space.
    Air,
    /// Temperate surface block.
    Grass,
    /// Subsurface band under the surface block.
    Dirt,
    /// Bulk rock, and everything at bedrock depth.
    Stone,
    /// Fluid filling columns below the water level.
    Water,
    /// Hot, dry surface override.
    Sand,
    /// Cold surface override.
    Snow,
    /// Decoration trunk above a grass surface.
    Tree,
    /// Placed by structures; never produced by classification.
    Glass,
}

bitflags::bitflags! {
    /// Behavior flags per block type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BlockFlags: u8 {
        /// Stops entities and projectiles.
        const SOLID = 0b0000_0001;
        /// Fluid; passable, applies drowning.
        const FLUID = 0b0000_0010;
    }
}

impl BlockType {
    /// Behavior flags for this block type.
    pub fn flags(self) -> BlockFlags {
        match self {
            BlockType::Air => BlockFlags::empty(),
            BlockType::Water => BlockFlags::FLUID,
            BlockType::Grass
            | BlockType::Dirt
            | BlockType::Stone
            | BlockType::Sand
            | BlockType::Snow
            | BlockType::Tree
            | BlockType::Glass => BlockFlags::SOLID,
        }
    }

    /// Whether the block stops movement and projectiles.
    #[inline]
    pub fn is_solid(self) -> bool {
        self.flags().contains(BlockFlags::SOLID)
    }

    /// Whether the block is a fluid cell.
    #[inline]
    pub fn is_fluid(self) -> bool {
        self.flags().contains(BlockFlags::FLUID)
    }
}

/// Stateless classifier mapping world coordinates to block types.
pub struct TerrainSampler {
    noise: NoiseGenerator,
}

impl TerrainSampler {
    /// Create a sampler for `seed`.
    pub fn new(seed: i64) -> Self {
        Self {
            noise: NoiseGenerator::new(seed),
        }
    }

    /// Seed this sampler classifies for.
    pub fn seed(&self) -> i64 {
        self.noise.seed()
    }

    /// Height noise at a column: 4 octaves, persistence 0.5, scale 0.01.
    pub fn height_noise(&self, x: f64, z: f64) -> f64 {
        self.noise.octave_sample(x, z, 4, 0.5, 0.01)
    }

    /// Moisture noise at a column: 3 octaves, persistence 0.6, scale 0.02.
    pub fn moisture_noise(&self, x: f64, z: f64) -> f64 {
        self.noise.octave_sample(x, z, 3, 0.6, 0.02)
    }

    /// Temperature noise at a column: 2 octaves, persistence 0.4, scale 0.015.
    pub fn temperature_noise(&self, x: f64, z: f64) -> f64 {
        self.noise.octave_sample(x, z, 2, 0.4, 0.015)
    }

    /// Y of the topmost solid terrain block in a column.
    pub fn surface_height(&self, x: f64, z: f64) -> i64 {
        (SURFACE_BASE + self.height_noise(x, z) * SURFACE_VARIATION).floor() as i64
    }

    /// First free cell above the surface; entities rest here.
    ///
    /// This closed form is the single shared height function. Every consumer
    /// (movement, projectile clamping, spawn placement) goes through it; the
    /// top-down column scan exists only as a test oracle.
    pub fn surface_height_at(&self, x: f64, z: f64) -> i64 {
        self.surface_height(x, z) + 1
    }

    /// Classify the cell containing (x, y, z).
    ///
    /// First-match decision order over the three noise fields and fixed
    /// thresholds; coordinates are floored to the cell grid.
    pub fn classify(&self, x: f64, y: f64, z: f64) -> BlockType {
        let y = y.floor() as i64;
        let surface = self.surface_height(x, z);

        if y > surface + AIR_MARGIN {
            return BlockType::Air;
        }
        if y <= WATER_LEVEL && y > surface {
            return BlockType::Water;
        }
        if y <= DEEP_STONE_TOP {
            return BlockType::Stone;
        }
        if y <= surface {
            if y == surface {
                return self.surface_block(x, z);
            }
            if y > surface - DIRT_DEPTH {
                return BlockType::Dirt;
            }
            return BlockType::Stone;
        }

        // Decoration layer: trunk cells above a dry grass surface. Derived
        // from a position hash, not RNG, so every query agrees.
        if y <= surface + TREE_HEIGHT
            && surface > WATER_LEVEL
            && self.surface_block(x, z) == BlockType::Grass
            && self.tree_at(x, z)
        {
            return BlockType::Tree;
        }

        BlockType::Air
    }

    /// Surface override selection at a column top.
    fn surface_block(&self, x: f64, z: f64) -> BlockType {
        let temperature = self.temperature_noise(x, z);
        if temperature > 0.3 && self.moisture_noise(x, z) < -0.2 {
            return BlockType::Sand;
        }
        if temperature < -0.3 {
            return BlockType::Snow;
        }
        BlockType::Grass
    }

    /// Deterministic tree decision for a column.
    pub fn tree_at(&self, x: f64, z: f64) -> bool {
        let bx = x.floor() as i64 as u64;
        let bz = z.floor() as i64 as u64;
        let hash = bx
            .wrapping_mul(73_856_093)
            .wrapping_add(bz.wrapping_mul(19_349_663))
            .wrapping_add((self.seed() as u64).wrapping_mul(83_492_791));
        hash % TREE_DENSITY_MODULUS == 0
    }
}
