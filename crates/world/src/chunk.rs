//! Chunk realization and caching.
//!
//! A chunk is a realized 16x16 column grouping of classified blocks. It is a
//! memoization layer only: the terrain sampler stays the source of truth, and
//! a cached chunk is bit-identical to re-sampling the terrain directly.

use crate::terrain::{BlockType, TerrainSampler};
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

/// Chunk width (X axis) in cells.
pub const CHUNK_SIZE_X: usize = 16;
/// Chunk height (Y axis) in cells.
pub const CHUNK_SIZE_Y: usize = 64;
/// Chunk depth (Z axis) in cells.
pub const CHUNK_SIZE_Z: usize = 16;
/// Total cell count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Default number of chunks kept realized.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Chunk coordinate (X, Z) in chunk space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    /// Chunk X coordinate.
    pub x: i32,
    /// Chunk Z coordinate.
    pub z: i32,
}

impl ChunkPos {
    /// Construct a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the given world column.
    pub fn containing(world_x: f64, world_z: f64) -> Self {
        Self {
            x: (world_x / CHUNK_SIZE_X as f64).floor() as i32,
            z: (world_z / CHUNK_SIZE_Z as f64).floor() as i32,
        }
    }
}

/// A realized block grid for one chunk.
pub struct Chunk {
    position: ChunkPos,
    blocks: Vec<BlockType>,
}

impl Chunk {
    /// Realize a chunk by classifying every cell.
    pub fn realize(sampler: &TerrainSampler, position: ChunkPos) -> Self {
        debug!(?position, "realizing chunk");
        let origin_x = position.x * CHUNK_SIZE_X as i32;
        let origin_z = position.z * CHUNK_SIZE_Z as i32;

        let mut blocks = Vec::with_capacity(CHUNK_VOLUME);
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let world_x = (origin_x + x as i32) as f64;
                    let world_z = (origin_z + z as i32) as f64;
                    blocks.push(sampler.classify(world_x, y as f64, world_z));
                }
            }
        }

        Self { position, blocks }
    }

    /// Position of this chunk.
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Block at chunk-local coordinates.
    ///
    /// # Panics
    /// Panics if any coordinate is out of bounds.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockType {
        assert!(x < CHUNK_SIZE_X && y < CHUNK_SIZE_Y && z < CHUNK_SIZE_Z);
        self.blocks[(y * CHUNK_SIZE_Z + z) * CHUNK_SIZE_X + x]
    }
}

/// LRU-backed chunk memoization.
///
/// Eviction never changes observable terrain: a re-realized chunk is
/// identical to the one dropped.
pub struct ChunkCache {
    cache: LruCache<ChunkPos, Chunk>,
}

impl ChunkCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` chunks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).expect("capacity must be nonzero")),
        }
    }

    /// Fetch a chunk, realizing it on miss.
    pub fn get(&mut self, sampler: &TerrainSampler, position: ChunkPos) -> &Chunk {
        if !self.cache.contains(&position) {
            self.cache.put(position, Chunk::realize(sampler, position));
        }
        self.cache.get(&position).expect("chunk just inserted")
    }

    /// Number of chunks currently realized.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no chunks are realized.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new()
    }
}
