//! Layered-noise terrain: heightmap sampling and biome classification.
//!
//! Height and biome are pure functions of (seed, x, z); chunks are
//! regenerated on demand and never stored, so repeated sampling must return
//! bit-identical results.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CHUNK_SIZE, MAX_TERRAIN_HEIGHT, MOISTURE_FREQUENCY, ROCKY_HEIGHT_THRESHOLD,
    TERRAIN_BASE_AMPLITUDE, TERRAIN_BASE_FREQUENCY, TERRAIN_DETAIL_AMPLITUDE,
    TERRAIN_DETAIL_FREQUENCY, TERRAIN_MICRO_AMPLITUDE, TERRAIN_MICRO_FREQUENCY,
};
use crate::numbers::clamp_f64_to_f32;
use crate::seed::{combine_seeds, hash_string};

/// Terrain classification for a world coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Desert,
    Scrubland,
    Grassland,
    Badlands,
    Mesa,
}

impl Biome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desert => "desert",
            Self::Scrubland => "scrubland",
            Self::Grassland => "grassland",
            Self::Badlands => "badlands",
            Self::Mesa => "mesa",
        }
    }

    /// Relative hostility used to scale travel encounter chance.
    #[must_use]
    pub const fn danger_tier(self) -> u32 {
        match self {
            Self::Grassland => 1,
            Self::Scrubland | Self::Desert => 2,
            Self::Mesa => 3,
            Self::Badlands => 4,
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer chunk coordinate; a chunk covers `CHUNK_SIZE` world units per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// World-space origin (minimum corner) of the chunk.
    #[must_use]
    pub fn origin(self) -> (f32, f32) {
        #[allow(clippy::cast_precision_loss)]
        (self.x as f32 * CHUNK_SIZE, self.z as f32 * CHUNK_SIZE)
    }
}

/// Map a world coordinate to its containing chunk.
#[must_use]
pub fn chunk_of(x: f32, z: f32) -> ChunkCoord {
    #[allow(clippy::cast_possible_truncation)]
    ChunkCoord {
        x: (x / CHUNK_SIZE).floor() as i32,
        z: (z / CHUNK_SIZE).floor() as i32,
    }
}

/// Deterministic heightmap and biome sampler.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    seed: u64,
    base: Perlin,
    detail: Perlin,
    micro: Perlin,
    moisture: Perlin,
}

impl TerrainGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            base: Perlin::new(channel_seed(seed, "terrain.base")),
            detail: Perlin::new(channel_seed(seed, "terrain.detail")),
            micro: Perlin::new(channel_seed(seed, "terrain.micro")),
            moisture: Perlin::new(channel_seed(seed, "terrain.moisture")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Octave-summed elevation normalized to `[0, 1]`.
    #[must_use]
    pub fn normalized_height_at(&self, x: f32, z: f32) -> f32 {
        let (wx, wz) = (f64::from(x), f64::from(z));
        let sum = TERRAIN_BASE_AMPLITUDE
            * self
                .base
                .get([wx * TERRAIN_BASE_FREQUENCY, wz * TERRAIN_BASE_FREQUENCY])
            + TERRAIN_DETAIL_AMPLITUDE
                * self
                    .detail
                    .get([wx * TERRAIN_DETAIL_FREQUENCY, wz * TERRAIN_DETAIL_FREQUENCY])
            + TERRAIN_MICRO_AMPLITUDE
                * self
                    .micro
                    .get([wx * TERRAIN_MICRO_FREQUENCY, wz * TERRAIN_MICRO_FREQUENCY]);
        let total_amplitude =
            TERRAIN_BASE_AMPLITUDE + TERRAIN_DETAIL_AMPLITUDE + TERRAIN_MICRO_AMPLITUDE;
        let normalized = (sum / total_amplitude + 1.0) / 2.0;
        clamp_f64_to_f32(normalized.clamp(0.0, 1.0))
    }

    /// Elevation in world units.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.normalized_height_at(x, z) * MAX_TERRAIN_HEIGHT
    }

    /// Moisture channel in `[0, 1]`, independent of elevation.
    #[must_use]
    pub fn moisture_at(&self, x: f32, z: f32) -> f32 {
        let (wx, wz) = (f64::from(x), f64::from(z));
        let raw = self
            .moisture
            .get([wx * MOISTURE_FREQUENCY, wz * MOISTURE_FREQUENCY]);
        clamp_f64_to_f32(((raw + 1.0) / 2.0).clamp(0.0, 1.0))
    }

    /// Biome classification: high ground is always mesa country, the rest is
    /// banded by moisture.
    #[must_use]
    pub fn biome_at(&self, x: f32, z: f32) -> Biome {
        let height = self.normalized_height_at(x, z);
        if height > ROCKY_HEIGHT_THRESHOLD {
            return Biome::Mesa;
        }
        let moisture = self.moisture_at(x, z);
        if moisture < 0.3 {
            Biome::Desert
        } else if moisture < 0.55 {
            Biome::Scrubland
        } else if moisture < 0.8 {
            Biome::Grassland
        } else {
            Biome::Badlands
        }
    }
}

fn channel_seed(seed: u64, channel: &str) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        combine_seeds(seed, hash_string(channel)) as u32
    }
}
