//! Weighted selection and per-chunk content generation.
//!
//! Chunk content is derived entirely from the chunk seed, so regenerating a
//! chunk after it was streamed out reproduces the same instances.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CHUNK_SIZE, VEGETATION_MAX_PER_CHUNK, VEGETATION_SCALE_MAX, VEGETATION_SCALE_MIN,
};
use crate::data::{ContentData, EncounterEntry, VegetationSpecies};
use crate::seed::{chunk_seed, combine_seeds, derive_stream_seed, GameRng};
use crate::terrain::{Biome, ChunkCoord, TerrainGenerator};

/// Weighted pick over `entries`.
///
/// Accumulates the total weight, draws a uniform value scaled to it, and
/// subtracts entry weights until the draw falls below zero; the first match
/// wins. If floating-point rounding exhausts the scan the **last** entry is
/// returned as the designated fallback. Empty tables return `None`.
pub fn pick_weighted<'a, T, R: Rng>(
    entries: &'a [T],
    weight_of: impl Fn(&T) -> f32,
    rng: &mut R,
) -> Option<&'a T> {
    if entries.is_empty() {
        return None;
    }
    let total: f32 = entries.iter().map(|entry| weight_of(entry).max(0.0)).sum();
    if total <= 0.0 {
        return entries.last();
    }
    let mut draw = rng.gen::<f32>() * total;
    for entry in entries {
        draw -= weight_of(entry).max(0.0);
        if draw < 0.0 {
            return Some(entry);
        }
    }
    entries.last()
}

/// A placed vegetation instance within a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationInstance {
    pub species_id: String,
    pub x: f32,
    pub z: f32,
    pub scale: f32,
    /// Yaw in radians.
    pub rotation: f32,
}

/// Deterministic content for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkContent {
    pub chunk: ChunkCoord,
    pub biome: Biome,
    pub vegetation: Vec<VegetationInstance>,
}

/// Vegetation density per chunk by biome.
const fn vegetation_budget(biome: Biome) -> u32 {
    match biome {
        Biome::Desert => 3,
        Biome::Scrubland => 6,
        Biome::Grassland => VEGETATION_MAX_PER_CHUNK,
        Biome::Badlands => 4,
        Biome::Mesa => 2,
    }
}

fn species_allowed(species: &VegetationSpecies, biome: Biome) -> bool {
    species.biomes.is_empty() || species.biomes.contains(&biome)
}

/// Generate the content for a chunk from its coordinates alone.
#[must_use]
pub fn generate_chunk(
    content: &ContentData,
    terrain: &TerrainGenerator,
    world_seed: u64,
    chunk: ChunkCoord,
) -> ChunkContent {
    let stream_seed = combine_seeds(
        derive_stream_seed(world_seed, b"worldgen"),
        chunk_seed(world_seed, chunk.x, chunk.z),
    );
    let mut rng = GameRng::from_seed(stream_seed);

    let (ox, oz) = chunk.origin();
    let center = CHUNK_SIZE / 2.0;
    let biome = terrain.biome_at(ox + center, oz + center);

    let candidates: Vec<&VegetationSpecies> = content
        .vegetation
        .iter()
        .filter(|species| species_allowed(species, biome))
        .collect();

    let mut vegetation = Vec::new();
    if !candidates.is_empty() {
        let budget = vegetation_budget(biome);
        let count = rng.range_i32(0, i32::try_from(budget).unwrap_or(0));
        for _ in 0..count {
            // Jitter and species come from the same per-chunk stream so the
            // result is reproducible.
            let x = ox + rng.range_f32(0.0, CHUNK_SIZE);
            let z = oz + rng.range_f32(0.0, CHUNK_SIZE);
            let scale = rng.range_f32(VEGETATION_SCALE_MIN, VEGETATION_SCALE_MAX);
            let rotation = rng.range_f32(0.0, std::f32::consts::TAU);
            if let Some(species) =
                pick_weighted(&candidates, |species| species.weight, &mut rng)
            {
                vegetation.push(VegetationInstance {
                    species_id: species.id.clone(),
                    x,
                    z,
                    scale,
                    rotation,
                });
            }
        }
    }

    ChunkContent {
        chunk,
        biome,
        vegetation,
    }
}

/// Weighted encounter selection filtered by biome.
#[must_use]
pub fn roll_encounter<'a, R: Rng>(
    content: &'a ContentData,
    biome: Biome,
    rng: &mut R,
) -> Option<&'a EncounterEntry> {
    let candidates: Vec<&EncounterEntry> = content
        .encounters
        .iter()
        .filter(|entry| entry.biomes.is_empty() || entry.biomes.contains(&biome))
        .collect();
    pick_weighted(&candidates, |entry| entry.weight, rng).copied()
}
