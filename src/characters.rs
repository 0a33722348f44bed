//! Procedural NPC identity generation.
//!
//! Identities are a pure function of a seed and index, so revisiting a
//! location reproduces the same residents without storing anything.

use serde::{Deserialize, Serialize};

use crate::seed::{combine_seeds, GameRng};
use crate::worldgen::pick_weighted;

const FIRST_NAMES: [&str; 24] = [
    "Silas", "Mabel", "Everett", "Cora", "Jasper", "Adelaide", "Rufus", "Ida", "Clement",
    "Ophelia", "Bartholomew", "Hattie", "Ezekiel", "Winifred", "Augustus", "Prudence", "Cassius",
    "Eudora", "Thaddeus", "Minerva", "Obadiah", "Lavinia", "Cornelius", "Zelda",
];

const SURNAMES: [&str; 20] = [
    "Brasswell", "Cogburn", "Ironwood", "Gearhart", "Steamer", "Boilerman", "Copperfield",
    "Wrenlock", "Pistonvale", "Rivetson", "Smokestack", "Crankshaw", "Boltwright", "Furnace",
    "Gaslight", "Tinwhistle", "Axlerod", "Cindermill", "Valveworth", "Springfield",
];

const PERSONALITY_TRAITS: [&str; 12] = [
    "gruff", "cheerful", "suspicious", "talkative", "stoic", "greedy", "generous", "nervous",
    "boastful", "weary", "devout", "scheming",
];

const HAT_STYLES: [&str; 6] = [
    "stovepipe", "weathered stetson", "brass-goggled cap", "bowler", "none", "prospector's slouch",
];

const COAT_COLORS: [&str; 6] = ["dust brown", "oxblood", "charcoal", "faded navy", "olive", "tan"];

struct ArchetypeEntry {
    id: &'static str,
    weight: f32,
}

const ARCHETYPES: [ArchetypeEntry; 8] = [
    ArchetypeEntry { id: "gunslinger", weight: 2.0 },
    ArchetypeEntry { id: "tinkerer", weight: 3.0 },
    ArchetypeEntry { id: "prospector", weight: 3.0 },
    ArchetypeEntry { id: "merchant", weight: 2.5 },
    ArchetypeEntry { id: "preacher", weight: 1.0 },
    ArchetypeEntry { id: "rail_worker", weight: 2.5 },
    ArchetypeEntry { id: "saloon_keeper", weight: 1.5 },
    ArchetypeEntry { id: "drifter", weight: 2.0 },
];

/// Visual description bits for a generated NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub hat: String,
    pub coat: String,
}

/// A procedurally generated NPC identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcIdentity {
    pub name: String,
    pub archetype: String,
    pub traits: Vec<String>,
    pub appearance: Appearance,
}

/// Generate the identity for resident `index` of the seeded pool.
#[must_use]
pub fn generate_npc(seed: u64, index: u32) -> NpcIdentity {
    let mut rng = GameRng::from_seed(combine_seeds(seed, u64::from(index)));

    let first = FIRST_NAMES[rng.pick_index(FIRST_NAMES.len()).unwrap_or(0)];
    let last = SURNAMES[rng.pick_index(SURNAMES.len()).unwrap_or(0)];

    let archetype = pick_weighted(&ARCHETYPES, |entry| entry.weight, &mut rng)
        .map_or("drifter", |entry| entry.id);

    let trait_count = rng.range_i32(1, 2);
    let mut traits: Vec<String> = Vec::new();
    for _ in 0..trait_count {
        let picked = PERSONALITY_TRAITS[rng.pick_index(PERSONALITY_TRAITS.len()).unwrap_or(0)];
        if !traits.iter().any(|existing| existing.as_str() == picked) {
            traits.push(picked.to_string());
        }
    }

    let hat = HAT_STYLES[rng.pick_index(HAT_STYLES.len()).unwrap_or(0)];
    let coat = COAT_COLORS[rng.pick_index(COAT_COLORS.len()).unwrap_or(0)];

    NpcIdentity {
        name: format!("{first} {last}"),
        archetype: archetype.to_string(),
        traits,
        appearance: Appearance {
            hat: hat.to_string(),
            coat: coat.to_string(),
        },
    }
}

/// Generate a pool of residents for a location seed.
#[must_use]
pub fn generate_residents(seed: u64, count: u32) -> Vec<NpcIdentity> {
    (0..count).map(|index| generate_npc(seed, index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_deterministic() {
        let a = generate_npc(0xB0B, 4);
        let b = generate_npc(0xB0B, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn indexes_produce_distinct_identities() {
        let residents = generate_residents(0x51, 8);
        assert_eq!(residents.len(), 8);
        let first = &residents[0];
        assert!(
            residents.iter().skip(1).any(|npc| npc != first),
            "all eight residents were identical"
        );
    }

    #[test]
    fn identity_fields_are_populated() {
        let npc = generate_npc(9, 0);
        assert!(npc.name.contains(' '));
        assert!(!npc.archetype.is_empty());
        assert!(!npc.traits.is_empty() && npc.traits.len() <= 2);
        assert!(!npc.appearance.hat.is_empty());
        assert!(!npc.appearance.coat.is_empty());
    }

    #[test]
    fn seeds_change_the_pool() {
        let a = generate_residents(1, 6);
        let b = generate_residents(2, 6);
        assert_ne!(a, b);
    }
}
