//! Static content model: items, NPCs, enemies, quests, shops, and the
//! generation tables. Lookups return `None` for unknown ids; callers handle
//! absence rather than unwinding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialogue::DialogueTree;
use crate::terrain::Biome;

/// Broad item classification used by shop acceptance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Consumable,
    Material,
    Curio,
}

impl ItemCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Consumable => "consumable",
            Self::Material => "material",
            Self::Curio => "curio",
        }
    }
}

/// Effects applied when a consumable item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemEffects {
    #[serde(default)]
    pub heal: i32,
    #[serde(default)]
    pub provisions: i32,
}

impl ItemEffects {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.heal == 0 && self.provisions == 0
    }
}

/// A static item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Base value in gold.
    pub value: i64,
    pub category: ItemCategory,
    #[serde(default)]
    pub effects: ItemEffects,
}

/// A static enemy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub accuracy: i32,
    #[serde(default)]
    pub evasion: i32,
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub luck: i32,
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub gold_reward: i64,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

/// Weighted loot candidate rolled once per defeated enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    #[serde(default = "default_loot_weight")]
    pub weight: f32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_loot_weight() -> f32 {
    1.0
}

fn default_quantity() -> u32 {
    1
}

/// A static NPC definition placed by content or generated per location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub dialogue_id: Option<String>,
    #[serde(default)]
    pub shop_id: Option<String>,
}

/// What a quest objective counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Talk,
    Kill,
    Collect,
    Visit,
}

impl ObjectiveKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Talk => "talk",
            Self::Kill => "kill",
            Self::Collect => "collect",
            Self::Visit => "visit",
        }
    }
}

/// A single objective within a quest stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub kind: ObjectiveKind,
    /// Target id the objective counts against (NPC, enemy, item, location).
    pub target: String,
    #[serde(default = "default_objective_count")]
    pub count: u32,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub desc: String,
}

fn default_objective_count() -> u32 {
    1
}

/// An ordered phase of a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStage {
    #[serde(default)]
    pub name: String,
    pub objectives: Vec<ObjectiveDef>,
}

/// Rewards granted when a quest completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestRewards {
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub reputation: i32,
    #[serde(default)]
    pub items: Vec<ItemGrant>,
}

/// Item quantity granted by rewards or dialogue actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// A static quest definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Quest ids that must be completed before this quest can start.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub stages: Vec<QuestStage>,
    #[serde(default)]
    pub rewards: QuestRewards,
}

/// A line of shop stock; `None` quantity means unlimited supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub item_id: String,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// A static shop definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopDef {
    pub id: String,
    pub name: String,
    /// Buy-price multiplier relative to item base value.
    #[serde(default = "default_price_modifier")]
    pub price_modifier: f64,
    /// Fraction of base value paid when the player sells.
    #[serde(default = "default_sell_fraction")]
    pub sell_fraction: f64,
    /// Categories this shop will purchase from the player.
    #[serde(default)]
    pub accepts: Vec<ItemCategory>,
    #[serde(default)]
    pub stock: Vec<StockLine>,
}

fn default_price_modifier() -> f64 {
    1.0
}

fn default_sell_fraction() -> f64 {
    crate::constants::SELL_FRACTION_DEFAULT
}

/// Weighted vegetation species for chunk generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationSpecies {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Biomes the species appears in; empty means everywhere.
    #[serde(default)]
    pub biomes: Vec<Biome>,
    #[serde(default = "default_table_weight")]
    pub weight: f32,
}

/// Weighted enemy group for travel encounters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    pub id: String,
    pub enemies: Vec<String>,
    /// Biomes the encounter can trigger in; empty means everywhere.
    #[serde(default)]
    pub biomes: Vec<Biome>,
    #[serde(default = "default_table_weight")]
    pub weight: f32,
}

fn default_table_weight() -> f32 {
    5.0
}

/// Container for all static game content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentData {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub quests: Vec<QuestDef>,
    #[serde(default)]
    pub dialogues: Vec<DialogueTree>,
    #[serde(default)]
    pub shops: Vec<ShopDef>,
    #[serde(default)]
    pub vegetation: Vec<VegetationSpecies>,
    #[serde(default)]
    pub encounters: Vec<EncounterEntry>,
}

/// Content reference errors surfaced by [`ContentData::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("quest {quest_id} rewards unknown item {item_id}")]
    UnknownRewardItem { quest_id: String, item_id: String },
    #[error("quest {quest_id} requires unknown quest {prerequisite}")]
    UnknownPrerequisite {
        quest_id: String,
        prerequisite: String,
    },
    #[error("quest {quest_id} has no stages")]
    EmptyQuest { quest_id: String },
    #[error("encounter {encounter_id} references unknown enemy {enemy_id}")]
    UnknownEncounterEnemy {
        encounter_id: String,
        enemy_id: String,
    },
    #[error("shop {shop_id} stocks unknown item {item_id}")]
    UnknownStockItem { shop_id: String, item_id: String },
    #[error("npc {npc_id} references unknown dialogue {dialogue_id}")]
    UnknownDialogue { npc_id: String, dialogue_id: String },
}

impl ContentData {
    /// Create empty content (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load content from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid content.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn npc(&self, id: &str) -> Option<&NpcDef> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    #[must_use]
    pub fn enemy(&self, id: &str) -> Option<&EnemyDef> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    #[must_use]
    pub fn quest(&self, id: &str) -> Option<&QuestDef> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    #[must_use]
    pub fn dialogue(&self, id: &str) -> Option<&DialogueTree> {
        self.dialogues.iter().find(|tree| tree.id == id)
    }

    #[must_use]
    pub fn shop(&self, id: &str) -> Option<&ShopDef> {
        self.shops.iter().find(|shop| shop.id == id)
    }

    /// Check cross-references between content tables.
    ///
    /// # Errors
    ///
    /// Returns the first dangling reference found.
    pub fn validate(&self) -> Result<(), ContentError> {
        for quest in &self.quests {
            if quest.stages.is_empty() {
                return Err(ContentError::EmptyQuest {
                    quest_id: quest.id.clone(),
                });
            }
            for prerequisite in &quest.prerequisites {
                if self.quest(prerequisite).is_none() {
                    return Err(ContentError::UnknownPrerequisite {
                        quest_id: quest.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
            for grant in &quest.rewards.items {
                if self.item(&grant.item_id).is_none() {
                    return Err(ContentError::UnknownRewardItem {
                        quest_id: quest.id.clone(),
                        item_id: grant.item_id.clone(),
                    });
                }
            }
        }
        for encounter in &self.encounters {
            for enemy_id in &encounter.enemies {
                if self.enemy(enemy_id).is_none() {
                    return Err(ContentError::UnknownEncounterEnemy {
                        encounter_id: encounter.id.clone(),
                        enemy_id: enemy_id.clone(),
                    });
                }
            }
        }
        for shop in &self.shops {
            for line in &shop.stock {
                if self.item(&line.item_id).is_none() {
                    return Err(ContentError::UnknownStockItem {
                        shop_id: shop.id.clone(),
                        item_id: line.item_id.clone(),
                    });
                }
            }
        }
        for npc in &self.npcs {
            if let Some(dialogue_id) = &npc.dialogue_id {
                if self.dialogue(dialogue_id).is_none() {
                    return Err(ContentError::UnknownDialogue {
                        npc_id: npc.id.clone(),
                        dialogue_id: dialogue_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
