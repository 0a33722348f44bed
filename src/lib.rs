//! Iron Frontier Game Engine
//!
//! Platform-agnostic core logic for the Iron Frontier steampunk-western RPG.
//! This crate provides deterministic world generation and the game-session
//! state machine without UI or platform-specific dependencies.

pub mod characters;
pub mod clock;
pub mod combat;
pub mod constants;
pub mod data;
pub mod dialogue;
pub mod location;
pub mod numbers;
pub mod player;
pub mod quest;
pub mod seed;
pub mod session;
pub mod shop;
pub mod survival;
pub mod terrain;
pub mod worldgen;

// Re-export commonly used types
pub use characters::{generate_npc, generate_residents, Appearance, NpcIdentity};
pub use clock::{Clock, TimeOfDay};
pub use combat::{
    crit_chance, damage_dealt, hit_chance, AttackReport, CombatOutcome, CombatRewards,
    CombatState, Combatant,
};
pub use constants::{CHUNK_SIZE, MAX_TERRAIN_HEIGHT};
pub use data::{
    ContentData, ContentError, EncounterEntry, EnemyDef, ItemCategory, ItemDef, ItemEffects,
    ItemGrant, LootEntry, NpcDef, ObjectiveDef, ObjectiveKind, QuestDef, QuestRewards, QuestStage,
    ShopDef, StockLine, VegetationSpecies,
};
pub use dialogue::{
    DialogueAction, DialogueActions, DialogueChoice, DialogueNode, DialogueState, DialogueTree,
};
pub use location::{LocationContent, LocationDirector, LocationSpec};
pub use player::{Inventory, ItemStack, PlayerStats};
pub use quest::{ActiveQuest, QuestEvent, QuestLog, QuestStatus};
pub use seed::{
    chunk_seed, combine_seeds, derive_stream_seed, hash_string, CountingRng, GameRng, RngBundle,
};
pub use session::{CampState, GameMode, GameSession, SaveData, TravelOutcome};
pub use shop::{buy_price, sell_price, ShopState, TradeRefusal};
pub use survival::{Survival, SurvivalTick};
pub use terrain::{chunk_of, Biome, ChunkCoord, TerrainGenerator};
pub use worldgen::{generate_chunk, pick_weighted, roll_encounter, ChunkContent, VegetationInstance};

/// Trait for abstracting static content loading.
/// Platform-specific implementations should provide this.
pub trait DataAccess {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the static game content from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded.
    fn load_content(&self) -> Result<ContentData, Self::Error>;
}

/// Trait for abstracting save persistence as a string key-value store.
/// Platform-specific implementations should provide this.
pub trait StorageAdapter {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}

/// `DataAccess` implementation backed by owned in-memory content.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    content: ContentData,
}

impl StaticContent {
    #[must_use]
    pub const fn new(content: ContentData) -> Self {
        Self { content }
    }
}

impl DataAccess for StaticContent {
    type Error = std::convert::Infallible;

    fn load_content(&self) -> Result<ContentData, Self::Error> {
        Ok(self.content.clone())
    }
}

/// In-memory `StorageAdapter` for tests and platforms without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

impl StorageAdapter for MemoryStorage {
    type Error = std::convert::Infallible;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

fn save_key(slot: &str) -> String {
    format!("iron-frontier.save.{slot}")
}

/// Main game engine binding content loading and save persistence.
pub struct GameEngine<D, S>
where
    D: DataAccess,
    S: StorageAdapter,
{
    data: D,
    storage: S,
}

impl<D, S> GameEngine<D, S>
where
    D: DataAccess,
    S: StorageAdapter,
{
    /// Create a new engine with the provided content source and storage.
    pub const fn new(data: D, storage: S) -> Self {
        Self { data, storage }
    }

    /// Create a fresh session for the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded.
    pub fn new_session(&self, seed: u64) -> Result<GameSession, D::Error> {
        let content = self.data.load_content()?;
        Ok(GameSession::new(seed, content))
    }

    /// Persist a session snapshot under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or stored.
    pub fn save_session(&self, slot: &str, session: &GameSession) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let snapshot = session.get_save_data();
        let encoded = serde_json::to_string(&snapshot)?;
        self.storage
            .set_item(&save_key(slot), &encoded)
            .map_err(Into::into)
    }

    /// Load the session stored under `slot`, rehydrating it with freshly
    /// loaded content.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, the snapshot cannot be
    /// decoded, or content loading fails.
    pub fn load_session(&self, slot: &str) -> Result<Option<GameSession>, anyhow::Error>
    where
        D::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        let Some(encoded) = self.storage.get_item(&save_key(slot)).map_err(Into::into)? else {
            return Ok(None);
        };
        let snapshot: SaveData = serde_json::from_str(&encoded)?;
        let content = self.data.load_content().map_err(Into::into)?;
        Ok(Some(GameSession::from_save(snapshot, content)))
    }

    /// Delete the save stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete_save(&self, slot: &str) -> Result<(), S::Error> {
        self.storage.remove_item(&save_key(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creates_and_round_trips_sessions() {
        let engine = GameEngine::new(StaticContent::default(), MemoryStorage::default());
        let mut session = engine.new_session(0xABCD).unwrap();
        session.start_new_game("Tess");
        session.player.adjust_gold(200);
        session.inventory.add("screws", 5);

        engine.save_session("slot-one", &session).unwrap();

        let loaded = engine
            .load_session("slot-one")
            .unwrap()
            .expect("save exists");
        assert_eq!(loaded.seed(), 0xABCD);
        assert_eq!(loaded.player_name(), "Tess");
        assert_eq!(loaded.player.gold, session.player.gold);
        assert_eq!(loaded.inventory.quantity_of("screws"), 5);
        assert_eq!(loaded.mode(), GameMode::Overworld);

        assert!(engine.load_session("missing-slot").unwrap().is_none());
    }

    #[test]
    fn delete_save_removes_the_slot() {
        let engine = GameEngine::new(StaticContent::default(), MemoryStorage::default());
        let mut session = engine.new_session(1).unwrap();
        session.start_new_game("Tess");
        engine.save_session("doomed", &session).unwrap();
        engine.delete_save("doomed").unwrap();
        assert!(engine.load_session("doomed").unwrap().is_none());
    }

    #[test]
    fn restored_sessions_share_generation_streams() {
        let engine = GameEngine::new(StaticContent::default(), MemoryStorage::default());
        let mut session = engine.new_session(99).unwrap();
        session.start_new_game("Tess");

        let spec = LocationSpec {
            id: "gearford".to_string(),
            x: 40.0,
            z: 40.0,
            resident_count: Some(3),
        };
        session.enter_town(&spec);
        let original = session.locations.get("gearford").cloned().unwrap();

        engine.save_session("slot", &session).unwrap();
        let restored = engine.load_session("slot").unwrap().unwrap();
        assert_eq!(restored.locations.get("gearford"), Some(&original));

        // Terrain resamples identically after restore.
        let (x, z) = (123.0, -45.0);
        assert_eq!(
            session.terrain().height_at(x, z).to_bits(),
            restored.terrain().height_at(x, z).to_bits()
        );
    }
}
