//! The game session coordinator.
//!
//! Aggregates the sub-controllers behind a single action surface and a game
//! mode state machine. All mutations happen synchronously inside an action
//! call; the session is the sole writer of the save snapshot.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::combat::{AttackReport, CombatOutcome, CombatState};
use crate::constants::{
    CAMP_FORAGE_COOLDOWN_HOURS, CAMP_REST_COOLDOWN_HOURS, CAMP_REST_HEAL, CAMP_REST_HOURS,
    DEBUG_ENV_VAR, ENCOUNTER_CHANCE_CEILING, ENCOUNTER_CHANCE_PER_TIER, FORAGE_PROVISIONS_MAX,
    FORAGE_PROVISIONS_MIN, LOG_CAMP_COOLDOWN, LOG_CAMP_FORAGE, LOG_CAMP_REST, LOG_COMBAT_DEFEAT,
    LOG_COMBAT_FLED, LOG_COMBAT_STARTED, LOG_COMBAT_VICTORY, LOG_DIALOGUE_ENDED,
    LOG_DIALOGUE_STARTED, LOG_EXHAUSTED, LOG_GAME_OVER, LOG_ITEM_USED, LOG_NEW_GAME,
    LOG_QUEST_COMPLETED_PREFIX, LOG_QUEST_OBJECTIVE_PREFIX, LOG_QUEST_STAGE_PREFIX,
    LOG_QUEST_STARTED_PREFIX, LOG_SHOP_CLOSED, LOG_SHOP_OPENED, LOG_SHOP_PURCHASE,
    LOG_SHOP_REFUSED, LOG_SHOP_SALE, LOG_STARVATION_RELIEF, LOG_STARVATION_TICK, LOG_TOWN_ENTERED,
    LOG_TOWN_LEFT, LOG_TRAVELED, LOG_TRAVEL_ENCOUNTER, NIGHT_ENCOUNTER_BONUS,
    TRAVEL_UNITS_PER_HOUR,
};
use crate::data::{ContentData, ObjectiveKind};
use crate::dialogue::{DialogueAction, DialogueState};
use crate::location::{LocationDirector, LocationSpec};
use crate::player::{Inventory, PlayerStats};
use crate::quest::{QuestEvent, QuestLog};
use crate::seed::RngBundle;
use crate::shop::ShopState;
use crate::survival::Survival;
use crate::terrain::TerrainGenerator;
use crate::worldgen::roll_encounter;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Top-level mode of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Title,
    Overworld,
    Town,
    Dialogue,
    Combat,
    Shop,
    Camp,
    Puzzle,
    GameOver,
}

/// Camp action cooldowns, ticked in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CampState {
    #[serde(default)]
    pub rest_cooldown_hours: u32,
    #[serde(default)]
    pub forage_cooldown_hours: u32,
}

impl CampState {
    fn tick_hours(&mut self, hours: u32) {
        self.rest_cooldown_hours = self.rest_cooldown_hours.saturating_sub(hours);
        self.forage_cooldown_hours = self.forage_cooldown_hours.saturating_sub(hours);
    }
}

/// Result of a travel action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelOutcome {
    pub moved: bool,
    pub distance: f32,
    pub encounter_started: bool,
}

/// Serializable snapshot of the whole session. The schema is versionless;
/// every field tolerates absence so older saves deserialize to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub seed: u64,
    #[serde(default)]
    pub player_name: String,
    pub mode: GameMode,
    #[serde(default)]
    pub prior_mode: Option<GameMode>,
    pub player: PlayerStats,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub clock: Clock,
    #[serde(default)]
    pub survival: Survival,
    #[serde(default)]
    pub camp: CampState,
    #[serde(default)]
    pub quests: QuestLog,
    pub locations: LocationDirector,
    #[serde(default)]
    pub dialogue: Option<DialogueState>,
    #[serde(default)]
    pub shop: Option<ShopState>,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Central coordinator owning every sub-controller.
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: u64,
    mode: GameMode,
    prior_mode: Option<GameMode>,
    player_name: String,
    pub player: PlayerStats,
    pub inventory: Inventory,
    x: f32,
    z: f32,
    pub clock: Clock,
    pub survival: Survival,
    pub camp: CampState,
    pub quests: QuestLog,
    pub locations: LocationDirector,
    dialogue: Option<DialogueState>,
    combat: Option<CombatState>,
    shop: Option<ShopState>,
    pub logs: Vec<String>,
    content: ContentData,
    terrain: TerrainGenerator,
    rng: RngBundle,
}

impl GameSession {
    #[must_use]
    pub fn new(seed: u64, content: ContentData) -> Self {
        Self {
            seed,
            mode: GameMode::Title,
            prior_mode: None,
            player_name: String::new(),
            player: PlayerStats::default(),
            inventory: Inventory::new(),
            x: 0.0,
            z: 0.0,
            clock: Clock::default(),
            survival: Survival::default(),
            camp: CampState::default(),
            quests: QuestLog::new(),
            locations: LocationDirector::new(seed),
            dialogue: None,
            combat: None,
            shop: None,
            logs: Vec::new(),
            terrain: TerrainGenerator::new(seed),
            rng: RngBundle::from_user_seed(seed),
            content,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    #[must_use]
    pub const fn content(&self) -> &ContentData {
        &self.content
    }

    #[must_use]
    pub const fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    #[must_use]
    pub const fn combat(&self) -> Option<&CombatState> {
        self.combat.as_ref()
    }

    #[must_use]
    pub const fn dialogue(&self) -> Option<&DialogueState> {
        self.dialogue.as_ref()
    }

    #[must_use]
    pub const fn shop(&self) -> Option<&ShopState> {
        self.shop.as_ref()
    }

    /// Reset every sub-controller and begin in the overworld.
    pub fn start_new_game(&mut self, name: &str) {
        self.player_name = name.to_string();
        self.player = PlayerStats::default();
        self.inventory = Inventory::new();
        self.x = 0.0;
        self.z = 0.0;
        self.clock = Clock::default();
        self.survival = Survival::default();
        self.camp = CampState::default();
        self.quests = QuestLog::new();
        self.locations = LocationDirector::new(self.seed);
        self.dialogue = None;
        self.combat = None;
        self.shop = None;
        self.prior_mode = None;
        self.logs = vec![String::from(LOG_NEW_GAME)];
        self.mode = GameMode::Overworld;
    }

    // ---- clock and upkeep -------------------------------------------------

    /// Advance the clock, running daily upkeep for every day rolled over.
    pub fn advance_hours(&mut self, hours: u32) {
        if self.mode == GameMode::GameOver {
            return;
        }
        let days = self.clock.advance_hours(hours);
        self.camp.tick_hours(hours);
        for _ in 0..days {
            let tick = self.survival.tick_day();
            if tick.starving {
                self.logs.push(String::from(LOG_STARVATION_TICK));
            }
            if tick.starvation_relieved {
                self.logs.push(String::from(LOG_STARVATION_RELIEF));
            }
            if tick.exhausted {
                self.logs.push(String::from(LOG_EXHAUSTED));
            }
            if tick.hp_loss > 0 {
                self.player.take_damage(tick.hp_loss);
            }
        }
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        if self.player.is_dead() && self.mode != GameMode::GameOver {
            self.mode = GameMode::GameOver;
            self.combat = None;
            self.dialogue = None;
            self.shop = None;
            self.logs.push(String::from(LOG_GAME_OVER));
        }
    }

    // ---- travel -----------------------------------------------------------

    /// Move across the overworld. Time passes, fatigue and provisions track
    /// the distance, and hostile terrain can spring an encounter.
    pub fn travel(&mut self, dx: f32, dz: f32) -> TravelOutcome {
        let mut outcome = TravelOutcome {
            moved: false,
            distance: 0.0,
            encounter_started: false,
        };
        if self.mode != GameMode::Overworld {
            return outcome;
        }
        let distance = (dx * dx + dz * dz).sqrt();
        if distance <= 0.0 {
            return outcome;
        }

        self.x += dx;
        self.z += dz;
        outcome.moved = true;
        outcome.distance = distance;

        self.survival.apply_travel(distance);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hours = ((distance / TRAVEL_UNITS_PER_HOUR).ceil() as u32).max(1);
        self.advance_hours(hours);
        if self.mode == GameMode::GameOver {
            return outcome;
        }
        self.logs.push(String::from(LOG_TRAVELED));

        let biome = self.terrain.biome_at(self.x, self.z);
        #[allow(clippy::cast_precision_loss)]
        let mut chance = biome.danger_tier() as f32 * ENCOUNTER_CHANCE_PER_TIER;
        if self.clock.is_night() {
            chance += NIGHT_ENCOUNTER_BONUS;
        }
        chance = chance.min(ENCOUNTER_CHANCE_CEILING);

        let roll: f32 = self.rng.travel().gen();
        if debug_log_enabled() {
            println!(
                "Day {} hour {}: pos ({:.1}, {:.1}) biome {} roll {roll:.3} chance {chance:.3}",
                self.clock.day, self.clock.hour, self.x, self.z, biome
            );
        }
        if roll < chance {
            outcome.encounter_started = self.trigger_encounter(biome);
        }
        outcome
    }

    fn trigger_encounter(&mut self, biome: crate::terrain::Biome) -> bool {
        let entry = {
            let mut encounter_rng = self.rng.encounter();
            roll_encounter(&self.content, biome, &mut *encounter_rng).cloned()
        };
        let Some(entry) = entry else {
            return false;
        };
        let defs: Vec<_> = entry
            .enemies
            .iter()
            .filter_map(|enemy_id| self.content.enemy(enemy_id).cloned())
            .collect();
        if defs.is_empty() {
            return false;
        }
        let refs: Vec<_> = defs.iter().collect();
        self.combat = Some(CombatState::new(&self.player, &refs));
        self.prior_mode = Some(self.mode);
        self.mode = GameMode::Combat;
        self.logs.push(String::from(LOG_TRAVEL_ENCOUNTER));
        self.logs.push(String::from(LOG_COMBAT_STARTED));
        true
    }

    // ---- combat -----------------------------------------------------------

    /// Standard attack in the active battle.
    pub fn combat_attack(&mut self, target: usize) -> Option<AttackReport> {
        let report = {
            let combat = self.combat.as_mut()?;
            let mut rng = self.rng.combat();
            combat.player_attack(target, &mut *rng)
        };
        self.after_combat_action();
        report
    }

    /// Aimed attack in the active battle.
    pub fn combat_aimed_attack(&mut self, target: usize) -> Option<AttackReport> {
        let report = {
            let combat = self.combat.as_mut()?;
            let mut rng = self.rng.combat();
            combat.player_aimed_attack(target, &mut *rng)
        };
        self.after_combat_action();
        report
    }

    /// Brace against the coming enemy round.
    pub fn combat_defend(&mut self) -> bool {
        self.combat
            .as_mut()
            .is_some_and(CombatState::player_defend)
    }

    /// Attempt to flee the active battle.
    pub fn combat_flee(&mut self) -> Option<bool> {
        let escaped = {
            let combat = self.combat.as_mut()?;
            let mut rng = self.rng.combat();
            combat.player_flee(&mut *rng)
        };
        self.after_combat_action();
        escaped
    }

    /// Let the enemies act and start the next round.
    pub fn combat_end_turn(&mut self) -> Vec<AttackReport> {
        let reports = {
            let Some(combat) = self.combat.as_mut() else {
                return Vec::new();
            };
            let mut rng = self.rng.combat();
            combat.end_player_turn(&mut *rng)
        };
        self.after_combat_action();
        reports
    }

    fn after_combat_action(&mut self) {
        let Some(combat) = self.combat.as_ref() else {
            return;
        };
        let Some(outcome) = combat.outcome().cloned() else {
            return;
        };
        let defeated: Vec<String> = combat.defeated_ids().to_vec();
        self.combat = None;

        match outcome {
            CombatOutcome::Victory(rewards) => {
                for enemy_id in &defeated {
                    self.quests.update_objective(
                        &self.content,
                        ObjectiveKind::Kill,
                        enemy_id,
                        self.clock.day,
                    );
                }
                self.player.add_xp(rewards.xp);
                self.player.adjust_gold(rewards.gold);
                for grant in &rewards.items {
                    self.inventory.add(&grant.item_id, grant.quantity);
                }
                self.logs.push(String::from(LOG_COMBAT_VICTORY));
                self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
                self.sync_quest_events();
            }
            CombatOutcome::Defeat => {
                self.player.health = 0;
                self.logs.push(String::from(LOG_COMBAT_DEFEAT));
                self.check_game_over();
            }
            CombatOutcome::Fled => {
                self.logs.push(String::from(LOG_COMBAT_FLED));
                self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
            }
        }
    }

    // ---- dialogue ---------------------------------------------------------

    /// Start a conversation. Returns `false` and stays in the current mode
    /// when the NPC or its dialogue tree is missing.
    pub fn talk_to_npc(&mut self, npc_id: &str) -> bool {
        if !matches!(self.mode, GameMode::Overworld | GameMode::Town) {
            return false;
        }
        let Some(npc) = self.content.npc(npc_id) else {
            return false;
        };
        let Some(dialogue_id) = npc.dialogue_id.clone() else {
            return false;
        };
        let Some(tree) = self.content.dialogue(&dialogue_id) else {
            return false;
        };
        let Some(state) = DialogueState::begin(tree, npc_id) else {
            return false;
        };
        self.dialogue = Some(state);
        self.prior_mode = Some(self.mode);
        self.mode = GameMode::Dialogue;
        self.logs.push(String::from(LOG_DIALOGUE_STARTED));
        self.quests
            .update_objective(&self.content, ObjectiveKind::Talk, npc_id, self.clock.day);
        self.sync_quest_events();
        true
    }

    /// Pick a dialogue choice and run its actions.
    pub fn choose_dialogue(&mut self, index: usize) -> bool {
        if self.mode != GameMode::Dialogue {
            return false;
        }
        let actions = {
            let Some(state) = self.dialogue.as_mut() else {
                return false;
            };
            let Some(tree) = self.content.dialogue(&state.tree_id) else {
                return false;
            };
            let Some(actions) = state.choose(tree, index) else {
                return false;
            };
            actions
        };

        for action in actions {
            self.dispatch_action(&action);
            if self.mode != GameMode::Dialogue {
                // An action (open shop, end) already moved us on.
                break;
            }
        }

        if self.mode == GameMode::Dialogue
            && self.dialogue.as_ref().is_some_and(|state| state.finished)
        {
            self.end_dialogue();
        }
        self.sync_quest_events();
        true
    }

    fn end_dialogue(&mut self) {
        self.dialogue = None;
        self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
        self.logs.push(String::from(LOG_DIALOGUE_ENDED));
    }

    /// Interpret one declarative dialogue action.
    fn dispatch_action(&mut self, action: &DialogueAction) {
        match action {
            DialogueAction::StartQuest { quest_id } => {
                let _ = self
                    .quests
                    .start_quest(&self.content, quest_id, self.clock.day);
            }
            DialogueAction::AdvanceObjective { kind, target } => {
                let _ = self
                    .quests
                    .update_objective(&self.content, *kind, target, self.clock.day);
            }
            DialogueAction::GiveItem { item_id, quantity } => {
                self.inventory.add(item_id, *quantity);
            }
            DialogueAction::GiveGold { amount } => {
                self.player.adjust_gold(*amount);
            }
            DialogueAction::TakeGold { amount } => {
                if self.player.gold >= *amount {
                    self.player.gold -= amount;
                }
            }
            DialogueAction::AdjustReputation { delta } => {
                self.player.adjust_reputation(*delta);
            }
            DialogueAction::OpenShop { shop_id } => {
                let shop_id = shop_id.clone();
                self.end_dialogue();
                let _ = self.open_shop(&shop_id);
            }
            DialogueAction::EndDialogue => {
                self.end_dialogue();
            }
        }
    }

    // ---- shop -------------------------------------------------------------

    /// Open a shop counter; restores the current mode on close.
    pub fn open_shop(&mut self, shop_id: &str) -> bool {
        if matches!(self.mode, GameMode::Combat | GameMode::GameOver) {
            return false;
        }
        let Some(def) = self.content.shop(shop_id) else {
            return false;
        };
        self.shop = Some(ShopState::new(def));
        self.prior_mode = Some(self.mode);
        self.mode = GameMode::Shop;
        self.logs.push(String::from(LOG_SHOP_OPENED));
        true
    }

    /// Close the shop, returning to the prior mode.
    pub fn close_shop(&mut self) {
        if self.mode != GameMode::Shop {
            return;
        }
        self.shop = None;
        self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
        self.logs.push(String::from(LOG_SHOP_CLOSED));
    }

    /// Buy one unit of an item from the open shop.
    pub fn buy_item(&mut self, item_id: &str) -> bool {
        if self.mode != GameMode::Shop {
            return false;
        }
        let Some(shop) = self.shop.as_mut() else {
            return false;
        };
        match shop.buy(&self.content, &mut self.player, &mut self.inventory, item_id) {
            Ok(_) => {
                self.logs.push(String::from(LOG_SHOP_PURCHASE));
                self.quests.update_objective(
                    &self.content,
                    ObjectiveKind::Collect,
                    item_id,
                    self.clock.day,
                );
                self.sync_quest_events();
                true
            }
            Err(_) => {
                self.logs.push(String::from(LOG_SHOP_REFUSED));
                false
            }
        }
    }

    /// Sell one unit of an item to the open shop.
    pub fn sell_item(&mut self, item_id: &str) -> bool {
        if self.mode != GameMode::Shop {
            return false;
        }
        let Some(shop) = self.shop.as_mut() else {
            return false;
        };
        match shop.sell(&self.content, &mut self.player, &mut self.inventory, item_id) {
            Ok(_) => {
                self.logs.push(String::from(LOG_SHOP_SALE));
                true
            }
            Err(_) => {
                self.logs.push(String::from(LOG_SHOP_REFUSED));
                false
            }
        }
    }

    // ---- towns and locations ----------------------------------------------

    /// Arrive at a location: its content is established on first visit and
    /// stays stable afterwards.
    pub fn enter_town(&mut self, spec: &LocationSpec) -> bool {
        if self.mode != GameMode::Overworld {
            return false;
        }
        self.locations
            .generate_location_content(spec, &self.content, &self.terrain);
        self.x = spec.x;
        self.z = spec.z;
        self.mode = GameMode::Town;
        self.logs.push(String::from(LOG_TOWN_ENTERED));
        self.quests
            .update_objective(&self.content, ObjectiveKind::Visit, &spec.id, self.clock.day);
        self.sync_quest_events();
        true
    }

    /// Head back out to the overworld.
    pub fn leave_town(&mut self) {
        if self.mode == GameMode::Town {
            self.mode = GameMode::Overworld;
            self.logs.push(String::from(LOG_TOWN_LEFT));
        }
    }

    // ---- camp -------------------------------------------------------------

    /// Make camp; restores the current mode on break.
    pub fn enter_camp(&mut self) -> bool {
        if self.mode != GameMode::Overworld {
            return false;
        }
        self.prior_mode = Some(self.mode);
        self.mode = GameMode::Camp;
        true
    }

    /// Break camp, returning to the prior mode.
    pub fn leave_camp(&mut self) {
        if self.mode == GameMode::Camp {
            self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
        }
    }

    /// Sleep off fatigue. Blocked while the rest cooldown runs.
    pub fn camp_rest(&mut self) -> bool {
        if self.mode != GameMode::Camp {
            return false;
        }
        if self.camp.rest_cooldown_hours > 0 {
            self.logs.push(String::from(LOG_CAMP_COOLDOWN));
            return false;
        }
        self.survival.rest(CAMP_REST_HOURS);
        self.player.heal(CAMP_REST_HEAL);
        self.advance_hours(CAMP_REST_HOURS);
        self.camp.rest_cooldown_hours = CAMP_REST_COOLDOWN_HOURS;
        self.logs.push(String::from(LOG_CAMP_REST));
        true
    }

    /// Scrounge the surroundings for provisions.
    pub fn camp_forage(&mut self) -> bool {
        if self.mode != GameMode::Camp {
            return false;
        }
        if self.camp.forage_cooldown_hours > 0 {
            self.logs.push(String::from(LOG_CAMP_COOLDOWN));
            return false;
        }
        let found = {
            let mut rng = self.rng.travel();
            rng.gen_range(FORAGE_PROVISIONS_MIN..=FORAGE_PROVISIONS_MAX)
        };
        self.survival.add_provisions(found);
        self.advance_hours(2);
        self.camp.forage_cooldown_hours = CAMP_FORAGE_COOLDOWN_HOURS;
        self.logs.push(String::from(LOG_CAMP_FORAGE));
        true
    }

    // ---- puzzle -----------------------------------------------------------

    /// Enter a puzzle vignette; the puzzle itself lives in the shell.
    pub fn enter_puzzle(&mut self) -> bool {
        if !matches!(self.mode, GameMode::Overworld | GameMode::Town) {
            return false;
        }
        self.prior_mode = Some(self.mode);
        self.mode = GameMode::Puzzle;
        true
    }

    /// Leave the puzzle, returning to the prior mode.
    pub fn leave_puzzle(&mut self) {
        if self.mode == GameMode::Puzzle {
            self.mode = self.prior_mode.take().unwrap_or(GameMode::Overworld);
        }
    }

    // ---- items ------------------------------------------------------------

    /// Consume one unit of a usable item, applying its effects.
    pub fn use_item(&mut self, item_id: &str) -> bool {
        if self.mode == GameMode::GameOver {
            return false;
        }
        let Some(item) = self.content.item(item_id) else {
            return false;
        };
        if item.effects.is_empty() {
            return false;
        }
        let effects = item.effects;
        if !self.inventory.remove(item_id, 1) {
            return false;
        }
        if effects.heal > 0 {
            self.player.heal(effects.heal);
        }
        if effects.provisions != 0 {
            self.survival.add_provisions(effects.provisions);
        }
        self.logs.push(String::from(LOG_ITEM_USED));
        true
    }

    // ---- quests -----------------------------------------------------------

    /// Start a quest directly (UI journal, scripted triggers).
    pub fn start_quest(&mut self, quest_id: &str) -> bool {
        let started = self
            .quests
            .start_quest(&self.content, quest_id, self.clock.day);
        self.sync_quest_events();
        started
    }

    /// Report progress toward matching objectives across active quests.
    pub fn update_objective(&mut self, kind: ObjectiveKind, target: &str) -> u32 {
        let advanced = self
            .quests
            .update_objective(&self.content, kind, target, self.clock.day);
        self.sync_quest_events();
        advanced
    }

    /// Fold quest events into the log ledger and pay out completions.
    fn sync_quest_events(&mut self) {
        for event in self.quests.drain_events() {
            match event {
                QuestEvent::Started { quest_id } => {
                    self.logs
                        .push(format!("{LOG_QUEST_STARTED_PREFIX}{quest_id}"));
                }
                QuestEvent::Updated { .. } => {}
                QuestEvent::ObjectiveComplete { quest_id, .. } => {
                    self.logs
                        .push(format!("{LOG_QUEST_OBJECTIVE_PREFIX}{quest_id}"));
                }
                QuestEvent::StageAdvanced { quest_id, .. } => {
                    self.logs.push(format!("{LOG_QUEST_STAGE_PREFIX}{quest_id}"));
                }
                QuestEvent::Completed { quest_id } => {
                    self.logs
                        .push(format!("{LOG_QUEST_COMPLETED_PREFIX}{quest_id}"));
                    if let Some(def) = self.content.quest(&quest_id) {
                        let rewards = def.rewards.clone();
                        self.player.add_xp(rewards.xp);
                        self.player.adjust_gold(rewards.gold);
                        self.player.adjust_reputation(rewards.reputation);
                        for grant in &rewards.items {
                            self.inventory.add(&grant.item_id, grant.quantity);
                        }
                    }
                }
                QuestEvent::Failed { .. } => {}
            }
        }
    }

    // ---- persistence ------------------------------------------------------

    /// Aggregate every sub-controller's serializable state into a snapshot.
    /// Transient battles are dropped; a save taken mid-combat resumes just
    /// before the fight.
    #[must_use]
    pub fn get_save_data(&self) -> SaveData {
        let mode = if self.mode == GameMode::Combat {
            self.prior_mode.unwrap_or(GameMode::Overworld)
        } else {
            self.mode
        };
        SaveData {
            seed: self.seed,
            player_name: self.player_name.clone(),
            mode,
            prior_mode: self.prior_mode,
            player: self.player.clone(),
            inventory: self.inventory.clone(),
            x: self.x,
            z: self.z,
            clock: self.clock,
            survival: self.survival.clone(),
            camp: self.camp,
            quests: self.quests.clone(),
            locations: self.locations.clone(),
            dialogue: self.dialogue.clone(),
            shop: self.shop.clone(),
            logs: self.logs.clone(),
        }
    }

    /// Rebuild a session from a snapshot plus freshly loaded content. The
    /// terrain sampler and RNG streams are rederived from the stored seed.
    #[must_use]
    pub fn from_save(save: SaveData, content: ContentData) -> Self {
        let mode = if save.mode == GameMode::Combat {
            GameMode::Overworld
        } else {
            save.mode
        };
        Self {
            seed: save.seed,
            mode,
            prior_mode: save.prior_mode,
            player_name: save.player_name,
            player: save.player,
            inventory: save.inventory,
            x: save.x,
            z: save.z,
            clock: save.clock,
            survival: save.survival,
            camp: save.camp,
            quests: save.quests,
            locations: save.locations,
            dialogue: save.dialogue,
            combat: None,
            shop: save.shop,
            logs: save.logs,
            terrain: TerrainGenerator::new(save.seed),
            rng: RngBundle::from_user_seed(save.seed),
            content,
        }
    }
}
