//! Centralized balance and tuning constants for Iron Frontier core logic.
//!
//! These values define the deterministic math for the simulation. Keeping
//! them together ensures gameplay can only be adjusted via code changes
//! reviewed in version control, rather than through external assets.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "IRON_FRONTIER_DEBUG_LOGS";
pub(crate) const LOG_NEW_GAME: &str = "log.new-game";
pub(crate) const LOG_TRAVELED: &str = "log.traveled";
pub(crate) const LOG_TRAVEL_ENCOUNTER: &str = "log.travel.encounter";
pub(crate) const LOG_TOWN_ENTERED: &str = "log.town.entered";
pub(crate) const LOG_TOWN_LEFT: &str = "log.town.left";
pub(crate) const LOG_DIALOGUE_STARTED: &str = "log.dialogue.started";
pub(crate) const LOG_DIALOGUE_ENDED: &str = "log.dialogue.ended";
pub(crate) const LOG_QUEST_STARTED_PREFIX: &str = "log.quest.started.";
pub(crate) const LOG_QUEST_OBJECTIVE_PREFIX: &str = "log.quest.objective.";
pub(crate) const LOG_QUEST_STAGE_PREFIX: &str = "log.quest.stage.";
pub(crate) const LOG_QUEST_COMPLETED_PREFIX: &str = "log.quest.completed.";
pub(crate) const LOG_SHOP_OPENED: &str = "log.shop.opened";
pub(crate) const LOG_SHOP_CLOSED: &str = "log.shop.closed";
pub(crate) const LOG_SHOP_PURCHASE: &str = "log.shop.purchase";
pub(crate) const LOG_SHOP_SALE: &str = "log.shop.sale";
pub(crate) const LOG_SHOP_REFUSED: &str = "log.shop.refused";
pub(crate) const LOG_COMBAT_STARTED: &str = "log.combat.started";
pub(crate) const LOG_COMBAT_VICTORY: &str = "log.combat.victory";
pub(crate) const LOG_COMBAT_DEFEAT: &str = "log.combat.defeat";
pub(crate) const LOG_COMBAT_FLED: &str = "log.combat.fled";
pub(crate) const LOG_CAMP_REST: &str = "log.camp.rest";
pub(crate) const LOG_CAMP_FORAGE: &str = "log.camp.forage";
pub(crate) const LOG_CAMP_COOLDOWN: &str = "log.camp.cooldown";
pub(crate) const LOG_STARVATION_TICK: &str = "log.starvation.tick";
pub(crate) const LOG_STARVATION_RELIEF: &str = "log.starvation.relief";
pub(crate) const LOG_EXHAUSTED: &str = "log.exhausted";
pub(crate) const LOG_ITEM_USED: &str = "log.item.used";
pub(crate) const LOG_GAME_OVER: &str = "log.game-over";

// World generation ---------------------------------------------------------
pub const CHUNK_SIZE: f32 = 32.0;
pub const MAX_TERRAIN_HEIGHT: f32 = 48.0;
pub(crate) const TERRAIN_BASE_FREQUENCY: f64 = 0.008;
pub(crate) const TERRAIN_DETAIL_FREQUENCY: f64 = 0.032;
pub(crate) const TERRAIN_MICRO_FREQUENCY: f64 = 0.11;
pub(crate) const TERRAIN_BASE_AMPLITUDE: f64 = 1.0;
pub(crate) const TERRAIN_DETAIL_AMPLITUDE: f64 = 0.5;
pub(crate) const TERRAIN_MICRO_AMPLITUDE: f64 = 0.25;
pub(crate) const MOISTURE_FREQUENCY: f64 = 0.004;
pub(crate) const ROCKY_HEIGHT_THRESHOLD: f32 = 0.7;
pub(crate) const VEGETATION_MAX_PER_CHUNK: u32 = 12;
pub(crate) const VEGETATION_SCALE_MIN: f32 = 0.8;
pub(crate) const VEGETATION_SCALE_MAX: f32 = 1.4;

// Travel and encounters ----------------------------------------------------
pub(crate) const TRAVEL_UNITS_PER_HOUR: f32 = 24.0;
pub(crate) const ENCOUNTER_CHANCE_PER_TIER: f32 = 0.07;
pub(crate) const ENCOUNTER_CHANCE_CEILING: f32 = 0.45;
pub(crate) const NIGHT_ENCOUNTER_BONUS: f32 = 0.05;

// Survival tuning ----------------------------------------------------------
pub(crate) const SURVIVAL_METER_MAX: i32 = 100;
pub(crate) const FATIGUE_PER_UNIT: f32 = 0.25;
pub(crate) const PROVISIONS_PER_UNIT: f32 = 0.15;
pub(crate) const REST_RECOVERY_PER_HOUR: i32 = 8;
pub(crate) const EXHAUSTION_DAILY_HP_LOSS: i32 = 2;
pub(crate) const STARVATION_BASE_HP_LOSS: i32 = 1;
pub(crate) const STARVATION_MAX_STACK: u32 = 5;
pub(crate) const CAMP_REST_HOURS: u32 = 8;
pub(crate) const CAMP_REST_HEAL: i32 = 10;
pub(crate) const CAMP_REST_COOLDOWN_HOURS: u32 = 16;
pub(crate) const CAMP_FORAGE_COOLDOWN_HOURS: u32 = 12;
pub(crate) const FORAGE_PROVISIONS_MIN: i32 = 4;
pub(crate) const FORAGE_PROVISIONS_MAX: i32 = 14;

// Combat tuning ------------------------------------------------------------
pub(crate) const AP_PER_TURN: i32 = 4;
pub(crate) const AP_COST_ATTACK: i32 = 2;
pub(crate) const AP_COST_AIMED: i32 = 3;
pub(crate) const AP_COST_DEFEND: i32 = 1;
pub(crate) const AP_COST_FLEE: i32 = 2;
pub(crate) const BASE_HIT_CHANCE: f32 = 0.72;
pub(crate) const HIT_CHANCE_PER_POINT: f32 = 0.01;
pub(crate) const HIT_CHANCE_FLOOR: f32 = 0.05;
pub(crate) const HIT_CHANCE_CEILING: f32 = 0.95;
pub(crate) const AIMED_HIT_BONUS: f32 = 0.15;
pub(crate) const CRIT_BASE_CHANCE: f32 = 0.05;
pub(crate) const CRIT_CHANCE_PER_LUCK: f32 = 0.01;
pub(crate) const CRIT_CHANCE_CEILING: f32 = 0.5;
pub(crate) const FLEE_BASE_CHANCE: f32 = 0.4;
pub(crate) const FLEE_CHANCE_PER_SPEED: f32 = 0.02;
pub(crate) const FLEE_CHANCE_FLOOR: f32 = 0.1;
pub(crate) const FLEE_CHANCE_CEILING: f32 = 0.9;

// Player progression -------------------------------------------------------
pub(crate) const XP_PER_LEVEL: u32 = 100;
pub(crate) const LEVEL_HEALTH_BONUS: i32 = 10;
pub(crate) const LEVEL_ATTACK_BONUS: i32 = 1;
pub(crate) const REPUTATION_MIN: i32 = -50;
pub(crate) const REPUTATION_MAX: i32 = 50;

// Shop tuning --------------------------------------------------------------
pub(crate) const SELL_FRACTION_DEFAULT: f64 = 0.5;
pub(crate) const REPUTATION_PRICE_STEP: f64 = 0.002;
