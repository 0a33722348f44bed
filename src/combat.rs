//! Turn-based combat.
//!
//! A battle is created when an encounter triggers and dropped on resolution.
//! Hit, damage, and critical values come from deterministic formulas over
//! attacker/defender stats; only the rolls themselves consume randomness.
//! Action costs draw from the fixed AP table in `constants`.

use rand::Rng;

use crate::constants::{
    AIMED_HIT_BONUS, AP_COST_AIMED, AP_COST_ATTACK, AP_COST_DEFEND, AP_COST_FLEE, AP_PER_TURN,
    BASE_HIT_CHANCE, CRIT_BASE_CHANCE, CRIT_CHANCE_CEILING, CRIT_CHANCE_PER_LUCK,
    FLEE_BASE_CHANCE, FLEE_CHANCE_CEILING, FLEE_CHANCE_FLOOR, FLEE_CHANCE_PER_SPEED,
    HIT_CHANCE_CEILING, HIT_CHANCE_FLOOR, HIT_CHANCE_PER_POINT,
};
use crate::data::{EnemyDef, ItemGrant, LootEntry};
use crate::player::PlayerStats;
use crate::worldgen::pick_weighted;

/// Combat-relevant stat block shared by the player and enemies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub speed: i32,
    pub luck: i32,
}

impl Combatant {
    fn from_player(player: &PlayerStats) -> Self {
        Self {
            id: "player".to_string(),
            name: "player".to_string(),
            health: player.health,
            max_health: player.max_health,
            attack: player.attack,
            defense: player.defense,
            accuracy: player.accuracy,
            evasion: player.evasion,
            speed: player.speed,
            luck: player.luck,
        }
    }

    fn from_enemy(def: &EnemyDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            health: def.health,
            max_health: def.health,
            attack: def.attack,
            defense: def.defense,
            accuracy: def.accuracy,
            evasion: def.evasion,
            speed: def.speed,
            luck: def.luck,
        }
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(Debug, Clone)]
struct EnemyUnit {
    combatant: Combatant,
    xp_reward: u32,
    gold_reward: i64,
    loot: Vec<LootEntry>,
}

/// One attack resolution, for the UI battle log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: String,
    pub target: String,
    pub hit: bool,
    pub crit: bool,
    pub damage: i32,
    pub target_defeated: bool,
}

/// Spoils reported with a victory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombatRewards {
    pub xp: u32,
    pub gold: i64,
    pub items: Vec<ItemGrant>,
}

/// Terminal result of a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory(CombatRewards),
    Defeat,
    Fled,
}

/// Chance for `attacker` to land a hit on `defender`.
#[must_use]
pub fn hit_chance(attacker: &Combatant, defender: &Combatant, aimed: bool) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let delta = (attacker.accuracy - defender.evasion) as f32 * HIT_CHANCE_PER_POINT;
    let bonus = if aimed { AIMED_HIT_BONUS } else { 0.0 };
    (BASE_HIT_CHANCE + delta + bonus).clamp(HIT_CHANCE_FLOOR, HIT_CHANCE_CEILING)
}

/// Chance for `attacker` to land a critical.
#[must_use]
pub fn crit_chance(attacker: &Combatant) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let from_luck = attacker.luck.max(0) as f32 * CRIT_CHANCE_PER_LUCK;
    (CRIT_BASE_CHANCE + from_luck).min(CRIT_CHANCE_CEILING)
}

/// Damage dealt by a landed hit. Criticals deal 150%.
#[must_use]
pub fn damage_dealt(attacker: &Combatant, defender: &Combatant, crit: bool) -> i32 {
    let base = (attacker.attack - defender.defense / 2).max(1);
    if crit {
        (base * 3) / 2
    } else {
        base
    }
}

/// A battle in progress. The session owns the player's canonical stats; this
/// holds a working copy and reports the result back on resolution.
#[derive(Debug, Clone)]
pub struct CombatState {
    player: Combatant,
    enemies: Vec<EnemyUnit>,
    round: u32,
    player_ap: i32,
    defending: bool,
    outcome: Option<CombatOutcome>,
    defeated: Vec<String>,
}

impl CombatState {
    #[must_use]
    pub fn new(player: &PlayerStats, enemy_defs: &[&EnemyDef]) -> Self {
        let enemies = enemy_defs
            .iter()
            .map(|def| EnemyUnit {
                combatant: Combatant::from_enemy(def),
                xp_reward: def.xp_reward,
                gold_reward: def.gold_reward,
                loot: def.loot.clone(),
            })
            .collect();
        Self {
            player: Combatant::from_player(player),
            enemies,
            round: 1,
            player_ap: AP_PER_TURN,
            defending: false,
            outcome: None,
            defeated: Vec::new(),
        }
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn player_ap(&self) -> i32 {
        self.player_ap
    }

    #[must_use]
    pub const fn player(&self) -> &Combatant {
        &self.player
    }

    #[must_use]
    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies.iter().map(|unit| &unit.combatant)
    }

    #[must_use]
    pub fn alive_enemy_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|unit| unit.combatant.is_alive())
            .count()
    }

    /// Ids of enemies defeated so far (kill-objective feed).
    #[must_use]
    pub fn defeated_ids(&self) -> &[String] {
        &self.defeated
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&CombatOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Initiative order: combatant ids sorted by speed, ties keeping join
    /// order (player first).
    #[must_use]
    pub fn turn_order(&self) -> Vec<String> {
        let mut order: Vec<(&Combatant, usize)> = Vec::new();
        order.push((&self.player, 0));
        for (index, unit) in self.enemies.iter().enumerate() {
            if unit.combatant.is_alive() {
                order.push((&unit.combatant, index + 1));
            }
        }
        order.sort_by(|a, b| b.0.speed.cmp(&a.0.speed).then(a.1.cmp(&b.1)));
        order.into_iter().map(|(c, _)| c.id.clone()).collect()
    }

    fn spend_ap(&mut self, cost: i32) -> bool {
        if self.player_ap < cost {
            return false;
        }
        self.player_ap -= cost;
        true
    }

    fn resolve_attack<R: Rng>(
        attacker: &Combatant,
        defender: &mut Combatant,
        aimed: bool,
        rng: &mut R,
    ) -> AttackReport {
        let hit = rng.gen::<f32>() < hit_chance(attacker, defender, aimed);
        let crit = hit && rng.gen::<f32>() < crit_chance(attacker);
        let damage = if hit {
            damage_dealt(attacker, defender, crit)
        } else {
            0
        };
        defender.health = (defender.health - damage).max(0);
        AttackReport {
            attacker: attacker.id.clone(),
            target: defender.id.clone(),
            hit,
            crit,
            damage,
            target_defeated: !defender.is_alive(),
        }
    }

    fn attack_target<R: Rng>(
        &mut self,
        target: usize,
        aimed: bool,
        rng: &mut R,
    ) -> Option<AttackReport> {
        if self.is_over() {
            return None;
        }
        let cost = if aimed { AP_COST_AIMED } else { AP_COST_ATTACK };
        if !self
            .enemies
            .get(target)
            .is_some_and(|unit| unit.combatant.is_alive())
        {
            return None;
        }
        if !self.spend_ap(cost) {
            return None;
        }
        let player = self.player.clone();
        let unit = &mut self.enemies[target];
        let report = Self::resolve_attack(&player, &mut unit.combatant, aimed, rng);
        if report.target_defeated {
            self.defeated.push(unit.combatant.id.clone());
        }
        if self.alive_enemy_count() == 0 {
            let rewards = self.collect_rewards(rng);
            self.outcome = Some(CombatOutcome::Victory(rewards));
        }
        Some(report)
    }

    /// Standard attack against enemy `target`. `None` when the battle is
    /// over, the target is invalid/dead, or AP is insufficient.
    pub fn player_attack<R: Rng>(&mut self, target: usize, rng: &mut R) -> Option<AttackReport> {
        self.attack_target(target, false, rng)
    }

    /// Aimed attack: higher cost, better hit chance.
    pub fn player_aimed_attack<R: Rng>(
        &mut self,
        target: usize,
        rng: &mut R,
    ) -> Option<AttackReport> {
        self.attack_target(target, true, rng)
    }

    /// Brace for the coming round, halving incoming damage.
    pub fn player_defend(&mut self) -> bool {
        if self.is_over() || !self.spend_ap(AP_COST_DEFEND) {
            return false;
        }
        self.defending = true;
        true
    }

    /// Attempt to flee. Returns whether the attempt succeeded; `None` when
    /// the battle is over or AP is insufficient.
    pub fn player_flee<R: Rng>(&mut self, rng: &mut R) -> Option<bool> {
        if self.is_over() || !self.spend_ap(AP_COST_FLEE) {
            return None;
        }
        let fastest_enemy = self
            .enemies
            .iter()
            .filter(|unit| unit.combatant.is_alive())
            .map(|unit| unit.combatant.speed)
            .max()
            .unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let delta = (self.player.speed - fastest_enemy) as f32 * FLEE_CHANCE_PER_SPEED;
        let chance = (FLEE_BASE_CHANCE + delta).clamp(FLEE_CHANCE_FLOOR, FLEE_CHANCE_CEILING);
        let escaped = rng.gen::<f32>() < chance;
        if escaped {
            self.outcome = Some(CombatOutcome::Fled);
        }
        Some(escaped)
    }

    /// Enemies act in initiative order, then a new round begins.
    pub fn end_player_turn<R: Rng>(&mut self, rng: &mut R) -> Vec<AttackReport> {
        if self.is_over() {
            return Vec::new();
        }
        let mut reports = Vec::new();
        let mut order: Vec<usize> = (0..self.enemies.len())
            .filter(|&index| self.enemies[index].combatant.is_alive())
            .collect();
        order.sort_by(|&a, &b| {
            self.enemies[b]
                .combatant
                .speed
                .cmp(&self.enemies[a].combatant.speed)
                .then(a.cmp(&b))
        });

        for index in order {
            if !self.player.is_alive() {
                break;
            }
            let enemy = self.enemies[index].combatant.clone();
            let mut report = Self::resolve_attack(&enemy, &mut self.player, false, rng);
            if self.defending && report.damage > 0 {
                let reduced = report.damage / 2;
                self.player.health = (self.player.health + (report.damage - reduced))
                    .min(self.player.max_health);
                report.damage = reduced;
                report.target_defeated = !self.player.is_alive();
            }
            reports.push(report);
        }

        if !self.player.is_alive() {
            self.outcome = Some(CombatOutcome::Defeat);
            return reports;
        }

        self.round = self.round.saturating_add(1);
        self.player_ap = AP_PER_TURN;
        self.defending = false;
        reports
    }

    fn collect_rewards<R: Rng>(&self, rng: &mut R) -> CombatRewards {
        let mut rewards = CombatRewards::default();
        for unit in &self.enemies {
            rewards.xp = rewards.xp.saturating_add(unit.xp_reward);
            rewards.gold = rewards.gold.saturating_add(unit.gold_reward);
            if let Some(entry) = pick_weighted(&unit.loot, |entry| entry.weight, rng) {
                rewards.items.push(ItemGrant {
                    item_id: entry.item_id.clone(),
                    quantity: entry.quantity,
                });
            }
        }
        rewards
    }
}
