//! Fatigue and provisions tracking.
//!
//! Both meters clamp to `0..=100`. Running out of provisions starts an
//! escalating starvation stack; a maxed fatigue meter marks the player
//! exhausted until they rest below the threshold again.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EXHAUSTION_DAILY_HP_LOSS, FATIGUE_PER_UNIT, PROVISIONS_PER_UNIT, REST_RECOVERY_PER_HOUR,
    STARVATION_BASE_HP_LOSS, STARVATION_MAX_STACK, SURVIVAL_METER_MAX,
};
use crate::numbers::round_f32_to_i32;

/// Result of a daily survival tick, applied to the player by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurvivalTick {
    pub hp_loss: i32,
    pub starving: bool,
    pub starvation_relieved: bool,
    pub exhausted: bool,
}

/// Fatigue/provisions meters and the starvation stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survival {
    pub fatigue: i32,
    pub provisions: i32,
    #[serde(default)]
    pub starvation_days: u32,
    #[serde(default)]
    pub malnutrition_level: u32,
    #[serde(default)]
    pub exhausted: bool,
}

impl Default for Survival {
    fn default() -> Self {
        Self {
            fatigue: 0,
            provisions: 60,
            starvation_days: 0,
            malnutrition_level: 0,
            exhausted: false,
        }
    }
}

impl Survival {
    /// Account for traveled distance: fatigue rises and provisions are
    /// consumed proportionally.
    pub fn apply_travel(&mut self, distance: f32) {
        if distance <= 0.0 {
            return;
        }
        self.fatigue += round_f32_to_i32(distance * FATIGUE_PER_UNIT).max(1);
        self.provisions -= round_f32_to_i32(distance * PROVISIONS_PER_UNIT).max(1);
        self.clamp();
        if self.fatigue >= SURVIVAL_METER_MAX {
            self.exhausted = true;
        }
    }

    /// Rest for `hours`, recovering fatigue.
    pub fn rest(&mut self, hours: u32) {
        let recovered = i32::try_from(hours).unwrap_or(i32::MAX) * REST_RECOVERY_PER_HOUR;
        self.fatigue -= recovered;
        self.clamp();
        if self.fatigue < SURVIVAL_METER_MAX {
            self.exhausted = false;
        }
    }

    /// Add provisions (foraging, purchases, quest rewards).
    pub fn add_provisions(&mut self, amount: i32) {
        self.provisions += amount;
        self.clamp();
    }

    /// Daily upkeep: starvation stacking and exhaustion attrition. The
    /// returned tick carries the health loss for the session to apply.
    pub fn tick_day(&mut self) -> SurvivalTick {
        let mut tick = SurvivalTick::default();

        if self.provisions > 0 {
            if self.starvation_days > 0 {
                tick.starvation_relieved = true;
            }
            self.starvation_days = 0;
            self.malnutrition_level = 0;
        } else {
            self.starvation_days = self.starvation_days.saturating_add(1);
            self.malnutrition_level = (self.malnutrition_level + 1).min(STARVATION_MAX_STACK);
            let malnutrition_penalty = i32::try_from(self.malnutrition_level).unwrap_or(0);
            tick.hp_loss += STARVATION_BASE_HP_LOSS + malnutrition_penalty.min(3);
            tick.starving = true;
        }

        if self.exhausted {
            tick.hp_loss += EXHAUSTION_DAILY_HP_LOSS;
            tick.exhausted = true;
        }

        tick
    }

    pub fn clamp(&mut self) {
        self.fatigue = self.fatigue.clamp(0, SURVIVAL_METER_MAX);
        self.provisions = self.provisions.clamp(0, SURVIVAL_METER_MAX);
    }
}
