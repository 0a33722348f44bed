//! Player stats, leveling, and the stacking inventory.

use serde::{Deserialize, Serialize};

use crate::constants::{
    LEVEL_ATTACK_BONUS, LEVEL_HEALTH_BONUS, REPUTATION_MAX, REPUTATION_MIN, XP_PER_LEVEL,
};

/// Mutable player statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub xp: u32,
    pub health: i32,
    pub max_health: i32,
    pub gold: i64,
    #[serde(default)]
    pub reputation: i32,
    pub attack: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub speed: i32,
    pub luck: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            health: 100,
            max_health: 100,
            gold: 50,
            reputation: 0,
            attack: 8,
            defense: 4,
            accuracy: 12,
            evasion: 8,
            speed: 10,
            luck: 5,
        }
    }
}

impl PlayerStats {
    /// Apply damage; health floors at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Restore health, capped at `max_health`.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// XP required to advance out of the current level.
    #[must_use]
    pub const fn xp_for_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Grant experience; returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= self.xp_for_next_level() {
            self.xp -= self.xp_for_next_level();
            self.level = self.level.saturating_add(1);
            self.max_health += LEVEL_HEALTH_BONUS;
            self.attack += LEVEL_ATTACK_BONUS;
            self.health = self.max_health;
            gained += 1;
        }
        gained
    }

    pub fn adjust_gold(&mut self, delta: i64) {
        self.gold = (self.gold + delta).max(0);
    }

    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = (self.reputation + delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    }

    pub fn clamp(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
        self.reputation = self.reputation.clamp(REPUTATION_MIN, REPUTATION_MAX);
        self.gold = self.gold.max(0);
    }
}

/// Quantity-stacked inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

/// Player inventory; identical item ids merge into one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `item_id`, merging with any existing stack.
    pub fn add(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(stack) = self.stacks.iter_mut().find(|stack| stack.item_id == item_id) {
            stack.quantity = stack.quantity.saturating_add(quantity);
        } else {
            self.stacks.push(ItemStack {
                item_id: item_id.to_string(),
                quantity,
            });
        }
    }

    /// Remove `quantity` of `item_id`; returns `false` (and leaves the
    /// inventory unchanged) when the stack is missing or too small.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(index) = self
            .stacks
            .iter()
            .position(|stack| stack.item_id == item_id)
        else {
            return false;
        };
        if self.stacks[index].quantity < quantity {
            return false;
        }
        self.stacks[index].quantity -= quantity;
        if self.stacks[index].quantity == 0 {
            self.stacks.remove(index);
        }
        true
    }

    #[must_use]
    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.stacks
            .iter()
            .find(|stack| stack.item_id == item_id)
            .map_or(0, |stack| stack.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.iter()
    }

    /// Number of distinct stacks.
    #[must_use]
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_and_heal_clamp() {
        let mut stats = PlayerStats::default();
        stats.take_damage(30);
        stats.heal(20);
        assert_eq!(stats.health, 90);

        stats.heal(500);
        assert_eq!(stats.health, stats.max_health);

        stats.take_damage(9_999);
        assert_eq!(stats.health, 0);
        assert!(stats.is_dead());
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut stats = PlayerStats::default();
        stats.take_damage(-10);
        assert_eq!(stats.health, 100);
        stats.take_damage(40);
        stats.heal(-10);
        assert_eq!(stats.health, 60);
    }

    #[test]
    fn xp_levels_up_and_carries_remainder() {
        let mut stats = PlayerStats::default();
        let gained = stats.add_xp(130);
        assert_eq!(gained, 1);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.xp, 30);
        assert_eq!(stats.max_health, 110);
        assert_eq!(stats.health, 110);
        assert_eq!(stats.attack, 9);
    }

    #[test]
    fn multi_level_grant() {
        let mut stats = PlayerStats::default();
        // 100 for level 1 -> 2, 200 for 2 -> 3.
        let gained = stats.add_xp(320);
        assert_eq!(gained, 2);
        assert_eq!(stats.level, 3);
        assert_eq!(stats.xp, 20);
    }

    #[test]
    fn inventory_stacks_identical_ids() {
        let mut inventory = Inventory::new();
        inventory.add("screws", 5);
        inventory.add("screws", 3);
        assert_eq!(inventory.stack_count(), 1);
        assert_eq!(inventory.quantity_of("screws"), 8);
    }

    #[test]
    fn inventory_remove_guards() {
        let mut inventory = Inventory::new();
        inventory.add("cog", 2);
        assert!(!inventory.remove("cog", 3));
        assert_eq!(inventory.quantity_of("cog"), 2);
        assert!(!inventory.remove("sprocket", 1));
        assert!(inventory.remove("cog", 2));
        assert_eq!(inventory.quantity_of("cog"), 0);
        assert!(inventory.is_empty());
    }

    #[test]
    fn reputation_clamps_to_band() {
        let mut stats = PlayerStats::default();
        stats.adjust_reputation(1_000);
        assert_eq!(stats.reputation, 50);
        stats.adjust_reputation(-1_000);
        assert_eq!(stats.reputation, -50);
    }
}
