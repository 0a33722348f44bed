//! Shop trading: price math and buy/sell guards.
//!
//! Prices start from an item's base value, scaled by the shop's modifier and
//! the player's reputation. Rejected trades leave player state untouched.

use serde::{Deserialize, Serialize};

use crate::constants::REPUTATION_PRICE_STEP;
use crate::data::{ContentData, ItemDef, ShopDef, StockLine};
use crate::numbers::{ceil_f64_to_i64, floor_f64_to_i64, i64_to_f64};
use crate::player::{Inventory, PlayerStats};

/// Why a trade was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeRefusal {
    UnknownItem,
    OutOfStock,
    InsufficientGold,
    NotCarried,
    CategoryNotAccepted,
}

/// Buy price after shop modifier and reputation adjustment, rounded up.
#[must_use]
pub fn buy_price(item: &ItemDef, shop: &ShopDef, reputation: i32) -> i64 {
    let reputation_factor = 1.0 - f64::from(reputation) * REPUTATION_PRICE_STEP;
    let price = i64_to_f64(item.value) * shop.price_modifier * reputation_factor;
    ceil_f64_to_i64(price).max(1)
}

/// Sell price: base value times the shop's sell fraction, nudged by
/// reputation, rounded down.
#[must_use]
pub fn sell_price(item: &ItemDef, shop: &ShopDef, reputation: i32) -> i64 {
    let reputation_factor = 1.0 + f64::from(reputation) * REPUTATION_PRICE_STEP;
    let price = i64_to_f64(item.value) * shop.sell_fraction * reputation_factor;
    floor_f64_to_i64(price).max(0)
}

/// A shop counter opened for browsing. Stock is copied from the definition
/// when the shop opens and lives only for the visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    pub shop_id: String,
    stock: Vec<StockLine>,
}

impl ShopState {
    #[must_use]
    pub fn new(def: &ShopDef) -> Self {
        Self {
            shop_id: def.id.clone(),
            stock: def.stock.clone(),
        }
    }

    /// Remaining quantity of an item; `None` quantity means unlimited.
    #[must_use]
    pub fn stocked(&self, item_id: &str) -> Option<&StockLine> {
        self.stock.iter().find(|line| line.item_id == item_id)
    }

    /// Purchase one unit of `item_id`. Gold and inventory move together or
    /// not at all.
    ///
    /// # Errors
    ///
    /// Returns the refusal reason; player state is unchanged on refusal.
    pub fn buy(
        &mut self,
        content: &ContentData,
        player: &mut PlayerStats,
        inventory: &mut Inventory,
        item_id: &str,
    ) -> Result<i64, TradeRefusal> {
        let Some(shop) = content.shop(&self.shop_id) else {
            return Err(TradeRefusal::UnknownItem);
        };
        let Some(item) = content.item(item_id) else {
            return Err(TradeRefusal::UnknownItem);
        };
        let Some(line_index) = self.stock.iter().position(|line| line.item_id == item_id) else {
            return Err(TradeRefusal::OutOfStock);
        };
        if self.stock[line_index].quantity == Some(0) {
            return Err(TradeRefusal::OutOfStock);
        }
        let price = buy_price(item, shop, player.reputation);
        if player.gold < price {
            return Err(TradeRefusal::InsufficientGold);
        }

        player.gold -= price;
        inventory.add(item_id, 1);
        if let Some(quantity) = &mut self.stock[line_index].quantity {
            *quantity -= 1;
        }
        Ok(price)
    }

    /// Sell one unit of `item_id`. Refused when the shop does not buy the
    /// item's category or the player does not carry it.
    ///
    /// # Errors
    ///
    /// Returns the refusal reason; player state is unchanged on refusal.
    pub fn sell(
        &mut self,
        content: &ContentData,
        player: &mut PlayerStats,
        inventory: &mut Inventory,
        item_id: &str,
    ) -> Result<i64, TradeRefusal> {
        let Some(shop) = content.shop(&self.shop_id) else {
            return Err(TradeRefusal::UnknownItem);
        };
        let Some(item) = content.item(item_id) else {
            return Err(TradeRefusal::UnknownItem);
        };
        if !shop.accepts.is_empty() && !shop.accepts.contains(&item.category) {
            return Err(TradeRefusal::CategoryNotAccepted);
        }
        if !inventory.remove(item_id, 1) {
            return Err(TradeRefusal::NotCarried);
        }
        let price = sell_price(item, shop, player.reputation);
        player.gold += price;
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ItemCategory, ItemEffects};

    fn item(id: &str, value: i64, category: ItemCategory) -> ItemDef {
        ItemDef {
            id: id.to_string(),
            name: id.to_string(),
            desc: String::new(),
            value,
            category,
            effects: ItemEffects::default(),
        }
    }

    fn fixture_content() -> ContentData {
        let mut content = ContentData::empty();
        content.items.push(item("revolver", 40, ItemCategory::Weapon));
        content.items.push(item("screws", 2, ItemCategory::Material));
        content.items.push(item("locket", 15, ItemCategory::Curio));
        content.shops.push(ShopDef {
            id: "general_store".to_string(),
            name: "General Store".to_string(),
            price_modifier: 1.2,
            sell_fraction: 0.5,
            accepts: vec![ItemCategory::Weapon, ItemCategory::Material],
            stock: vec![
                StockLine {
                    item_id: "revolver".to_string(),
                    quantity: Some(1),
                },
                StockLine {
                    item_id: "screws".to_string(),
                    quantity: None,
                },
            ],
        });
        content
    }

    #[test]
    fn buy_moves_gold_and_stock_atomically() {
        let content = fixture_content();
        let shop_def = content.shop("general_store").unwrap();
        let mut shop = ShopState::new(shop_def);
        let mut player = PlayerStats {
            gold: 100,
            ..PlayerStats::default()
        };
        let mut inventory = Inventory::new();

        let price = shop
            .buy(&content, &mut player, &mut inventory, "revolver")
            .unwrap();
        assert_eq!(price, 48); // ceil(40 * 1.2)
        assert_eq!(player.gold, 52);
        assert_eq!(inventory.quantity_of("revolver"), 1);

        // The single revolver is gone now.
        assert_eq!(
            shop.buy(&content, &mut player, &mut inventory, "revolver"),
            Err(TradeRefusal::OutOfStock)
        );
        assert_eq!(player.gold, 52);
        assert_eq!(inventory.quantity_of("revolver"), 1);
    }

    #[test]
    fn insufficient_gold_is_rejected_without_changes() {
        let content = fixture_content();
        let mut shop = ShopState::new(content.shop("general_store").unwrap());
        let mut player = PlayerStats {
            gold: 5,
            ..PlayerStats::default()
        };
        let mut inventory = Inventory::new();
        assert_eq!(
            shop.buy(&content, &mut player, &mut inventory, "revolver"),
            Err(TradeRefusal::InsufficientGold)
        );
        assert_eq!(player.gold, 5);
        assert!(inventory.is_empty());
    }

    #[test]
    fn sell_round_trip_and_category_guard() {
        let content = fixture_content();
        let mut shop = ShopState::new(content.shop("general_store").unwrap());
        let mut player = PlayerStats {
            gold: 0,
            ..PlayerStats::default()
        };
        let mut inventory = Inventory::new();
        inventory.add("screws", 3);
        inventory.add("locket", 1);

        let price = shop
            .sell(&content, &mut player, &mut inventory, "screws")
            .unwrap();
        assert_eq!(price, 1); // floor(2 * 0.5)
        assert_eq!(player.gold, 1);
        assert_eq!(inventory.quantity_of("screws"), 2);

        // Curios are not on the accepted list.
        assert_eq!(
            shop.sell(&content, &mut player, &mut inventory, "locket"),
            Err(TradeRefusal::CategoryNotAccepted)
        );
        assert_eq!(inventory.quantity_of("locket"), 1);
        assert_eq!(player.gold, 1);

        // Selling something the player lacks is refused.
        assert_eq!(
            shop.sell(&content, &mut player, &mut inventory, "revolver"),
            Err(TradeRefusal::NotCarried)
        );
    }

    #[test]
    fn reputation_sways_prices_in_the_players_favor() {
        let content = fixture_content();
        let shop = content.shop("general_store").unwrap();
        let revolver = content.item("revolver").unwrap();

        let neutral_buy = buy_price(revolver, shop, 0);
        let liked_buy = buy_price(revolver, shop, 50);
        let disliked_buy = buy_price(revolver, shop, -50);
        assert!(liked_buy < neutral_buy);
        assert!(disliked_buy > neutral_buy);

        let neutral_sell = sell_price(revolver, shop, 0);
        let liked_sell = sell_price(revolver, shop, 50);
        assert!(liked_sell >= neutral_sell);
    }

    #[test]
    fn prices_never_drop_below_floor() {
        let content = fixture_content();
        let shop = content.shop("general_store").unwrap();
        let screws = content.item("screws").unwrap();
        assert!(buy_price(screws, shop, 50) >= 1);
        assert!(sell_price(screws, shop, -50) >= 0);
    }
}
