//! Shop: item stock and buy/sell transactions against a character's gold.

use crate::character::Character;
use crate::errors::GameError;
use crate::items::GameItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// A shop with a list of wares and per-item stock counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    inventory: Vec<GameItem>,
    stock: HashMap<String, u32>,
}

impl Shop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: Vec::new(),
            stock: HashMap::new(),
        }
    }

    /// Add an item to the shop with the given stock count. Restocking an
    /// existing item adds to its count.
    pub fn add_item(&mut self, item: GameItem, stock: u32) {
        let key = item.name().to_lowercase();
        if !self.stock.contains_key(&key) {
            self.inventory.push(item);
        }
        *self.stock.entry(key).or_insert(0) += stock;
    }

    /// Items currently in stock.
    pub fn available_items(&self) -> Vec<&GameItem> {
        self.inventory
            .iter()
            .filter(|i| self.stock_of(i.name()) > 0)
            .collect()
    }

    /// In-stock items of one category ("Weapon", "Armor", "Potion").
    pub fn items_by_category(&self, category: &str) -> Vec<&GameItem> {
        self.available_items()
            .into_iter()
            .filter(|i| i.category().eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn stock_of(&self, name: &str) -> u32 {
        self.stock.get(&name.to_lowercase()).copied().unwrap_or(0)
    }

    fn find_in_stock(&self, name: &str) -> Option<&GameItem> {
        self.inventory
            .iter()
            .find(|i| i.name().eq_ignore_ascii_case(name) && self.stock_of(i.name()) > 0)
    }

    /// Sell an item to the buyer: checks stock, gold, and inventory space,
    /// then moves gold and goods. Returns the price paid.
    pub fn buy_item(&mut self, buyer: &mut Character, name: &str) -> Result<u32, GameError> {
        let item = self
            .find_in_stock(name)
            .ok_or_else(|| GameError::ItemNotFound {
                item: name.to_string(),
            })?
            .clone();
        let price = item.buy_price();
        if buyer.gold < price {
            return Err(GameError::InsufficientGold {
                current: buyer.gold,
                required: price,
            });
        }
        if buyer.inventory.len() >= buyer.inventory_capacity {
            return Err(GameError::InventoryFull {
                item: item.name().to_string(),
                capacity: buyer.inventory_capacity,
            });
        }

        buyer.spend_gold(price)?;
        buyer.add_item(item.clone())?;
        *self.stock.entry(item.name().to_lowercase()).or_insert(1) -= 1;
        Ok(price)
    }

    /// Buy an item from the seller at the sell price. Items that have been
    /// used are refused. Returns the gold credited.
    pub fn sell_item(&mut self, seller: &mut Character, name: &str) -> Result<u32, GameError> {
        let item = seller.find_item(name).ok_or_else(|| GameError::ItemNotFound {
            item: name.to_string(),
        })?;
        if !item.is_sellable() {
            return Err(GameError::invalid_action(
                "sell item",
                format!("'{}' cannot be sold", item.name()),
            ));
        }
        let proceeds = item.sell_price();
        seller.remove_item(name)?;
        seller.add_gold(proceeds);
        Ok(proceeds)
    }

    /// Total buy-price value of everything in stock.
    pub fn total_value(&self) -> u32 {
        self.inventory
            .iter()
            .map(|i| i.buy_price() * self.stock_of(i.name()))
            .sum()
    }

    /// Human-readable stock listing.
    pub fn inventory_report(&self) -> String {
        let mut report = format!("=== {} ===\n", self.name);
        for item in self.available_items() {
            let _ = writeln!(
                report,
                "{} [{}] x{} - {} gold",
                item.name(),
                item.rarity(),
                self.stock_of(item.name()),
                item.buy_price()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{get_potion, get_weapon, Potion, PotionKind};

    fn stocked_shop() -> Shop {
        let mut shop = Shop::new("The Rusty Anvil");
        shop.add_item(GameItem::Weapon(get_weapon("Iron Sword").unwrap()), 2);
        shop.add_item(
            GameItem::Potion(get_potion("Minor Health Potion").unwrap()),
            5,
        );
        shop
    }

    #[test]
    fn test_buy_item_moves_gold_and_stock() {
        let mut shop = stocked_shop();
        let mut hero = Character::warrior("Borin");
        hero.add_gold(100);

        let price = shop.buy_item(&mut hero, "Iron Sword").unwrap();
        assert_eq!(price, 50);
        assert_eq!(hero.gold, 50);
        assert!(hero.has_item("Iron Sword"));
        assert_eq!(shop.stock_of("Iron Sword"), 1);
    }

    #[test]
    fn test_buy_requires_gold_and_stock() {
        let mut shop = stocked_shop();
        let mut hero = Character::warrior("Borin");

        assert!(matches!(
            shop.buy_item(&mut hero, "Iron Sword"),
            Err(GameError::InsufficientGold {
                current: 0,
                required: 50
            })
        ));

        hero.add_gold(1000);
        shop.buy_item(&mut hero, "Iron Sword").unwrap();
        shop.buy_item(&mut hero, "Iron Sword").unwrap();
        assert!(matches!(
            shop.buy_item(&mut hero, "Iron Sword"),
            Err(GameError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_buy_respects_inventory_capacity() {
        let mut shop = stocked_shop();
        let mut hero = Character::warrior("Borin").with_inventory_capacity(1);
        hero.add_gold(1000);
        shop.buy_item(&mut hero, "Minor Health Potion").unwrap();
        let err = shop.buy_item(&mut hero, "Iron Sword").unwrap_err();
        assert!(matches!(err, GameError::InventoryFull { .. }));
        // Gold untouched on failure
        assert_eq!(hero.gold, 1000 - 20);
        assert_eq!(shop.stock_of("Iron Sword"), 2);
    }

    #[test]
    fn test_sell_item_credits_half_buy_price() {
        let mut shop = stocked_shop();
        let mut hero = Character::warrior("Borin");
        hero.add_item(GameItem::Weapon(get_weapon("Iron Sword").unwrap()))
            .unwrap();

        let proceeds = shop.sell_item(&mut hero, "Iron Sword").unwrap();
        assert_eq!(proceeds, 25);
        assert_eq!(hero.gold, 25);
        assert!(!hero.has_item("Iron Sword"));
    }

    #[test]
    fn test_used_potion_cannot_be_sold() {
        let mut shop = stocked_shop();
        let mut hero = Character::warrior("Borin");
        let mut potion = Potion::new("Tonic", PotionKind::Health, 10, 2);
        potion.remaining_uses = 1;
        hero.add_item(GameItem::Potion(potion)).unwrap();

        let err = shop.sell_item(&mut hero, "Tonic").unwrap_err();
        assert!(matches!(err, GameError::InvalidAction { .. }));
        assert!(hero.has_item("Tonic"));
    }

    #[test]
    fn test_category_listing_and_value() {
        let shop = stocked_shop();
        assert_eq!(shop.items_by_category("Weapon").len(), 1);
        assert_eq!(shop.items_by_category("Potion").len(), 1);
        // 2 swords at 50 + 5 potions at 20
        assert_eq!(shop.total_value(), 200);

        let report = shop.inventory_report();
        assert!(report.contains("Iron Sword"));
        assert!(report.contains("x5"));
    }
}
