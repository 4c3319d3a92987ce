//! Item model: weapons, armor, and potions with rarity-based trade pricing.
//!
//! Items are value objects, immutable after creation except for a potion's
//! remaining-use counter. A small catalog of stock items is provided for
//! seeding shops and encounters.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Rarity
// ============================================================================

/// Rarity tier. Ordered from most to least common; each tier multiplies an
/// item's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn price_multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.5,
            Rarity::Rare => 2.5,
            Rarity::Epic => 4.0,
            Rarity::Legendary => 10.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Base item
// ============================================================================

/// Properties shared by every item kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub weight: u32,
    pub base_price: u32,
    pub rarity: Rarity,
}

impl Item {
    pub fn new(name: impl Into<String>, base_price: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            weight: 1,
            base_price,
            rarity: Rarity::Common,
        }
    }

    /// Price to buy: base price scaled by rarity, rounded up.
    pub fn buy_price(&self) -> u32 {
        (self.base_price as f64 * self.rarity.price_multiplier()).ceil() as u32
    }

    /// Price when sold back: half the buy price, rounded up.
    pub fn sell_price(&self) -> u32 {
        (self.buy_price() as f64 * 0.5).ceil() as u32
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// Weapon category. Carries a combat-style tag and a speed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Sword,
    Axe,
    Bow,
    Staff,
    Dagger,
}

impl WeaponKind {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Sword => "Sword",
            WeaponKind::Axe => "Axe",
            WeaponKind::Bow => "Bow",
            WeaponKind::Staff => "Staff",
            WeaponKind::Dagger => "Dagger",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            WeaponKind::Sword | WeaponKind::Axe | WeaponKind::Dagger => "Melee",
            WeaponKind::Bow => "Ranged",
            WeaponKind::Staff => "Magic",
        }
    }

    pub fn speed_modifier(&self) -> f64 {
        match self {
            WeaponKind::Sword => 1.0,
            WeaponKind::Axe => 1.2,
            WeaponKind::Bow => 0.9,
            WeaponKind::Staff => 1.1,
            WeaponKind::Dagger => 0.7,
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A weapon with a uniform damage range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub base: Item,
    pub min_damage: u32,
    pub max_damage: u32,
    pub kind: WeaponKind,
}

impl Weapon {
    pub fn new(name: impl Into<String>, min_damage: u32, max_damage: u32, kind: WeaponKind) -> Self {
        Self {
            base: Item::new(name, 10),
            min_damage,
            max_damage,
            kind,
        }
    }

    pub fn with_price(mut self, base_price: u32) -> Self {
        self.base.base_price = base_price;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.base.rarity = rarity;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.base.weight = weight;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.description = description.into();
        self
    }

    /// Roll damage uniformly within the weapon's range.
    pub fn roll_damage(&self) -> u32 {
        self.roll_damage_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_damage_with_rng<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min_damage..=self.max_damage)
    }

    pub fn average_damage(&self) -> f64 {
        (self.min_damage + self.max_damage) as f64 / 2.0
    }
}

// ============================================================================
// Armor
// ============================================================================

/// Body slot an armor piece occupies. Each slot contributes a fixed share
/// of the wearer's damage reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    Head,
    Chest,
    Legs,
    Boots,
    Gloves,
}

impl ArmorSlot {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorSlot::Head => "Head",
            ArmorSlot::Chest => "Chest",
            ArmorSlot::Legs => "Legs",
            ArmorSlot::Boots => "Boots",
            ArmorSlot::Gloves => "Gloves",
        }
    }

    /// Fraction of defense this slot contributes to damage reduction.
    pub fn contribution(&self) -> f64 {
        match self {
            ArmorSlot::Head => 0.15,
            ArmorSlot::Chest => 0.40,
            ArmorSlot::Legs => 0.25,
            ArmorSlot::Boots => 0.10,
            ArmorSlot::Gloves => 0.10,
        }
    }

    pub fn all() -> &'static [ArmorSlot] {
        &[
            ArmorSlot::Head,
            ArmorSlot::Chest,
            ArmorSlot::Legs,
            ArmorSlot::Boots,
            ArmorSlot::Gloves,
        ]
    }
}

impl fmt::Display for ArmorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An armor piece occupying one body slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armor {
    pub base: Item,
    pub defense: u32,
    pub slot: ArmorSlot,
}

impl Armor {
    pub fn new(name: impl Into<String>, defense: u32, slot: ArmorSlot) -> Self {
        Self {
            base: Item::new(name, 10),
            defense,
            slot,
        }
    }

    pub fn with_price(mut self, base_price: u32) -> Self {
        self.base.base_price = base_price;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.base.rarity = rarity;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.base.weight = weight;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.description = description.into();
        self
    }

    /// Reduction factor in [0, 0.75], weighted by the slot's coverage.
    pub fn damage_reduction(&self) -> f64 {
        (self.defense as f64 * self.slot.contribution() / 100.0).min(0.75)
    }

    /// Apply this piece's reduction to incoming damage, rounding up.
    pub fn reduce_damage(&self, incoming: u32) -> u32 {
        (incoming as f64 * (1.0 - self.damage_reduction())).ceil() as u32
    }
}

// ============================================================================
// Potions
// ============================================================================

/// Effect a potion applies when drunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotionKind {
    Health,
    Mana,
    Strength,
    Defense,
}

impl PotionKind {
    pub fn name(&self) -> &'static str {
        match self {
            PotionKind::Health => "Health",
            PotionKind::Mana => "Mana",
            PotionKind::Strength => "Strength",
            PotionKind::Defense => "Defense",
        }
    }
}

impl fmt::Display for PotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A consumable with a limited number of uses. Once any use is spent the
/// potion can no longer be sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Potion {
    pub base: Item,
    pub kind: PotionKind,
    pub potency: u32,
    pub max_uses: u32,
    pub remaining_uses: u32,
}

impl Potion {
    pub fn new(name: impl Into<String>, kind: PotionKind, potency: u32, max_uses: u32) -> Self {
        Self {
            // Potions always weigh 1
            base: Item::new(name, 10),
            kind,
            potency,
            max_uses,
            remaining_uses: max_uses,
        }
    }

    pub fn with_price(mut self, base_price: u32) -> Self {
        self.base.base_price = base_price;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.base.rarity = rarity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.description = description.into();
        self
    }

    pub fn is_spent(&self) -> bool {
        self.remaining_uses == 0
    }

    pub fn is_sellable(&self) -> bool {
        self.remaining_uses == self.max_uses
    }
}

// ============================================================================
// Unified item
// ============================================================================

/// Any item that can sit in an inventory or a shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameItem {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
}

impl GameItem {
    pub fn base(&self) -> &Item {
        match self {
            GameItem::Weapon(w) => &w.base,
            GameItem::Armor(a) => &a.base,
            GameItem::Potion(p) => &p.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn weight(&self) -> u32 {
        self.base().weight
    }

    pub fn rarity(&self) -> Rarity {
        self.base().rarity
    }

    pub fn buy_price(&self) -> u32 {
        self.base().buy_price()
    }

    pub fn sell_price(&self) -> u32 {
        self.base().sell_price()
    }

    pub fn is_sellable(&self) -> bool {
        match self {
            GameItem::Potion(p) => p.is_sellable(),
            _ => true,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            GameItem::Weapon(_) => "Weapon",
            GameItem::Armor(_) => "Armor",
            GameItem::Potion(_) => "Potion",
        }
    }
}

impl fmt::Display for GameItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.rarity())
    }
}

// ============================================================================
// Catalog
// ============================================================================

lazy_static::lazy_static! {
    /// Stock weapons.
    pub static ref WEAPONS: Vec<Weapon> = vec![
        Weapon::new("Rusty Dagger", 2, 5, WeaponKind::Dagger)
            .with_price(8)
            .with_description("A chipped blade, better than nothing."),
        Weapon::new("Iron Sword", 5, 12, WeaponKind::Sword)
            .with_price(50)
            .with_weight(6),
        Weapon::new("Battle Axe", 8, 16, WeaponKind::Axe)
            .with_price(80)
            .with_weight(9)
            .with_rarity(Rarity::Uncommon),
        Weapon::new("Hunting Bow", 6, 14, WeaponKind::Bow)
            .with_price(60)
            .with_weight(3),
        Weapon::new("Apprentice Staff", 4, 9, WeaponKind::Staff)
            .with_price(45)
            .with_weight(4),
        Weapon::new("Flame Blade", 12, 24, WeaponKind::Sword)
            .with_price(150)
            .with_weight(6)
            .with_rarity(Rarity::Rare)
            .with_description("The edge glows faintly even in daylight."),
        Weapon::new("Dragonbone Bow", 15, 30, WeaponKind::Bow)
            .with_price(300)
            .with_weight(5)
            .with_rarity(Rarity::Epic),
        Weapon::new("Archmage Staff", 10, 20, WeaponKind::Staff)
            .with_price(500)
            .with_weight(4)
            .with_rarity(Rarity::Legendary),
    ];

    /// Stock armor, one entry per slot plus heavier variants.
    pub static ref ARMORS: Vec<Armor> = vec![
        Armor::new("Leather Cap", 5, ArmorSlot::Head)
            .with_price(15),
        Armor::new("Leather Vest", 8, ArmorSlot::Chest)
            .with_price(40)
            .with_weight(8),
        Armor::new("Leather Leggings", 6, ArmorSlot::Legs)
            .with_price(25)
            .with_weight(5),
        Armor::new("Worn Boots", 3, ArmorSlot::Boots)
            .with_price(10)
            .with_weight(2),
        Armor::new("Cloth Gloves", 2, ArmorSlot::Gloves)
            .with_price(8),
        Armor::new("Iron Helmet", 12, ArmorSlot::Head)
            .with_price(60)
            .with_weight(5)
            .with_rarity(Rarity::Uncommon),
        Armor::new("Iron Breastplate", 20, ArmorSlot::Chest)
            .with_price(120)
            .with_weight(15)
            .with_rarity(Rarity::Uncommon),
        Armor::new("Dragonscale Mail", 40, ArmorSlot::Chest)
            .with_price(400)
            .with_weight(12)
            .with_rarity(Rarity::Epic)
            .with_description("Scales shed by a red dragon, still warm."),
    ];

    /// Stock potions.
    pub static ref POTIONS: Vec<Potion> = vec![
        Potion::new("Minor Health Potion", PotionKind::Health, 30, 1)
            .with_price(20),
        Potion::new("Health Potion", PotionKind::Health, 60, 2)
            .with_price(50),
        Potion::new("Mana Potion", PotionKind::Mana, 50, 2)
            .with_price(45),
        Potion::new("Elixir of Strength", PotionKind::Strength, 5, 1)
            .with_price(120)
            .with_rarity(Rarity::Rare)
            .with_description("Permanently hardens the drinker's muscles."),
        Potion::new("Elixir of Iron Skin", PotionKind::Defense, 3, 1)
            .with_price(100)
            .with_rarity(Rarity::Rare),
    ];
}

/// Get a stock weapon by name.
pub fn get_weapon(name: &str) -> Option<Weapon> {
    WEAPONS
        .iter()
        .find(|w| w.base.name.eq_ignore_ascii_case(name))
        .cloned()
}

/// Get a stock armor piece by name.
pub fn get_armor(name: &str) -> Option<Armor> {
    ARMORS
        .iter()
        .find(|a| a.base.name.eq_ignore_ascii_case(name))
        .cloned()
}

/// Get a stock potion by name.
pub fn get_potion(name: &str) -> Option<Potion> {
    POTIONS
        .iter()
        .find(|p| p.base.name.eq_ignore_ascii_case(name))
        .cloned()
}

/// Try to find any stock item by name.
pub fn find_item(name: &str) -> Option<GameItem> {
    if let Some(weapon) = get_weapon(name) {
        return Some(GameItem::Weapon(weapon));
    }
    if let Some(armor) = get_armor(name) {
        return Some(GameItem::Armor(armor));
    }
    if let Some(potion) = get_potion(name) {
        return Some(GameItem::Potion(potion));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rarity_pricing() {
        let mut sword = Weapon::new("Test Sword", 1, 2, WeaponKind::Sword).with_price(100);
        assert_eq!(sword.base.buy_price(), 100);
        assert_eq!(sword.base.sell_price(), 50);

        sword.base.rarity = Rarity::Uncommon;
        assert_eq!(sword.base.buy_price(), 150);

        sword.base.rarity = Rarity::Legendary;
        assert_eq!(sword.base.buy_price(), 1000);
        assert_eq!(sword.base.sell_price(), 500);
    }

    #[test]
    fn test_buy_price_rounds_up() {
        // 7 * 1.5 = 10.5 -> 11; sell = ceil(5.5) = 6
        let item = Item {
            rarity: Rarity::Uncommon,
            ..Item::new("Trinket", 7)
        };
        assert_eq!(item.buy_price(), 11);
        assert_eq!(item.sell_price(), 6);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Epic < Rarity::Legendary);
        assert_eq!(Rarity::all().len(), 5);
    }

    #[test]
    fn test_weapon_damage_range() {
        let bow = Weapon::new("Test Bow", 6, 14, WeaponKind::Bow);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let damage = bow.roll_damage_with_rng(&mut rng);
            assert!((6..=14).contains(&damage));
        }
        assert_eq!(bow.average_damage(), 10.0);
        assert_eq!(bow.kind.category(), "Ranged");
    }

    #[test]
    fn test_armor_reduction_bounds() {
        // 8 defense on chest: 8 * 0.40 / 100 = 0.032
        let vest = Armor::new("Vest", 8, ArmorSlot::Chest);
        assert!((vest.damage_reduction() - 0.032).abs() < 1e-9);

        // Absurd defense still caps at 0.75
        let wall = Armor::new("Wall", 10_000, ArmorSlot::Chest);
        assert_eq!(wall.damage_reduction(), 0.75);
        assert_eq!(wall.reduce_damage(100), 25);

        // Reduction rounds up, never negative
        assert_eq!(vest.reduce_damage(0), 0);
        assert_eq!(vest.reduce_damage(100), 97);
    }

    #[test]
    fn test_slot_contributions() {
        let total: f64 = ArmorSlot::all().iter().map(|s| s.contribution()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_potion_sellability() {
        let mut potion = Potion::new("Tonic", PotionKind::Health, 10, 2);
        assert!(potion.is_sellable());
        potion.remaining_uses -= 1;
        assert!(!potion.is_sellable());
        assert!(!potion.is_spent());
        potion.remaining_uses -= 1;
        assert!(potion.is_spent());
    }

    #[test]
    fn test_catalog_lookup() {
        let sword = get_weapon("iron sword").unwrap();
        assert_eq!(sword.min_damage, 5);
        assert_eq!(sword.max_damage, 12);

        let cap = get_armor("Leather Cap").unwrap();
        assert_eq!(cap.slot, ArmorSlot::Head);

        assert!(matches!(find_item("Mana Potion"), Some(GameItem::Potion(_))));
        assert!(find_item("Excalibur").is_none());
    }
}
