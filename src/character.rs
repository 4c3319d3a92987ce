//! Character model: stats, resource pools, equipment, inventory, and the
//! class-specific combat formulas.
//!
//! The class set is closed: Warrior (fury), Mage (mana and spell power), and
//! Archer (arrows and critical hits). Each class defines its own attack
//! formula, special ability, and level-up stat deltas.

use crate::errors::GameError;
use crate::items::{Armor, ArmorSlot, GameItem, Potion, PotionKind, Weapon};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Experience required for each level.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
/// Default inventory capacity.
pub const DEFAULT_INVENTORY_CAPACITY: usize = 20;
/// How many recently used items the history retains.
const RECENT_HISTORY_LIMIT: usize = 10;

// Warrior
const MAX_FURY: u32 = 100;
const FURY_PER_HIT: u32 = 10;
const BERSERK_FURY_COST: u32 = 50;
const SHIELD_BLOCK_MANA_COST: u32 = 20;

// Mage
const FIREBALL_MANA_COST: u32 = 25;
const HEAL_MANA_COST: u32 = 30;

// Archer
pub const MAX_ARROWS: u32 = 30;
const MULTISHOT_ARROW_COST: u32 = 3;
const ARROW_PRICE: u32 = 5;
const EVASIVE_MANA_COST: u32 = 15;

// ============================================================================
// Identity
// ============================================================================

/// Unique character identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        CharacterId(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Classes
// ============================================================================

/// The fixed set of character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Warrior,
    Mage,
    Archer,
}

impl ClassKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Warrior => "Warrior",
            ClassKind::Mage => "Mage",
            ClassKind::Archer => "Archer",
        }
    }

    pub fn all() -> &'static [ClassKind] {
        &[ClassKind::Warrior, ClassKind::Mage, ClassKind::Archer]
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-class resource state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassState {
    Warrior {
        fury: u32,
    },
    Mage {
        spell_power: u32,
    },
    Archer {
        arrows: u32,
        crit_chance: f64,
        crit_multiplier: f64,
    },
}

// ============================================================================
// Character
// ============================================================================

/// A combatant: player hero or dungeon monster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,

    pub current_health: u32,
    pub max_health: u32,
    pub current_mana: u32,
    pub max_mana: u32,
    pub strength: u32,
    pub defense: u32,

    pub class: ClassState,

    pub weapon: Option<Weapon>,
    pub armor: HashMap<ArmorSlot, Armor>,
    pub inventory: Vec<GameItem>,
    pub inventory_capacity: usize,
    pub recently_used: Vec<GameItem>,

    /// Set by the defend action; halves the next hit taken, then clears.
    #[serde(default)]
    pub defending: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, class: ClassKind) -> Self {
        let (max_health, max_mana, strength, defense, state) = match class {
            ClassKind::Warrior => (150, 30, 15, 10, ClassState::Warrior { fury: 0 }),
            ClassKind::Mage => (80, 150, 5, 3, ClassState::Mage { spell_power: 20 }),
            ClassKind::Archer => (
                100,
                80,
                12,
                5,
                ClassState::Archer {
                    arrows: MAX_ARROWS,
                    crit_chance: 0.15,
                    crit_multiplier: 2.0,
                },
            ),
        };

        Self {
            id: CharacterId::new(),
            name: name.into(),
            level: 1,
            experience: 0,
            gold: 0,
            current_health: max_health,
            max_health,
            current_mana: max_mana,
            max_mana,
            strength,
            defense,
            class: state,
            weapon: None,
            armor: HashMap::new(),
            inventory: Vec::new(),
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            recently_used: Vec::new(),
            defending: false,
        }
    }

    pub fn warrior(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Warrior)
    }

    pub fn mage(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Mage)
    }

    pub fn archer(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Archer)
    }

    pub fn with_inventory_capacity(mut self, capacity: usize) -> Self {
        self.inventory_capacity = capacity;
        self
    }

    pub fn class_kind(&self) -> ClassKind {
        match self.class {
            ClassState::Warrior { .. } => ClassKind::Warrior,
            ClassState::Mage { .. } => ClassKind::Mage,
            ClassState::Archer { .. } => ClassKind::Archer,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    // ========================================================================
    // Health and resources
    // ========================================================================

    /// Apply incoming damage. Equipped armor reduces it piece by piece
    /// (each slot's factor is weighted by its coverage and capped at 0.75,
    /// composed multiplicatively with ceiling rounding), a raised guard
    /// halves what remains, and the result comes off current health.
    /// Returns the damage actually applied. A Warrior gains fury on every
    /// hit taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let mut damage = amount;
        for slot in ArmorSlot::all() {
            if let Some(armor) = self.armor.get(slot) {
                damage = armor.reduce_damage(damage);
            }
        }

        if self.defending {
            damage = damage.div_ceil(2);
            self.defending = false;
        }

        self.current_health = self.current_health.saturating_sub(damage);

        if let ClassState::Warrior { fury } = &mut self.class {
            *fury = (*fury + FURY_PER_HIT).min(MAX_FURY);
        }

        damage
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }

    pub fn restore_mana(&mut self, amount: u32) {
        self.current_mana = (self.current_mana + amount).min(self.max_mana);
    }

    /// Deduct mana, or return false without mutation if there isn't enough.
    pub fn use_mana(&mut self, amount: u32) -> bool {
        if self.current_mana < amount {
            return false;
        }
        self.current_mana -= amount;
        true
    }

    /// Base defense plus every equipped armor piece.
    pub fn total_defense(&self) -> u32 {
        self.defense + self.armor.values().map(|a| a.defense).sum::<u32>()
    }

    // ========================================================================
    // Combat formulas
    // ========================================================================

    /// Class-specific attack damage. Consults the equipped weapon's damage
    /// roll; Warriors add a fury bonus, Archers roll for a critical hit.
    pub fn attack_damage<R: Rng>(&self, rng: &mut R) -> u32 {
        let weapon_damage = self
            .weapon
            .as_ref()
            .map(|w| w.roll_damage_with_rng(rng))
            .unwrap_or(0);
        let base = self.strength + weapon_damage;

        match &self.class {
            ClassState::Warrior { fury } => base + fury / 10,
            ClassState::Mage { .. } => base,
            ClassState::Archer {
                crit_chance,
                crit_multiplier,
                ..
            } => {
                if rng.gen::<f64>() < *crit_chance {
                    (base as f64 * crit_multiplier) as u32
                } else {
                    base
                }
            }
        }
    }

    /// Execute the class special ability against a target.
    ///
    /// - Warrior, Berserk Strike: spends 50 fury for a double-damage blow.
    /// - Mage, Fireball: spends 25 mana, deals `ceil(spellPower * 1.5)`.
    /// - Archer, Multishot: spends 3 arrows for three shots at
    ///   `floor(attackDamage * 0.7)` each, independent crit rolls.
    ///
    /// Fails with `InsufficientResource` when the pool is short, leaving all
    /// state untouched.
    pub fn special_ability<R: Rng>(
        &mut self,
        target: &mut Character,
        rng: &mut R,
    ) -> Result<String, GameError> {
        match &mut self.class {
            ClassState::Warrior { fury } => {
                if *fury < BERSERK_FURY_COST {
                    return Err(GameError::InsufficientResource {
                        resource: "fury",
                        current: *fury,
                        required: BERSERK_FURY_COST,
                    });
                }
                *fury -= BERSERK_FURY_COST;
                let damage = self.attack_damage(rng) * 2;
                let dealt = target.take_damage(damage);
                Ok(format!(
                    "{} unleashes a Berserk Strike on {} for {} damage!",
                    self.name, target.name, dealt
                ))
            }
            ClassState::Mage { spell_power } => {
                let power = *spell_power;
                if !self.use_mana(FIREBALL_MANA_COST) {
                    return Err(GameError::InsufficientResource {
                        resource: "mana",
                        current: self.current_mana,
                        required: FIREBALL_MANA_COST,
                    });
                }
                let damage = (power as f64 * 1.5).ceil() as u32;
                let dealt = target.take_damage(damage);
                Ok(format!(
                    "{} hurls a Fireball at {} for {} damage!",
                    self.name, target.name, dealt
                ))
            }
            ClassState::Archer { arrows, .. } => {
                if *arrows < MULTISHOT_ARROW_COST {
                    return Err(GameError::InsufficientResource {
                        resource: "arrows",
                        current: *arrows,
                        required: MULTISHOT_ARROW_COST,
                    });
                }
                *arrows -= MULTISHOT_ARROW_COST;
                let mut total = 0;
                for _ in 0..3 {
                    let hit = (self.attack_damage(rng) as f64 * 0.7).floor() as u32;
                    total += target.take_damage(hit);
                }
                Ok(format!(
                    "{} fires a Multishot at {} for {} total damage!",
                    self.name, target.name, total
                ))
            }
        }
    }

    // ========================================================================
    // Progression
    // ========================================================================

    /// Accumulate experience, leveling up for every full threshold crossed.
    /// Each level-up applies the class stat deltas and refills both pools.
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience += amount;
        while self.experience >= EXPERIENCE_PER_LEVEL {
            self.experience -= EXPERIENCE_PER_LEVEL;
            self.level_up();
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        match &mut self.class {
            ClassState::Warrior { .. } => {
                self.max_health += 20;
                self.max_mana += 5;
                self.strength += 3;
                self.defense += 2;
            }
            ClassState::Mage { spell_power } => {
                self.max_health += 8;
                self.max_mana += 25;
                self.strength += 1;
                self.defense += 1;
                *spell_power += 5;
            }
            ClassState::Archer {
                arrows,
                crit_chance,
                ..
            } => {
                self.max_health += 12;
                self.max_mana += 10;
                self.strength += 2;
                self.defense += 1;
                *crit_chance = (*crit_chance + 0.02).min(0.5);
                *arrows = MAX_ARROWS;
            }
        }
        self.current_health = self.max_health;
        self.current_mana = self.max_mana;
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub fn add_item(&mut self, item: GameItem) -> Result<(), GameError> {
        if self.inventory.len() >= self.inventory_capacity {
            return Err(GameError::InventoryFull {
                item: item.name().to_string(),
                capacity: self.inventory_capacity,
            });
        }
        self.inventory.push(item);
        Ok(())
    }

    /// Remove the first item matching the name (case-insensitive).
    pub fn remove_item(&mut self, name: &str) -> Result<GameItem, GameError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GameError::ItemNotFound {
                item: name.to_string(),
            })?;
        Ok(self.inventory.remove(index))
    }

    pub fn find_item(&self, name: &str) -> Option<&GameItem> {
        self.inventory
            .iter()
            .find(|i| i.name().eq_ignore_ascii_case(name))
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.find_item(name).is_some()
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    /// Equip a weapon from the inventory by name. Any currently equipped
    /// weapon returns to the inventory first. The whole operation is atomic:
    /// if the displaced weapon has no free slot to return to, nothing moves.
    pub fn equip_weapon(&mut self, name: &str) -> Result<(), GameError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GameError::ItemNotFound {
                item: name.to_string(),
            })?;
        if !matches!(self.inventory[index], GameItem::Weapon(_)) {
            return Err(GameError::invalid_action(
                "equip weapon",
                format!("'{}' is not a weapon", name),
            ));
        }
        if let Some(old) = &self.weapon {
            if self.inventory.len() >= self.inventory_capacity {
                return Err(GameError::InventoryFull {
                    item: old.base.name.clone(),
                    capacity: self.inventory_capacity,
                });
            }
        }

        let GameItem::Weapon(new_weapon) = self.inventory.remove(index) else {
            unreachable!("index checked above");
        };
        if let Some(old) = self.weapon.take() {
            self.inventory.push(GameItem::Weapon(old));
        }
        self.weapon = Some(new_weapon);
        Ok(())
    }

    /// Equip an armor piece from the inventory by name, into its own slot.
    /// Same displacement and atomicity rules as `equip_weapon`.
    pub fn equip_armor(&mut self, name: &str) -> Result<(), GameError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GameError::ItemNotFound {
                item: name.to_string(),
            })?;
        let GameItem::Armor(piece) = &self.inventory[index] else {
            return Err(GameError::invalid_action(
                "equip armor",
                format!("'{}' is not armor", name),
            ));
        };
        let slot = piece.slot;
        if let Some(old) = self.armor.get(&slot) {
            if self.inventory.len() >= self.inventory_capacity {
                return Err(GameError::InventoryFull {
                    item: old.base.name.clone(),
                    capacity: self.inventory_capacity,
                });
            }
        }

        let GameItem::Armor(new_armor) = self.inventory.remove(index) else {
            unreachable!("index checked above");
        };
        if let Some(old) = self.armor.remove(&slot) {
            self.inventory.push(GameItem::Armor(old));
        }
        self.armor.insert(slot, new_armor);
        Ok(())
    }

    // ========================================================================
    // Recently used history
    // ========================================================================

    /// Push onto the bounded LIFO history, dropping the oldest entry when
    /// the limit is reached.
    pub fn push_recently_used(&mut self, item: GameItem) {
        if self.recently_used.len() >= RECENT_HISTORY_LIMIT {
            self.recently_used.remove(0);
        }
        self.recently_used.push(item);
    }

    pub fn pop_recently_used(&mut self) -> Option<GameItem> {
        self.recently_used.pop()
    }

    pub fn peek_recently_used(&self) -> Option<&GameItem> {
        self.recently_used.last()
    }

    // ========================================================================
    // Gold
    // ========================================================================

    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), GameError> {
        if self.gold < amount {
            return Err(GameError::InsufficientGold {
                current: self.gold,
                required: amount,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    // ========================================================================
    // Potions
    // ========================================================================

    /// Drink a potion, applying its effect and spending one use.
    /// Restorative potions fail when the pool is already full; stat elixirs
    /// add their potency to the base stat permanently.
    pub fn apply_potion(&mut self, potion: &mut Potion) -> Result<String, GameError> {
        if potion.is_spent() {
            return Err(GameError::invalid_action(
                "use potion",
                format!("'{}' has no uses remaining", potion.base.name),
            ));
        }
        let line = match potion.kind {
            PotionKind::Health => {
                if self.current_health >= self.max_health {
                    return Err(GameError::invalid_action(
                        "use potion",
                        "health is already full",
                    ));
                }
                self.heal(potion.potency);
                format!("{} restores {} health!", self.name, potion.potency)
            }
            PotionKind::Mana => {
                if self.current_mana >= self.max_mana {
                    return Err(GameError::invalid_action(
                        "use potion",
                        "mana is already full",
                    ));
                }
                self.restore_mana(potion.potency);
                format!("{} restores {} mana!", self.name, potion.potency)
            }
            PotionKind::Strength => {
                self.strength += potion.potency;
                format!("{} gains {} strength!", self.name, potion.potency)
            }
            PotionKind::Defense => {
                self.defense += potion.potency;
                format!("{} gains {} defense!", self.name, potion.potency)
            }
        };
        potion.remaining_uses -= 1;
        Ok(line)
    }

    // ========================================================================
    // Class extras
    // ========================================================================

    /// Warrior only: spend mana to absorb most of a blow, taking just a
    /// quarter of it (rounded up). Returns the damage taken.
    pub fn shield_block(&mut self, amount: u32) -> Result<u32, GameError> {
        if self.class_kind() != ClassKind::Warrior {
            return Err(GameError::invalid_action(
                "shield block",
                "only a Warrior can shield block",
            ));
        }
        if !self.use_mana(SHIELD_BLOCK_MANA_COST) {
            return Err(GameError::InsufficientResource {
                resource: "mana",
                current: self.current_mana,
                required: SHIELD_BLOCK_MANA_COST,
            });
        }
        let taken = (amount as f64 * 0.25).ceil() as u32;
        self.current_health = self.current_health.saturating_sub(taken);
        Ok(taken)
    }

    /// Mage only: spend mana to heal for the current spell power.
    pub fn cast_heal(&mut self) -> Result<u32, GameError> {
        let ClassState::Mage { spell_power } = self.class else {
            return Err(GameError::invalid_action(
                "cast heal",
                "only a Mage can cast heal",
            ));
        };
        if !self.use_mana(HEAL_MANA_COST) {
            return Err(GameError::InsufficientResource {
                resource: "mana",
                current: self.current_mana,
                required: HEAL_MANA_COST,
            });
        }
        self.heal(spell_power);
        Ok(spell_power)
    }

    /// Mage only: convert mana into a shield where 1 mana absorbs 2 damage.
    /// Returns the damage left over after absorption; the caller applies it.
    pub fn mana_shield(&mut self, damage: u32) -> Result<u32, GameError> {
        if self.class_kind() != ClassKind::Mage {
            return Err(GameError::invalid_action(
                "mana shield",
                "only a Mage can raise a mana shield",
            ));
        }
        let needed = damage.div_ceil(2);
        if self.current_mana >= needed {
            self.current_mana -= needed;
            Ok(0)
        } else {
            let absorbed = self.current_mana * 2;
            self.current_mana = 0;
            Ok(damage - absorbed.min(damage))
        }
    }

    /// Archer only: fire a single arrow at the target.
    pub fn shoot_arrow<R: Rng>(
        &mut self,
        target: &mut Character,
        rng: &mut R,
    ) -> Result<u32, GameError> {
        let ClassState::Archer { arrows, .. } = &mut self.class else {
            return Err(GameError::invalid_action(
                "shoot arrow",
                "only an Archer can shoot arrows",
            ));
        };
        if *arrows == 0 {
            return Err(GameError::InsufficientResource {
                resource: "arrows",
                current: 0,
                required: 1,
            });
        }
        *arrows -= 1;
        let damage = self.attack_damage(rng);
        Ok(target.take_damage(damage))
    }

    /// Archer only: buy arrows back up to the maximum at a fixed price per
    /// arrow. Returns how many were bought.
    pub fn refill_arrows(&mut self) -> Result<u32, GameError> {
        let ClassState::Archer { arrows, .. } = &self.class else {
            return Err(GameError::invalid_action(
                "refill arrows",
                "only an Archer carries arrows",
            ));
        };
        let missing = MAX_ARROWS - arrows;
        self.spend_gold(missing * ARROW_PRICE)?;
        if let ClassState::Archer { arrows, .. } = &mut self.class {
            *arrows = MAX_ARROWS;
        }
        Ok(missing)
    }

    /// Archer only: spend mana for a dodge attempt with a chance scaled off
    /// the critical-hit stat. Returns whether the dodge succeeds.
    pub fn evasive_maneuver<R: Rng>(&mut self, rng: &mut R) -> Result<bool, GameError> {
        let ClassState::Archer { crit_chance, .. } = self.class else {
            return Err(GameError::invalid_action(
                "evasive maneuver",
                "only an Archer can take evasive maneuvers",
            ));
        };
        if !self.use_mana(EVASIVE_MANA_COST) {
            return Err(GameError::InsufficientResource {
                resource: "mana",
                current: self.current_mana,
                required: EVASIVE_MANA_COST,
            });
        }
        Ok(rng.gen::<f64>() < crit_chance * 1.5)
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Lv.{} {}) HP {}/{}",
            self.name,
            self.level,
            self.class_kind(),
            self.current_health,
            self.max_health
        )
    }
}
