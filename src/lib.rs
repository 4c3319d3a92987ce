//! Turn-based combat and character-progression engine for a single-player
//! dungeon crawler.
//!
//! This crate provides:
//! - Warrior, Mage, and Archer character classes with distinct resources,
//!   attack formulas, and level-up rules
//! - Weapons, armor, and potions with rarity-based trade pricing
//! - A priority-ordered action queue and a turn resolver that detects
//!   battle termination
//! - Shop and dungeon-map collaborators around the combat core
//!
//! Randomness is always injectable: every rolling operation accepts any
//! [`rand::Rng`], so battles replay deterministically under a seeded
//! generator.
//!
//! # Quick Start
//!
//! ```
//! use dungeon_core::{ActionKind, Battle, Character};
//!
//! let hero = Character::warrior("Aldric");
//! let ghoul = Character::mage("Crypt Ghoul");
//!
//! let mut battle = Battle::new(hero, ghoul);
//! battle.start()?;
//! battle.enqueue_player_action(ActionKind::Attack)?;
//!
//! while let Some(outcome) = battle.resolve_next_action() {
//!     println!("{outcome}");
//! }
//! # Ok::<(), dungeon_core::GameError>(())
//! ```

pub mod actions;
pub mod battle;
pub mod character;
pub mod errors;
pub mod items;
pub mod map;
pub mod shop;
pub mod utils;

// Primary public API
pub use actions::{ActionKind, ActionSource, BattleAction, ScriptedActions, Side};
pub use battle::{Battle, BattleState};
pub use character::{Character, CharacterId, ClassKind, ClassState};
pub use errors::GameError;
pub use items::{Armor, ArmorSlot, GameItem, Item, Potion, PotionKind, Rarity, Weapon, WeaponKind};
pub use map::{DungeonMap, Location};
pub use shop::Shop;
