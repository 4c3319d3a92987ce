//! Turn-based battle resolution.
//!
//! A battle holds the two combatants, a FIFO queue of pending actions, and an
//! append-only event log. Actions resolve one at a time; after every
//! resolution the battle checks whether either side has fallen. Errors raised
//! while resolving an action are downgraded to a failure line in the log so a
//! bad action never aborts the fight.

use crate::actions::{sort_by_priority, ActionKind, ActionSource, BattleAction, Side};
use crate::character::Character;
use crate::errors::GameError;
use crate::items::GameItem;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Weighted AI draw, percent thresholds over [0, 100).
const AI_ATTACK_THRESHOLD: i32 = 60;
const AI_SPECIAL_THRESHOLD: i32 = 85;

/// Base flee chance in percent, adjusted by level difference.
const FLEE_BASE_CHANCE: i32 = 30;
const FLEE_CHANCE_PER_LEVEL: i32 = 5;

/// Battle lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    NotStarted,
    Active,
    Ended,
}

/// A fight between the player and one enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    pub player: Character,
    pub enemy: Character,
    queue: VecDeque<BattleAction>,
    log: Vec<String>,
    state: BattleState,
    winner: Option<Side>,
}

impl Battle {
    pub fn new(player: Character, enemy: Character) -> Self {
        Self {
            player,
            enemy,
            queue: VecDeque::new(),
            log: Vec::new(),
            state: BattleState::NotStarted,
            winner: None,
        }
    }

    /// Open the battle for actions.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.state != BattleState::NotStarted {
            return Err(GameError::invalid_action(
                "start battle",
                "battle has already started",
            ));
        }
        self.state = BattleState::Active;
        self.log
            .push(format!("{} faces {}!", self.player.name, self.enemy.name));
        Ok(())
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == BattleState::Ended
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn combatant(&self, side: Side) -> &Character {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// The event log as a defensive copy.
    pub fn log(&self) -> Vec<String> {
        self.log.clone()
    }

    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    // ========================================================================
    // Queueing
    // ========================================================================

    /// Add an action to the queue. Only an active battle accepts actions.
    pub fn enqueue(&mut self, action: BattleAction) -> Result<(), GameError> {
        match self.state {
            BattleState::Active => {
                self.queue.push_back(action);
                Ok(())
            }
            BattleState::NotStarted => Err(GameError::invalid_action(
                action.kind.name(),
                "battle has not started",
            )),
            BattleState::Ended => Err(GameError::invalid_action(
                action.kind.name(),
                "battle has ended",
            )),
        }
    }

    /// Queue a player action of the given kind against the enemy.
    pub fn enqueue_player_action(&mut self, kind: ActionKind) -> Result<(), GameError> {
        self.enqueue(BattleAction::new(Side::Player, Side::Enemy, kind))
    }

    /// Queue the player using a named item on themselves.
    pub fn enqueue_player_item_action(
        &mut self,
        item_name: impl Into<String>,
    ) -> Result<(), GameError> {
        self.enqueue(BattleAction::use_item(Side::Player, item_name))
    }

    /// Generate and queue the enemy's action: attack 60%, special 25%,
    /// defend 15%.
    pub fn generate_enemy_action<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        let roll = rng.gen_range(0..100);
        let kind = if roll < AI_ATTACK_THRESHOLD {
            ActionKind::Attack
        } else if roll < AI_SPECIAL_THRESHOLD {
            ActionKind::Special
        } else {
            ActionKind::Defend
        };
        self.enqueue(BattleAction::new(Side::Enemy, Side::Player, kind))
    }

    /// Reorder everything pending by descending priority, keeping insertion
    /// order among equal priorities.
    pub fn sort_pending_by_priority(&mut self) {
        let mut batch: Vec<BattleAction> = self.queue.drain(..).collect();
        sort_by_priority(&mut batch);
        self.queue.extend(batch);
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the next pending action, returning its outcome line, or
    /// `None` when the queue is drained or the battle is not active.
    /// Resolution errors become failure lines, never panics or aborts.
    pub fn resolve_next<R: Rng>(&mut self, rng: &mut R) -> Option<String> {
        if self.state != BattleState::Active {
            return None;
        }
        let action = self.queue.pop_front()?;
        let outcome = match self.dispatch(&action, rng) {
            Ok(line) => line,
            Err(err) => format!("{} failed: {}", action, err),
        };
        self.log.push(outcome.clone());
        self.check_battle_end();
        Some(outcome)
    }

    /// Resolve with the thread-local RNG.
    pub fn resolve_next_action(&mut self) -> Option<String> {
        self.resolve_next(&mut rand::thread_rng())
    }

    /// Run one full round: take the player's action from the source, let the
    /// AI pick the enemy's, sort the batch by priority, then resolve until
    /// the queue drains or the battle ends. Returns the outcome lines.
    pub fn play_round<R: Rng>(
        &mut self,
        source: &mut dyn ActionSource,
        rng: &mut R,
    ) -> Result<Vec<String>, GameError> {
        let kind = source.next_action();
        if kind == ActionKind::UseItem {
            return Err(GameError::invalid_action(
                kind.name(),
                "item actions need an item name; queue them directly",
            ));
        }
        self.enqueue_player_action(kind)?;
        self.generate_enemy_action(rng)?;
        self.sort_pending_by_priority();

        let mut outcomes = Vec::new();
        while let Some(outcome) = self.resolve_next(rng) {
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn dispatch<R: Rng>(
        &mut self,
        action: &BattleAction,
        rng: &mut R,
    ) -> Result<String, GameError> {
        match action.kind {
            ActionKind::Attack => self.execute_attack(action.actor, rng),
            ActionKind::Special => self.execute_special(action.actor, rng),
            ActionKind::UseItem => {
                let name = action.item_name.as_deref().ok_or_else(|| {
                    GameError::invalid_action("use item", "no item name supplied")
                })?;
                self.execute_use_item(action.actor, name)
            }
            ActionKind::Defend => self.execute_defend(action.actor),
            ActionKind::Flee => self.execute_flee(action.actor, rng),
        }
    }

    /// Split borrows into (actor, opponent).
    fn pair_mut(&mut self, side: Side) -> (&mut Character, &mut Character) {
        match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }

    fn execute_attack<R: Rng>(&mut self, side: Side, rng: &mut R) -> Result<String, GameError> {
        let (actor, opponent) = self.pair_mut(side);
        let damage = actor.attack_damage(rng);
        let dealt = opponent.take_damage(damage);
        Ok(format!(
            "{} attacks {} for {} damage!",
            actor.name, opponent.name, dealt
        ))
    }

    fn execute_special<R: Rng>(&mut self, side: Side, rng: &mut R) -> Result<String, GameError> {
        let (actor, opponent) = self.pair_mut(side);
        actor.special_ability(opponent, rng)
    }

    fn execute_use_item(&mut self, side: Side, name: &str) -> Result<String, GameError> {
        let (actor, _) = self.pair_mut(side);
        let category = actor
            .find_item(name)
            .map(|item| item.category())
            .ok_or_else(|| GameError::ItemNotFound {
                item: name.to_string(),
            })?;

        match category {
            "Potion" => {
                let GameItem::Potion(mut potion) = actor.remove_item(name)? else {
                    unreachable!("matched above");
                };
                match actor.apply_potion(&mut potion) {
                    Ok(line) => {
                        // Used potions go to history, not back to inventory
                        actor.push_recently_used(GameItem::Potion(potion));
                        Ok(line)
                    }
                    Err(err) => {
                        actor.inventory.push(GameItem::Potion(potion));
                        Err(err)
                    }
                }
            }
            "Weapon" => match actor.equip_weapon(name) {
                Ok(()) => {
                    let equipped = actor.weapon.clone().map(GameItem::Weapon);
                    if let Some(item) = equipped {
                        actor.push_recently_used(item);
                    }
                    Ok(format!("{} equips {}!", actor.name, name))
                }
                Err(err) => Ok(format!("{} fails to equip {}: {}", actor.name, name, err)),
            },
            _ => match actor.equip_armor(name) {
                Ok(()) => {
                    let equipped = actor
                        .armor
                        .values()
                        .find(|a| a.base.name.eq_ignore_ascii_case(name))
                        .cloned()
                        .map(GameItem::Armor);
                    if let Some(item) = equipped {
                        actor.push_recently_used(item);
                    }
                    Ok(format!("{} puts on {}!", actor.name, name))
                }
                Err(err) => Ok(format!("{} fails to put on {}: {}", actor.name, name, err)),
            },
        }
    }

    fn execute_defend(&mut self, side: Side) -> Result<String, GameError> {
        let (actor, _) = self.pair_mut(side);
        actor.defending = true;
        Ok(format!("{} braces for the next attack!", actor.name))
    }

    /// Flee chance is 30% plus 5% per level the fleer has over the opponent.
    /// A successful escape ends the battle with the opponent as winner.
    fn execute_flee<R: Rng>(&mut self, side: Side, rng: &mut R) -> Result<String, GameError> {
        let (actor, opponent) = self.pair_mut(side);
        let chance = FLEE_BASE_CHANCE
            + FLEE_CHANCE_PER_LEVEL * (actor.level as i32 - opponent.level as i32);
        let roll = rng.gen_range(0..100);
        if roll < chance {
            let line = format!("{} flees the battle!", actor.name);
            self.state = BattleState::Ended;
            self.winner = Some(side.opponent());
            Ok(line)
        } else {
            Ok(format!("{} tries to flee but can't escape!", actor.name))
        }
    }

    fn check_battle_end(&mut self) {
        if self.state != BattleState::Active {
            return;
        }
        let fallen = if !self.player.is_alive() {
            Some(Side::Player)
        } else if !self.enemy.is_alive() {
            Some(Side::Enemy)
        } else {
            None
        };
        if let Some(loser) = fallen {
            let winner = loser.opponent();
            self.state = BattleState::Ended;
            self.winner = Some(winner);
            self.log
                .push(format!("{} wins the battle!", self.combatant(winner).name));
        }
    }
}
