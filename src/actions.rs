//! Battle actions and the priority ordering applied before resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which combatant an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Enemy => "Enemy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of action a combatant can take on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Attack,
    Special,
    UseItem,
    Defend,
    Flee,
}

impl ActionKind {
    /// Fixed priority table; higher resolves first.
    pub fn default_priority(&self) -> i32 {
        match self {
            ActionKind::Flee => 100,
            ActionKind::Defend => 80,
            ActionKind::UseItem => 60,
            ActionKind::Special => 40,
            ActionKind::Attack => 20,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Attack => "Attack",
            ActionKind::Special => "Special Ability",
            ActionKind::UseItem => "Use Item",
            ActionKind::Defend => "Defend",
            ActionKind::Flee => "Flee",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One pending action: actor, target, kind, and resolution priority.
/// Use-item actions additionally carry the item's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleAction {
    pub actor: Side,
    pub target: Side,
    pub kind: ActionKind,
    pub item_name: Option<String>,
    pub priority: i32,
}

impl BattleAction {
    pub fn new(actor: Side, target: Side, kind: ActionKind) -> Self {
        Self {
            actor,
            target,
            kind,
            item_name: None,
            priority: kind.default_priority(),
        }
    }

    /// A use-item action targeting the actor themselves.
    pub fn use_item(actor: Side, item_name: impl Into<String>) -> Self {
        Self {
            actor,
            target: actor,
            kind: ActionKind::UseItem,
            item_name: Some(item_name.into()),
            priority: ActionKind::UseItem.default_priority(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item_name {
            Some(item) => write!(f, "{}: {} ({})", self.actor, self.kind, item),
            None => write!(f, "{}: {}", self.actor, self.kind),
        }
    }
}

/// Reorder a batch by descending priority. The sort is stable, so actions
/// with equal priority keep their insertion order.
pub fn sort_by_priority(actions: &mut [BattleAction]) {
    actions.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Caller-supplied source for the player's next action kind, so the engine
/// never reads input itself.
pub trait ActionSource {
    fn next_action(&mut self) -> ActionKind;
}

/// Plays back a fixed script of action kinds, repeating the last entry once
/// the script is exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedActions {
    script: Vec<ActionKind>,
    index: usize,
}

impl ScriptedActions {
    pub fn new(script: Vec<ActionKind>) -> Self {
        Self { script, index: 0 }
    }
}

impl ActionSource for ScriptedActions {
    fn next_action(&mut self) -> ActionKind {
        let kind = self
            .script
            .get(self.index)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(ActionKind::Attack);
        self.index += 1;
        kind
    }
}
