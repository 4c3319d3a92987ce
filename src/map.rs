//! Location graph: dungeon rooms, connections, and traversal.

use crate::errors::GameError;
use crate::items::GameItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A room or area in the dungeon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    pub danger_level: u32,
    pub connections: Vec<String>,
    pub loot: Vec<GameItem>,
    pub visited: bool,
    pub has_boss: bool,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, danger_level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            danger_level,
            connections: Vec::new(),
            loot: Vec::new(),
            visited: false,
            has_boss: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_loot(mut self, loot: Vec<GameItem>) -> Self {
        self.loot = loot;
        self
    }

    fn add_connection(&mut self, id: &str) {
        if !self.connections.iter().any(|c| c == id) {
            self.connections.push(id.to_string());
        }
    }

    pub fn is_connected_to(&self, id: &str) -> bool {
        self.connections.iter().any(|c| c == id)
    }

    /// Drain and return everything lying here.
    pub fn collect_loot(&mut self) -> Vec<GameItem> {
        std::mem::take(&mut self.loot)
    }
}

/// The dungeon's location graph and the explorer's position in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DungeonMap {
    locations: HashMap<String, Location>,
    start: Option<String>,
    current: Option<String>,
    boss: Option<String>,
}

impl DungeonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location. The first one added becomes the start and the
    /// current position, and counts as visited.
    pub fn add_location(&mut self, mut location: Location) {
        if self.locations.is_empty() {
            location.visited = true;
            self.start = Some(location.id.clone());
            self.current = Some(location.id.clone());
        }
        self.locations.insert(location.id.clone(), location);
    }

    /// Connect two locations in both directions.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), GameError> {
        for id in [a, b] {
            if !self.locations.contains_key(id) {
                return Err(GameError::invalid_action(
                    "connect locations",
                    format!("location '{}' does not exist", id),
                ));
            }
        }
        if let Some(loc) = self.locations.get_mut(a) {
            loc.add_connection(b);
        }
        if let Some(loc) = self.locations.get_mut(b) {
            loc.add_connection(a);
        }
        Ok(())
    }

    /// Move to a location connected to the current one, marking it visited.
    pub fn move_to(&mut self, id: &str) -> Result<&Location, GameError> {
        if !self.locations.contains_key(id) {
            return Err(GameError::invalid_action(
                "move",
                format!("location '{}' does not exist", id),
            ));
        }
        let connected = self
            .current_location()
            .map(|loc| loc.is_connected_to(id))
            .unwrap_or(false);
        if !connected {
            return Err(GameError::invalid_action(
                "move",
                format!("'{}' is not reachable from here", id),
            ));
        }
        self.current = Some(id.to_string());
        let location = self
            .locations
            .get_mut(id)
            .ok_or_else(|| GameError::invalid_action("move", "location vanished"))?;
        location.visited = true;
        Ok(location)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn location_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.locations.get_mut(id)
    }

    pub fn current_location(&self) -> Option<&Location> {
        self.current.as_deref().and_then(|id| self.locations.get(id))
    }

    pub fn start_location(&self) -> Option<&Location> {
        self.start.as_deref().and_then(|id| self.locations.get(id))
    }

    /// Locations reachable from the current position.
    pub fn accessible_locations(&self) -> Vec<&Location> {
        self.current_location()
            .map(|loc| {
                loc.connections
                    .iter()
                    .filter_map(|id| self.locations.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn visited_locations(&self) -> Vec<&Location> {
        self.locations.values().filter(|l| l.visited).collect()
    }

    pub fn unvisited_locations(&self) -> Vec<&Location> {
        self.locations.values().filter(|l| !l.visited).collect()
    }

    pub fn locations_by_danger(&self, danger_level: u32) -> Vec<&Location> {
        self.locations
            .values()
            .filter(|l| l.danger_level == danger_level)
            .collect()
    }

    /// Fraction of locations visited, in [0, 1].
    pub fn exploration_progress(&self) -> f64 {
        if self.locations.is_empty() {
            return 0.0;
        }
        self.visited_locations().len() as f64 / self.locations.len() as f64
    }

    pub fn set_start(&mut self, id: &str) -> Result<(), GameError> {
        if !self.locations.contains_key(id) {
            return Err(GameError::invalid_action(
                "set start",
                format!("location '{}' does not exist", id),
            ));
        }
        self.start = Some(id.to_string());
        Ok(())
    }

    /// Mark a location as the boss lair.
    pub fn set_boss_location(&mut self, id: &str) -> Result<(), GameError> {
        let location = self.locations.get_mut(id).ok_or_else(|| {
            GameError::invalid_action("set boss", format!("location '{}' does not exist", id))
        })?;
        location.has_boss = true;
        self.boss = Some(id.to_string());
        Ok(())
    }

    pub fn boss_location(&self) -> Option<&Location> {
        self.boss.as_deref().and_then(|id| self.locations.get(id))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::get_potion;

    fn small_dungeon() -> DungeonMap {
        let mut map = DungeonMap::new();
        map.add_location(Location::new("entrance", "Dungeon Entrance", 1));
        map.add_location(Location::new("hall", "Great Hall", 3));
        map.add_location(Location::new("crypt", "Crypt", 5));
        map.connect("entrance", "hall").unwrap();
        map.connect("hall", "crypt").unwrap();
        map
    }

    #[test]
    fn test_first_location_is_start_and_visited() {
        let map = small_dungeon();
        assert_eq!(map.start_location().unwrap().id, "entrance");
        assert_eq!(map.current_location().unwrap().id, "entrance");
        assert!(map.location("entrance").unwrap().visited);
        assert!(!map.location("hall").unwrap().visited);
    }

    #[test]
    fn test_connections_are_bidirectional_and_unique() {
        let mut map = small_dungeon();
        map.connect("entrance", "hall").unwrap();
        let entrance = map.location("entrance").unwrap();
        assert_eq!(entrance.connections, vec!["hall".to_string()]);
        assert!(map.location("hall").unwrap().is_connected_to("entrance"));
    }

    #[test]
    fn test_connect_missing_location_fails() {
        let mut map = small_dungeon();
        assert!(matches!(
            map.connect("entrance", "abyss"),
            Err(GameError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_move_requires_connection() {
        let mut map = small_dungeon();
        // Crypt is two hops away
        assert!(matches!(
            map.move_to("crypt"),
            Err(GameError::InvalidAction { .. })
        ));
        map.move_to("hall").unwrap();
        let crypt = map.move_to("crypt").unwrap();
        assert!(crypt.visited);
        assert!(matches!(
            map.move_to("nowhere"),
            Err(GameError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_exploration_progress() {
        let mut map = small_dungeon();
        assert!((map.exploration_progress() - 1.0 / 3.0).abs() < 1e-9);
        map.move_to("hall").unwrap();
        map.move_to("crypt").unwrap();
        assert!((map.exploration_progress() - 1.0).abs() < 1e-9);
        assert!(map.unvisited_locations().is_empty());
    }

    #[test]
    fn test_accessible_and_danger_queries() {
        let map = small_dungeon();
        let accessible = map.accessible_locations();
        assert_eq!(accessible.len(), 1);
        assert_eq!(accessible[0].id, "hall");
        assert_eq!(map.locations_by_danger(5).len(), 1);
        assert_eq!(map.locations_by_danger(9).len(), 0);
    }

    #[test]
    fn test_boss_location() {
        let mut map = small_dungeon();
        map.set_boss_location("crypt").unwrap();
        assert!(map.location("crypt").unwrap().has_boss);
        assert_eq!(map.boss_location().unwrap().id, "crypt");
        assert!(map.set_boss_location("abyss").is_err());
    }

    #[test]
    fn test_loot_collection_drains() {
        let mut map = DungeonMap::new();
        map.add_location(
            Location::new("cave", "Cave", 2).with_loot(vec![GameItem::Potion(
                get_potion("Minor Health Potion").unwrap(),
            )]),
        );
        let cave = map.location_mut("cave").unwrap();
        let loot = cave.collect_loot();
        assert_eq!(loot.len(), 1);
        assert!(cave.loot.is_empty());
    }
}
