//! Cross-module flows: shopping, gearing up, exploring, and fighting with
//! the same character.

use dungeon_core::items::{get_armor, get_potion, get_weapon};
use dungeon_core::{
    ActionKind, Battle, Character, DungeonMap, GameError, GameItem, Location, Shop, Side,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// =============================================================================
// Shopping and gearing up
// =============================================================================

#[test]
fn test_buy_then_equip_flow() {
    let mut shop = Shop::new("Outfitter");
    shop.add_item(GameItem::Weapon(get_weapon("Hunting Bow").unwrap()), 1);
    shop.add_item(GameItem::Armor(get_armor("Leather Vest").unwrap()), 1);

    let mut hero = Character::archer("Fenn");
    hero.add_gold(200);

    shop.buy_item(&mut hero, "Hunting Bow").unwrap();
    shop.buy_item(&mut hero, "Leather Vest").unwrap();
    assert_eq!(hero.inventory.len(), 2);

    hero.equip_weapon("Hunting Bow").unwrap();
    hero.equip_armor("Leather Vest").unwrap();
    // Equipping removes from the inventory count and sets the references
    assert!(hero.inventory.is_empty());
    assert_eq!(hero.weapon.as_ref().unwrap().base.name, "Hunting Bow");
    assert_eq!(hero.armor.len(), 1);

    // An item is never both equipped and in inventory
    assert!(!hero.has_item("Hunting Bow"));
}

#[test]
fn test_sell_loot_for_gold() {
    let mut shop = Shop::new("Outfitter");
    let mut hero = Character::warrior("Aldric");
    hero.add_item(GameItem::Weapon(get_weapon("Battle Axe").unwrap()))
        .unwrap();

    // Battle Axe: 80 base, Uncommon -> buy 120, sell 60
    let proceeds = shop.sell_item(&mut hero, "Battle Axe").unwrap();
    assert_eq!(proceeds, 60);
    assert_eq!(hero.gold, 60);
}

// =============================================================================
// Exploration feeding combat
// =============================================================================

#[test]
fn test_explore_loot_and_fight() {
    let mut map = DungeonMap::new();
    map.add_location(Location::new("camp", "Camp", 0));
    map.add_location(Location::new("cave", "Spider Cave", 4).with_loot(vec![
        GameItem::Potion(get_potion("Minor Health Potion").unwrap()),
    ]));
    map.connect("camp", "cave").unwrap();
    map.set_boss_location("cave").unwrap();

    let mut hero = Character::warrior("Aldric");
    map.move_to("cave").unwrap();
    let loot = map.location_mut("cave").unwrap().collect_loot();
    for item in loot {
        hero.add_item(item).unwrap();
    }
    assert!(hero.has_item("Minor Health Potion"));
    assert!((map.exploration_progress() - 1.0).abs() < 1e-9);

    // The boss fight: hero drinks the looted potion mid-battle
    let mut rng = seeded(77);
    let mut battle = Battle::new(hero, Character::mage("Broodmother"));
    battle.start().unwrap();
    battle.player.take_damage(40);
    battle
        .enqueue_player_item_action("Minor Health Potion")
        .unwrap();
    battle.resolve_next(&mut rng).unwrap();
    assert_eq!(battle.player.current_health, 140);
}

// =============================================================================
// Victory rewards
// =============================================================================

#[test]
fn test_victory_awards_experience_and_gold() {
    let mut rng = seeded(13);
    let mut battle = Battle::new(Character::archer("Fenn"), Character::mage("Ghoul"));
    battle.start().unwrap();

    while !battle.is_ended() {
        battle.enqueue_player_action(ActionKind::Attack).unwrap();
        battle.generate_enemy_action(&mut rng).unwrap();
        battle.sort_pending_by_priority();
        while battle.resolve_next(&mut rng).is_some() {}
    }

    if battle.winner() == Some(Side::Player) {
        let reward_xp = battle.enemy.level * 120;
        battle.player.gain_experience(reward_xp);
        battle.player.add_gold(50);
        assert!(battle.player.level >= 2);
        assert_eq!(battle.player.gold, 50);
    }
}

#[test]
fn test_enqueue_after_victory_reports_invalid_action() {
    let mut rng = seeded(21);
    let mut battle = Battle::new(Character::warrior("Aldric"), Character::mage("Ghoul"));
    battle.start().unwrap();
    battle.enemy.current_health = 1;
    battle.enqueue_player_action(ActionKind::Attack).unwrap();
    battle.resolve_next(&mut rng).unwrap();

    match battle.enqueue_player_action(ActionKind::Flee) {
        Err(GameError::InvalidAction { action, reason }) => {
            assert_eq!(action, "Flee");
            assert!(reason.contains("ended"));
        }
        other => panic!("expected InvalidAction, got {:?}", other),
    }
}
