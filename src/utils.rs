//! Sorting and filtering helpers for item and character collections.

use crate::character::Character;
use crate::items::{GameItem, Rarity};
use std::cmp::Ordering;

/// Sort items by buy price, cheapest first.
pub fn sort_items_by_price(items: &mut [GameItem]) {
    items.sort_by_key(|i| i.buy_price());
}

/// Sort items by buy price, most expensive first.
pub fn sort_items_by_price_descending(items: &mut [GameItem]) {
    items.sort_by(|a, b| b.buy_price().cmp(&a.buy_price()));
}

/// Sort items from most common to rarest.
pub fn sort_items_by_rarity(items: &mut [GameItem]) {
    items.sort_by_key(|i| i.rarity());
}

/// Sort items alphabetically by name.
pub fn sort_items_by_name(items: &mut [GameItem]) {
    items.sort_by(|a, b| a.name().cmp(b.name()));
}

/// Sort items by weight, lightest first.
pub fn sort_items_by_weight(items: &mut [GameItem]) {
    items.sort_by_key(|i| i.weight());
}

/// Sort characters by current health, lowest first.
pub fn sort_characters_by_health(characters: &mut [Character]) {
    characters.sort_by_key(|c| c.current_health);
}

/// Sort characters by level, lowest first.
pub fn sort_characters_by_level(characters: &mut [Character]) {
    characters.sort_by_key(|c| c.level);
}

/// Filter items by an arbitrary predicate.
pub fn filter_items<'a>(
    items: &'a [GameItem],
    predicate: impl Fn(&GameItem) -> bool,
) -> Vec<&'a GameItem> {
    items.iter().filter(|i| predicate(i)).collect()
}

/// Items the given amount of gold can buy.
pub fn filter_affordable(items: &[GameItem], gold: u32) -> Vec<&GameItem> {
    filter_items(items, |i| i.buy_price() <= gold)
}

/// Items of at least the given rarity.
pub fn filter_by_min_rarity(items: &[GameItem], min_rarity: Rarity) -> Vec<&GameItem> {
    filter_items(items, |i| i.rarity() >= min_rarity)
}

/// Items no heavier than the given weight.
pub fn filter_light_items(items: &[GameItem], max_weight: u32) -> Vec<&GameItem> {
    filter_items(items, |i| i.weight() <= max_weight)
}

/// The item ranked highest by the comparator, or `None` for an empty list.
pub fn find_best_item<'a>(
    items: &'a [GameItem],
    compare: impl Fn(&GameItem, &GameItem) -> Ordering,
) -> Option<&'a GameItem> {
    items
        .iter()
        .fold(None, |best: Option<&GameItem>, item| match best {
            Some(current) if compare(item, current) != Ordering::Greater => Some(current),
            _ => Some(item),
        })
}

/// Combined weight of all items.
pub fn total_weight(items: &[GameItem]) -> u32 {
    items.iter().map(|i| i.weight()).sum()
}

/// Combined buy-price value of all items.
pub fn total_value(items: &[GameItem]) -> u32 {
    items.iter().map(|i| i.buy_price()).sum()
}
