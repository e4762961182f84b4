use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{Deck, Item, ItemState};
use crate::srs;

/// A due item together with how far past its due time it is.
#[derive(Debug, Clone, Copy)]
pub struct DueItem<'a> {
    pub item: &'a Item,
    pub overdue: Duration,
}

/// Why `next_item` picked an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Review,
    New,
}

#[derive(Debug, Clone, Copy)]
pub struct NextItem<'a> {
    pub item: &'a Item,
    pub pick: Pick,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub mature: usize,
    pub due: usize,
    pub introduced_today: usize,
    pub total_reviews: u64,
    pub success_total: u64,
    pub failure_total: u64,
}

/// Adds `key` with a fresh memory state. Adding a key that already exists
/// leaves the deck untouched and returns the existing item.
pub fn add_item<'a>(deck: &'a mut Deck, key: &str, now: DateTime<Utc>) -> &'a Item {
    deck.insert(Item::new(key, now))
}

pub fn item<'a>(deck: &'a Deck, key: &str) -> Option<&'a Item> {
    deck.get(key)
}

/// Grades the item stored under `key`. Unknown keys yield `None`.
pub fn review<'a>(
    deck: &'a mut Deck,
    key: &str,
    quality: i32,
    response_time_ms: u64,
    now: DateTime<Utc>,
) -> Option<&'a Item> {
    let item = deck.get_mut(key)?;
    srs::grade(item, quality, response_time_ms, now);
    Some(&*item)
}

/// Items whose review time has come, most overdue first.
///
/// Never-graded items are excluded; they have no meaningful due time and
/// are handed out through `new_items` instead. Equal overdue amounts keep
/// deck order.
pub fn due_items(deck: &Deck, now: DateTime<Utc>) -> Vec<DueItem<'_>> {
    let mut due: Vec<DueItem<'_>> = deck
        .items()
        .iter()
        .filter(|item| !item.is_new() && item.due_at <= now)
        .map(|item| DueItem {
            item,
            overdue: now - item.due_at,
        })
        .collect();

    // stable
    due.sort_by(|a, b| b.overdue.cmp(&a.overdue));
    due
}

/// Up to `limit` never-graded items, in deck order.
pub fn new_items(deck: &Deck, limit: usize) -> Vec<&Item> {
    deck.items().iter().filter(|item| item.is_new()).take(limit).collect()
}

/// The single item to present next: the most overdue review, otherwise an
/// unseen item, otherwise nothing. The daily cap on unseen items is left to the caller.
pub fn next_item(deck: &Deck, now: DateTime<Utc>) -> Option<NextItem<'_>> {
    if let Some(first) = due_items(deck, now).first() {
        return Some(NextItem {
            item: first.item,
            pick: Pick::Review,
        });
    }

    new_items(deck, 1).first().map(|item| NextItem {
        item,
        pick: Pick::New,
    })
}

/// Number of items graded for the first time on the UTC day of `now`.
pub fn introduced_on(deck: &Deck, now: DateTime<Utc>) -> usize {
    let today = now.date_naive();
    deck.items()
        .iter()
        .filter(|item| {
            item.first_reviewed_at
                .is_some_and(|first| first.date_naive() == today)
        })
        .count()
}

pub fn stats(deck: &Deck, now: DateTime<Utc>) -> DeckStats {
    let mut stats = DeckStats {
        total: deck.len(),
        introduced_today: introduced_on(deck, now),
        ..DeckStats::default()
    };

    for item in deck.items() {
        match item.state {
            ItemState::New => stats.new += 1,
            ItemState::Learning => stats.learning += 1,
            ItemState::Mature => stats.mature += 1,
        }
        if !item.is_new() && item.due_at <= now {
            stats.due += 1;
        }
        stats.total_reviews += u64::from(item.total_reviews);
        stats.success_total += u64::from(item.success_count);
        stats.failure_total += u64::from(item.failure_count);
    }

    stats
}
