use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ease factor given to an item that has never been graded.
pub const INITIAL_MEMORY_STRENGTH: f64 = 2.5;
/// Ease factor floor; the SM-2 update never goes below it.
pub const MIN_MEMORY_STRENGTH: f64 = 1.3;
/// Longest gap between reviews, in days (100 years).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

pub const DEFAULT_NEW_ITEMS_PER_DAY: u32 = 5;
pub const DEFAULT_MAX_REVIEWS_PER_SESSION: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Never graded.
    #[default]
    New,
    /// Zero or one successful recall since the last lapse.
    Learning,
    /// Interval grows by the ease factor.
    Mature,
}

/// Memory state of a single learnable unit, identified by its content (e.g. one character).
///
/// The key is the map key in the persisted deck, so it is not written inside the item body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(skip)]
    pub key: String,
    pub memory_strength: f64,
    pub interval: u32, // days
    pub repetitions: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub first_reviewed_at: Option<DateTime<Utc>>,
    pub total_reviews: u32,
    pub success_count: u32,
    pub failure_count: u32,
    /// Exponential moving average of measured response times, in milliseconds.
    pub average_response_time: f64,
    pub state: ItemState,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            key: String::new(),
            memory_strength: INITIAL_MEMORY_STRENGTH,
            interval: 0,
            repetitions: 0,
            due_at: DateTime::<Utc>::default(),
            last_reviewed_at: None,
            first_reviewed_at: None,
            total_reviews: 0,
            success_count: 0,
            failure_count: 0,
            average_response_time: 0.0,
            state: ItemState::New,
        }
    }
}

impl Item {
    pub fn new(key: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            due_at: now,
            ..Self::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.state == ItemState::New
    }

    /// Repairs a restored item so the model invariants hold again.
    /// Returns true when anything had to change.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();

        if !self.memory_strength.is_finite() {
            self.memory_strength = INITIAL_MEMORY_STRENGTH;
        }
        self.memory_strength = self.memory_strength.max(MIN_MEMORY_STRENGTH);

        if !self.average_response_time.is_finite() || self.average_response_time < 0.0 {
            self.average_response_time = 0.0;
        }

        self.interval = self.interval.min(MAX_INTERVAL_DAYS);

        // Counts too large to sum are trimmed so the total still equals their sum.
        self.failure_count = self.failure_count.min(u32::MAX - self.success_count);
        self.total_reviews = self.success_count + self.failure_count;

        if self.total_reviews > 0 && self.state == ItemState::New {
            self.state = if self.repetitions >= 3 {
                ItemState::Mature
            } else {
                ItemState::Learning
            };
        }
        if self.state != ItemState::New && self.first_reviewed_at.is_none() {
            self.first_reviewed_at = self.last_reviewed_at;
        }

        *self != before
    }
}

/// All items of one learner plus the two scheduling knobs.
///
/// Items keep insertion order; that order breaks ties in the review queue
/// and decides which unseen item is introduced next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    items: ItemTable,
    #[serde(default = "default_new_items_per_day")]
    pub new_items_per_day: u32,
    #[serde(default = "default_max_reviews_per_session")]
    pub max_reviews_per_session: u32,
}

fn default_new_items_per_day() -> u32 {
    DEFAULT_NEW_ITEMS_PER_DAY
}

fn default_max_reviews_per_session() -> u32 {
    DEFAULT_MAX_REVIEWS_PER_SESSION
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            items: ItemTable::default(),
            new_items_per_day: default_new_items_per_day(),
            max_reviews_per_session: default_max_reviews_per_session(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items.items
    }

    pub fn len(&self) -> usize {
        self.items.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.items.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.position(key).map(|i| &self.items.items[i])
    }

    /// Mutable access to one item. Its `key` must stay as it is; the deck indexes by it.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Item> {
        let index = self.items.position(key)?;
        Some(&mut self.items.items[index])
    }

    /// Appends `item` unless its key is already present. Returns the stored item either way.
    pub(crate) fn insert(&mut self, item: Item) -> &mut Item {
        let index = self.items.insert(item);
        &mut self.items.items[index]
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.items.iter_mut()
    }
}

/// Items in insertion order plus a key index into them.
///
/// Persisted as a JSON object keyed by item key, written in insertion order
/// and read back in document order.
#[derive(Debug, Clone, Default, PartialEq)]
struct ItemTable {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemTable {
    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Index of the item stored under `item.key`, adding `item` first if the key is new.
    fn insert(&mut self, item: Item) -> usize {
        if let Some(i) = self.position(&item.key) {
            return i;
        }
        let i = self.items.len();
        self.index.insert(item.key.clone(), i);
        self.items.push(item);
        i
    }
}

impl Serialize for ItemTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.key, item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ItemTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ItemTableVisitor)
    }
}

struct ItemTableVisitor;

impl<'de> Visitor<'de> for ItemTableVisitor {
    type Value = ItemTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of item key to item state")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = ItemTable::default();

        while let Some((key, mut item)) = access.next_entry::<String, Item>()? {
            if table.position(&key).is_some() {
                log::warn!("duplicate item {:?} in deck, keeping the first entry", key);
                continue;
            }
            item.key = key;
            table.insert(item);
        }
        Ok(table)
    }
}
