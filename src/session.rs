use chrono::{DateTime, Utc};

use crate::models::{Deck, Item};
use crate::scheduler::{self, NextItem, Pick};

/// Applies the deck's advisory caps to one sitting of reviews.
///
/// The scheduler itself never refuses an item; this is the host-side gate that
/// stops introducing unseen items after `new_items_per_day` and ends the
/// session after `max_reviews_per_session` gradings.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    reviews_done: u32,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reviews_done(&self) -> u32 {
        self.reviews_done
    }

    pub fn remaining(&self, deck: &Deck) -> u32 {
        deck.max_reviews_per_session.saturating_sub(self.reviews_done)
    }

    pub fn is_finished(&self, deck: &Deck) -> bool {
        self.remaining(deck) == 0
    }

    pub fn next<'a>(&self, deck: &'a Deck, now: DateTime<Utc>) -> Option<NextItem<'a>> {
        if self.is_finished(deck) {
            return None;
        }

        match scheduler::next_item(deck, now) {
            Some(next) if next.pick == Pick::New => {
                let introduced = scheduler::introduced_on(deck, now);
                if introduced < deck.new_items_per_day as usize {
                    Some(next)
                } else {
                    None
                }
            }
            other => other,
        }
    }

    pub fn grade<'a>(
        &mut self,
        deck: &'a mut Deck,
        key: &str,
        quality: i32,
        response_time_ms: u64,
        now: DateTime<Utc>,
    ) -> Option<&'a Item> {
        let item = scheduler::review(deck, key, quality, response_time_ms, now)?;
        self.reviews_done += 1;
        Some(item)
    }
}
