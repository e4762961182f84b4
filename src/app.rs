use std::sync::Arc;

use log::info;

use crate::clock::Clock;
use crate::config::Config;
use crate::data;
use crate::db::DeckStore;
use crate::feedback::FeedbackGenerator;
use crate::models::Deck;
use crate::scheduler::{self, DeckStats, Pick};
use crate::session::ReviewSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Dashboard,
    Quiz,
    /// Nothing left to show in this session.
    Finished,
}

/// Grade for a typed answer.
///
/// Correct answers are graded by speed: up to 3s is 5, up to 8s is 4, slower is 3;
/// an unmeasured time counts as 4. Wrong answers: blank is 0, typing another kana's
/// romaji is 1, anything else 2.
pub fn quality_for_answer(kana: &str, user_input: &str, response_time_ms: u64) -> i32 {
    if data::is_correct(kana, user_input) {
        match response_time_ms {
            0 => 4,
            1..=3_000 => 5,
            3_001..=8_000 => 4,
            _ => 3,
        }
    } else if user_input.trim().is_empty() {
        0
    } else if FeedbackGenerator::confused_with(kana, user_input).is_some() {
        1
    } else {
        2
    }
}

pub struct App {
    pub store: DeckStore,
    pub deck_key: String,
    pub deck: Deck,
    pub session: ReviewSession,
    clock: Arc<dyn Clock>,
    pub state: AppState,
    pub current: Option<String>,
    pub current_pick: Option<Pick>,
    pub user_input: String,
    pub current_feedback: Option<bool>,
    pub feedback_detail: String,
    pub due_count: usize,
}

impl App {
    pub async fn new(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let store = DeckStore::connect(&config.database_url).await?;
        Self::with_store(store, config, clock).await
    }

    /// Loads (or creates) the configured deck and makes sure every kana is in it.
    pub async fn with_store(store: DeckStore, config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let now = clock.now();

        let mut deck = store.load(&config.deck_key).await?.unwrap_or_default();
        config.apply(&mut deck);

        let added = data::seed_deck(&mut deck, None, now);
        if added > 0 {
            info!("added {} kana to deck {:?}", added, config.deck_key);
        }
        store.save(&config.deck_key, &deck, now).await?;

        let due_count = scheduler::due_items(&deck, now).len();

        Ok(Self {
            store,
            deck_key: config.deck_key.clone(),
            deck,
            session: ReviewSession::new(),
            clock,
            state: AppState::Dashboard,
            current: None,
            current_pick: None,
            user_input: String::new(),
            current_feedback: None,
            feedback_detail: String::new(),
            due_count,
        })
    }

    pub fn start_quiz(&mut self) {
        self.user_input.clear();
        self.current_feedback = None;
        self.feedback_detail.clear();
        self.pick_next();
    }

    pub async fn submit_answer(&mut self, response_time_ms: u64) -> anyhow::Result<()> {
        let Some(kana) = self.current.clone() else {
            return Ok(());
        };

        if self.current_feedback.is_some() {
            return Ok(());
        }

        let now = self.clock.now();
        let quality = quality_for_answer(&kana, &self.user_input, response_time_ms);
        let correct = quality >= crate::srs::PASS_GRADE;

        let interval = self
            .session
            .grade(&mut self.deck, &kana, quality, response_time_ms, now)
            .map(|item| item.interval);

        self.store.save(&self.deck_key, &self.deck, now).await?;

        self.current_feedback = Some(correct);
        self.feedback_detail = if correct {
            FeedbackGenerator::next_review(interval.unwrap_or(0))
        } else {
            FeedbackGenerator::generate_explanation(&kana, &self.user_input)
        };

        Ok(())
    }

    pub fn next_card(&mut self) {
        self.user_input.clear();
        self.current_feedback = None;
        self.feedback_detail.clear();
        self.pick_next();
    }

    pub fn stats(&self) -> DeckStats {
        scheduler::stats(&self.deck, self.clock.now())
    }

    fn pick_next(&mut self) {
        let now = self.clock.now();
        match self.session.next(&self.deck, now) {
            Some(next) => {
                self.current = Some(next.item.key.clone());
                self.current_pick = Some(next.pick);
                self.state = AppState::Quiz;
            }
            None => {
                self.current = None;
                self.current_pick = None;
                self.state = AppState::Finished;
            }
        }
        self.due_count = scheduler::due_items(&self.deck, now).len();
    }
}
