use anyhow::Context;

use crate::models::Deck;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://kana.db?mode=rwc";
pub const DEFAULT_DECK_KEY: &str = "default";

/// Runtime settings, read from the environment (and an optional `.env` file).
///
/// - `KANA_SRS_DATABASE_URL` sqlite URL of the deck store
/// - `KANA_SRS_DECK` which deck to review
/// - `KANA_SRS_NEW_PER_DAY` / `KANA_SRS_MAX_REVIEWS` override the deck's caps when set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub deck_key: String,
    pub new_items_per_day: Option<u32>,
    pub max_reviews_per_session: Option<u32>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Missing .env is fine; real env vars still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let parse_cap = |name: &str| -> anyhow::Result<Option<u32>> {
            match lookup(name) {
                Some(raw) if !raw.trim().is_empty() => {
                    let value = raw
                        .trim()
                        .parse::<u32>()
                        .with_context(|| format!("{} must be a non-negative integer, got {:?}", name, raw))?;
                    Ok(Some(value))
                }
                _ => Ok(None),
            }
        };

        Ok(Self {
            database_url: lookup("KANA_SRS_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            deck_key: lookup("KANA_SRS_DECK").unwrap_or_else(|| DEFAULT_DECK_KEY.to_string()),
            new_items_per_day: parse_cap("KANA_SRS_NEW_PER_DAY")?,
            max_reviews_per_session: parse_cap("KANA_SRS_MAX_REVIEWS")?,
        })
    }

    pub fn apply(&self, deck: &mut Deck) {
        if let Some(n) = self.new_items_per_day {
            deck.new_items_per_day = n;
        }
        if let Some(n) = self.max_reviews_per_session {
            deck.max_reviews_per_session = n;
        }
    }
}
