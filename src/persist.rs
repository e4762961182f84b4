//! JSON import/export of whole decks.
//!
//! Exports are wrapped in a small envelope carrying the schema version:
//!
//! ```json
//! { "version": 2, "exportedAt": 1700000000000, "deck": { "items": { ... }, ... } }
//! ```
//!
//! Version 1 files are a bare deck object without the envelope. Both are accepted on
//! import; fields missing from older files fall back to fresh defaults and unknown
//! fields are ignored.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::Deck;

pub const SCHEMA_VERSION: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    version: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    exported_at: DateTime<Utc>,
    deck: &'a Deck,
}

pub fn export_json(deck: &Deck, now: DateTime<Utc>) -> Result<String, StoreError> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        exported_at: now,
        deck,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn import_json(json: &str) -> Result<Deck, StoreError> {
    let value: Value = serde_json::from_str(json)?;
    let (version, body) = unwrap_envelope(value);

    if version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    let mut deck: Deck = serde_json::from_value(body)?;
    let repaired = normalize(&mut deck);
    if repaired > 0 {
        warn!("repaired {} item(s) while importing a v{} deck", repaired, version);
    }
    Ok(deck)
}

/// Brings every item back within the model invariants. Returns how many items changed.
pub fn normalize(deck: &mut Deck) -> usize {
    let mut repaired = 0;
    for item in deck.items_mut() {
        if item.normalize() {
            warn!("item {:?} had inconsistent memory state, repaired", item.key);
            repaired += 1;
        }
    }
    repaired
}

fn unwrap_envelope(value: Value) -> (u32, Value) {
    match value {
        Value::Object(mut map) if map.contains_key("deck") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));
            let body = map.remove("deck").unwrap_or(Value::Null);
            (version, body)
        }
        bare => (1, bare),
    }
}
