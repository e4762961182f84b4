//! Spaced-repetition scheduling for character flashcards.
//!
//! The engine is script-agnostic: items are keyed by their content, whatever the writing system.
//! It is two synchronous pieces working on a caller-owned [`Deck`]:
//!
//! - [`srs::grade`] applies one SM-2 graded recall to an [`Item`]
//! - [`scheduler`] decides what to show next (most overdue review first, then unseen items)
//!
//! Time is always passed in as `now`; see [`clock`] for the sources used by hosts.
//! Everything else in the crate ([`persist`], [`db`], [`config`], [`app`]) is host plumbing
//! around the engine; the bundled host ([`data`], [`feedback`], [`app`]) is a kana tutor.

pub mod app;
pub mod clock;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod feedback;
pub mod models;
pub mod persist;
pub mod scheduler;
pub mod session;
pub mod srs;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use models::{Deck, Item, ItemState};
pub use scheduler::{DeckStats, DueItem, NextItem, Pick};
pub use session::ReviewSession;

#[cfg(test)]
mod scheduler_tests;
