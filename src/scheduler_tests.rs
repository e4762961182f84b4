use super::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
}

/// Deck with `keys` graded once at `t0` (due one day later).
fn reviewed_deck(keys: &[&str]) -> Deck {
    let mut deck = Deck::new();
    for key in keys {
        scheduler::add_item(&mut deck, key, t0());
        scheduler::review(&mut deck, key, 4, 0, t0());
    }
    deck
}

fn keys<'a>(due: &[DueItem<'a>]) -> Vec<&'a str> {
    due.iter().map(|d| d.item.key.as_str()).collect()
}

#[test]
fn test_add_item_is_idempotent() {
    let mut once = Deck::new();
    scheduler::add_item(&mut once, "か", t0());

    let mut twice = Deck::new();
    scheduler::add_item(&mut twice, "か", t0());
    let existing = scheduler::add_item(&mut twice, "か", t0() + Duration::hours(5)).clone();

    assert_eq!(twice.len(), 1);
    assert_eq!(existing.due_at, t0());
    assert_eq!(
        serde_json::to_string(&once).unwrap(),
        serde_json::to_string(&twice).unwrap()
    );
}

#[test]
fn test_add_item_keeps_existing_progress() {
    let mut deck = reviewed_deck(&["き"]);
    let before = deck.get("き").cloned();
    scheduler::add_item(&mut deck, "き", t0() + Duration::days(3));
    assert_eq!(deck.get("き").cloned(), before);
}

#[test]
fn test_due_items_most_overdue_first() {
    let mut deck = Deck::new();
    for key in ["a", "b", "c", "d"] {
        scheduler::add_item(&mut deck, key, t0());
    }
    scheduler::review(&mut deck, "a", 4, 0, t0() + Duration::hours(3));
    scheduler::review(&mut deck, "b", 4, 0, t0());
    scheduler::review(&mut deck, "c", 4, 0, t0() + Duration::hours(1));
    // graded but not yet due
    scheduler::review(&mut deck, "d", 4, 0, t0() + Duration::days(5));

    let now = t0() + Duration::days(2);
    let due = scheduler::due_items(&deck, now);

    assert_eq!(keys(&due), vec!["b", "c", "a"]);
    assert_eq!(due[0].overdue, Duration::days(1));
    assert!(due.windows(2).all(|w| w[0].overdue > w[1].overdue));
}

#[test]
fn test_due_items_ties_keep_insertion_order() {
    let deck = reviewed_deck(&["ね", "こ", "い", "ぬ"]);
    let due = scheduler::due_items(&deck, t0() + Duration::days(1));
    assert_eq!(keys(&due), vec!["ね", "こ", "い", "ぬ"]);
}

#[test]
fn test_due_items_excludes_new_and_future() {
    let mut deck = reviewed_deck(&["x"]);
    scheduler::add_item(&mut deck, "fresh", t0());

    assert!(scheduler::due_items(&deck, t0()).is_empty());

    let due = scheduler::due_items(&deck, t0() + Duration::days(1));
    assert_eq!(keys(&due), vec!["x"]);
    assert_eq!(due[0].overdue, Duration::zero());
}

#[test]
fn test_new_items_respects_limit_and_order() {
    let mut deck = reviewed_deck(&["seen"]);
    for key in ["n1", "n2", "n3"] {
        scheduler::add_item(&mut deck, key, t0());
    }

    let picked: Vec<&str> = scheduler::new_items(&deck, 2).iter().map(|i| i.key.as_str()).collect();
    assert_eq!(picked, vec!["n1", "n2"]);
    assert_eq!(scheduler::new_items(&deck, 10).len(), 3);
    assert!(scheduler::new_items(&deck, 0).is_empty());
}

#[test]
fn test_next_item_prefers_due_reviews() {
    let mut deck = reviewed_deck(&["old"]);
    scheduler::add_item(&mut deck, "unseen", t0());

    let before_due = scheduler::next_item(&deck, t0() + Duration::hours(1)).unwrap();
    assert_eq!(before_due.item.key, "unseen");
    assert_eq!(before_due.pick, Pick::New);

    let after_due = scheduler::next_item(&deck, t0() + Duration::days(2)).unwrap();
    assert_eq!(after_due.item.key, "old");
    assert_eq!(after_due.pick, Pick::Review);
}

#[test]
fn test_next_item_empty() {
    let deck = Deck::new();
    assert!(scheduler::next_item(&deck, t0()).is_none());

    let deck = reviewed_deck(&["done"]);
    assert!(scheduler::next_item(&deck, t0() + Duration::hours(2)).is_none());
}

#[test]
fn test_review_unknown_key() {
    let mut deck = reviewed_deck(&["a"]);
    let before = deck.clone();
    assert!(scheduler::review(&mut deck, "missing", 5, 0, t0()).is_none());
    assert!(scheduler::item(&deck, "missing").is_none());
    assert_eq!(deck, before);
}

#[test]
fn test_stats() {
    let mut deck = reviewed_deck(&["a", "b"]);
    scheduler::add_item(&mut deck, "c", t0());
    scheduler::review(&mut deck, "b", 1, 0, t0());
    // "a" through the ladder to mature
    scheduler::review(&mut deck, "a", 5, 0, t0() + Duration::days(1));
    scheduler::review(&mut deck, "a", 5, 0, t0() + Duration::days(7));

    let stats = scheduler::stats(&deck, t0() + Duration::days(1));
    assert_eq!(stats.total, 3);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.learning, 1);
    assert_eq!(stats.mature, 1);
    assert_eq!(stats.due, 1); // "b"
    assert_eq!(stats.introduced_today, 0);
    assert_eq!(stats.total_reviews, 5);
    assert_eq!(stats.success_total, 4);
    assert_eq!(stats.failure_total, 1);

    let same_day = scheduler::stats(&deck, t0());
    assert_eq!(same_day.introduced_today, 2);
}

#[test]
fn test_session_caps_new_items_per_day() {
    let mut deck = Deck::new();
    deck.new_items_per_day = 2;
    for key in ["a", "b", "c"] {
        scheduler::add_item(&mut deck, key, t0());
    }
    let mut session = ReviewSession::new();

    for expected in ["a", "b"] {
        let key = session.next(&deck, t0()).unwrap().item.key.clone();
        assert_eq!(key, expected);
        session.grade(&mut deck, &key, 5, 0, t0());
    }
    assert!(session.next(&deck, t0()).is_none());

    // the next day the cap resets and reviews come first
    let tomorrow = t0() + Duration::days(1);
    let next = session.next(&deck, tomorrow).unwrap();
    assert_eq!(next.pick, Pick::Review);
    assert_eq!(next.item.key, "a");
}

#[test]
fn test_session_caps_reviews() {
    let mut deck = reviewed_deck(&["a", "b", "c"]);
    deck.max_reviews_per_session = 2;
    let now = t0() + Duration::days(1);
    let mut session = ReviewSession::new();

    for _ in 0..2 {
        let key = session.next(&deck, now).unwrap().item.key.clone();
        session.grade(&mut deck, &key, 4, 0, now);
    }
    assert_eq!(session.reviews_done(), 2);
    assert!(session.is_finished(&deck));
    assert!(session.next(&deck, now).is_none());
}

#[test]
fn test_session_ignores_unknown_key() {
    let mut deck = reviewed_deck(&["a"]);
    let mut session = ReviewSession::new();
    assert!(session.grade(&mut deck, "zzz", 5, 0, t0()).is_none());
    assert_eq!(session.reviews_done(), 0);
}

#[test]
fn test_scheduling_is_script_agnostic() {
    let mut deck = Deck::new();
    for key in ["ก", "ข", "ค"] {
        scheduler::add_item(&mut deck, key, t0());
    }
    scheduler::review(&mut deck, "ข", 5, 800, t0());
    scheduler::review(&mut deck, "ก", 1, 800, t0() + Duration::hours(2));

    let now = t0() + Duration::days(1) + Duration::hours(3);
    let due = scheduler::due_items(&deck, now);
    assert_eq!(keys(&due), vec!["ข", "ก"]);

    let next = scheduler::next_item(&deck, t0() + Duration::hours(3)).unwrap();
    assert_eq!(next.item.key, "ค");
    assert_eq!(next.pick, Pick::New);
}
