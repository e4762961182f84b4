use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::models::{Item, ItemState, MAX_INTERVAL_DAYS, MIN_MEMORY_STRENGTH};

/// Lowest grade that still counts as a successful recall.
pub const PASS_GRADE: i32 = 3;

/// Weights of the previous average and the newest sample in the response-time average.
const RESPONSE_TIME_KEEP: f64 = 0.8;
const RESPONSE_TIME_WEIGHT: f64 = 0.2;

/// Applies one graded recall attempt to `item` (SM-2).
///
/// Grade:
/// 5 - Perfect response
/// 4 - Correct response after a hesitation
/// 3 - Correct response recalled with serious difficulty
/// 2 - Incorrect response; where the correct one seemed easy to recall
/// 1 - Incorrect response; the correct one remembered
/// 0 - Complete blackout.
///
/// Out-of-range grades are clamped into 0..=5. A `response_time_ms` of 0 means
/// "not measured" and leaves the response-time average alone.
///
/// The item is updated in place as one step, so callers never observe a half-graded item.
pub fn grade(item: &mut Item, quality: i32, response_time_ms: u64, now: DateTime<Utc>) {
    let quality = quality.clamp(0, 5);

    item.total_reviews = item.total_reviews.saturating_add(1);
    item.last_reviewed_at = Some(now);
    if item.first_reviewed_at.is_none() {
        item.first_reviewed_at = Some(now);
    }

    if response_time_ms > 0 {
        let sample = response_time_ms as f64;
        item.average_response_time = if item.average_response_time == 0.0 {
            sample
        } else {
            item.average_response_time * RESPONSE_TIME_KEEP + sample * RESPONSE_TIME_WEIGHT
        };
    }

    if quality >= PASS_GRADE {
        // Correct
        item.success_count = item.success_count.saturating_add(1);
        if item.repetitions == 0 {
            item.interval = 1;
            item.state = ItemState::Learning;
        } else if item.repetitions == 1 {
            item.interval = 6;
            item.state = ItemState::Learning;
        } else {
            let next = (f64::from(item.interval) * item.memory_strength).round();
            item.interval = next.min(f64::from(MAX_INTERVAL_DAYS)) as u32;
            item.state = ItemState::Mature;
        }
        item.repetitions = item.repetitions.saturating_add(1);
    } else {
        // Incorrect
        item.failure_count = item.failure_count.saturating_add(1);
        item.repetitions = 0;
        item.interval = 1;
        item.state = ItemState::Learning;
    }

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    // Grades 3 and 4 lower the ease even though they pass.
    item.memory_strength = (item.memory_strength + ease_delta(quality)).max(MIN_MEMORY_STRENGTH);

    item.due_at = due_after(now, item.interval);

    debug!(
        "graded {} q={} -> reps={} interval={}d ease={:.2} state={:?}",
        item.key, quality, item.repetitions, item.interval, item.memory_strength, item.state
    );
}

/// `now` plus `interval` days, pinned to the latest representable time instead of overflowing.
pub fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Change in ease factor for a (clamped) grade.
pub fn ease_delta(quality: i32) -> f64 {
    let q = f64::from(quality.clamp(0, 5));
    0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)
}
