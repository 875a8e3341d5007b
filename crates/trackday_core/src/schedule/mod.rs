//! Schedule conflict detection and free-slot lookup.
//!
//! # Responsibility
//! - Flag the first overlap in the merged session/break/briefing timeline.
//! - Propose free time slots inside the standard track-day window.
//!
//! # Invariants
//! - Items occupy half-open intervals `[start, start + duration)`; entries
//!   sharing an exact boundary do not conflict.
//! - The sort is stable: equal start times keep insertion order.
//! - Only the first conflict is reported; the scan stops there.

use crate::model::event::{ScheduleBlock, ScheduleItem, ScheduleItemKind};
use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Track-day window bounds, local-to-track hours on the event day.
const DAY_START_HOUR: u32 = 9;
const DAY_END_HOUR: u32 = 17;

/// First overlapping pair found in timeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConflict {
    pub first_kind: ScheduleItemKind,
    pub first_title: String,
    pub second_kind: ScheduleItemKind,
    pub second_title: String,
    /// Overlap length in minutes, rounded down.
    pub overlap_minutes: i64,
}

impl ScheduleConflict {
    fn between(previous: &ScheduleItem, next: &ScheduleItem) -> Self {
        Self {
            first_kind: previous.kind,
            first_title: previous.title.clone(),
            second_kind: next.kind,
            second_title: next.title.clone(),
            overlap_minutes: (previous.end_time() - next.start_time) / 60_000,
        }
    }
}

/// Scans the merged timeline and reports the first overlap, if any.
///
/// The input union preserves insertion order (sessions, breaks, briefings),
/// so ties on `start_time` resolve to the order items were added.
pub fn find_first_conflict(schedule: &ScheduleBlock) -> Option<ScheduleConflict> {
    let mut timeline: Vec<&ScheduleItem> = schedule.all_items().collect();
    timeline.sort_by_key(|item| item.start_time);

    timeline
        .windows(2)
        .find(|pair| pair[0].end_time() > pair[1].start_time)
        .map(|pair| ScheduleConflict::between(pair[0], pair[1]))
}

/// A proposed free slot able to hold a session of the requested duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Slot start, epoch milliseconds.
    pub start_time: i64,
    /// Free span available from `start_time`, in minutes.
    pub free_minutes: i64,
}

/// Proposes gaps of at least `duration_minutes` inside the 09:00-17:00
/// window of the scheduled day: before the first item, between items and
/// after the last one.
///
/// An empty schedule proposes 09:00 of the `reference` day with the whole
/// window free.
pub fn available_time_slots(
    schedule: &ScheduleBlock,
    duration_minutes: u32,
    reference: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let needed_ms = i64::from(duration_minutes) * 60_000;
    let mut timeline: Vec<&ScheduleItem> = schedule.all_items().collect();
    timeline.sort_by_key(|item| item.start_time);

    if timeline.is_empty() {
        let start = at_hour(reference, DAY_START_HOUR);
        return vec![TimeSlot {
            start_time: start.timestamp_millis(),
            free_minutes: i64::from((DAY_END_HOUR - DAY_START_HOUR) * 60),
        }];
    }

    let mut slots = Vec::new();
    let first_start = timeline[0].start_time;
    let day_start = at_hour(ms_to_utc(first_start), DAY_START_HOUR).timestamp_millis();
    push_slot(&mut slots, day_start, first_start - day_start, needed_ms);

    for pair in timeline.windows(2) {
        let gap_start = pair[0].end_time();
        push_slot(&mut slots, gap_start, pair[1].start_time - gap_start, needed_ms);
    }

    let last_end = timeline
        .iter()
        .map(|item| item.end_time())
        .max()
        .unwrap_or(first_start);
    let day_end = at_hour(ms_to_utc(last_end), DAY_END_HOUR).timestamp_millis();
    push_slot(&mut slots, last_end, day_end - last_end, needed_ms);

    slots
}

fn push_slot(slots: &mut Vec<TimeSlot>, start_ms: i64, gap_ms: i64, needed_ms: i64) {
    if gap_ms >= needed_ms {
        slots.push(TimeSlot {
            start_time: start_ms,
            free_minutes: gap_ms / 60_000,
        });
    }
}

fn ms_to_utc(epoch_ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .unwrap_or_else(Utc::now)
}

fn at_hour(instant: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    instant
        .with_hour(hour)
        .and_then(|value| value.with_minute(0))
        .and_then(|value| value.with_second(0))
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Convenience for callers that only need the merged, time-ordered view.
pub fn sorted_timeline(schedule: &ScheduleBlock) -> Vec<ScheduleItem> {
    let mut timeline: Vec<ScheduleItem> = schedule.all_items().cloned().collect();
    timeline.sort_by_key(|item| item.start_time);
    timeline
}
