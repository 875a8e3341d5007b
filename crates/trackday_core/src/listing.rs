//! Dashboard listing helpers over persisted event records.
//!
//! # Responsibility
//! - Derive the display status and registration progress of an event.
//! - Sort, filter and group record lists for dashboard views.
//!
//! # Invariants
//! - All helpers are pure; callers supply `now` and registration counts.
//! - Grouping preserves the input order of records within each bucket.

use crate::model::event::{EventRecord, EventStatus};
use chrono::{TimeZone, Utc};

/// Display status derived from stored status, dates and entry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedStatus {
    Draft,
    Completed,
    RegistrationClosed,
    RegistrationOpen,
    Scheduled,
    Published,
}

/// First event day in epoch milliseconds, if any day is set.
pub fn event_date(record: &EventRecord) -> Option<i64> {
    record.draft.basics.dates.first().copied()
}

/// Derives the dashboard status for one record.
///
/// Drafts stay drafts; past events are completed; a full entry list closes
/// registration; an upcoming published event is open for registration.
pub fn derived_status(record: &EventRecord, registered: u32, now_ms: i64) -> DerivedStatus {
    if record.status == EventStatus::Draft {
        return DerivedStatus::Draft;
    }
    let date = event_date(record);
    if matches!(date, Some(day) if day < now_ms) {
        return DerivedStatus::Completed;
    }
    if let Some(limit) = record.draft.basics.participant_limit {
        if registered >= limit {
            return DerivedStatus::RegistrationClosed;
        }
    }
    if record.status == EventStatus::Published && matches!(date, Some(day) if day > now_ms) {
        return DerivedStatus::RegistrationOpen;
    }
    match record.status {
        EventStatus::Scheduled => DerivedStatus::Scheduled,
        _ => DerivedStatus::Published,
    }
}

/// Percentage of the entry cap currently taken, clamped to 0 when no cap is
/// set yet.
pub fn registration_progress(record: &EventRecord, registered: u32) -> f64 {
    match record.draft.basics.participant_limit {
        Some(limit) if limit > 0 => f64::from(registered) / f64::from(limit) * 100.0,
        _ => 0.0,
    }
}

/// Sort key for dashboard event lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest event day first; undated events last.
    Date,
    /// Event name, lexicographic.
    Name,
    /// Largest entry cap first.
    Participants,
}

/// Sorts records in place by the requested key. Stable.
pub fn sort_events(records: &mut [EventRecord], key: SortKey) {
    match key {
        SortKey::Date => records.sort_by_key(|record| event_date(record).unwrap_or(i64::MAX)),
        SortKey::Name => records.sort_by(|a, b| a.draft.basics.name.cmp(&b.draft.basics.name)),
        SortKey::Participants => records.sort_by(|a, b| {
            b.draft
                .basics
                .participant_limit
                .unwrap_or(0)
                .cmp(&a.draft.basics.participant_limit.unwrap_or(0))
        }),
    }
}

/// Event-day filter for dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Event day strictly after `now`.
    Upcoming,
    /// Event day strictly before `now`.
    Past,
}

/// Keeps records matching both the stored-status and date filters.
pub fn filter_events(
    records: Vec<EventRecord>,
    status: Option<EventStatus>,
    date: DateFilter,
    now_ms: i64,
) -> Vec<EventRecord> {
    records
        .into_iter()
        .filter(|record| status.map_or(true, |wanted| record.status == wanted))
        .filter(|record| match date {
            DateFilter::All => true,
            DateFilter::Upcoming => matches!(event_date(record), Some(day) if day > now_ms),
            DateFilter::Past => matches!(event_date(record), Some(day) if day < now_ms),
        })
        .collect()
}

/// Groups records under their "Month Year" label, in input order.
///
/// Undated records land under an "Unscheduled" bucket at the end.
pub fn group_events_by_month(records: &[EventRecord]) -> Vec<(String, Vec<&EventRecord>)> {
    let mut groups: Vec<(String, Vec<&EventRecord>)> = Vec::new();
    for record in records {
        let label = event_date(record)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|day| day.format("%B %Y").to_string())
            .unwrap_or_else(|| "Unscheduled".to_string());

        match groups.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, bucket)) => bucket.push(record),
            None => groups.push((label, vec![record])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::{
        derived_status, filter_events, group_events_by_month, registration_progress, sort_events,
        DateFilter, DerivedStatus, SortKey,
    };
    use crate::model::event::{EventDraft, EventRecord, EventStatus};
    use uuid::Uuid;

    const NOW_MS: i64 = 1_760_000_000_000;
    const DAY_MS: i64 = 86_400_000;

    fn record(name: &str, status: EventStatus, date: Option<i64>, limit: Option<u32>) -> EventRecord {
        let mut draft = EventDraft::new();
        draft.basics.name = name.to_string();
        draft.basics.dates = date.into_iter().collect();
        draft.basics.participant_limit = limit;
        EventRecord {
            id: Uuid::new_v4(),
            draft,
            status,
            organizer_id: "org-1".to_string(),
            created_by: "org-1".to_string(),
            last_modified_by: "org-1".to_string(),
            version: 1,
            is_template: false,
            created_at: NOW_MS,
            updated_at: NOW_MS,
            published_at: None,
            scheduled_publish_time: None,
        }
    }

    #[test]
    fn draft_status_wins_over_everything() {
        let past = record("a", EventStatus::Draft, Some(NOW_MS - DAY_MS), Some(10));
        assert_eq!(derived_status(&past, 10, NOW_MS), DerivedStatus::Draft);
    }

    #[test]
    fn past_published_event_is_completed() {
        let past = record("a", EventStatus::Published, Some(NOW_MS - DAY_MS), Some(10));
        assert_eq!(derived_status(&past, 0, NOW_MS), DerivedStatus::Completed);
    }

    #[test]
    fn full_event_closes_registration() {
        let full = record("a", EventStatus::Published, Some(NOW_MS + DAY_MS), Some(10));
        assert_eq!(
            derived_status(&full, 10, NOW_MS),
            DerivedStatus::RegistrationClosed
        );
        assert_eq!(
            derived_status(&full, 3, NOW_MS),
            DerivedStatus::RegistrationOpen
        );
    }

    #[test]
    fn progress_is_zero_without_a_cap() {
        let capless = record("a", EventStatus::Published, None, None);
        assert_eq!(registration_progress(&capless, 12), 0.0);
        let capped = record("b", EventStatus::Published, None, Some(40));
        assert_eq!(registration_progress(&capped, 10), 25.0);
    }

    #[test]
    fn sort_by_date_puts_undated_last() {
        let mut records = vec![
            record("undated", EventStatus::Draft, None, None),
            record("late", EventStatus::Draft, Some(NOW_MS + 2 * DAY_MS), None),
            record("early", EventStatus::Draft, Some(NOW_MS + DAY_MS), None),
        ];
        sort_events(&mut records, SortKey::Date);
        let names: Vec<&str> = records
            .iter()
            .map(|r| r.draft.basics.name.as_str())
            .collect();
        assert_eq!(names, vec!["early", "late", "undated"]);
    }

    #[test]
    fn filter_combines_status_and_date() {
        let records = vec![
            record("up-pub", EventStatus::Published, Some(NOW_MS + DAY_MS), None),
            record("past-pub", EventStatus::Published, Some(NOW_MS - DAY_MS), None),
            record("up-draft", EventStatus::Draft, Some(NOW_MS + DAY_MS), None),
        ];
        let kept = filter_events(
            records,
            Some(EventStatus::Published),
            DateFilter::Upcoming,
            NOW_MS,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].draft.basics.name, "up-pub");
    }

    #[test]
    fn grouping_preserves_input_order_and_buckets_undated() {
        let records = vec![
            record("a", EventStatus::Draft, Some(NOW_MS), None),
            record("b", EventStatus::Draft, None, None),
            record("c", EventStatus::Draft, Some(NOW_MS + DAY_MS), None),
        ];
        let groups = group_events_by_month(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Unscheduled");
    }
}
