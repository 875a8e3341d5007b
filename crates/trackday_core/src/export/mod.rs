//! Printable exports for finalized event drafts.
//!
//! # Responsibility
//! - Render an event summary sheet and a liability waiver as printable
//!   plain text.
//!
//! # Invariants
//! - Rendering is a pure formatting transform: no state, no I/O.
//! - Missing optional fields render as blanks, never as errors.

use crate::model::event::EventDraft;
use crate::schedule::sorted_timeline;
use chrono::{TimeZone, Utc};
use std::fmt::Write;

/// Signer details stamped onto a waiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
}

/// Renders the printable one-page event summary.
///
/// Layout follows the organizer hand-out: header, event details, run-group
/// table, schedule table in timeline order.
pub fn render_event_summary(draft: &EventDraft) -> String {
    let mut out = String::new();
    let title = if draft.basics.name.trim().is_empty() {
        "Untitled Event"
    } else {
        draft.basics.name.trim()
    };

    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out);

    if let Some(first_day) = draft.basics.dates.first() {
        let _ = writeln!(out, "Date:     {}", format_date(*first_day));
    }
    if !draft.basics.track.is_empty() {
        let _ = writeln!(out, "Location: {}", draft.basics.track);
    }
    if !draft.basics.event_type.is_empty() {
        let _ = writeln!(out, "Type:     {}", draft.basics.event_type);
    }
    if let Some(limit) = draft.basics.participant_limit {
        let _ = writeln!(out, "Entries:  {limit}");
    }

    if !draft.groups.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Run Groups");
        let _ = writeln!(out, "----------");
        let _ = writeln!(
            out,
            "{:<24} {:<14} {:>12} {:>10}",
            "Group", "Level", "Participants", "Duration"
        );
        for group in &draft.groups {
            let level = group
                .experience_level
                .map(|value| format!("{value:?}").to_lowercase())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{:<24} {:<14} {:>12} {:>10}",
                group.name,
                level,
                group.max_participants,
                format!("{} min", group.session_duration_minutes)
            );
        }
    }

    let timeline = sorted_timeline(&draft.schedule);
    if !timeline.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Schedule");
        let _ = writeln!(out, "--------");
        let _ = writeln!(
            out,
            "{:<7} {:<10} {:<28} {:>10}",
            "Time", "Kind", "Title", "Duration"
        );
        for item in &timeline {
            let _ = writeln!(
                out,
                "{:<7} {:<10} {:<28} {:>10}",
                format_time(item.start_time),
                item.kind.as_str(),
                item.title,
                format!("{} min", item.duration_minutes)
            );
        }
    }

    out
}

/// Renders the liability waiver for one participant.
pub fn render_liability_waiver(draft: &EventDraft, participant: &Participant) -> String {
    let event_name = draft.basics.name.trim();
    let track = draft.basics.track.trim();
    let event_date = draft
        .basics
        .dates
        .first()
        .map(|ms| format_date(*ms))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "WAIVER AND RELEASE OF LIABILITY");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "IN CONSIDERATION of being permitted to participate in {event_name} at {track},"
    );
    let _ = writeln!(out, "I acknowledge and agree to the following:");
    let _ = writeln!(out);
    let _ = writeln!(out, "1. I understand the risks involved in motorsport activities.");
    let _ = writeln!(
        out,
        "2. I am physically fit and mentally capable of participating in this event."
    );
    let _ = writeln!(out, "3. I will follow all safety instructions and track rules.");
    let _ = writeln!(out, "4. I assume all risks associated with participation.");
    let _ = writeln!(out);
    let _ = writeln!(out, "Participant Name: {}", participant.name);
    let _ = writeln!(out, "Event:            {event_name}");
    let _ = writeln!(out, "Location:         {track}");
    let _ = writeln!(out, "Date of Event:    {event_date}");
    let _ = writeln!(out);
    let _ = writeln!(out, "____________________________        ____________________");
    let _ = writeln!(out, "Participant Signature               Date");

    out
}

fn format_date(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_time(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|value| value.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{render_event_summary, render_liability_waiver, Participant};
    use crate::model::event::{EventDraft, RunGroup, ScheduleItem, ScheduleItemKind};

    fn sample_draft() -> EventDraft {
        let mut draft = EventDraft::new();
        draft.basics.name = "Spring Sprint".to_string();
        draft.basics.track = "Willow Run".to_string();
        draft.basics.event_type = "open lapping".to_string();
        draft.basics.dates = vec![1_760_000_000_000];
        draft.basics.participant_limit = Some(60);
        draft.groups.push(RunGroup::new("Green", 20, 20));
        draft.schedule.add_item(ScheduleItem::new(
            ScheduleItemKind::Briefing,
            "Drivers briefing",
            1_760_000_000_000,
            30,
        ));
        draft
    }

    #[test]
    fn summary_includes_header_groups_and_schedule() {
        let rendered = render_event_summary(&sample_draft());
        assert!(rendered.starts_with("Spring Sprint\n"));
        assert!(rendered.contains("Run Groups"));
        assert!(rendered.contains("Green"));
        assert!(rendered.contains("Drivers briefing"));
        assert!(rendered.contains("30 min"));
    }

    #[test]
    fn summary_orders_schedule_by_start_time() {
        let mut draft = sample_draft();
        draft.schedule.add_item(ScheduleItem::new(
            ScheduleItemKind::Session,
            "Green session 1",
            1_760_000_000_000 - 3_600_000,
            20,
        ));
        let rendered = render_event_summary(&draft);
        let session_pos = rendered.find("Green session 1").unwrap();
        let briefing_pos = rendered.find("Drivers briefing").unwrap();
        assert!(session_pos < briefing_pos);
    }

    #[test]
    fn waiver_stamps_participant_and_event() {
        let participant = Participant {
            name: "Alex Driver".to_string(),
        };
        let rendered = render_liability_waiver(&sample_draft(), &participant);
        assert!(rendered.contains("WAIVER AND RELEASE OF LIABILITY"));
        assert!(rendered.contains("Alex Driver"));
        assert!(rendered.contains("Spring Sprint"));
        assert!(rendered.contains("Willow Run"));
    }
}
