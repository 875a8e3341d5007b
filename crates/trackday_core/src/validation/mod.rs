//! Per-step validation gate for the event-creation wizard.
//!
//! # Responsibility
//! - Check required-field completeness for each wizard step.
//! - Surface a stable field -> message error map for inline display.
//!
//! # Invariants
//! - Checks are pure and synchronous; no I/O, no side effects.
//! - A failed outcome never mutates the draft or the sequencer.
//! - The review step aggregates every prior step's rules.

use crate::model::event::EventDraft;
use crate::schedule::find_first_conflict;
use crate::wizard::WizardStep;
use std::collections::BTreeMap;

/// Result of validating one draft slice: empty error map means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Field identifier -> human-readable message, deterministic order.
    pub errors: BTreeMap<&'static str, String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    fn merge(&mut self, other: ValidationOutcome) {
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }
}

/// Validates the draft slice owned by one wizard step.
pub fn validate_step(step: WizardStep, draft: &EventDraft) -> ValidationOutcome {
    match step {
        WizardStep::Basics => validate_basics(draft),
        WizardStep::Requirements => validate_requirements(draft),
        WizardStep::Groups => validate_groups(draft),
        WizardStep::Registration => validate_registration(draft),
        WizardStep::Schedule => validate_schedule(draft),
        WizardStep::Documents => ValidationOutcome::default(),
        WizardStep::Review => validate_event(draft),
    }
}

/// Aggregate check across every step; gates publish/schedule.
pub fn validate_event(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    outcome.merge(validate_basics(draft));
    outcome.merge(validate_requirements(draft));
    outcome.merge(validate_groups(draft));
    outcome.merge(validate_registration(draft));
    outcome.merge(validate_schedule(draft));
    outcome
}

fn validate_basics(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    if draft.basics.name.trim().is_empty() {
        outcome.reject("name", "Event name is required");
    }
    match draft.basics.participant_limit {
        Some(limit) if limit >= 1 => {}
        _ => outcome.reject("participant_limit", "Valid participant limit is required"),
    }
    outcome
}

fn validate_requirements(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    if draft.requirements.sound.required && draft.requirements.sound.limit_db.is_none() {
        outcome.reject("sound_limit", "Sound limit is required when sound check is enabled");
    }
    outcome
}

fn validate_groups(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    if draft.groups.is_empty() {
        outcome.reject("groups", "At least one run group is required");
        return outcome;
    }
    for group in &draft.groups {
        if group.name.trim().is_empty() {
            outcome.reject("groups", "Every run group needs a name");
        } else if let Err(err) = group.validate() {
            outcome.reject("groups", err.to_string());
        }
    }
    outcome
}

fn validate_registration(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    if let (Some(open), Some(close)) = (
        draft.registration.open_date,
        draft.registration.close_date,
    ) {
        if close <= open {
            outcome.reject("registration", "Close date must be after open date");
        }
    }
    if draft.registration.waitlist.enabled {
        match draft.registration.waitlist.limit {
            Some(limit) if limit >= 1 => {}
            _ => outcome.reject("waitlist", "Waitlist limit is required when waitlist is enabled"),
        }
    }
    outcome
}

fn validate_schedule(draft: &EventDraft) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for item in draft.schedule.all_items() {
        if let Err(err) = item.validate() {
            outcome.reject("schedule", err.to_string());
            return outcome;
        }
    }
    if let Some(conflict) = find_first_conflict(&draft.schedule) {
        outcome.reject(
            "schedule",
            format!(
                "Schedule has time conflicts: {} `{}` overlaps {} `{}`",
                conflict.first_kind.as_str(),
                conflict.first_title,
                conflict.second_kind.as_str(),
                conflict.second_title
            ),
        );
    }
    outcome
}
