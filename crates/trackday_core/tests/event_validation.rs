use trackday_core::{
    validate_event, validate_step, EventDraft, RunGroup, ScheduleItem, ScheduleItemKind,
    WizardStep,
};

fn valid_draft() -> EventDraft {
    let mut draft = EventDraft::new();
    draft.basics.name = "Spring Sprint".to_string();
    draft.basics.participant_limit = Some(60);
    draft.groups.push(RunGroup::new("Green", 20, 20));
    draft.registration.open_date = Some(1_755_000_000_000);
    draft.registration.close_date = Some(1_756_000_000_000);
    draft.schedule.add_item(ScheduleItem::new(
        ScheduleItemKind::Session,
        "Green 1",
        1_760_000_000_000,
        20,
    ));
    draft
}

#[test]
fn empty_draft_fails_basics_with_field_errors() {
    let outcome = validate_step(WizardStep::Basics, &EventDraft::new());
    assert!(!outcome.is_valid());
    assert_eq!(
        outcome.errors.get("name").map(String::as_str),
        Some("Event name is required")
    );
    assert!(outcome.errors.contains_key("participant_limit"));
}

#[test]
fn whitespace_only_name_is_rejected() {
    let mut draft = valid_draft();
    draft.basics.name = "   ".to_string();
    let outcome = validate_step(WizardStep::Basics, &draft);
    assert!(outcome.errors.contains_key("name"));
}

#[test]
fn zero_participant_limit_is_rejected() {
    let mut draft = valid_draft();
    draft.basics.participant_limit = Some(0);
    let outcome = validate_step(WizardStep::Basics, &draft);
    assert!(outcome.errors.contains_key("participant_limit"));
}

#[test]
fn groups_step_fails_without_any_run_group() {
    let mut draft = valid_draft();
    draft.groups.clear();
    let outcome = validate_step(WizardStep::Groups, &draft);
    assert!(!outcome.is_valid());
    assert!(!outcome.errors.is_empty());
    assert!(outcome.errors.contains_key("groups"));
}

#[test]
fn malformed_group_color_fails_the_groups_step() {
    let mut draft = valid_draft();
    draft.groups[0].color = "blue".to_string();
    let outcome = validate_step(WizardStep::Groups, &draft);
    assert!(outcome.errors.contains_key("groups"));
}

#[test]
fn registration_close_must_be_after_open() {
    let mut draft = valid_draft();
    draft.registration.open_date = Some(2_000);
    draft.registration.close_date = Some(2_000);
    let outcome = validate_step(WizardStep::Registration, &draft);
    assert_eq!(
        outcome.errors.get("registration").map(String::as_str),
        Some("Close date must be after open date")
    );

    // Half-open windows are fine; missing dates are fine too.
    draft.registration.close_date = None;
    assert!(validate_step(WizardStep::Registration, &draft).is_valid());
}

#[test]
fn enabled_waitlist_requires_a_limit() {
    let mut draft = valid_draft();
    draft.registration.waitlist.enabled = true;
    let outcome = validate_step(WizardStep::Registration, &draft);
    assert!(outcome.errors.contains_key("waitlist"));

    draft.registration.waitlist.limit = Some(10);
    assert!(validate_step(WizardStep::Registration, &draft).is_valid());
}

#[test]
fn sound_check_requires_a_decibel_limit() {
    let mut draft = valid_draft();
    draft.requirements.sound.required = true;
    let outcome = validate_step(WizardStep::Requirements, &draft);
    assert!(outcome.errors.contains_key("sound_limit"));

    draft.requirements.sound.limit_db = Some(95);
    assert!(validate_step(WizardStep::Requirements, &draft).is_valid());
}

#[test]
fn schedule_step_surfaces_the_first_conflict() {
    let mut draft = valid_draft();
    draft.schedule.add_item(ScheduleItem::new(
        ScheduleItemKind::Session,
        "Blue 1",
        1_760_000_000_000 + 10 * 60_000,
        20,
    ));
    let outcome = validate_step(WizardStep::Schedule, &draft);
    let message = outcome.errors.get("schedule").unwrap();
    assert!(message.contains("Schedule has time conflicts"));
    assert!(message.contains("Green 1"));
    assert!(message.contains("Blue 1"));
}

#[test]
fn documents_step_has_no_hard_requirements() {
    assert!(validate_step(WizardStep::Documents, &EventDraft::new()).is_valid());
}

#[test]
fn review_step_aggregates_every_rule() {
    assert!(validate_step(WizardStep::Review, &valid_draft()).is_valid());

    let mut broken = valid_draft();
    broken.basics.name.clear();
    broken.groups.clear();
    let outcome = validate_event(&broken);
    assert!(outcome.errors.contains_key("name"));
    assert!(outcome.errors.contains_key("groups"));
}
