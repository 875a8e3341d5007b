use trackday_core::{
    EventDraft, RunGroup, ScheduleItem, ScheduleItemKind, StepSequencer, WizardStep, WIZARD_STEPS,
};

#[test]
fn sequencer_starts_on_first_step_with_nothing_completed() {
    let sequencer = StepSequencer::new();
    assert_eq!(sequencer.current(), WizardStep::Basics);
    assert!(sequencer.completed().is_empty());
    assert!(!sequencer.is_terminal());
}

#[test]
fn complete_advances_through_the_fixed_order() {
    let mut sequencer = StepSequencer::new();
    for step in WIZARD_STEPS {
        assert_eq!(sequencer.current(), step);
        sequencer.complete(step);
    }
    // Completing the final step stays on it.
    assert_eq!(sequencer.current(), WizardStep::Review);
    assert!(sequencer.is_terminal());
}

#[test]
fn complete_is_idempotent_on_the_completed_set() {
    let mut sequencer = StepSequencer::new();
    sequencer.complete(WizardStep::Basics);
    let after_first = sequencer.completed().len();
    sequencer.complete(WizardStep::Basics);
    assert_eq!(sequencer.completed().len(), after_first);
}

#[test]
fn go_back_is_a_no_op_on_the_first_step() {
    let mut sequencer = StepSequencer::new();
    sequencer.go_back();
    assert_eq!(sequencer.current(), WizardStep::Basics);

    sequencer.complete(WizardStep::Basics);
    assert_eq!(sequencer.current(), WizardStep::Requirements);
    sequencer.go_back();
    assert_eq!(sequencer.current(), WizardStep::Basics);
}

#[test]
fn jump_to_succeeds_iff_step_is_completed_or_current() {
    let mut sequencer = StepSequencer::new();
    sequencer.complete(WizardStep::Basics);
    sequencer.complete(WizardStep::Requirements);
    // current is now Groups.

    for step in WIZARD_STEPS {
        let allowed = sequencer.is_completed(step) || step == sequencer.current();
        let before = sequencer.clone();
        let jumped = sequencer.jump_to(step);
        assert_eq!(jumped, allowed, "jump_to({}) gate mismatch", step.id());
        if !jumped {
            assert_eq!(sequencer, before, "rejected jump must not change state");
        } else {
            assert_eq!(sequencer.current(), step);
            sequencer = before;
        }
    }
}

#[test]
fn try_complete_blocks_on_invalid_slice_and_leaves_state_unchanged() {
    let mut sequencer = StepSequencer::new();
    let empty = EventDraft::new();

    let outcome = sequencer.try_complete(WizardStep::Basics, &empty).unwrap_err();
    assert!(!outcome.is_valid());
    assert!(outcome.errors.contains_key("name"));
    assert_eq!(sequencer.current(), WizardStep::Basics);
    assert!(sequencer.completed().is_empty());

    let mut filled = EventDraft::new();
    filled.basics.name = "Spring Sprint".to_string();
    filled.basics.participant_limit = Some(40);
    sequencer.try_complete(WizardStep::Basics, &filled).unwrap();
    assert_eq!(sequencer.current(), WizardStep::Requirements);
    assert!(sequencer.is_completed(WizardStep::Basics));
}

#[test]
fn step_ids_round_trip() {
    for step in WIZARD_STEPS {
        assert_eq!(WizardStep::from_id(step.id()), Some(step));
    }
    assert_eq!(WizardStep::from_id("unknown"), None);
}

#[test]
fn resume_from_rebuilds_completed_steps_from_filled_data() {
    let mut draft = EventDraft::new();
    draft.basics.name = "Autumn Track Day".to_string();
    draft.groups.push(RunGroup::new("Green", 20, 20));
    draft.schedule.add_item(ScheduleItem::new(
        ScheduleItemKind::Session,
        "Green 1",
        1_760_000_000_000,
        20,
    ));

    let sequencer = StepSequencer::resume_from(&draft);
    assert!(sequencer.is_completed(WizardStep::Basics));
    assert!(sequencer.is_completed(WizardStep::Groups));
    assert!(sequencer.is_completed(WizardStep::Schedule));
    assert!(!sequencer.is_completed(WizardStep::Requirements));
    // First incomplete step becomes current.
    assert_eq!(sequencer.current(), WizardStep::Requirements);
}

#[test]
fn resume_from_empty_draft_matches_fresh_sequencer() {
    assert_eq!(StepSequencer::resume_from(&EventDraft::new()), StepSequencer::new());
}
