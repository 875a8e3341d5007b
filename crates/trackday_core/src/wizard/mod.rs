//! Event-creation wizard step sequencer.
//!
//! # Responsibility
//! - Own the fixed ordered list of configuration steps.
//! - Track the current step and the set of completed steps.
//! - Gate step completion behind the per-step validation rules.
//!
//! # Invariants
//! - `current` is always one of the fixed steps.
//! - `jump_to` succeeds only for completed steps or the current step.
//! - `complete` never moves past the last step.

use crate::model::event::EventDraft;
use crate::validation::{validate_step, ValidationOutcome};
use std::collections::BTreeSet;

/// One named configuration step, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Basics,
    Requirements,
    Groups,
    Registration,
    Schedule,
    Documents,
    Review,
}

/// Fixed wizard order. `complete` and `go_back` walk this list.
pub const WIZARD_STEPS: [WizardStep; 7] = [
    WizardStep::Basics,
    WizardStep::Requirements,
    WizardStep::Groups,
    WizardStep::Registration,
    WizardStep::Schedule,
    WizardStep::Documents,
    WizardStep::Review,
];

impl WizardStep {
    /// Stable identifier used in data and logs.
    pub fn id(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Requirements => "requirements",
            Self::Groups => "groups",
            Self::Registration => "registration",
            Self::Schedule => "schedule",
            Self::Documents => "documents",
            Self::Review => "review",
        }
    }

    /// Human-readable title shown in the stepper.
    pub fn title(self) -> &'static str {
        match self {
            Self::Basics => "Basic Details",
            Self::Requirements => "Requirements & Limits",
            Self::Groups => "Run Groups",
            Self::Registration => "Registration Settings",
            Self::Schedule => "Schedule",
            Self::Documents => "Documents & Rules",
            Self::Review => "Review & Publish",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        WIZARD_STEPS.iter().copied().find(|step| step.id() == id)
    }

    fn index(self) -> usize {
        WIZARD_STEPS
            .iter()
            .position(|step| *step == self)
            .unwrap_or(0)
    }
}

/// Linear wizard controller moving through the named configuration steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer {
    current: WizardStep,
    completed: BTreeSet<WizardStep>,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    /// Starts on the first step with nothing completed.
    pub fn new() -> Self {
        Self {
            current: WIZARD_STEPS[0],
            completed: BTreeSet::new(),
        }
    }

    /// Rebuilds sequencer state from an existing draft when editing.
    ///
    /// A step counts as completed when its slice of the draft holds data;
    /// `current` lands on the first step not yet completed (or the review
    /// step when everything is filled).
    pub fn resume_from(draft: &EventDraft) -> Self {
        let mut completed = BTreeSet::new();
        if !draft.basics.name.trim().is_empty() {
            completed.insert(WizardStep::Basics);
        }
        if draft.requirements.insurance.required
            || draft.requirements.sound.required
            || draft.requirements.tech_inspection.required
            || !draft.requirements.equipment.is_empty()
        {
            completed.insert(WizardStep::Requirements);
        }
        if !draft.groups.is_empty() {
            completed.insert(WizardStep::Groups);
        }
        if draft.registration.open_date.is_some() {
            completed.insert(WizardStep::Registration);
        }
        if !draft.schedule.is_empty() {
            completed.insert(WizardStep::Schedule);
        }
        if !draft.documents.is_empty() {
            completed.insert(WizardStep::Documents);
        }

        let current = WIZARD_STEPS
            .iter()
            .copied()
            .find(|step| !completed.contains(step))
            .unwrap_or(WizardStep::Review);

        Self { current, completed }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn completed(&self) -> &BTreeSet<WizardStep> {
        &self.completed
    }

    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed.contains(&step)
    }

    /// True once the last step is reached with every prior step completed.
    pub fn is_terminal(&self) -> bool {
        self.current == WIZARD_STEPS[WIZARD_STEPS.len() - 1]
            && WIZARD_STEPS[..WIZARD_STEPS.len() - 1]
                .iter()
                .all(|step| self.completed.contains(step))
    }

    /// Marks `step` completed and advances to the next step in order.
    ///
    /// Idempotent on the completed set; stays on the last step when the
    /// completed step is final.
    pub fn complete(&mut self, step: WizardStep) {
        self.completed.insert(step);
        let index = step.index();
        if index < WIZARD_STEPS.len() - 1 {
            self.current = WIZARD_STEPS[index + 1];
        }
    }

    /// Moves to the previous step; no-op on the first step.
    pub fn go_back(&mut self) {
        let index = self.current.index();
        if index > 0 {
            self.current = WIZARD_STEPS[index - 1];
        }
    }

    /// Jumps directly to `step` when it is completed or already current.
    ///
    /// Returns whether the jump happened; a rejected jump changes nothing
    /// and surfaces no error.
    pub fn jump_to(&mut self, step: WizardStep) -> bool {
        if step == self.current || self.completed.contains(&step) {
            self.current = step;
            return true;
        }
        false
    }

    /// Runs the validation gate for `step`, completing it only on success.
    ///
    /// On failure the sequencer state is untouched and the outcome with its
    /// field errors is returned for display.
    pub fn try_complete(
        &mut self,
        step: WizardStep,
        draft: &EventDraft,
    ) -> Result<(), ValidationOutcome> {
        let outcome = validate_step(step, draft);
        if !outcome.is_valid() {
            return Err(outcome);
        }
        self.complete(step);
        Ok(())
    }
}
