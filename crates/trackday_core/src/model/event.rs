//! Event draft aggregate and persisted record envelope.
//!
//! # Responsibility
//! - Define the draft shape assembled step-by-step by the creation wizard.
//! - Provide structural `validate()` checks enforced on every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `duration_minutes` of every schedule item is strictly positive.
//! - `max_participants` and `session_duration_minutes` of every run group
//!   are strictly positive.
//! - The whole draft is the unit of storage; partial drafts are legal as
//!   long as the structural invariants above hold.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a persisted event.
pub type EventId = Uuid;

/// Stable identifier for a run group inside one event.
pub type GroupId = Uuid;

/// Opaque auth-collaborator user identifier (not a UUID).
pub type UserId = String;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Default run-group badge color, matching the wizard's picker default.
pub const DEFAULT_GROUP_COLOR: &str = "#2563eb";

/// Stored lifecycle status of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being assembled; may be structurally incomplete.
    Draft,
    /// Complete, publication deferred to `scheduled_publish_time`.
    Scheduled,
    /// Visible to participants.
    Published,
}

/// Rider skill tier used for grouping and requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Novice,
    Intermediate,
    Advanced,
    Instructor,
}

/// Category of a timed schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleItemKind {
    /// On-track lapping session for one or more run groups.
    Session,
    /// Track-cold pause (lunch, cleanup).
    Break,
    /// Mandatory drivers briefing.
    Briefing,
}

impl ScheduleItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Break => "break",
            Self::Briefing => "briefing",
        }
    }
}

/// Structural validation failure raised on write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    /// A schedule item carries a zero duration.
    NonPositiveDuration { kind: ScheduleItemKind, title: String },
    /// A run group has a zero participant cap.
    NonPositiveGroupCapacity { group: String },
    /// A run group has a zero session duration.
    NonPositiveGroupSessionDuration { group: String },
    /// A run group color is not a `#rrggbb` value.
    InvalidGroupColor { group: String, color: String },
    /// Persisted envelope carries a version below 1.
    NonPositiveVersion { version: u32 },
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDuration { kind, title } => write!(
                f,
                "schedule {} `{title}` must have a positive duration",
                kind.as_str()
            ),
            Self::NonPositiveGroupCapacity { group } => {
                write!(f, "run group `{group}` must allow at least one participant")
            }
            Self::NonPositiveGroupSessionDuration { group } => {
                write!(f, "run group `{group}` must have a positive session duration")
            }
            Self::InvalidGroupColor { group, color } => {
                write!(f, "run group `{group}` color `{color}` is not #rrggbb")
            }
            Self::NonPositiveVersion { version } => {
                write!(f, "event record version {version} must be >= 1")
            }
        }
    }
}

impl Error for DraftValidationError {}

/// Step-one basics: what, where, how many.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBasics {
    pub name: String,
    pub track: String,
    pub track_configuration: String,
    pub event_type: String,
    pub description: String,
    /// Event days in epoch milliseconds, one entry per day.
    pub dates: Vec<i64>,
    /// Total entry cap across all groups. `None` until filled in.
    pub participant_limit: Option<u32>,
    pub experience_level: Option<ExperienceLevel>,
}

/// One toggleable requirement with free-form details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub required: bool,
    pub details: String,
}

/// Sound check requirement with an optional decibel ceiling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRequirement {
    pub required: bool,
    pub limit_db: Option<u32>,
    pub details: String,
}

/// Step-two requirements and limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub insurance: Requirement,
    pub sound: SoundRequirement,
    pub tech_inspection: Requirement,
    /// Mandatory equipment line items (helmet spec, tow hook, ...).
    pub equipment: Vec<String>,
}

/// Named cohort of participants sharing a skill level and session length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunGroup {
    pub id: GroupId,
    pub name: String,
    pub experience_level: Option<ExperienceLevel>,
    pub max_participants: u32,
    pub session_duration_minutes: u32,
    /// Badge color rendered on timing screens, `#rrggbb`.
    pub color: String,
}

impl RunGroup {
    /// Creates a group with a generated stable ID and the default color.
    pub fn new(name: impl Into<String>, max_participants: u32, session_duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            experience_level: None,
            max_participants,
            session_duration_minutes,
            color: DEFAULT_GROUP_COLOR.to_string(),
        }
    }

    /// Checks structural invariants for this group.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        if self.max_participants == 0 {
            return Err(DraftValidationError::NonPositiveGroupCapacity {
                group: self.name.clone(),
            });
        }
        if self.session_duration_minutes == 0 {
            return Err(DraftValidationError::NonPositiveGroupSessionDuration {
                group: self.name.clone(),
            });
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(DraftValidationError::InvalidGroupColor {
                group: self.name.clone(),
                color: self.color.clone(),
            });
        }
        Ok(())
    }
}

/// Entry pricing in minor currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub regular_cents: Option<u32>,
    pub early_bird_cents: Option<u32>,
}

/// Waitlist behavior once the entry cap is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waitlist {
    pub enabled: bool,
    pub limit: Option<u32>,
}

/// Step-four registration window and pricing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSettings {
    /// Registration opens, epoch milliseconds.
    pub open_date: Option<i64>,
    /// Registration closes, epoch milliseconds. Must be after `open_date`.
    pub close_date: Option<i64>,
    /// Early-bird pricing cutoff, epoch milliseconds.
    pub early_bird_date: Option<i64>,
    pub pricing: Pricing,
    pub waitlist: Waitlist,
    /// Free-form extra questions shown on the entry form.
    pub custom_questions: Vec<String>,
}

/// One timed entry on the event day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub kind: ScheduleItemKind,
    pub title: String,
    /// Start instant in epoch milliseconds.
    pub start_time: i64,
    /// Occupied span in minutes. Must be strictly positive.
    pub duration_minutes: u32,
    /// Run groups on track during this item. Empty for breaks/briefings.
    pub group_refs: Vec<GroupId>,
}

impl ScheduleItem {
    pub fn new(
        kind: ScheduleItemKind,
        title: impl Into<String>,
        start_time: i64,
        duration_minutes: u32,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            start_time,
            duration_minutes,
            group_refs: Vec::new(),
        }
    }

    /// Exclusive end instant of the half-open `[start, end)` interval.
    pub fn end_time(&self) -> i64 {
        self.start_time + i64::from(self.duration_minutes) * 60_000
    }

    pub fn validate(&self) -> Result<(), DraftValidationError> {
        if self.duration_minutes == 0 {
            return Err(DraftValidationError::NonPositiveDuration {
                kind: self.kind,
                title: self.title.clone(),
            });
        }
        Ok(())
    }
}

/// Step-five schedule: sessions, breaks and briefings kept in separate
/// lists, merged on demand for conflict scanning and display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub sessions: Vec<ScheduleItem>,
    pub breaks: Vec<ScheduleItem>,
    pub briefings: Vec<ScheduleItem>,
}

impl ScheduleBlock {
    /// Routes an item into the list matching its kind.
    pub fn add_item(&mut self, item: ScheduleItem) {
        match item.kind {
            ScheduleItemKind::Session => self.sessions.push(item),
            ScheduleItemKind::Break => self.breaks.push(item),
            ScheduleItemKind::Briefing => self.briefings.push(item),
        }
    }

    /// Union of all timed items in insertion order (sessions first, then
    /// breaks, then briefings). Callers sort when they need timeline order.
    pub fn all_items(&self) -> impl Iterator<Item = &ScheduleItem> {
        self.sessions
            .iter()
            .chain(self.breaks.iter())
            .chain(self.briefings.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.breaks.is_empty() && self.briefings.is_empty()
    }
}

/// Uploaded file reference returned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Store key, `events/{id}/{doc_type}/{filename}`.
    pub path: String,
    /// Retrieval URL handed back by the store.
    pub url: String,
}

/// Step-six attached documents, grouped by purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub supplementary_rules: Vec<DocumentRef>,
    pub track_maps: Vec<DocumentRef>,
    pub waivers: Vec<DocumentRef>,
    pub tech_forms: Vec<DocumentRef>,
}

impl DocumentSet {
    pub fn is_empty(&self) -> bool {
        self.supplementary_rules.is_empty()
            && self.track_maps.is_empty()
            && self.waivers.is_empty()
            && self.tech_forms.is_empty()
    }
}

/// In-progress record describing a track-day event being created or edited.
///
/// Created empty when the creation flow starts, mutated one wizard step at a
/// time, and persisted whole or discarded. There is no autosave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub basics: EventBasics,
    pub requirements: Requirements,
    pub groups: Vec<RunGroup>,
    pub registration: RegistrationSettings,
    pub schedule: ScheduleBlock,
    pub documents: DocumentSet,
}

impl EventDraft {
    /// Creates the empty draft the creation flow starts from.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks structural invariants across the whole aggregate.
    ///
    /// This is not the per-step completeness gate (see `validation`); a
    /// half-filled draft passes as long as nothing present is malformed.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        for group in &self.groups {
            group.validate()?;
        }
        for item in self.schedule.all_items() {
            item.validate()?;
        }
        Ok(())
    }
}

/// Persisted envelope: the draft plus store-assigned metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub draft: EventDraft,
    pub status: EventStatus,
    pub organizer_id: UserId,
    pub created_by: UserId,
    pub last_modified_by: UserId,
    /// Monotonic edit counter, starts at 1.
    pub version: u32,
    pub is_template: bool,
    /// Store-assigned, epoch milliseconds.
    pub created_at: i64,
    /// Store-assigned, epoch milliseconds.
    pub updated_at: i64,
    /// Set while `status == Published`.
    pub published_at: Option<i64>,
    /// Set while `status == Scheduled`.
    pub scheduled_publish_time: Option<i64>,
}

impl EventRecord {
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        if self.version == 0 {
            return Err(DraftValidationError::NonPositiveVersion { version: self.version });
        }
        self.draft.validate()
    }
}
