//! Core domain logic for the trackday event-management dashboard.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod export;
pub mod listing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod store;
pub mod validation;
pub mod wizard;

pub use export::{render_event_summary, render_liability_waiver, Participant};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{
    DraftValidationError, EventBasics, EventDraft, EventId, EventRecord, EventStatus,
    ExperienceLevel, GroupId, RunGroup, ScheduleBlock, ScheduleItem, ScheduleItemKind, UserId,
};
pub use repo::event_repo::{
    EventListQuery, EventRepository, RepoError, RepoResult, SqliteEventRepository,
};
pub use schedule::{available_time_slots, find_first_conflict, ScheduleConflict, TimeSlot};
pub use service::event_service::{CurrentUser, EventService, EventServiceError};
pub use store::{DocumentKind, DocumentStore, FsDocumentStore, StoreError};
pub use validation::{validate_event, validate_step, ValidationOutcome};
pub use wizard::{StepSequencer, WizardStep, WIZARD_STEPS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
