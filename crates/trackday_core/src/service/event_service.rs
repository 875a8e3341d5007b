//! Event use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for event records.
//! - Gate publish and schedule transitions behind full draft validation.
//! - Enforce organizer-only mutation with an explicitly passed user.
//!
//! # Invariants
//! - Identity is dependency-injected: every operation takes a `CurrentUser`
//!   value; nothing reads ambient auth state.
//! - `version` increases by exactly one on every successful update.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::event::{EventDraft, EventId, EventRecord, EventStatus, UserId};
use crate::repo::event_repo::{EventListQuery, EventRepository, RepoError, RepoResult};
use crate::validation::{validate_event, ValidationOutcome};
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Authenticated caller identity, passed explicitly into each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Opaque auth-collaborator uid.
    pub id: UserId,
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }
}

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Draft failed the aggregate validation gate for publish/schedule.
    Validation(ValidationOutcome),
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Caller is not the organizer of the target event.
    PermissionDenied { event: EventId, user: UserId },
    /// Scheduled status requires a publish time.
    MissingScheduledTime,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(outcome) => {
                write!(f, "event draft is not valid:")?;
                for (field, message) in &outcome.errors {
                    write!(f, " {field}: {message};")?;
                }
                Ok(())
            }
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::PermissionDenied { event, user } => write!(
                f,
                "user {user} does not have permission to modify event {event}"
            ),
            Self::MissingScheduledTime => {
                write!(f, "scheduled events require a scheduled publish time")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent event state: {details}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EventNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Event service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new event for `user` and returns the stored record.
    ///
    /// # Contract
    /// - `Draft` status accepts partial drafts (structural checks only).
    /// - `Published`/`Scheduled` require the full validation gate to pass.
    /// - `Scheduled` additionally requires `scheduled_publish_time`.
    /// - `organizer_id`, `created_by` and `last_modified_by` are stamped
    ///   from `user`; `version` starts at 1.
    pub fn create_event(
        &self,
        draft: EventDraft,
        status: EventStatus,
        scheduled_publish_time: Option<i64>,
        user: &CurrentUser,
    ) -> Result<EventRecord, EventServiceError> {
        let (published_at, scheduled_publish_time) =
            self.publication_stamps(&draft, status, scheduled_publish_time)?;

        let record = EventRecord {
            id: Uuid::new_v4(),
            draft,
            status,
            organizer_id: user.id.clone(),
            created_by: user.id.clone(),
            last_modified_by: user.id.clone(),
            version: 1,
            is_template: false,
            // Store-assigned on insert; overwritten by the read-back below.
            created_at: 0,
            updated_at: 0,
            published_at,
            scheduled_publish_time,
        };

        let id = self.repo.create_event(&record)?;
        info!(
            "event=event_create module=service status=ok event_id={id} event_status={} organizer={}",
            status_label(status),
            user.id
        );
        self.read_back(id, "created event not found in read-back")
    }

    /// Replaces the stored draft of an existing event.
    ///
    /// # Contract
    /// - Fails with `PermissionDenied` unless `user` is the organizer.
    /// - Bumps `version` by one and stamps `last_modified_by`.
    /// - Same publish/schedule gating as `create_event`.
    pub fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
        status: EventStatus,
        scheduled_publish_time: Option<i64>,
        user: &CurrentUser,
    ) -> Result<EventRecord, EventServiceError> {
        let existing = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;

        if existing.organizer_id != user.id {
            return Err(EventServiceError::PermissionDenied {
                event: id,
                user: user.id.clone(),
            });
        }

        let (published_at, scheduled_publish_time) =
            self.publication_stamps(&draft, status, scheduled_publish_time)?;

        let record = EventRecord {
            draft,
            status,
            last_modified_by: user.id.clone(),
            version: existing.version + 1,
            published_at,
            scheduled_publish_time,
            ..existing
        };

        self.repo.update_event(&record)?;
        info!(
            "event=event_update module=service status=ok event_id={id} event_status={} version={}",
            status_label(status),
            record.version
        );
        self.read_back(id, "updated event not found in read-back")
    }

    /// Gets one event by stable ID. Reading requires a signed-in user but
    /// not ownership.
    pub fn get_event(
        &self,
        id: EventId,
        _user: &CurrentUser,
    ) -> Result<EventRecord, EventServiceError> {
        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))
    }

    /// Lists the caller's own events, newest update first.
    pub fn list_my_events(
        &self,
        user: &CurrentUser,
        status: Option<EventStatus>,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<EventRecord>> {
        self.repo.list_events(&EventListQuery {
            status,
            organizer: Some(user.id.clone()),
            include_templates: false,
            limit,
            offset,
        })
    }

    /// Permanently removes an event the caller organizes.
    pub fn delete_event(&self, id: EventId, user: &CurrentUser) -> Result<(), EventServiceError> {
        let existing = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;

        if existing.organizer_id != user.id {
            return Err(EventServiceError::PermissionDenied {
                event: id,
                user: user.id.clone(),
            });
        }

        self.repo.delete_event(id)?;
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }

    fn publication_stamps(
        &self,
        draft: &EventDraft,
        status: EventStatus,
        scheduled_publish_time: Option<i64>,
    ) -> Result<(Option<i64>, Option<i64>), EventServiceError> {
        match status {
            EventStatus::Draft => Ok((None, None)),
            EventStatus::Published => {
                self.require_valid(draft)?;
                Ok((Some(Utc::now().timestamp_millis()), None))
            }
            EventStatus::Scheduled => {
                self.require_valid(draft)?;
                let at = scheduled_publish_time.ok_or(EventServiceError::MissingScheduledTime)?;
                Ok((None, Some(at)))
            }
        }
    }

    fn require_valid(&self, draft: &EventDraft) -> Result<(), EventServiceError> {
        let outcome = validate_event(draft);
        if !outcome.is_valid() {
            return Err(EventServiceError::Validation(outcome));
        }
        Ok(())
    }

    fn read_back(
        &self,
        id: EventId,
        details: &'static str,
    ) -> Result<EventRecord, EventServiceError> {
        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::InconsistentState(details))
    }
}

fn status_label(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Draft => "draft",
        EventStatus::Scheduled => "scheduled",
        EventStatus::Published => "published",
    }
}
