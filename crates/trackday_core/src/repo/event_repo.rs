//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `events` storage.
//! - Keep SQL and JSON-column details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `EventRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `created_at`/`updated_at` are store-assigned; callers never supply them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::event::{DraftValidationError, EventDraft, EventId, EventRecord, EventStatus, UserId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    status,
    organizer_id,
    created_by,
    last_modified_by,
    version,
    is_template,
    draft,
    created_at,
    updated_at,
    published_at,
    scheduled_publish_time
FROM events";

const REQUIRED_COLUMNS: &[&str] = &[
    "uuid",
    "status",
    "organizer_id",
    "created_by",
    "last_modified_by",
    "version",
    "is_template",
    "draft",
    "created_at",
    "updated_at",
    "published_at",
    "scheduled_publish_time",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DraftValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
    /// Connection has not run migrations (or runs a different version).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DraftValidationError> for RepoError {
    fn from(value: DraftValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing events.
#[derive(Debug, Clone, Default)]
pub struct EventListQuery {
    pub status: Option<EventStatus>,
    pub organizer: Option<UserId>,
    pub include_templates: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    /// Inserts a new record; timestamps are store-assigned.
    fn create_event(&self, record: &EventRecord) -> RepoResult<EventId>;
    /// Replaces the stored draft and envelope; bumps `updated_at`.
    fn update_event(&self, record: &EventRecord) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<EventRecord>>;
    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<EventRecord>>;
    /// Removes one record permanently.
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or `events` table shape
    /// does not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, record: &EventRecord) -> RepoResult<EventId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                uuid,
                status,
                organizer_id,
                created_by,
                last_modified_by,
                version,
                is_template,
                draft,
                published_at,
                scheduled_publish_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                record.id.to_string(),
                status_to_db(record.status),
                record.organizer_id.as_str(),
                record.created_by.as_str(),
                record.last_modified_by.as_str(),
                record.version,
                bool_to_int(record.is_template),
                draft_to_json(&record.draft)?,
                record.published_at,
                record.scheduled_publish_time,
            ],
        )?;

        Ok(record.id)
    }

    fn update_event(&self, record: &EventRecord) -> RepoResult<()> {
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE events
             SET
                status = ?1,
                last_modified_by = ?2,
                version = ?3,
                is_template = ?4,
                draft = ?5,
                published_at = ?6,
                scheduled_publish_time = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                status_to_db(record.status),
                record.last_modified_by.as_str(),
                record.version,
                bool_to_int(record.is_template),
                draft_to_json(&record.draft)?,
                record.published_at,
                record.scheduled_publish_time,
                record.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.id));
        }

        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<EventRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<EventRecord>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_templates {
            sql.push_str(" AND is_template = 0");
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        if let Some(organizer) = &query.organizer {
            sql.push_str(" AND organizer_id = ?");
            bind_values.push(Value::Text(organizer.clone()));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_event_row(row)?);
        }

        Ok(records)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'events'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("events"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('events');")?;
    let mut rows = stmt.query([])?;
    let mut present: HashSet<String> = HashSet::new();
    while let Some(row) = rows.next()? {
        present.insert(row.get("name")?);
    }
    for column in REQUIRED_COLUMNS {
        if !present.contains(*column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "events",
                column: (*column).to_string(),
            });
        }
    }

    Ok(())
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<EventRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in events.uuid"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in events.status"))
    })?;

    let draft_json: String = row.get("draft")?;
    let draft: EventDraft = serde_json::from_str(&draft_json).map_err(|err| {
        RepoError::InvalidData(format!("undecodable draft document for event {id}: {err}"))
    })?;

    let is_template = match row.get::<_, i64>("is_template")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_template value `{other}` in events.is_template"
            )));
        }
    };

    let record = EventRecord {
        id,
        draft,
        status,
        organizer_id: row.get("organizer_id")?,
        created_by: row.get("created_by")?,
        last_modified_by: row.get("last_modified_by")?,
        version: row.get("version")?,
        is_template,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        published_at: row.get("published_at")?,
        scheduled_publish_time: row.get("scheduled_publish_time")?,
    };
    record.validate()?;
    Ok(record)
}

fn draft_to_json(draft: &EventDraft) -> RepoResult<String> {
    serde_json::to_string(draft)
        .map_err(|err| RepoError::InvalidData(format!("unencodable draft document: {err}")))
}

fn status_to_db(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Draft => "draft",
        EventStatus::Scheduled => "scheduled",
        EventStatus::Published => "published",
    }
}

fn parse_status(value: &str) -> Option<EventStatus> {
    match value {
        "draft" => Some(EventStatus::Draft),
        "scheduled" => Some(EventStatus::Scheduled),
        "published" => Some(EventStatus::Published),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
