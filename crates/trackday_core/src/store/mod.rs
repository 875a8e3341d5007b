//! Event document storage collaborator.
//!
//! # Responsibility
//! - Store and retrieve raw file blobs keyed by the
//!   `events/{id}/{doc_type}/{filename}` convention.
//! - Hand back `DocumentRef` values the draft embeds in its document set.
//!
//! # Invariants
//! - Keys never escape the store root: file names and key components must
//!   not contain separators or parent references.
//! - Uploads are whole-blob; there is no partial write surface.

use crate::model::event::{DocumentRef, EventId};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Purpose bucket a document is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    SupplementaryRules,
    TrackMap,
    Waiver,
    TechForm,
}

impl DocumentKind {
    /// Key segment for this bucket.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SupplementaryRules => "supplementary_rules",
            Self::TrackMap => "track_maps",
            Self::Waiver => "waivers",
            Self::TechForm => "tech_forms",
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store failure.
#[derive(Debug)]
pub enum StoreError {
    /// File name or key component would escape the store key space.
    InvalidKey(String),
    /// No blob stored under the key.
    NotFound(String),
    Io(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid document key: `{key}`"),
            Self::NotFound(key) => write!(f, "document not found: `{key}`"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Storage interface for event document blobs.
pub trait DocumentStore {
    /// Stores one blob and returns the reference to embed in the draft.
    fn put_document(
        &self,
        event_id: EventId,
        kind: DocumentKind,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StoreResult<DocumentRef>;

    /// Retrieves the blob stored under `path`.
    fn fetch_document(&self, path: &str) -> StoreResult<Vec<u8>>;

    /// Removes the blob stored under `path`.
    fn delete_document(&self, path: &str) -> StoreResult<()>;
}

/// Local-filesystem document store rooted at one directory.
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(Path::new(key)))
    }
}

impl DocumentStore for FsDocumentStore {
    fn put_document(
        &self,
        event_id: EventId,
        kind: DocumentKind,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StoreResult<DocumentRef> {
        validate_file_name(file_name)?;
        let key = format!("events/{event_id}/{}/{file_name}", kind.as_str());
        let full_path = self.resolve(&key)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, bytes)?;

        info!(
            "event=document_put module=store status=ok key={key} size_bytes={}",
            bytes.len()
        );

        Ok(DocumentRef {
            name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as u64,
            url: format!("file://{}", full_path.display()),
            path: key,
        })
    }

    fn fetch_document(&self, path: &str) -> StoreResult<Vec<u8>> {
        let full_path = self.resolve(path)?;
        if !full_path.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(fs::read(full_path)?)
    }

    fn delete_document(&self, path: &str) -> StoreResult<()> {
        let full_path = self.resolve(path)?;
        if !full_path.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        fs::remove_file(full_path)?;
        info!("event=document_delete module=store status=ok key={path}");
        Ok(())
    }
}

fn validate_file_name(file_name: &str) -> StoreResult<()> {
    if file_name.trim().is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name == "."
        || file_name == ".."
    {
        return Err(StoreError::InvalidKey(file_name.to_string()));
    }
    Ok(())
}

fn validate_key(key: &str) -> StoreResult<()> {
    if key.trim().is_empty() || key.starts_with('/') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    for component in key.split('/') {
        if component.is_empty() || component == "." || component == ".." {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        if component.contains('\\') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
    }
    Ok(())
}
