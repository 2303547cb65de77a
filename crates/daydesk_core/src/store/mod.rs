//! Per-user board document persistence.
//!
//! # Responsibility
//! - Define the document shape saved for each user.
//! - Define the storage contract used by the workspace orchestrator.
//! - Upgrade documents written by older clients before use.
//!
//! # Invariants
//! - One document per user id; a save replaces the whole document.
//! - A user with no stored document loads as an empty board.
//! - Loaded notes always satisfy `Note::validate()`.

pub mod migrate;
pub mod sqlite_store;

use crate::db::DbError;
use crate::model::note::Note;
use crate::model::zone::Zone;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use sqlite_store::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything persisted for one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default, alias = "youtubeUrl")]
    pub video_url: String,
}

/// Storage error for document load/save.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidUserId(String),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidUserId(value) => write!(f, "invalid user id: `{value}`"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidUserId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Storage contract for per-user board documents.
pub trait DocumentStore {
    /// Loads a user's document; unknown users get an empty document.
    fn load_user_data(&self, user_id: &str) -> StoreResult<UserDocument>;
    /// Replaces a user's document.
    fn save_user_data(&self, user_id: &str, document: &UserDocument) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load_user_data(&self, user_id: &str) -> StoreResult<UserDocument> {
        (**self).load_user_data(user_id)
    }

    fn save_user_data(&self, user_id: &str, document: &UserDocument) -> StoreResult<()> {
        (**self).save_user_data(user_id, document)
    }
}

pub(crate) fn normalize_user_id(user_id: &str) -> StoreResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidUserId(user_id.to_string()));
    }
    Ok(trimmed)
}
