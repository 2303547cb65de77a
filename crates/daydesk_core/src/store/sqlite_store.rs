//! SQLite-backed document store.
//!
//! # Invariants
//! - Payloads are stored as the current JSON shape; legacy rows are upgraded
//!   on read and rewritten in the current shape on the next save.
//! - Log lines carry ids and counts only, never note content.

use crate::config::BoardConfig;
use crate::store::migrate::parse_document;
use crate::store::{normalize_user_id, DocumentStore, StoreResult, UserDocument};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Instant;

pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
    config: BoardConfig,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Creates a store over a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection, config: BoardConfig) -> Self {
        Self { conn, config }
    }

    /// Writes a raw payload, bypassing serialization. Used for imports of
    /// documents produced by older clients.
    pub fn import_raw(&self, user_id: &str, payload: &str) -> StoreResult<()> {
        let user_id = normalize_user_id(user_id)?;
        self.write_payload(user_id, payload)
    }

    fn write_payload(&self, user_id: &str, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO user_documents (user_id, payload)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![user_id, payload],
        )?;
        Ok(())
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn load_user_data(&self, user_id: &str) -> StoreResult<UserDocument> {
        let started_at = Instant::now();
        let user_id = normalize_user_id(user_id)?;

        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM user_documents WHERE user_id = ?1;",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;

        let result = match payload {
            Some(payload) => parse_document(&payload, &self.config),
            None => Ok(UserDocument::default()),
        };

        match &result {
            Ok(document) => info!(
                "event=document_load module=store status=ok notes={} zones={} duration_ms={}",
                document.notes.len(),
                document.zones.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=document_load module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn save_user_data(&self, user_id: &str, document: &UserDocument) -> StoreResult<()> {
        let started_at = Instant::now();
        let user_id = normalize_user_id(user_id)?;
        let payload = serde_json::to_string(document)?;

        let result = self.write_payload(user_id, &payload);
        match &result {
            Ok(()) => info!(
                "event=document_save module=store status=ok notes={} zones={} bytes={} duration_ms={}",
                document.notes.len(),
                document.zones.len(),
                payload.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=document_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}
