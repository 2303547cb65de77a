//! Board database schema steps.
//!
//! Each step is one SQL script; a database's step is its `PRAGMA
//! user_version`. Steps only ever append.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "user_documents",
    sql: include_str!("schema/0001_user_documents.sql"),
}];

/// What an upgrade did to one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn changed(self) -> bool {
        self.from != self.to
    }
}

/// Highest schema step this build knows.
pub fn supported_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Schema step recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Runs every step above the recorded version inside one transaction.
///
/// A database written by a newer build is refused rather than opened.
pub fn upgrade_schema(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    let from = schema_version(conn)?;
    let to = supported_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let upgrade = SchemaUpgrade { from, to };
    if !upgrade.changed() {
        return Ok(upgrade);
    }

    let tx = conn.transaction()?;
    for step in STEPS.iter().filter(|step| step.version > from) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::SchemaStep {
                version: step.version,
                source,
            })?;
        info!(
            "event=db_schema_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_schema_upgrade module=db status=ok from_version={} to_version={}",
        from, to
    );
    Ok(upgrade)
}
