//! Clinic schema versions and the executor that applies them.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - Pending steps run in one transaction; `user_version` moves with each step.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "clinic",
    sql: include_str!("0001_clinic.sql"),
}];

/// Where a connection's schema stands relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Current,
    Behind { db_version: u32, latest: u32 },
    Ahead { db_version: u32, latest: u32 },
}

/// Highest schema version this build can apply.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded on `conn`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    let db_version = current_version(conn)?;
    let latest = latest_version();
    Ok(match db_version.cmp(&latest) {
        std::cmp::Ordering::Equal => SchemaStatus::Current,
        std::cmp::Ordering::Less => SchemaStatus::Behind { db_version, latest },
        std::cmp::Ordering::Greater => SchemaStatus::Ahead { db_version, latest },
    })
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` naming the first step that failed; earlier steps roll back too.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = match schema_status(conn)? {
        SchemaStatus::Current => return Ok(()),
        SchemaStatus::Ahead { db_version, latest } => {
            warn!(
                "event=db_migrate module=db status=rejected db_version={db_version} latest={latest}"
            );
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest,
            });
        }
        SchemaStatus::Behind { db_version, .. } => db_version,
    };

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                source,
            })?;
        info!(
            "event=db_migrate_step module=db version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={}",
        latest_version()
    );
    Ok(())
}
