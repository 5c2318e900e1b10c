//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by resource services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Identity mismatches are rejected before any SQL runs.
//! - A replace that touches no row is classified as `NotFound` or `Conflict`
//!   by re-checking existence, never left ambiguous.

pub mod patient_repo;
pub mod record_store;
pub mod treatment_repo;

pub use record_store::{
    RecordStore, RepoError, RepoResult, ReplaceOutcome, SqliteRecordStore, TableRecord,
};
