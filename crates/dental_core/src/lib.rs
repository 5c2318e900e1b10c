//! Record-management core for a dental clinic.
//!
//! Patients and treatments share one shape: a composable list query
//! (search, filter, sort, page), single-record reads, and create/update/delete
//! mediated by a record store with optimistic-concurrency checks.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::patient::Patient;
pub use model::treatment::Treatment;
pub use model::{FieldError, Record, RecordId, ValidationErrors};
pub use query::{parse_filter_date, QueryBuilder, SortDirection, SortOrder, SortTable};
pub use repo::patient_repo::SqlitePatientStore;
pub use repo::treatment_repo::SqliteTreatmentStore;
pub use repo::{RecordStore, RepoError, RepoResult, ReplaceOutcome, SqliteRecordStore};
pub use service::patient_service::PatientService;
pub use service::resource_service::{
    CreateOutcome, DeleteOutcome, ListParams, ResourceProfile, ResourceService, UpdateOutcome,
};
pub use service::treatment_service::TreatmentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
