//! Clinic domain model.
//!
//! # Responsibility
//! - Define the records persisted by the store (patients, treatments).
//! - Expose the accessor interface shared by the generic store and service.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `row_version` is store-owned; callers echo back what they read.

pub mod patient;
pub mod treatment;
pub mod validation;

pub use validation::{FieldError, ValidationErrors};

/// Store-assigned primary identity of a record.
pub type RecordId = i64;

/// Accessors every persisted clinic record provides.
pub trait Record: Clone {
    /// Identity assigned by the store, `None` before the first insert.
    fn id(&self) -> Option<RecordId>;

    /// Returns a copy carrying the given store identity.
    fn with_id(&self, id: RecordId) -> Self;

    /// Concurrency token observed when the record was read.
    fn row_version(&self) -> i64;

    /// Returns a copy carrying the given concurrency token.
    fn with_row_version(&self, row_version: i64) -> Self;

    /// Field-level validation verdict.
    fn validate(&self) -> Result<(), ValidationErrors>;
}
