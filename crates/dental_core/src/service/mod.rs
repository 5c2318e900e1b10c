//! Resource use-case services.
//!
//! # Responsibility
//! - Translate list parameters into `QueryBuilder` pipelines.
//! - Mediate mutations through a `RecordStore`, reporting outcomes as values.
//!
//! # Invariants
//! - Services hold no state between calls beyond their store handle.
//! - Not-found, conflict, identity mismatch and validation failures are
//!   outcomes, not errors; only store failures surface as `Err`.

pub mod patient_service;
pub mod resource_service;
pub mod treatment_service;
