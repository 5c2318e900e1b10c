//! Patient resource configuration.
//!
//! - Search matches `name` or `email`.
//! - `ListParams::date` filters on the appointment's calendar date.
//! - Sort keys: `name_asc`, `name_desc`, `date_asc`, `date_desc`; default `name_asc`.

use super::resource_service::{ResourceProfile, ResourceService};
use crate::model::patient::Patient;
use crate::query::{Column, SortOrder, SortTable};
use crate::repo::patient_repo::{PATIENT_APPOINTMENT_DATE, PATIENT_EMAIL, PATIENT_NAME};

pub const PATIENT_SORTS: SortTable = SortTable {
    entries: &[
        ("name_asc", SortOrder::asc(PATIENT_NAME)),
        ("name_desc", SortOrder::desc(PATIENT_NAME)),
        ("date_asc", SortOrder::asc(PATIENT_APPOINTMENT_DATE)),
        ("date_desc", SortOrder::desc(PATIENT_APPOINTMENT_DATE)),
    ],
    default: SortOrder::asc(PATIENT_NAME),
};

pub type PatientService<S> = ResourceService<Patient, S>;

impl ResourceProfile for Patient {
    const LABEL: &'static str = "patient";
    const SEARCH_COLUMNS: &'static [Column] = &[PATIENT_NAME, PATIENT_EMAIL];
    const DATE_FILTER: Option<Column> = Some(PATIENT_APPOINTMENT_DATE);
    const SORTS: &'static SortTable = &PATIENT_SORTS;
}
