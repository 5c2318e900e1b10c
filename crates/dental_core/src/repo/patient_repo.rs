//! `patients` table layout and row mapping.

use super::record_store::{RepoError, RepoResult, SqliteRecordStore, TableRecord};
use crate::model::patient::Patient;
use crate::query::{Column, ColumnKind, TableSchema};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::Row;

pub(crate) const STORED_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub const PATIENT_ID: Column = Column::new("id", ColumnKind::Integer);
pub const PATIENT_NAME: Column = Column::new("name", ColumnKind::Text);
pub const PATIENT_EMAIL: Column = Column::new("email", ColumnKind::Text);
pub const PATIENT_APPOINTMENT_DATE: Column =
    Column::new("appointment_date", ColumnKind::DateTime);
const PATIENT_ROW_VERSION: Column = Column::new("row_version", ColumnKind::Integer);

pub const PATIENTS: TableSchema = TableSchema {
    name: "patients",
    id: PATIENT_ID,
    columns: &[
        PATIENT_ID,
        PATIENT_NAME,
        PATIENT_EMAIL,
        PATIENT_APPOINTMENT_DATE,
        PATIENT_ROW_VERSION,
    ],
};

/// SQLite store for patients.
pub type SqlitePatientStore<'conn> = SqliteRecordStore<'conn, Patient>;

impl TableRecord for Patient {
    const TABLE: &'static TableSchema = &PATIENTS;
    const WRITE_COLUMNS: &'static [Column] =
        &[PATIENT_NAME, PATIENT_EMAIL, PATIENT_APPOINTMENT_DATE];

    fn write_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.email.clone()),
            Value::Text(
                self.appointment_date
                    .format(STORED_DATE_TIME_FORMAT)
                    .to_string(),
            ),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let date_text: String = row.get("appointment_date")?;
        let appointment_date = NaiveDateTime::parse_from_str(&date_text, STORED_DATE_TIME_FORMAT)
            .map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid date-time `{date_text}` in patients.appointment_date"
                ))
            })?;

        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            email: row.get("email")?,
            appointment_date,
            row_version: row.get("row_version")?,
        })
    }
}
