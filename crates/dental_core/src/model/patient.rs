//! Patient record.
//!
//! # Invariants
//! - `name` and `email` are the searchable text fields.
//! - `appointment_date` carries no timezone; date filters compare its date part.
//! - Appointment years stay within 1..=9999 so stored text sorts chronologically.

use super::{Record, RecordId, ValidationErrors};
use chrono::{Datelike, NaiveDateTime};
use std::ops::RangeInclusive;

const APPOINTMENT_YEARS: RangeInclusive<i32> = 1..=9999;
use serde::{Deserialize, Serialize};

/// A clinic patient with their next appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub appointment_date: NaiveDateTime,
    /// Store-managed concurrency token.
    #[serde(default)]
    pub row_version: i64,
}

impl Patient {
    /// Creates an unsaved patient.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        appointment_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            appointment_date,
            row_version: 0,
        }
    }
}

impl Record for Patient {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn with_id(&self, id: RecordId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    fn row_version(&self) -> i64 {
        self.row_version
    }

    fn with_row_version(&self, row_version: i64) -> Self {
        Self {
            row_version,
            ..self.clone()
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check_required_text("name", &self.name);

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "is required");
        } else if !is_plausible_email(email) {
            errors.push("email", "is not a valid email address");
        }

        if !APPOINTMENT_YEARS.contains(&self.appointment_date.year()) {
            errors.push("appointment_date", "year must be between 1 and 9999");
        }

        errors.into_result()
    }
}

fn is_plausible_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}
