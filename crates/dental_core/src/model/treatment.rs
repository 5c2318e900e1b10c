//! Treatment record.
//!
//! # Invariants
//! - `specialist` is categorical; its distinct stored values populate filter options.
//! - `price` is an exact decimal, never negative, with at most two decimal
//!   places and ten integer digits so its numeric ordering in SQLite is exact.

use super::{Record, RecordId, ValidationErrors};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MAX_PRICE_SCALE: u32 = 2;
/// First price with eleven integer digits.
const PRICE_LIMIT: i64 = 10_000_000_000;

/// A billable treatment offered by the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Option<RecordId>,
    pub name: String,
    pub specialist: String,
    pub price: Decimal,
    #[serde(default)]
    pub row_version: i64,
}

impl Treatment {
    /// Creates an unsaved treatment.
    pub fn new(name: impl Into<String>, specialist: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            specialist: specialist.into(),
            price,
            row_version: 0,
        }
    }
}

impl Record for Treatment {
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
        errors.check_required_text("specialist", &self.specialist);
        if self.price < Decimal::ZERO {
            errors.push("price", "must not be negative");
        } else if self.price >= Decimal::from(PRICE_LIMIT) {
            errors.push("price", format!("must be below {PRICE_LIMIT}"));
        }
        if self.price.normalize().scale() > MAX_PRICE_SCALE {
            errors.push("price", "must have at most 2 decimal places");
        }
        errors.into_result()
    }
}
