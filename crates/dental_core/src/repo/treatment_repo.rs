//! `treatments` table layout and row mapping.
//!
//! Prices are stored as canonical decimal text so no precision is lost;
//! ordering casts them to numbers.

use super::record_store::{RepoError, RepoResult, SqliteRecordStore, TableRecord};
use crate::model::treatment::Treatment;
use crate::query::{Column, ColumnKind, TableSchema};
use rusqlite::types::Value;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const TREATMENT_ID: Column = Column::new("id", ColumnKind::Integer);
pub const TREATMENT_NAME: Column = Column::new("name", ColumnKind::Text);
pub const TREATMENT_SPECIALIST: Column = Column::new("specialist", ColumnKind::Text);
pub const TREATMENT_PRICE: Column = Column::new("price", ColumnKind::Decimal);
const TREATMENT_ROW_VERSION: Column = Column::new("row_version", ColumnKind::Integer);

pub const TREATMENTS: TableSchema = TableSchema {
    name: "treatments",
    id: TREATMENT_ID,
    columns: &[
        TREATMENT_ID,
        TREATMENT_NAME,
        TREATMENT_SPECIALIST,
        TREATMENT_PRICE,
        TREATMENT_ROW_VERSION,
    ],
};

/// SQLite store for treatments.
pub type SqliteTreatmentStore<'conn> = SqliteRecordStore<'conn, Treatment>;

impl TableRecord for Treatment {
    const TABLE: &'static TableSchema = &TREATMENTS;
    const WRITE_COLUMNS: &'static [Column] =
        &[TREATMENT_NAME, TREATMENT_SPECIALIST, TREATMENT_PRICE];

    fn write_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.specialist.clone()),
            Value::Text(self.price.to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let price_text: String = row.get("price")?;
        let price = Decimal::from_str(&price_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid decimal `{price_text}` in treatments.price"))
        })?;

        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            specialist: row.get("specialist")?,
            price,
            row_version: row.get("row_version")?,
        })
    }
}
