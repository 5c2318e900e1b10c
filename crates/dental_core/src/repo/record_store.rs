//! Record store contract and generic SQLite implementation.
//!
//! # Responsibility
//! - Provide get/insert/replace/delete/exists over one table per record type.
//! - Execute `QueryBuilder` reads and distinct-value scans.
//!
//! # Invariants
//! - `insert` ignores caller identity and returns the store-assigned one.
//! - `replace` is guarded by `row_version`; the store bumps it on success.
//! - `delete` of an absent identity succeeds.
//! - Read paths reject corrupt persisted values instead of masking them.

use crate::db::{schema_status, DbError, SchemaStatus};
use crate::model::{Record, RecordId};
use crate::query::{distinct_values_sql, Column, QueryBuilder, TableSchema};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Path identity and record identity disagree; raised before touching the store.
    IdentityMismatch {
        path_id: RecordId,
        record_id: Option<RecordId>,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::IdentityMismatch { path_id, record_id } => match record_id {
                Some(record_id) => write!(
                    f,
                    "record identity {record_id} does not match requested identity {path_id}"
                ),
                None => write!(
                    f,
                    "record carries no identity; requested identity {path_id}"
                ),
            },
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with `open_db`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a guarded full-record replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome<R> {
    /// Stored record, carrying its new `row_version`.
    Replaced(R),
    /// The record was deleted before the write.
    NotFound,
    /// The record still exists but changed since it was read.
    Conflict,
}

/// Persistence contract for one record type.
pub trait RecordStore<R: Record> {
    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<R>>;
    fn insert(&self, record: &R) -> RepoResult<R>;
    fn replace(&self, id: RecordId, record: &R) -> RepoResult<ReplaceOutcome<R>>;
    /// Removes `id` if present; returns whether a row was removed.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;
    fn exists(&self, id: RecordId) -> RepoResult<bool>;
    fn query(&self, query: &QueryBuilder) -> RepoResult<Vec<R>>;
    /// Distinct values of a text-stored column across the whole table.
    fn distinct_values(&self, column: Column) -> RepoResult<Vec<String>>;
}

/// Table layout and row mapping for a record persisted in SQLite.
pub trait TableRecord: Record {
    const TABLE: &'static TableSchema;
    /// Columns written by insert/replace, in `write_values` order.
    const WRITE_COLUMNS: &'static [Column];

    fn write_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// SQLite-backed record store for any [`TableRecord`].
pub struct SqliteRecordStore<'conn, R> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: TableRecord> SqliteRecordStore<'conn, R> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if let SchemaStatus::Behind { db_version, latest } = schema_status(conn)? {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest,
                actual_version: db_version,
            });
        }

        Ok(Self {
            conn,
            _record: PhantomData,
        })
    }

    fn table(&self) -> &'static TableSchema {
        R::TABLE
    }
}

impl<R: TableRecord> RecordStore<R> for SqliteRecordStore<'_, R> {
    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<R>> {
        let table = self.table();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} WHERE {} = ?1;",
            table.select_list(),
            table.name,
            table.id.name()
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(R::from_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, record: &R) -> RepoResult<R> {
        let table = self.table();
        let columns = R::WRITE_COLUMNS
            .iter()
            .map(|column| column.name())
            .collect::<Vec<_>>();
        let placeholders = vec!["?"; columns.len()].join(", ");

        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, row_version) VALUES ({placeholders}, 1);",
                table.name,
                columns.join(", ")
            ),
            params_from_iter(record.write_values()),
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "event=record_insert module=repo table={} id={id} status=ok",
            table.name
        );
        Ok(record.with_id(id).with_row_version(1))
    }

    fn replace(&self, id: RecordId, record: &R) -> RepoResult<ReplaceOutcome<R>> {
        if record.id() != Some(id) {
            return Err(RepoError::IdentityMismatch {
                path_id: id,
                record_id: record.id(),
            });
        }

        let table = self.table();
        let assignments = R::WRITE_COLUMNS
            .iter()
            .map(|column| format!("{} = ?", column.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut bind_values = record.write_values();
        bind_values.push(Value::Integer(id));
        bind_values.push(Value::Integer(record.row_version()));

        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET {assignments}, row_version = row_version + 1 WHERE {} = ? AND row_version = ?;",
                table.name,
                table.id.name()
            ),
            params_from_iter(bind_values),
        )?;

        if changed > 0 {
            return Ok(ReplaceOutcome::Replaced(
                record.with_row_version(record.row_version() + 1),
            ));
        }

        if self.exists(id)? {
            warn!(
                "event=record_replace module=repo table={} id={id} status=conflict",
                table.name
            );
            Ok(ReplaceOutcome::Conflict)
        } else {
            debug!(
                "event=record_replace module=repo table={} id={id} status=not_found",
                table.name
            );
            Ok(ReplaceOutcome::NotFound)
        }
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let table = self.table();
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", table.name, table.id.name()),
            [id],
        )?;
        Ok(changed > 0)
    }

    fn exists(&self, id: RecordId) -> RepoResult<bool> {
        let table = self.table();
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
                table.name,
                table.id.name()
            ),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn query(&self, query: &QueryBuilder) -> RepoResult<Vec<R>> {
        if query.table().name != self.table().name {
            return Err(RepoError::InvalidData(format!(
                "query targets `{}` but store owns `{}`",
                query.table().name,
                self.table().name
            )));
        }

        let (sql, bind_values) = query.build();
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }

        Ok(records)
    }

    fn distinct_values(&self, column: Column) -> RepoResult<Vec<String>> {
        let table = self.table();
        if !table.columns.contains(&column) {
            return Err(RepoError::InvalidData(format!(
                "column `{}` is not part of `{}`",
                column.name(),
                table.name
            )));
        }

        let mut stmt = self.conn.prepare(&distinct_values_sql(table, column))?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}
