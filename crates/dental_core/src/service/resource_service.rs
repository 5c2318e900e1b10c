//! Generic list/get/create/update/delete service over one record type.

use crate::model::{RecordId, ValidationErrors};
use crate::query::{Column, QueryBuilder, SortTable};
use crate::repo::record_store::{RecordStore, RepoResult, ReplaceOutcome, TableRecord};
use log::{info, warn};
use std::marker::PhantomData;

/// Per-entity configuration consumed by [`ResourceService`].
///
/// Entities differ only in which columns are searched, filtered and sorted.
pub trait ResourceProfile: TableRecord {
    /// Lowercase entity label used in log events.
    const LABEL: &'static str;
    /// Columns matched by the free-text search (any column may match).
    const SEARCH_COLUMNS: &'static [Column];
    /// Categorical column matched exactly by `ListParams::filter`.
    const EXACT_FILTER: Option<Column> = None;
    /// Date-time column matched by `ListParams::date`.
    const DATE_FILTER: Option<Column> = None;
    /// Column whose distinct values populate filter options.
    const FILTER_OPTIONS: Option<Column> = None;
    const SORTS: &'static SortTable;

    /// Builds the filtered, ordered read described by `params`.
    fn list_query(params: &ListParams) -> QueryBuilder {
        let mut query = QueryBuilder::new(Self::TABLE);
        query.filter_by_text(Self::SEARCH_COLUMNS, params.search.as_deref());
        if let Some(column) = Self::EXACT_FILTER {
            query.filter_by_exact_match(column, params.filter.as_deref());
        }
        if let Some(column) = Self::DATE_FILTER {
            query.filter_by_date(column, params.date.as_deref());
        }
        query
            .apply_sort(Self::SORTS, params.sort.as_deref())
            .paginate(params.limit, params.offset);
        query
    }
}

/// Optional list parameters as extracted from a request.
///
/// Parameters an entity does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    /// Exact-match categorical filter (treatment specialist).
    pub filter: Option<String>,
    /// Date filter input (patient appointment date).
    pub date: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }

    pub fn filter(mut self, value: impl Into<String>) -> Self {
        self.filter = Some(value.into());
        self
    }

    pub fn date(mut self, value: impl Into<String>) -> Self {
        self.date = Some(value.into());
        self
    }

    pub fn sort(mut self, value: impl Into<String>) -> Self {
        self.sort = Some(value.into());
        self
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<R> {
    /// Persisted record with its store-assigned identity.
    Created(R),
    ValidationFailed(ValidationErrors),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<R> {
    /// Persisted record with its new concurrency token.
    Updated(R),
    IdentityMismatch {
        path_id: RecordId,
        record_id: Option<RecordId>,
    },
    NotFound,
    /// The record changed since it was read; reload and retry or abort.
    Conflict,
    ValidationFailed(ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
}

/// Use-case service for one resource type.
pub struct ResourceService<R, S> {
    store: S,
    _record: PhantomData<fn() -> R>,
}

impl<R, S> ResourceService<R, S>
where
    R: ResourceProfile,
    S: RecordStore<R>,
{
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists records matching `params`, sorted and paged.
    ///
    /// An empty result is a valid answer, never an error.
    pub fn list(&self, params: &ListParams) -> RepoResult<Vec<R>> {
        let records = self.store.query(&R::list_query(params))?;
        info!(
            "event={}_list module=service status=ok count={}",
            R::LABEL,
            records.len()
        );
        Ok(records)
    }

    /// Distinct values for the entity's categorical filter, over all records.
    ///
    /// Returns an empty list for entities without a categorical filter.
    pub fn filter_options(&self) -> RepoResult<Vec<String>> {
        match R::FILTER_OPTIONS {
            Some(column) => self.store.distinct_values(column),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, id: RecordId) -> RepoResult<Option<R>> {
        self.store.get_by_id(id)
    }

    /// Persists a new record; any caller-supplied identity is replaced.
    pub fn create(&self, record: &R) -> RepoResult<CreateOutcome<R>> {
        if let Err(errors) = record.validate() {
            info!(
                "event={}_create module=service status=validation_failed fields={}",
                R::LABEL,
                errors.errors().len()
            );
            return Ok(CreateOutcome::ValidationFailed(errors));
        }

        let created = self.store.insert(record)?;
        info!(
            "event={}_create module=service status=ok id={}",
            R::LABEL,
            created.id().unwrap_or_default()
        );
        Ok(CreateOutcome::Created(created))
    }

    /// Replaces every field of record `id`.
    ///
    /// Identity is checked first and never reaches the store on mismatch.
    pub fn update(&self, id: RecordId, record: &R) -> RepoResult<UpdateOutcome<R>> {
        if record.id() != Some(id) {
            warn!(
                "event={}_update module=service status=identity_mismatch id={id}",
                R::LABEL
            );
            return Ok(UpdateOutcome::IdentityMismatch {
                path_id: id,
                record_id: record.id(),
            });
        }

        if let Err(errors) = record.validate() {
            info!(
                "event={}_update module=service status=validation_failed id={id}",
                R::LABEL
            );
            return Ok(UpdateOutcome::ValidationFailed(errors));
        }

        let outcome = match self.store.replace(id, record)? {
            ReplaceOutcome::Replaced(updated) => UpdateOutcome::Updated(updated),
            ReplaceOutcome::NotFound => UpdateOutcome::NotFound,
            ReplaceOutcome::Conflict => UpdateOutcome::Conflict,
        };
        info!(
            "event={}_update module=service status={} id={id}",
            R::LABEL,
            update_status(&outcome)
        );
        Ok(outcome)
    }

    /// Deletes record `id`; deleting an absent record also succeeds.
    pub fn delete(&self, id: RecordId) -> RepoResult<DeleteOutcome> {
        let removed = self.store.delete(id)?;
        info!(
            "event={}_delete module=service status=ok id={id} removed={removed}",
            R::LABEL
        );
        Ok(DeleteOutcome::Deleted)
    }
}

fn update_status<R>(outcome: &UpdateOutcome<R>) -> &'static str {
    match outcome {
        UpdateOutcome::Updated(_) => "ok",
        UpdateOutcome::IdentityMismatch { .. } => "identity_mismatch",
        UpdateOutcome::NotFound => "not_found",
        UpdateOutcome::Conflict => "conflict",
        UpdateOutcome::ValidationFailed(_) => "validation_failed",
    }
}
