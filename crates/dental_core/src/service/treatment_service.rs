//! Treatment resource configuration.
//!
//! - Search matches `name`.
//! - `ListParams::filter` matches `specialist` exactly; distinct specialists
//!   are exposed as filter options.
//! - Sort keys: `name_asc`, `name_desc`, `price_asc`, `price_desc`; default `name_asc`.

use super::resource_service::{ResourceProfile, ResourceService};
use crate::model::treatment::Treatment;
use crate::query::{Column, SortOrder, SortTable};
use crate::repo::treatment_repo::{TREATMENT_NAME, TREATMENT_PRICE, TREATMENT_SPECIALIST};

pub const TREATMENT_SORTS: SortTable = SortTable {
    entries: &[
        ("name_asc", SortOrder::asc(TREATMENT_NAME)),
        ("name_desc", SortOrder::desc(TREATMENT_NAME)),
        ("price_asc", SortOrder::asc(TREATMENT_PRICE)),
        ("price_desc", SortOrder::desc(TREATMENT_PRICE)),
    ],
    default: SortOrder::asc(TREATMENT_NAME),
};

pub type TreatmentService<S> = ResourceService<Treatment, S>;

impl ResourceProfile for Treatment {
    const LABEL: &'static str = "treatment";
    const SEARCH_COLUMNS: &'static [Column] = &[TREATMENT_NAME];
    const EXACT_FILTER: Option<Column> = Some(TREATMENT_SPECIALIST);
    const FILTER_OPTIONS: Option<Column> = Some(TREATMENT_SPECIALIST);
    const SORTS: &'static SortTable = &TREATMENT_SORTS;
}
