//! Composable, parameterized list queries.
//!
//! # Responsibility
//! - Narrow and order a table's rows from optional caller parameters.
//! - Keep every caller-supplied value in bind parameters, never in SQL text.
//!
//! # Invariants
//! - Filters compose with AND semantics; their order does not change the result set.
//! - Column identifiers come only from compile-time table schemas.
//! - Ordering is resolved through closed sort tables; unknown keys use the default.

mod builder;
mod date;

pub use builder::{distinct_values_sql, QueryBuilder};
pub use date::parse_filter_date;

/// How a column is compared and ordered in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    /// `YYYY-MM-DD HH:MM:SS` text without timezone.
    DateTime,
    /// Canonical decimal text, ordered numerically.
    Decimal,
}

/// A column declared by a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    kind: ColumnKind,
}

impl Column {
    pub(crate) const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    fn order_expr(&self) -> String {
        match self.kind {
            ColumnKind::Decimal => format!("CAST({} AS REAL)", self.name),
            ColumnKind::Integer | ColumnKind::Text | ColumnKind::DateTime => {
                self.name.to_string()
            }
        }
    }
}

/// Static description of one persisted table.
#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub id: Column,
    /// Select list, in row-mapping order.
    pub columns: &'static [Column],
}

impl TableSchema {
    pub(crate) fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(Column::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Ordering over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortOrder {
    pub const fn asc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn desc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Closed mapping from sort tokens (`name_asc`, `price_desc`, ...) to orderings.
#[derive(Debug)]
pub struct SortTable {
    pub entries: &'static [(&'static str, SortOrder)],
    pub default: SortOrder,
}

impl SortTable {
    /// Resolves `key`, falling back to the default for absent or unknown tokens.
    pub fn resolve(&self, key: Option<&str>) -> SortOrder {
        key.and_then(|key| {
            self.entries
                .iter()
                .find(|(token, _)| *token == key)
                .map(|(_, order)| *order)
        })
        .unwrap_or(self.default)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(token, _)| *token)
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, ColumnKind, SortOrder, SortTable};

    const NAME: Column = Column::new("name", ColumnKind::Text);
    const PRICE: Column = Column::new("price", ColumnKind::Decimal);
    const TABLE: SortTable = SortTable {
        entries: &[
            ("price_asc", SortOrder::asc(PRICE)),
            ("price_desc", SortOrder::desc(PRICE)),
        ],
        default: SortOrder::asc(NAME),
    };

    #[test]
    fn known_keys_resolve_to_their_ordering() {
        assert_eq!(TABLE.resolve(Some("price_desc")), SortOrder::desc(PRICE));
        assert_eq!(TABLE.resolve(Some("price_asc")), SortOrder::asc(PRICE));
    }

    #[test]
    fn unknown_or_absent_keys_fall_back_to_default() {
        assert_eq!(TABLE.resolve(None), SortOrder::asc(NAME));
        assert_eq!(TABLE.resolve(Some("PRICE_DESC")), SortOrder::asc(NAME));
        assert_eq!(TABLE.resolve(Some("name; DROP TABLE x")), SortOrder::asc(NAME));
    }

    #[test]
    fn decimal_columns_order_numerically() {
        assert_eq!(PRICE.kind(), ColumnKind::Decimal);
        assert_eq!(NAME.kind(), ColumnKind::Text);
        assert_eq!(PRICE.order_expr(), "CAST(price AS REAL)");
        assert_eq!(NAME.order_expr(), "name");
    }
}
