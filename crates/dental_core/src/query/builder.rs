//! SQL composition for filtered, ordered list reads.

use super::date::parse_filter_date;
use super::{Column, SortOrder, SortTable, TableSchema};
use log::debug;
use rusqlite::types::Value;

/// Accumulates predicates, ordering and paging for one table read.
///
/// The builder only describes a read; executing it is the store's job.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: &'static TableSchema,
    predicates: Vec<String>,
    bind_values: Vec<Value>,
    order: Option<SortOrder>,
    limit: Option<u32>,
    offset: u32,
}

impl QueryBuilder {
    pub fn new(table: &'static TableSchema) -> Self {
        Self {
            table,
            predicates: Vec::new(),
            bind_values: Vec::new(),
            order: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn table(&self) -> &'static TableSchema {
        self.table
    }

    /// Keeps rows where any of `columns` contains `needle` (case-sensitive).
    ///
    /// No-op when `needle` is absent or empty.
    pub fn filter_by_text(&mut self, columns: &[Column], needle: Option<&str>) -> &mut Self {
        let Some(needle) = needle.filter(|value| !value.is_empty()) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }

        let clauses = columns
            .iter()
            .map(|column| format!("instr({}, ?) > 0", column.name()))
            .collect::<Vec<_>>();
        self.predicates.push(format!("({})", clauses.join(" OR ")));
        for _ in columns {
            self.bind_values.push(Value::Text(needle.to_string()));
        }
        self
    }

    /// Keeps rows whose `column` equals `value` exactly.
    ///
    /// No-op when `value` is absent or empty.
    pub fn filter_by_exact_match(&mut self, column: Column, value: Option<&str>) -> &mut Self {
        let Some(value) = value.filter(|value| !value.is_empty()) else {
            return self;
        };

        self.predicates.push(format!("{} = ?", column.name()));
        self.bind_values.push(Value::Text(value.to_string()));
        self
    }

    /// Keeps rows whose date-time `column` falls on the date in `raw`.
    ///
    /// Unparseable input skips the filter instead of failing the read.
    pub fn filter_by_date(&mut self, column: Column, raw: Option<&str>) -> &mut Self {
        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return self;
        };
        let Some(date) = parse_filter_date(raw) else {
            debug!(
                "event=filter_skipped module=query table={} column={} reason=unparseable_date",
                self.table.name,
                column.name()
            );
            return self;
        };

        self.predicates.push(format!("date({}) = ?", column.name()));
        self.bind_values
            .push(Value::Text(date.format("%Y-%m-%d").to_string()));
        self
    }

    /// Orders by the ordering `key` maps to in `sorts`, or its default.
    pub fn apply_sort(&mut self, sorts: &SortTable, key: Option<&str>) -> &mut Self {
        self.order = Some(sorts.resolve(key));
        self
    }

    pub fn paginate(&mut self, limit: Option<u32>, offset: u32) -> &mut Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Renders the SELECT statement and its bind values.
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.table.select_list(),
            self.table.name
        );
        let mut bind_values = self.bind_values.clone();

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }

        let id = self.table.id.name();
        match self.order {
            Some(order) if order.column != self.table.id => {
                sql.push_str(&format!(
                    " ORDER BY {} {}, {id} ASC",
                    order.column.order_expr(),
                    order.direction.sql()
                ));
            }
            Some(order) => {
                sql.push_str(&format!(" ORDER BY {id} {}", order.direction.sql()));
            }
            None => sql.push_str(&format!(" ORDER BY {id} ASC")),
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(self.offset)));
        }

        (sql, bind_values)
    }
}

/// Full-table scan of the distinct values stored in `column`.
pub fn distinct_values_sql(table: &TableSchema, column: Column) -> String {
    format!("SELECT DISTINCT {} FROM {}", column.name(), table.name)
}
