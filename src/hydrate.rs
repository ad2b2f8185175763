//! Hydration: populating record fields from result-row columns.
//!
//! A [`ColumnMapping`] is the bidirectional association between the columns
//! a statement returned and the declared fields of the destination record
//! type. It is derived by matching the row's column list against the
//! transcoded field names in the type's [`TableMeta`], then consulted for
//! every column scanned.
//!
//! The metadata columns `id`, `created_at` and `updated_at` never pass
//! through named field accessors; when all three are present in a row they
//! reach the record through [`Record::fill_meta`] in one call.

use bimap::BiMap;
use chrono::{DateTime, Utc};
use rusqlite::Row;

use crate::error::{Result, StoreError};
use crate::record::{CREATED_COLUMN, ID_COLUMN, Id, Record, TableMeta, UPDATED_COLUMN, Value};

/// How a scan treats a result column with no destination field.
///
/// A full-record load is [`Strict`](ScanMode::Strict): a column the record
/// cannot receive means the record type and the table disagree, which is a
/// [`StoreError::MissingField`]. A [`Lenient`](ScanMode::Lenient) scan
/// discards such columns, for callers hydrating a projection into a wider
/// record. In the other direction, declared fields absent from the result
/// set keep their current value under either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Strict,
    Lenient,
}

/// Bidirectional column-name to field-name association for one result set.
#[derive(Debug)]
pub struct ColumnMapping {
    map: BiMap<String, &'static str>,
}

impl ColumnMapping {
    /// Match the result set's column list against a type's table metadata.
    /// Columns with no descriptor and descriptors with no column are simply
    /// left out; what each absence means is the scan's decision.
    pub fn derive(meta: &TableMeta, columns: &[String]) -> Self {
        let mut map = BiMap::new();
        for column in columns {
            if let Some(field) = meta.field_for(column) {
                map.insert(column.clone(), field);
            }
        }
        Self { map }
    }

    pub fn field_of(&self, column: &str) -> Option<&'static str> {
        self.map.get_by_left(column).copied()
    }

    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.map.get_by_right(field).map(|column| column.as_str())
    }
}

/// Scan one result row onto a destination record.
///
/// `columns` is the statement's column list, in result order; each column
/// either carries metadata, maps to a field, or is handled per `mode`.
pub fn scan_row<R: Record>(
    row: &Row<'_>,
    columns: &[String],
    meta: &TableMeta,
    mode: ScanMode,
    record: &mut R,
) -> Result<()> {
    let mapping = ColumnMapping::derive(meta, columns);
    let mut id: Option<Id> = None;
    let mut created_at: Option<DateTime<Utc>> = None;
    let mut updated_at: Option<DateTime<Utc>> = None;
    for (position, column) in columns.iter().enumerate() {
        match column.as_str() {
            ID_COLUMN => id = Some(row.get(position)?),
            CREATED_COLUMN => created_at = Some(row.get(position)?),
            UPDATED_COLUMN => updated_at = Some(row.get(position)?),
            _ => match mapping.field_of(column) {
                Some(field) => record.set(field, Value::from(row.get_ref(position)?))?,
                None => {
                    if mode == ScanMode::Strict {
                        return Err(StoreError::MissingField {
                            column: column.clone(),
                        });
                    }
                }
            },
        }
    }
    if let (Some(id), Some(created_at), Some(updated_at)) = (id, created_at, updated_at) {
        record.fill_meta(id, created_at, updated_at);
    }
    Ok(())
}
