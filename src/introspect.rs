//! Record introspection: one record in, an ordered column/value list out.

use crate::error::{Result, StoreError};
use crate::record::{Record, TableMeta, Value};

/// Read the current value of every persistable field of `record`, paired
/// with its derived column name, in declaration order.
///
/// The identity and timestamp fields were already excluded when `meta` was
/// derived, so the walk here is a straight pairing of descriptors with
/// values. The resulting order is the order the query builder assigns
/// positional placeholders in, so the two must always be consumed together.
pub fn introspect<'m, R: Record>(
    record: &R,
    meta: &'m TableMeta,
) -> Result<Vec<(&'m str, Value)>> {
    let mut pairs = Vec::with_capacity(meta.len());
    for descriptor in meta.fields() {
        let value = record.get(descriptor.field).ok_or_else(|| {
            StoreError::Misuse(format!(
                "record does not recognize its own declared field '{}'",
                descriptor.field
            ))
        })?;
        pairs.push((descriptor.column.as_str(), value));
    }
    Ok(pairs)
}
