//! The record capability and the per-type table metadata it gives rise to.
//!
//! A *record* is any flat application type that can tell the engine its
//! declared field names, hand out and accept field values by name, and take
//! a metadata fill after a successful write. The engine derives a
//! [`TableMeta`] from those declared names once per record type and caches
//! it, so no per-operation introspection happens after the first use.
//!
//! Values cross the engine boundary as the scalar [`Value`] type. Nested or
//! composite fields are inexpressible by construction; a caller with
//! structured data flattens it before declaring the field.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

use crate::error::{Result, StoreError};
use crate::transcode::Transcoder;

/// The integer primary key of a record.
pub type Id = i64;

/// The identity of a record that has never been persisted.
pub const TRANSIENT: Id = 0;

/// Column names reserved for record metadata. Fields whose derived column
/// collides with one of these are excluded from introspection and are
/// populated through [`Record::fill_meta`] instead.
pub const ID_COLUMN: &str = "id";
pub const CREATED_COLUMN: &str = "created_at";
pub const UPDATED_COLUMN: &str = "updated_at";

/// A scalar field value, as it travels between a record and the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
    /// Integer columns widen to `f64`, since SQLite stores a round float
    /// back as an integer.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }
    /// Booleans are stored as integers; anything non-zero reads as true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*r)),
            Value::Text(t) => ToSqlOutput::Borrowed(ValueRef::Text(t.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(v as i64)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}
impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Text(v.to_rfc3339())
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// What every persistable type must expose to the engine.
///
/// Implementations list every declared field in declaration order in
/// [`fields`](Record::fields), including the identity and timestamp fields
/// if the type declares them by name. The engine never reads or writes
/// identity and timestamps through [`get`](Record::get) /
/// [`set`](Record::set); those travel through [`id`](Record::id) and
/// [`fill_meta`](Record::fill_meta) exclusively.
pub trait Record {
    /// Declared field names, in declaration order.
    fn fields() -> &'static [&'static str]
    where
        Self: Sized;

    /// Current identity; [`TRANSIENT`] when the record has not been
    /// persisted.
    fn id(&self) -> Id;

    /// Accept identity and timestamps after a successful Create, Update or
    /// full-record load. This is the only path by which the engine touches
    /// record metadata.
    fn fill_meta(&mut self, id: Id, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    /// Read the current value of a declared persistable field, by declared
    /// name. `None` for names the type does not recognize.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write a value into a declared persistable field, by declared name.
    /// Implementations should reject unrecognized names with
    /// [`StoreError::Misuse`].
    fn set(&mut self, field: &str, value: Value) -> Result<()>;
}

/// One persistable field: its declared name and the column it maps to.
#[derive(Debug, Clone)]
pub struct FieldColumn {
    pub field: &'static str,
    pub column: String,
}

/// The ordered persistable-field descriptors of one record type, derived
/// once by applying a [`Transcoder`] to every declared field and dropping
/// the identity and timestamp fields. Declaration order is preserved; it is
/// the order the query builder binds parameters in.
#[derive(Debug, Clone)]
pub struct TableMeta {
    fields: Vec<FieldColumn>,
}

impl TableMeta {
    pub fn derive<R: Record>(transcoder: &Transcoder) -> Self {
        let mut fields = Vec::new();
        for &field in R::fields() {
            // Metadata detection is canonical, not strategy-dependent: `Id`
            // and `id` both name the identity field no matter what the
            // store's transcoder would make of them.
            let canonical = crate::transcode::to_snake(field);
            if matches!(
                canonical.as_str(),
                ID_COLUMN | CREATED_COLUMN | UPDATED_COLUMN
            ) {
                continue;
            }
            fields.push(FieldColumn {
                field,
                column: transcoder.transcode(field),
            });
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldColumn] {
        &self.fields
    }

    pub fn field_for(&self, column: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|fc| fc.column == column)
            .map(|fc| fc.field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Store-side cache of derived [`TableMeta`], keyed by record type. Replaces
/// per-operation field reflection with a single derivation per type.
#[derive(Debug, Default)]
pub struct MetaRegistry {
    derived: Mutex<HashMap<TypeId, Arc<TableMeta>>>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta_for<R: Record + 'static>(&self, transcoder: &Transcoder) -> Result<Arc<TableMeta>> {
        let mut derived = self
            .derived
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(derived
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Arc::new(TableMeta::derive::<R>(transcoder)))
            .clone())
    }
}
