//! The record store: per-table orchestration of introspection, statement
//! assembly, execution and hydration.
//!
//! A [`RecordStore`] is bound at construction to exactly one table name, a
//! shared connection collaborator, and a [`Transcoder`]. It never opens,
//! closes or pools connections; pooling, retries and timeouts belong to the
//! collaborator. All operations are synchronous and block until the
//! statement completes or fails.
//!
//! Concurrent callers need no coordination at the identity level, but note
//! that concurrent updates to the same identity race at the storage layer
//! with last-write-wins semantics; there is no optimistic-concurrency check.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::hydrate::{ScanMode, scan_row};
use crate::introspect::introspect;
use crate::query;
use crate::record::{Id, MetaRegistry, Record, TRANSIENT};
use crate::transcode::Transcoder;

/// A store for one table. Cheap to construct; table metadata for each record
/// type it sees is derived on first use and cached for the store's lifetime.
pub struct RecordStore {
    connection: Arc<Mutex<Connection>>,
    table: String,
    transcoder: Transcoder,
    registry: MetaRegistry,
}

impl RecordStore {
    /// Bind a store to `table` on the given connection collaborator, using
    /// the standard snake-case transcoder. The table name is trusted as a
    /// literal; no validation is performed.
    pub fn new(connection: Arc<Mutex<Connection>>, table: impl Into<String>) -> Self {
        Self::with_transcoder(connection, table, Transcoder::snake())
    }

    /// Bind a store with an explicit naming strategy.
    pub fn with_transcoder(
        connection: Arc<Mutex<Connection>>,
        table: impl Into<String>,
        transcoder: Transcoder,
    ) -> Self {
        Self {
            connection,
            table: table.into(),
            transcoder,
            registry: MetaRegistry::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Persist a transient record. On success the generated identity and
    /// both timestamps are filled into the record from the statement's
    /// returning clause; its other fields are untouched.
    pub fn create<R: Record + 'static>(&self, record: &mut R) -> Result<()> {
        let meta = self.registry.meta_for::<R>(&self.transcoder)?;
        let statement = query::insert(&self.table, introspect(record, &meta)?)?;
        debug!(table = %self.table, sql = %statement.sql, "create");
        let connection = self.lock()?;
        let mut prepared = connection.prepare(&statement.sql)?;
        let (id, created_at, updated_at) = prepared.query_row(
            params_from_iter(statement.params.iter()),
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        record.fill_meta(id, created_at, updated_at);
        Ok(())
    }

    /// Load the row with identity `id` onto `record`. Zero matching rows is
    /// [`StoreError::NoRows`], distinct from a failing driver.
    pub fn load<R: Record + 'static>(&self, record: &mut R, id: Id) -> Result<()> {
        let meta = self.registry.meta_for::<R>(&self.transcoder)?;
        let statement = query::select(&self.table, id);
        debug!(table = %self.table, sql = %statement.sql, "load");
        let connection = self.lock()?;
        let mut prepared = connection.prepare(&statement.sql)?;
        let columns: Vec<String> = prepared
            .column_names()
            .iter()
            .map(|column| column.to_string())
            .collect();
        let mut rows = prepared.query(params_from_iter(statement.params.iter()))?;
        match rows.next()? {
            Some(row) => scan_row(row, &columns, &meta, ScanMode::Strict, record),
            None => Err(StoreError::NoRows),
        }
    }

    /// Load every row whose identity appears in `ids`, returned as
    /// `(identity, record)` pairs in ascending identity order regardless of
    /// input order. Identities with no matching row are simply absent from
    /// the result. An empty id list returns an empty vector without
    /// contacting the store.
    pub fn load_many<R: Record + Default + 'static>(&self, ids: &[Id]) -> Result<Vec<(Id, R)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let meta = self.registry.meta_for::<R>(&self.transcoder)?;
        let statement = query::select_many(&self.table, ids);
        debug!(table = %self.table, sql = %statement.sql, "load_many");
        let connection = self.lock()?;
        let mut prepared = connection.prepare(&statement.sql)?;
        let columns: Vec<String> = prepared
            .column_names()
            .iter()
            .map(|column| column.to_string())
            .collect();
        let mut rows = prepared.query(params_from_iter(statement.params.iter()))?;
        let mut records = Vec::with_capacity(ids.len());
        while let Some(row) = rows.next()? {
            let mut record = R::default();
            scan_row(row, &columns, &meta, ScanMode::Strict, &mut record)?;
            records.push((record.id(), record));
        }
        Ok(records)
    }

    /// Positional variant of [`load_many`](RecordStore::load_many):
    /// hydrates rows into a caller-supplied slice by index.
    ///
    /// **Sharp edge**: rows arrive in ascending identity order, and the
    /// destination slice must already be arranged to correspond — the store
    /// does not re-sort on the caller's behalf. The slice must be exactly as
    /// long as the id list; a mismatch is [`StoreError::Misuse`]. When some
    /// identities match no row, trailing destinations are left untouched.
    /// Prefer [`load_many`](RecordStore::load_many) unless the destination
    /// records carry state that must survive hydration.
    pub fn load_many_into<R: Record + 'static>(&self, ids: &[Id], records: &mut [R]) -> Result<()> {
        if records.len() != ids.len() {
            return Err(StoreError::Misuse(format!(
                "destination slice length {} does not match id list length {}",
                records.len(),
                ids.len()
            )));
        }
        if ids.is_empty() {
            return Ok(());
        }
        let meta = self.registry.meta_for::<R>(&self.transcoder)?;
        let statement = query::select_many(&self.table, ids);
        debug!(table = %self.table, sql = %statement.sql, "load_many_into");
        let connection = self.lock()?;
        let mut prepared = connection.prepare(&statement.sql)?;
        let columns: Vec<String> = prepared
            .column_names()
            .iter()
            .map(|column| column.to_string())
            .collect();
        let mut rows = prepared.query(params_from_iter(statement.params.iter()))?;
        let mut position = 0;
        while let Some(row) = rows.next()? {
            let Some(record) = records.get_mut(position) else {
                return Err(StoreError::Misuse(
                    "result returned more rows than destinations".to_string(),
                ));
            };
            scan_row(row, &columns, &meta, ScanMode::Strict, record)?;
            position += 1;
        }
        Ok(())
    }

    /// Rewrite the row with the record's identity. Fails with
    /// [`StoreError::InvalidState`] before any statement is built when the
    /// identity is transient. On success the identity and both timestamps
    /// are refreshed from the returning clause.
    ///
    /// Concurrent updates to the same identity are last-write-wins; no
    /// version check is made.
    pub fn update<R: Record + 'static>(&self, record: &mut R) -> Result<()> {
        if record.id() == TRANSIENT {
            return Err(StoreError::InvalidState(
                "record has no identity, nothing to update".to_string(),
            ));
        }
        let meta = self.registry.meta_for::<R>(&self.transcoder)?;
        let statement = query::update(&self.table, introspect(record, &meta)?, record.id())?;
        debug!(table = %self.table, sql = %statement.sql, "update");
        let connection = self.lock()?;
        let mut prepared = connection.prepare(&statement.sql)?;
        let (id, created_at, updated_at) = prepared.query_row(
            params_from_iter(statement.params.iter()),
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        record.fill_meta(id, created_at, updated_at);
        Ok(())
    }

    /// Remove the row with the record's identity. The in-memory record keeps
    /// its last known identity; treating it as gone is the caller's
    /// responsibility.
    pub fn delete<R: Record>(&self, record: &R) -> Result<()> {
        let statement = query::delete(&self.table, record.id());
        debug!(table = %self.table, sql = %statement.sql, "delete");
        let connection = self.lock()?;
        let affected =
            connection.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        debug!(table = %self.table, affected, "delete done");
        Ok(())
    }
}
