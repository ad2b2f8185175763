//! rowbound – a minimal record-to-table data access layer.
//!
//! rowbound persists arbitrary flat in-memory record types to single
//! relational tables without hand-written SQL, by deriving column mappings
//! from a record's declared field structure:
//! * A [`record::Record`] is any type exposing an integer identity, two
//!   timestamps, and named scalar fields.
//! * A [`transcode::Transcoder`] converts declared field names to column
//!   names (`UserID` → `user_id`), carried as explicit per-store
//!   configuration rather than global state.
//! * [`record::TableMeta`] is the ordered persistable-field descriptor list,
//!   derived once per record type and cached; identity and timestamps are
//!   excluded and only ever travel through `fill_meta`.
//! * The [`query`] builders assemble parameterized INSERT / UPDATE / SELECT
//!   / DELETE statements; every value, identities included, is a bound
//!   parameter.
//! * The [`hydrate`] scanner maps result columns back onto record fields
//!   through a bidirectional [`hydrate::ColumnMapping`].
//! * A [`store::RecordStore`] orchestrates the above per table: Create,
//!   Load, LoadMany, Update, Delete.
//!
//! ## Modules
//! * [`transcode`] – field-identifier to column-identifier conversion.
//! * [`record`] – the record capability, scalar values, table metadata.
//! * [`introspect`] – record to ordered column/value list.
//! * [`query`] – parameterized statement assembly.
//! * [`hydrate`] – result-row to record-field scanning.
//! * [`store`] – per-table CRUD orchestration.
//! * [`settings`] – host-side configuration and connection opening.
//! * [`error`] – the typed error taxonomy.
//!
//! ## Scope
//! Single tables only: no joins, no relationships, no transactions spanning
//! statements, no migrations, no caching. Connection pooling, retries and
//! timeouts belong to the connection collaborator. Concurrent updates to
//! one identity are last-write-wins by design.
//!
//! ## Quick Start
//! ```
//! use std::sync::{Arc, Mutex};
//! use chrono::{DateTime, Utc};
//! use rusqlite::Connection;
//! use rowbound::error::Result;
//! use rowbound::record::{Id, Record, Value};
//! use rowbound::store::RecordStore;
//!
//! #[derive(Debug, Default)]
//! struct Note {
//!     id: Id,
//!     created_at: Option<DateTime<Utc>>,
//!     updated_at: Option<DateTime<Utc>>,
//!     body: String,
//! }
//!
//! impl Record for Note {
//!     fn fields() -> &'static [&'static str] {
//!         &["Id", "CreatedAt", "UpdatedAt", "Body"]
//!     }
//!     fn id(&self) -> Id {
//!         self.id
//!     }
//!     fn fill_meta(&mut self, id: Id, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
//!         self.id = id;
//!         self.created_at = Some(created_at);
//!         self.updated_at = Some(updated_at);
//!     }
//!     fn get(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "Body" => Some(Value::from(self.body.clone())),
//!             _ => None,
//!         }
//!     }
//!     fn set(&mut self, field: &str, value: Value) -> Result<()> {
//!         match field {
//!             "Body" => self.body = value.as_text().unwrap_or_default().to_string(),
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let connection = Connection::open_in_memory().expect("connection");
//! connection
//!     .execute_batch(
//!         "create table note (
//!             id integer primary key autoincrement,
//!             created_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
//!             updated_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
//!             body text not null
//!         );",
//!     )
//!     .expect("schema");
//! let store = RecordStore::new(Arc::new(Mutex::new(connection)), "note");
//!
//! let mut note = Note { body: "first".to_string(), ..Note::default() };
//! store.create(&mut note).expect("create");
//! assert!(note.id > 0);
//!
//! let mut reloaded = Note::default();
//! store.load(&mut reloaded, note.id).expect("load");
//! assert_eq!(reloaded.body, "first");
//! ```

pub mod error;
pub mod hydrate;
pub mod introspect;
pub mod query;
pub mod record;
pub mod settings;
pub mod store;
pub mod transcode;
