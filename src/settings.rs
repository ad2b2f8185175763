//! Ambient configuration for hosts of the engine.
//!
//! The engine itself never manages connection lifecycle; it only ever sees
//! the shared connection collaborator. This module is the optional
//! convenience for hosting applications: settings read from an optional
//! `rowbound` config file with `ROWBOUND_*` environment overrides, and an
//! opener producing the collaborator in either persistence mode.

use std::sync::{Arc, Mutex};

use config::{Config, Environment, File};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

use crate::error::Result;

/// Whether the backing store lives in memory or in a database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

/// Host-facing settings. Absent a database path the store is in-memory,
/// which is also what the test suites run against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub database_path: Option<String>,
}

impl StoreSettings {
    /// Layered load: defaults, then an optional `rowbound.*` config file in
    /// the working directory, then `ROWBOUND_*` environment variables.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("rowbound").required(false))
            .add_source(Environment::with_prefix("ROWBOUND"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn mode(&self) -> PersistenceMode {
        match &self.database_path {
            Some(path) => PersistenceMode::File(path.clone()),
            None => PersistenceMode::InMemory,
        }
    }

    /// Open the connection collaborator described by these settings. This is
    /// host glue; stores accept the result but never call this themselves.
    pub fn open(&self) -> Result<Arc<Mutex<Connection>>> {
        let connection = match self.mode() {
            PersistenceMode::InMemory => {
                info!("opening in-memory store");
                Connection::open_in_memory()?
            }
            PersistenceMode::File(path) => {
                info!(%path, "opening file-backed store");
                Connection::open(path)?
            }
        };
        Ok(Arc::new(Mutex::new(connection)))
    }
}
