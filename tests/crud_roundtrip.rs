use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use rowbound::error::{Result, StoreError};
use rowbound::record::{Id, Record, Value};
use rowbound::store::RecordStore;

#[derive(Debug, Clone, Default, PartialEq)]
struct Gadget {
    id: Id,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    name: String,
    unit_price: f64,
    in_stock: bool,
}

impl Record for Gadget {
    fn fields() -> &'static [&'static str] {
        &["Id", "CreatedAt", "UpdatedAt", "Name", "UnitPrice", "InStock"]
    }
    fn id(&self) -> Id {
        self.id
    }
    fn fill_meta(&mut self, id: Id, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
    }
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "Name" => Some(Value::from(self.name.clone())),
            "UnitPrice" => Some(Value::from(self.unit_price)),
            "InStock" => Some(Value::from(self.in_stock)),
            _ => None,
        }
    }
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "Name" => self.name = value.as_text().unwrap_or_default().to_string(),
            "UnitPrice" => self.unit_price = value.as_real().unwrap_or_default(),
            "InStock" => self.in_stock = value.as_bool().unwrap_or_default(),
            other => return Err(StoreError::Misuse(format!("unknown field '{other}'"))),
        }
        Ok(())
    }
}

fn gadget_store() -> RecordStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let connection = Connection::open_in_memory().expect("db");
    connection
        .execute_batch(
            "create table gadget (
                id integer primary key autoincrement,
                created_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
                updated_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
                name text not null,
                unit_price real not null,
                in_stock integer not null
            );
            create trigger gadget_touch after update on gadget
            begin
                update gadget
                    set updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')
                    where id = new.id;
            end;",
        )
        .expect("schema");
    RecordStore::new(Arc::new(Mutex::new(connection)), "gadget")
}

#[test]
fn create_fills_identity_and_timestamps() {
    let store = gadget_store();
    let mut gadget = Gadget {
        name: "prism".to_string(),
        unit_price: 9.5,
        in_stock: true,
        ..Gadget::default()
    };
    store.create(&mut gadget).expect("create");
    assert!(gadget.id > 0);
    assert!(gadget.created_at.is_some());
    assert!(gadget.updated_at.is_some());
}

#[test]
fn created_record_loads_back_with_equal_field_values() {
    let store = gadget_store();
    let mut gadget = Gadget {
        name: "prism".to_string(),
        unit_price: 9.5,
        in_stock: true,
        ..Gadget::default()
    };
    store.create(&mut gadget).expect("create");

    let mut reloaded = Gadget::default();
    store.load(&mut reloaded, gadget.id).expect("load");
    assert_eq!(reloaded.id, gadget.id);
    assert_eq!(reloaded.name, "prism");
    assert_eq!(reloaded.unit_price, 9.5);
    assert!(reloaded.in_stock);
}

#[test]
fn update_rewrites_fields_and_refreshes_the_update_timestamp() {
    let store = gadget_store();
    let mut gadget = Gadget {
        name: "prism".to_string(),
        unit_price: 9.5,
        in_stock: true,
        ..Gadget::default()
    };
    store.create(&mut gadget).expect("create");

    gadget.name = "spectrum".to_string();
    gadget.in_stock = false;
    store.update(&mut gadget).expect("update");

    let mut reloaded = Gadget::default();
    store.load(&mut reloaded, gadget.id).expect("load");
    assert_eq!(reloaded.name, "spectrum");
    assert!(!reloaded.in_stock);
    assert!(reloaded.updated_at.expect("updated_at") >= reloaded.created_at.expect("created_at"));
}

#[test]
fn update_on_a_transient_record_fails_without_issuing_a_statement() {
    // The store is bound to a table that does not exist, so any statement
    // reaching the driver would fail with a connection error instead.
    let connection = Connection::open_in_memory().expect("db");
    let store = RecordStore::new(Arc::new(Mutex::new(connection)), "nowhere");
    let mut gadget = Gadget::default();
    let err = store.update(&mut gadget).expect_err("transient update");
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[test]
fn delete_then_load_yields_no_rows() {
    let store = gadget_store();
    let mut gadget = Gadget {
        name: "prism".to_string(),
        unit_price: 9.5,
        in_stock: true,
        ..Gadget::default()
    };
    store.create(&mut gadget).expect("create");
    store.delete(&gadget).expect("delete");
    // The in-memory record keeps its last known identity.
    assert!(gadget.id > 0);

    let mut reloaded = Gadget::default();
    let err = store.load(&mut reloaded, gadget.id).expect_err("gone");
    assert!(matches!(err, StoreError::NoRows));
}

#[test]
fn two_stores_can_follow_different_naming_conventions() {
    use rowbound::transcode::{Transcoder, to_snake};
    fn prefixed(identifier: &str) -> String {
        format!("c_{}", to_snake(identifier))
    }
    let connection = Connection::open_in_memory().expect("db");
    connection
        .execute_batch(
            "create table relic (
                id integer primary key autoincrement,
                created_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
                updated_at text not null default (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
                c_name text not null,
                c_unit_price real not null,
                c_in_stock integer not null
            );",
        )
        .expect("schema");
    let store = RecordStore::with_transcoder(
        Arc::new(Mutex::new(connection)),
        "relic",
        Transcoder::custom(prefixed),
    );
    let mut gadget = Gadget {
        name: "amulet".to_string(),
        unit_price: 3.25,
        in_stock: true,
        ..Gadget::default()
    };
    store.create(&mut gadget).expect("create");

    let mut reloaded = Gadget::default();
    store.load(&mut reloaded, gadget.id).expect("load");
    assert_eq!(reloaded.name, "amulet");
}
