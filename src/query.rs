//! Parameterized statement assembly.
//!
//! Every value is carried as a bound parameter, identities included; the
//! only token ever interpolated into statement text is the table name,
//! which each store receives as a trusted literal at construction. The
//! builders return the SQL text and its parameter list together so the two
//! cannot drift apart.

use crate::error::{Result, StoreError};
use crate::record::{Id, Value};

/// Metadata columns every write returns, in the order they are scanned.
pub const RETURNING: &str = "RETURNING id, created_at, updated_at";

/// A statement ready for execution: SQL text plus its positional parameters.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

fn placeholders(from: usize, count: usize) -> String {
    let mut list = String::new();
    for n in from..from + count {
        if !list.is_empty() {
            list.push_str(", ");
        }
        list.push('?');
        list.push_str(&n.to_string());
    }
    list
}

fn column_list<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut list = String::new();
    for column in fields {
        if !list.is_empty() {
            list.push_str(", ");
        }
        list.push_str(column);
    }
    list
}

/// `INSERT INTO <table> (<columns>) VALUES (?1..?n) RETURNING ...`
pub fn insert(table: &str, fields: Vec<(&str, Value)>) -> Result<Statement> {
    if fields.is_empty() {
        return Err(StoreError::Misuse(format!(
            "record bound to table '{table}' has no persistable fields"
        )));
    }
    let columns = column_list(fields.iter().map(|(column, _)| *column));
    let sql = format!(
        "INSERT INTO {table} ({columns}) VALUES ({}) {RETURNING}",
        placeholders(1, fields.len())
    );
    let params = fields.into_iter().map(|(_, value)| value).collect();
    Ok(Statement { sql, params })
}

/// `UPDATE <table> SET (<columns>) = (?1..?n) WHERE id = ?n+1 RETURNING ...`
///
/// The identity is the last bound parameter. Callers guarantee it is
/// non-zero; the store checks before asking for this statement.
pub fn update(table: &str, fields: Vec<(&str, Value)>, id: Id) -> Result<Statement> {
    if fields.is_empty() {
        return Err(StoreError::Misuse(format!(
            "record bound to table '{table}' has no persistable fields"
        )));
    }
    let columns = column_list(fields.iter().map(|(column, _)| *column));
    let sql = format!(
        "UPDATE {table} SET ({columns}) = ({}) WHERE id = ?{} {RETURNING}",
        placeholders(1, fields.len()),
        fields.len() + 1
    );
    let mut params: Vec<Value> = fields.into_iter().map(|(_, value)| value).collect();
    params.push(Value::Integer(id));
    Ok(Statement { sql, params })
}

/// `SELECT * FROM <table> WHERE id = ?1`
pub fn select(table: &str, id: Id) -> Statement {
    Statement {
        sql: format!("SELECT * FROM {table} WHERE id = ?1"),
        params: vec![Value::Integer(id)],
    }
}

/// `SELECT * FROM <table> WHERE id IN (?1..?n) ORDER BY id`
///
/// Results always come back in ascending identity order, whatever the input
/// order. The store short-circuits an empty id list before reaching here.
pub fn select_many(table: &str, ids: &[Id]) -> Statement {
    Statement {
        sql: format!(
            "SELECT * FROM {table} WHERE id IN ({}) ORDER BY id",
            placeholders(1, ids.len())
        ),
        params: ids.iter().map(|id| Value::Integer(*id)).collect(),
    }
}

/// `DELETE FROM <table> WHERE id = ?1`
pub fn delete(table: &str, id: Id) -> Statement {
    Statement {
        sql: format!("DELETE FROM {table} WHERE id = ?1"),
        params: vec![Value::Integer(id)],
    }
}
