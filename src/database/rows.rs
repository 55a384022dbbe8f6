use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::executor::DbRow;
use crate::database::manager::DatabaseError;

pub fn from_row<T: DeserializeOwned>(row: DbRow) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub fn from_rows<T: DeserializeOwned>(rows: Vec<DbRow>) -> Result<Vec<T>, DatabaseError> {
    rows.into_iter().map(from_row).collect()
}

/// First row of a statement that is guaranteed to produce one (INSERT … RETURNING).
pub fn returned<T: DeserializeOwned>(rows: Vec<DbRow>) -> Result<T, DatabaseError> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| DatabaseError::QueryError("statement returned no row".to_string()))?;
    from_row(row)
}

/// First row, or NotFound carrying `missing` as its detail.
pub fn found<T: DeserializeOwned>(rows: Vec<DbRow>, missing: impl FnOnce() -> String) -> Result<T, DatabaseError> {
    match rows.into_iter().next() {
        Some(row) => from_row(row),
        None => Err(DatabaseError::NotFound(missing())),
    }
}

/// The present fields of a payload, keyed by their external (camelCase) names.
pub fn to_fields<T: Serialize>(payload: &T) -> Result<Map<String, Value>, DatabaseError> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::BadInput(format!("expected an object, got {}", other))),
    }
}

/// `SELECT … FROM …`, an optional WHERE fragment and an ORDER BY, skipping empty parts.
pub fn select_sql(select: &str, where_clause: &str, order: &str) -> String {
    [select, where_clause, order]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
