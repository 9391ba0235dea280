use chrono::{DateTime, Utc};
use docket_core::{schema::TableName, stmt::Value};

/// The columns every document write stamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub id: Value,

    /// Serialized JSON payload.
    pub data: String,

    pub doc_type: String,

    pub tenant: String,

    pub last_modified: DateTime<Utc>,
}

/// Inserts a new row at version 1. Fails with a duplicate key error when the
/// id is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableName,
    pub doc: DocumentWrite,
}

/// Replaces the payload of an existing row and increments its version.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableName,
    pub doc: DocumentWrite,

    /// Adds `AND version = @expected` so a stale write matches no row.
    pub expected_version: Option<i64>,
}

/// Inserts or updates atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    pub table: TableName,
    pub doc: DocumentWrite,
    pub expected_version: Option<i64>,

    /// Clears the soft-delete flag of an existing row.
    pub revive: bool,
}
