use chrono::{DateTime, Utc};
use docket_core::{schema::TableName, stmt::Value};

use super::Fragment;

/// Deletes one document by id. `soft` carries the deletion timestamp for
/// soft-deletable tables, which turns the delete into an update.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableName,
    pub id: Value,
    pub tenant: String,
    pub soft: Option<DateTime<Utc>>,
}

/// Deletes every document of the tenant matching the filters.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteWhere {
    pub table: TableName,
    pub filters: Vec<Fragment>,
    pub tenant: String,
    pub soft: Option<DateTime<Utc>>,
}

/// Clears the deleted flag of every soft-deleted document of the tenant
/// matching the filters.
#[derive(Debug, Clone, PartialEq)]
pub struct UndeleteWhere {
    pub table: TableName,
    pub filters: Vec<Fragment>,
    pub tenant: String,
}
