//! Per-type storage metadata shared by the SQL generator and the session.

mod mapping;
pub use mapping::{DeleteStyle, DocumentMapping};

mod table_name;
pub use table_name::TableName;

/// Column names of the document table contract.
pub mod column {
    pub const ID: &str = "id";
    pub const DATA: &str = "data";
    pub const VERSION: &str = "version";
    pub const LAST_MODIFIED: &str = "last_modified";
    pub const DOC_TYPE: &str = "doc_type";
    pub const TENANT_ID: &str = "tenant_id";
    pub const IS_DELETED: &str = "is_deleted";
    pub const DELETED_AT: &str = "deleted_at";
}

/// Tenant id used by sessions that were not opened for a specific tenant.
pub const DEFAULT_TENANT: &str = "*DEFAULT*";
