use super::TableName;
use crate::stmt::IdType;

/// How deleting a document affects its row.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DeleteStyle {
    /// The row is physically removed.
    #[default]
    Remove,

    /// The row is kept and flagged through `is_deleted` / `deleted_at`.
    SoftDelete,
}

/// Storage metadata for one document type.
///
/// Built once per type the first time a store sees it, then shared behind an
/// `Arc` for the store's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMapping {
    /// Fully qualified Rust type name, for diagnostics.
    pub type_name: &'static str,

    /// Stable discriminator written to `doc_type` and used in error messages.
    pub alias: String,

    pub table: TableName,

    pub id_type: IdType,

    /// Rust field name of the identity member. Filters on this member target
    /// the `id` column instead of the payload.
    pub id_member: String,

    pub delete_style: DeleteStyle,

    /// When set, updates of documents read through a session check the
    /// version that was read.
    pub optimistic_concurrency: bool,
}

impl DocumentMapping {
    pub fn is_soft_deleted(&self) -> bool {
        matches!(self.delete_style, DeleteStyle::SoftDelete)
    }
}
