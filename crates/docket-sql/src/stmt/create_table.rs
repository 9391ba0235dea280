use docket_core::{
    schema::{DocumentMapping, TableName},
    stmt::IdType,
};

/// Creates a document table when it does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: TableName,
    pub id_type: IdType,
    pub soft_delete: bool,
}

impl CreateTable {
    pub fn for_mapping(mapping: &DocumentMapping) -> CreateTable {
        CreateTable {
            table: mapping.table.clone(),
            id_type: mapping.id_type,
            soft_delete: mapping.is_soft_deleted(),
        }
    }
}
