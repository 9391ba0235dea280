//! Document types and their storage mapping.

use docket_core::{
    schema::{DeleteStyle, DocumentMapping, TableName},
    stmt::{Id, IdType},
};
use heck::ToSnakeCase;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A type stored as a JSON payload in its own table.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Document for User {
///     type Id = i64;
///
///     fn id(&self) -> i64 {
///         self.id
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: DocumentId;

    fn id(&self) -> Self::Id;

    /// Customizes the storage mapping. Called once per store.
    fn configure(mapping: &mut MappingBuilder) {
        let _ = mapping;
    }
}

/// The identity types a document may use.
pub trait DocumentId: Clone + Send + Sync + 'static {
    const TYPE: IdType;

    fn to_id(&self) -> Id;
}

impl DocumentId for Uuid {
    const TYPE: IdType = IdType::Uuid;

    fn to_id(&self) -> Id {
        Id::Uuid(*self)
    }
}

impl DocumentId for String {
    const TYPE: IdType = IdType::String;

    fn to_id(&self) -> Id {
        Id::String(self.clone())
    }
}

impl DocumentId for i32 {
    const TYPE: IdType = IdType::I32;

    fn to_id(&self) -> Id {
        Id::I32(*self)
    }
}

impl DocumentId for i64 {
    const TYPE: IdType = IdType::I64;

    fn to_id(&self) -> Id {
        Id::I64(*self)
    }
}

/// Collects per-type overrides before the mapping is frozen.
#[derive(Debug)]
pub struct MappingBuilder {
    alias: Option<String>,
    delete_style: DeleteStyle,
    optimistic_concurrency: bool,
    id_member: String,
}

impl MappingBuilder {
    pub(crate) fn new() -> MappingBuilder {
        MappingBuilder {
            alias: None,
            delete_style: DeleteStyle::Remove,
            optimistic_concurrency: false,
            id_member: "id".to_string(),
        }
    }

    /// Sets the discriminator written to `doc_type` and used in the table
    /// name. Defaults to the snake-cased type name.
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    /// Keeps deleted rows, flagging them instead.
    pub fn soft_deleted(&mut self) -> &mut Self {
        self.delete_style = DeleteStyle::SoftDelete;
        self
    }

    /// Checks the version read by the session when the document is written
    /// back.
    pub fn use_optimistic_concurrency(&mut self, enabled: bool) -> &mut Self {
        self.optimistic_concurrency = enabled;
        self
    }

    /// Names the Rust field holding the identity. Defaults to `id`.
    pub fn identity(&mut self, field: impl Into<String>) -> &mut Self {
        self.id_member = field.into();
        self
    }

    pub(crate) fn build<T: Document>(self, schema: &str, prefix: &str) -> DocumentMapping {
        let type_name = std::any::type_name::<T>();
        let alias = self.alias.unwrap_or_else(|| default_alias(type_name));

        DocumentMapping {
            type_name,
            table: TableName::new(schema, format!("{prefix}{alias}")),
            alias,
            id_type: T::Id::TYPE,
            id_member: self.id_member,
            delete_style: self.delete_style,
            optimistic_concurrency: self.optimistic_concurrency,
        }
    }
}

/// `my_app::model::OrderLine<T>` becomes `order_line`.
fn default_alias(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let last = base.rsplit("::").next().unwrap_or(base);
    last.to_snake_case()
}
