use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use indexmap::IndexSet;

use std::time::Duration;

/// How member names appear in the JSON payload. Must agree with the serde
/// attributes of the stored types.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Casing {
    /// `shippingAddress`
    #[default]
    CamelCase,

    /// `shipping_address`
    SnakeCase,

    /// `ShippingAddress`
    PascalCase,

    /// The Rust field name unchanged.
    AsIs,
}

impl Casing {
    pub fn apply(self, name: &str) -> String {
        match self {
            Casing::CamelCase => name.to_lower_camel_case(),
            Casing::SnakeCase => name.to_snake_case(),
            Casing::PascalCase => name.to_upper_camel_case(),
            Casing::AsIs => name.to_string(),
        }
    }
}

/// How unit enums are serialized in payloads.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum EnumStorage {
    /// By discriminant, compared numerically.
    #[default]
    AsInteger,

    /// By variant name.
    AsString,
}

#[derive(Debug, Clone)]
pub(crate) struct Options {
    pub(crate) schema_name: String,
    pub(crate) table_name_prefix: String,
    pub(crate) casing: Casing,
    pub(crate) enum_storage: EnumStorage,

    /// Tenants sessions may be opened for. Empty accepts any tenant.
    pub(crate) tenants: IndexSet<String>,

    pub(crate) transaction_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            schema_name: "dbo".to_string(),
            table_name_prefix: "doc_".to_string(),
            casing: Casing::default(),
            enum_storage: EnumStorage::default(),
            tenants: IndexSet::new(),
            transaction_timeout: Duration::from_secs(5),
        }
    }
}
