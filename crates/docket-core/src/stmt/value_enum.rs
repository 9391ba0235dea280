use std::borrow::Cow;

use super::*;

/// A unit enum variant, carried with both of its storable forms so the
/// member resolver can pick one based on the store's enum storage mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueEnum {
    /// The variant name as serialized in document payloads.
    pub name: Cow<'static, str>,
    pub discriminant: i64,
}

impl ValueEnum {
    pub fn new(name: impl Into<Cow<'static, str>>, discriminant: i64) -> ValueEnum {
        ValueEnum {
            name: name.into(),
            discriminant,
        }
    }
}

impl From<ValueEnum> for Value {
    fn from(value: ValueEnum) -> Self {
        Self::Enum(value)
    }
}
