use super::Value;
use std::fmt;
use uuid::Uuid;

/// A document identity as stored in the `id` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Id {
    Uuid(Uuid),
    String(String),
    I32(i32),
    I64(i64),
}

/// The identity types a document may declare.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IdType {
    Uuid,
    String,
    I32,
    I64,
}

impl Id {
    pub fn ty(&self) -> IdType {
        match self {
            Id::Uuid(_) => IdType::Uuid,
            Id::String(_) => IdType::String,
            Id::I32(_) => IdType::I32,
            Id::I64(_) => IdType::I64,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Id::Uuid(v) => Value::Uuid(*v),
            Id::String(v) => Value::String(v.clone()),
            Id::I32(v) => Value::I32(*v),
            Id::I64(v) => Value::I64(*v),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Uuid(v) => v.fmt(f),
            Id::String(v) => v.fmt(f),
            Id::I32(v) => v.fmt(f),
            Id::I64(v) => v.fmt(f),
        }
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Self {
        Id::Uuid(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::String(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_string())
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::I32(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::I64(value)
    }
}

impl From<Id> for Value {
    fn from(value: Id) -> Self {
        value.to_value()
    }
}
