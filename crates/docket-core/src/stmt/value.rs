use super::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A scalar or list value exchanged with the database, either as a bound
/// parameter or as a column read back from a row.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    Bool(bool),

    Decimal(Decimal),

    DateTime(DateTime<Utc>),

    Enum(ValueEnum),

    F64(f64),

    I32(i32),

    I64(i64),

    /// A list of values of the same type
    List(Vec<Value>),

    #[default]
    Null,

    String(String),

    Uuid(Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the variant, used in conversion error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Decimal(_) => "decimal",
            Self::DateTime(_) => "datetime",
            Self::Enum(_) => "enum",
            Self::F64(_) => "f64",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
        }
    }

    /// Converts the value to `i64`, accepting any integral representation.
    pub fn to_i64(&self) -> crate::Result<i64> {
        match Type::I64.cast(self.clone())? {
            Value::I64(v) => Ok(v),
            other => Err(crate::Error::type_conversion(other, "i64")),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}
