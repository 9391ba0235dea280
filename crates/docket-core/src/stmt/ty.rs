use super::*;
use crate::{Error, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// The host-side type of a document member or scalar result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I32,
    I64,
    F64,
    Decimal,
    String,
    Uuid,
    DateTime,

    /// A unit enum stored by discriminant or by variant name.
    Enum,

    List(Box<Type>),

    /// A nested object; only reachable as an intermediate path segment.
    Object,
}

impl Type {
    pub fn list(item: Type) -> Type {
        Type::List(Box::new(item))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::I32 | Type::I64 | Type::F64 | Type::Decimal)
    }

    /// Coerces a value read from the database into this type.
    ///
    /// Databases hand back values in their own representation: SQLite has no
    /// boolean or UUID type and `JSON_VALUE` always yields text, so this accepts
    /// every lossless reading of a value and rejects the rest.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if let Some(value) = self.cast_chrono(&value)? {
            return Ok(value);
        }

        Ok(match (value, self) {
            (value @ Value::Bool(_), Type::Bool)
            | (value @ Value::I32(_), Type::I32)
            | (value @ Value::I64(_), Type::I64)
            | (value @ Value::F64(_), Type::F64)
            | (value @ Value::Decimal(_), Type::Decimal)
            | (value @ Value::String(_), Type::String)
            | (value @ Value::Uuid(_), Type::Uuid)
            | (value @ Value::DateTime(_), Type::DateTime) => value,

            // Enums are decoded by the host type itself
            (value, Type::Enum) => value,
            (value, Type::Object) => value,

            (Value::I32(v), Type::Bool) => Value::Bool(v != 0),
            (Value::I64(v), Type::Bool) => Value::Bool(v != 0),
            (Value::String(v), Type::Bool) => match &v[..] {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => return Err(Error::type_conversion(Value::String(v), "bool")),
            },

            (Value::I64(v), Type::I32) => match i32::try_from(v) {
                Ok(v) => Value::I32(v),
                Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
            },
            (Value::I32(v), Type::I64) => Value::I64(v.into()),
            (Value::Bool(v), Type::I32) => Value::I32(v.into()),
            (Value::Bool(v), Type::I64) => Value::I64(v.into()),
            (Value::F64(v), Type::I32) if v.fract() == 0.0 => Value::I32(v as i32),
            (Value::F64(v), Type::I64) if v.fract() == 0.0 => Value::I64(v as i64),
            (Value::Decimal(v), Type::I32) if v.fract().is_zero() => match v.to_i32() {
                Some(v) => Value::I32(v),
                None => return Err(Error::type_conversion(Value::Decimal(v), "i32")),
            },
            (Value::Decimal(v), Type::I64) if v.fract().is_zero() => match v.to_i64() {
                Some(v) => Value::I64(v),
                None => return Err(Error::type_conversion(Value::Decimal(v), "i64")),
            },
            (Value::String(v), Type::I32) => Value::I32(v.trim().parse()?),
            (Value::String(v), Type::I64) => Value::I64(v.trim().parse()?),

            (Value::I32(v), Type::F64) => Value::F64(v.into()),
            (Value::I64(v), Type::F64) => Value::F64(v as f64),
            (Value::Decimal(v), Type::F64) => match v.to_f64() {
                Some(v) => Value::F64(v),
                None => return Err(Error::type_conversion(Value::Decimal(v), "f64")),
            },
            (Value::String(v), Type::F64) => match v.trim().parse() {
                Ok(parsed) => Value::F64(parsed),
                Err(_) => return Err(Error::type_conversion(Value::String(v), "f64")),
            },

            (Value::I32(v), Type::Decimal) => Value::Decimal(v.into()),
            (Value::I64(v), Type::Decimal) => Value::Decimal(v.into()),
            (Value::F64(v), Type::Decimal) => match Decimal::from_f64(v) {
                Some(v) => Value::Decimal(v.normalize()),
                None => return Err(Error::type_conversion(Value::F64(v), "decimal")),
            },
            (Value::String(v), Type::Decimal) => match v.trim().parse::<Decimal>() {
                Ok(parsed) => Value::Decimal(parsed),
                Err(_) => return Err(Error::type_conversion(Value::String(v), "decimal")),
            },

            (Value::String(v), Type::Uuid) => Value::Uuid(v.trim().parse()?),

            (Value::Uuid(v), Type::String) => Value::String(v.to_string()),
            (Value::I32(v), Type::String) => Value::String(v.to_string()),
            (Value::I64(v), Type::String) => Value::String(v.to_string()),
            (Value::Enum(v), Type::String) => Value::String(v.name.into_owned()),

            (Value::List(items), Type::List(item)) => Value::List(
                items
                    .into_iter()
                    .map(|value| item.cast(value))
                    .collect::<Result<_>>()?,
            ),

            (value, ty) => return Err(Error::type_conversion(value, ty.name())),
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::Decimal => "decimal",
            Type::String => "string",
            Type::Uuid => "uuid",
            Type::DateTime => "datetime",
            Type::Enum => "enum",
            Type::List(_) => "list",
            Type::Object => "object",
        }
    }
}
