use crate::{Error, Result};

use chrono::{DateTime, Utc};
use docket_core::stmt::{Type, Value};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A Rust type that maps onto a document member value.
///
/// Unit enums implement this by hand, returning [`Type::Enum`] and a
/// [`Value::Enum`] carrying both the variant name and its discriminant; the
/// store's enum storage mode picks which one is compared.
pub trait Primitive: Sized + Send + 'static {
    const NULLABLE: bool = false;

    fn ty() -> Type;

    fn into_value(self) -> Value;

    fn load(value: Value) -> Result<Self>;
}

macro_rules! impl_primitive {
    ( $( $t:ty => $variant:ident, $name:literal ;)* ) => {
        $(
            impl Primitive for $t {
                fn ty() -> Type {
                    Type::$variant
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn load(value: Value) -> Result<Self> {
                    match Type::$variant.cast(value)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::type_conversion(other, $name)),
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool, "bool";
    i32 => I32, "i32";
    i64 => I64, "i64";
    f64 => F64, "f64";
    Decimal => Decimal, "decimal";
    String => String, "string";
    Uuid => Uuid, "uuid";
    DateTime<Utc> => DateTime, "datetime";
}

impl<T: Primitive> Primitive for Option<T> {
    const NULLABLE: bool = true;

    fn ty() -> Type {
        T::ty()
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }

    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::load(value)?))
        }
    }
}

impl<T: Primitive> Primitive for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Primitive::into_value).collect())
    }

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::load).collect(),
            // Drivers return JSON arrays as text
            Value::String(text) => {
                let items: Vec<serde_json::Value> = serde_json::from_str(&text)?;
                items.into_iter().map(|item| T::load(json_scalar(item)?)).collect()
            }
            other => Err(Error::type_conversion(other, "list")),
        }
    }
}

fn json_scalar(value: serde_json::Value) -> Result<Value> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(v) => Value::I64(v),
            None => Value::F64(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(v) => Value::String(v),
        other => return Err(Error::type_conversion(Value::String(other.to_string()), "scalar")),
    })
}
