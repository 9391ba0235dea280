use docket_core::{stmt::Value as CoreValue, Error};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rust_decimal::prelude::ToPrimitive;

/// Fixed-width RFC 3339 text: sorts chronologically, keeps every digit and
/// is accepted by SQLite's date functions.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Binds a core value as a SQLite parameter.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Converts a SQLite value within a row to a core value.
    pub(crate) fn load(value: ValueRef<'_>) -> docket_core::Result<CoreValue> {
        Ok(match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(
                std::str::from_utf8(value)
                    .map_err(|err| Error::invalid_result(format!("column is not UTF-8: {err}")))?
                    .to_string(),
            ),
            ValueRef::Blob(_) => {
                return Err(Error::invalid_result("blob columns are not supported"))
            }
        })
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            CoreValue::Null => SqlValue::Null,
            CoreValue::Bool(value) => SqlValue::Integer((*value).into()),
            CoreValue::I32(value) => SqlValue::Integer((*value).into()),
            CoreValue::I64(value) => SqlValue::Integer(*value),
            CoreValue::F64(value) => SqlValue::Real(*value),
            CoreValue::Decimal(value) => match value.to_f64() {
                Some(value) => SqlValue::Real(value),
                None => SqlValue::Text(value.to_string()),
            },
            CoreValue::String(value) => {
                return Ok(ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())))
            }
            CoreValue::Uuid(value) => SqlValue::Text(value.hyphenated().to_string()),
            CoreValue::DateTime(value) => SqlValue::Text(value.format(DATETIME_FORMAT).to_string()),
            CoreValue::Enum(value) => SqlValue::Integer(value.discriminant),
            CoreValue::List(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                    Error::type_conversion(self.0.clone(), "sqlite parameter"),
                )))
            }
        };

        Ok(ToSqlOutput::Owned(value))
    }
}
