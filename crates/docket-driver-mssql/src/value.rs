use chrono::{DateTime, NaiveDateTime, Utc};
use docket_core::{stmt::Value as CoreValue, Error, Result};
use rust_decimal::Decimal;
use std::borrow::Cow;
use tiberius::{ColumnData, FromSql, ToSql};

/// Binds a core value as a SQL Server parameter.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Converts a column of a returned row to a core value.
    pub(crate) fn load(data: ColumnData<'static>) -> Result<CoreValue> {
        Ok(match data {
            ColumnData::U8(value) => optional(value.map(|v| CoreValue::I32(v.into()))),
            ColumnData::I16(value) => optional(value.map(|v| CoreValue::I32(v.into()))),
            ColumnData::I32(value) => optional(value.map(CoreValue::I32)),
            ColumnData::I64(value) => optional(value.map(CoreValue::I64)),
            ColumnData::F32(value) => optional(value.map(|v| CoreValue::F64(v.into()))),
            ColumnData::F64(value) => optional(value.map(CoreValue::F64)),
            ColumnData::Bit(value) => optional(value.map(CoreValue::Bool)),
            ColumnData::String(value) => optional(value.map(|v| CoreValue::String(v.into_owned()))),
            ColumnData::Guid(value) => optional(value.map(CoreValue::Uuid)),
            ColumnData::Numeric(_) => {
                optional(Decimal::from_sql(&data).map_err(load_error)?.map(CoreValue::Decimal))
            }
            ColumnData::DateTimeOffset(_) => optional(
                DateTime::<Utc>::from_sql(&data)
                    .map_err(load_error)?
                    .map(CoreValue::DateTime),
            ),
            ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
                optional(
                    NaiveDateTime::from_sql(&data)
                        .map_err(load_error)?
                        .map(|v| CoreValue::DateTime(v.and_utc())),
                )
            }
            other => {
                return Err(Error::invalid_result(format!(
                    "unsupported column type: {other:?}"
                )))
            }
        })
    }
}

fn optional(value: Option<CoreValue>) -> CoreValue {
    value.unwrap_or(CoreValue::Null)
}

fn load_error(err: tiberius::error::Error) -> Error {
    Error::invalid_result(format!("failed to read column: {err}"))
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> ColumnData<'_> {
        match self.0 {
            CoreValue::Null => ColumnData::String(None),
            CoreValue::Bool(value) => value.to_sql(),
            CoreValue::I32(value) => value.to_sql(),
            CoreValue::I64(value) => value.to_sql(),
            CoreValue::F64(value) => value.to_sql(),
            CoreValue::Decimal(value) => value.to_sql(),
            CoreValue::String(value) => ColumnData::String(Some(Cow::Borrowed(value))),
            CoreValue::Uuid(value) => value.to_sql(),
            CoreValue::DateTime(value) => value.to_sql(),
            CoreValue::Enum(value) => value.discriminant.to_sql(),
            // Lists are expanded into one placeholder per item before binding
            CoreValue::List(_) => ColumnData::String(None),
        }
    }
}
