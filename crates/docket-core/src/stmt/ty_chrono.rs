use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{
    stmt::{Type, Value},
    Error, Result,
};

/// Text layouts a timestamp may come back in: RFC 3339 from JSON payloads,
/// and the space-separated form SQLite's date functions produce.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Type {
    pub(crate) fn cast_chrono(&self, value: &Value) -> Result<Option<Value>> {
        Ok(Some(match (value, self) {
            (Value::String(value), Type::DateTime) => Value::DateTime(parse_datetime(value)?),
            (Value::DateTime(value), Type::String) => Value::String(value.to_rfc3339()),
            _ => return Ok(None),
        }))
    }
}

pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Ok(value.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(value.and_utc());
        }
    }

    Err(Error::type_conversion(
        Value::String(text.to_string()),
        "datetime",
    ))
}
