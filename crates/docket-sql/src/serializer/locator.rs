use docket_core::schema::column;

use super::{CommandBuilder, Flavor, ToSql};
use crate::stmt::{Cast, Conversion, JsonPath, Locator, Source};

/// A JSON path as a string literal.
pub(super) struct PathLiteral<'a>(pub(super) &'a JsonPath);

impl ToSql for PathLiteral<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        f.sql.push('\'');
        f.sql.push_str(&self.0.to_string().replace('\'', "''"));
        f.sql.push('\'');
    }
}

impl ToSql for &Source {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self {
            Source::Column(name) => fmt!(f, *name),
            Source::Json(path) => match f.flavor {
                Flavor::Mssql => fmt!(f, "JSON_VALUE(" column::DATA ", " PathLiteral(path) ")"),
                Flavor::Sqlite => {
                    fmt!(f, "json_extract(" column::DATA ", " PathLiteral(path) ")")
                }
            },
        }
    }
}

impl ToSql for &Locator {
    fn to_sql(self, f: &mut CommandBuilder) {
        match (self.conversion, &self.source) {
            // `json_extract` turns JSON booleans into 1 / 0; `json_type` keeps
            // the literal
            (Conversion::BoolText, Source::Json(path)) if f.flavor.is_sqlite() => {
                fmt!(f, "json_type(" column::DATA ", " PathLiteral(path) ")")
            }
            (conversion, source) => Converted(conversion, source).to_sql(f),
        }
    }
}

/// Applies a conversion to an inner SQL expression.
pub(super) struct Converted<T>(pub(super) Conversion, pub(super) T);

impl<T: ToSql> ToSql for Converted<T> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let Converted(conversion, inner) = self;

        match (conversion, f.flavor) {
            (Conversion::None, _) => fmt!(f, inner),
            // `JSON_VALUE` already yields `true` / `false` as text
            (Conversion::BoolText, _) => fmt!(f, inner),
            (Conversion::Cast(cast), Flavor::Mssql) => {
                fmt!(f, "CAST(" inner " AS " mssql_type(cast) ")")
            }
            (Conversion::Cast(cast), Flavor::Sqlite) => match cast {
                Cast::Int | Cast::BigInt => fmt!(f, "CAST(" inner " AS INTEGER)"),
                Cast::Float | Cast::Decimal => fmt!(f, "CAST(" inner " AS REAL)"),
                Cast::Uuid => fmt!(f, inner),
                Cast::DateTime => fmt!(f, "strftime('%Y-%m-%d %H:%M:%f', " inner ")"),
            },
        }
    }
}

fn mssql_type(cast: Cast) -> &'static str {
    match cast {
        Cast::Int => "int",
        Cast::BigInt => "bigint",
        Cast::Float => "float",
        Cast::Decimal => "decimal(28, 10)",
        Cast::Uuid => "uniqueidentifier",
        Cast::DateTime => "datetimeoffset",
    }
}
