use super::{locator::Converted, locator::PathLiteral, Comma, CommandBuilder, Flavor, ToSql};
use crate::stmt::{Cast, Conversion, Fragment, LikeKind, Locator, TemplatePart};

use docket_core::{schema::column, stmt::Value};

impl ToSql for &Fragment {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self {
            Fragment::Comparison { locator, op, value } => {
                let op = op.to_string();
                fmt!(f, locator " " op.as_str() " " Operand(locator, value));
            }
            Fragment::IsNull { locator, negate } => {
                let is = if *negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, locator is);
            }
            Fragment::And(lhs, rhs) => {
                let (lhs, rhs) = (&**lhs, &**rhs);
                fmt!(f, "(" lhs " AND " rhs ")");
            }
            Fragment::Or(lhs, rhs) => {
                let (lhs, rhs) = (&**lhs, &**rhs);
                fmt!(f, "(" lhs " OR " rhs ")");
            }
            Fragment::Not(inner) => {
                let inner = &**inner;
                fmt!(f, "NOT (" inner ")");
            }
            Fragment::Literal(sql) => fmt!(f, &**sql),
            Fragment::InList { locator, values } => {
                if values.is_empty() {
                    fmt!(f, "1=0");
                } else {
                    let operands = values.iter().map(|value| Operand(locator, value));
                    fmt!(f, locator " IN (" Comma(operands) ")");
                }
            }
            Fragment::Like {
                locator,
                kind,
                value,
            } => {
                let pattern = like_pattern(f.flavor, *kind, value);
                match f.flavor {
                    Flavor::Mssql => fmt!(f, locator " LIKE " pattern),
                    Flavor::Sqlite => fmt!(f, locator " LIKE " pattern " ESCAPE '\\'"),
                }
            }
            Fragment::CollatedEquals { locator, value } => {
                let value = Value::String(value.clone());
                match f.flavor {
                    Flavor::Mssql => {
                        fmt!(f, locator " COLLATE Latin1_General_CI_AS = " value)
                    }
                    Flavor::Sqlite => fmt!(f, locator " = " value " COLLATE NOCASE"),
                }
            }
            Fragment::NullOrBlank {
                locator,
                whitespace,
            } => {
                fmt!(f, "(" locator " IS NULL OR ");
                match (*whitespace, f.flavor) {
                    // `= ''` ignores trailing spaces on SQL Server
                    (false, Flavor::Mssql) => fmt!(f, "DATALENGTH(" locator ") = 0"),
                    (false, Flavor::Sqlite) => fmt!(f, locator " = ''"),
                    (true, Flavor::Mssql) => fmt!(f, "LTRIM(RTRIM(" locator ")) = ''"),
                    (true, Flavor::Sqlite) => fmt!(f, "TRIM(" locator ") = ''"),
                }
                fmt!(f, ")");
            }
            Fragment::ArrayContains {
                path,
                element,
                value,
            } => {
                let (source, element_sql) = match (f.flavor, element) {
                    (Flavor::Mssql, _) => ("OPENJSON(", "j.[value]"),
                    (Flavor::Sqlite, Conversion::BoolText) => ("json_each(", "j.type"),
                    (Flavor::Sqlite, _) => ("json_each(", "j.value"),
                };
                fmt!(
                    f,
                    "EXISTS (SELECT 1 FROM " source column::DATA ", " PathLiteral(path)
                    ") AS j WHERE " Converted(*element, element_sql) " = " value ")"
                );
            }
            Fragment::Template(parts) => {
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => fmt!(f, &**text),
                        TemplatePart::Locator(locator) => fmt!(f, locator),
                        TemplatePart::Param(value) => fmt!(f, value),
                    }
                }
            }
        }
    }
}

/// A parameter compared against `locator`.
///
/// SQLite timestamps are compared as `strftime` output, which rounds to the
/// millisecond, so the parameter goes through the same function.
struct Operand<'a>(&'a Locator, &'a Value);

impl ToSql for Operand<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let Operand(locator, value) = self;

        match locator.conversion {
            Conversion::Cast(Cast::DateTime) if f.flavor.is_sqlite() && !value.is_null() => {
                Converted(locator.conversion, value).to_sql(f)
            }
            _ => value.to_sql(f),
        }
    }
}

/// Builds the `LIKE` pattern parameter, escaping wildcard characters in the
/// search text so they match literally.
fn like_pattern(flavor: Flavor, kind: LikeKind, value: &str) -> Value {
    let mut escaped = String::with_capacity(value.len() + 2);

    for c in value.chars() {
        match (flavor, c) {
            (Flavor::Mssql, '[') => escaped.push_str("[[]"),
            (Flavor::Mssql, '%') => escaped.push_str("[%]"),
            (Flavor::Mssql, '_') => escaped.push_str("[_]"),
            (Flavor::Sqlite, '\\' | '%' | '_') => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }

    let pattern = match kind {
        LikeKind::Contains => format!("%{escaped}%"),
        LikeKind::StartsWith => format!("{escaped}%"),
        LikeKind::EndsWith => format!("%{escaped}"),
    };

    Value::String(pattern)
}
