use docket_core::schema::column;

use super::{Comma, CommandBuilder, Delimited, Flavor, ToSql};
use crate::stmt::{Aggregate, Columns, DeletedFilter, Fragment, Locator, OrderBy, Select};

impl ToSql for &Select {
    fn to_sql(self, f: &mut CommandBuilder) {
        if self.exists {
            let inner = Body {
                select: self,
                columns: Projection::Declared,
                nested: true,
            };
            fmt!(f, "SELECT CASE WHEN EXISTS (" inner ") THEN 1 ELSE 0 END");
            return;
        }

        match &self.columns {
            // Aggregating over a page or over distinct rows has to see the
            // page first, so the select becomes a derived table
            Columns::Count | Columns::Aggregate(..) if self.is_paged() || self.distinct => {
                let columns = match &self.columns {
                    Columns::Aggregate(_, locator) => Projection::Value(locator),
                    _ => Projection::Row,
                };
                let inner = Body {
                    select: self,
                    columns,
                    nested: true,
                };
                fmt!(f, "SELECT " Outer(&self.columns) " FROM (" inner ") AS q");
            }
            _ => Body {
                select: self,
                columns: Projection::Declared,
                nested: false,
            }
            .to_sql(f),
        }
    }
}

/// What a select body puts in its column list.
#[derive(Clone, Copy)]
enum Projection<'a> {
    /// The statement's own columns.
    Declared,

    /// `locator AS v`, read by an outer aggregate.
    Value(&'a Locator),

    /// `data AS v`, counted by an outer `COUNT(*)`.
    Row,
}

struct Body<'a> {
    select: &'a Select,
    columns: Projection<'a>,

    /// SQL Server rejects ORDER BY in a subquery unless it pages.
    nested: bool,
}

impl ToSql for Body<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let select = self.select;
        let flavor = f.flavor;

        fmt!(f, "SELECT ");

        if select.distinct {
            fmt!(f, "DISTINCT ");
        }

        let top = match (flavor, select.limit, select.offset) {
            (Flavor::Mssql, Some(limit), None) => Some(limit),
            _ => None,
        };
        if let Some(limit) = top {
            fmt!(f, "TOP " limit " ");
        }

        match self.columns {
            Projection::Declared => fmt!(f, &select.columns),
            Projection::Value(locator) => fmt!(f, locator " AS v"),
            Projection::Row => fmt!(f, column::DATA " AS v"),
        }

        let ordered = !select.order_by.is_empty() && (!self.nested || select.is_paged());

        // SQL Server wants DISTINCT ordering terms in the select list. They
        // derive from `data`, so whole rows stay distinct.
        let whole_rows = matches!(
            (self.columns, &select.columns),
            (Projection::Row, _) | (Projection::Declared, Columns::Documents)
        );
        if flavor.is_mssql() && select.distinct && ordered && whole_rows {
            for (i, order_by) in select.order_by.iter().enumerate() {
                let locator = &order_by.locator;
                let alias = format!(" AS o{}", i + 1);
                fmt!(f, ", " locator alias.as_str());
            }
        }

        let table = &select.table;
        fmt!(f, " FROM " table);

        let conditions = Conditions(select);
        if !conditions.is_empty() {
            fmt!(f, " WHERE " conditions);
        }

        if ordered {
            fmt!(f, " ORDER BY " Comma(&select.order_by));
        } else if flavor.is_mssql() && select.offset.is_some() {
            // OFFSET requires an ORDER BY clause
            fmt!(f, " ORDER BY (SELECT NULL)");
        }

        match flavor {
            Flavor::Mssql => {
                if let Some(offset) = select.offset {
                    fmt!(f, " OFFSET " offset " ROWS");
                    if let Some(limit) = select.limit {
                        fmt!(f, " FETCH NEXT " limit " ROWS ONLY");
                    }
                }
            }
            Flavor::Sqlite => match (select.limit, select.offset) {
                (Some(limit), offset) => {
                    fmt!(f, " LIMIT " limit);
                    if let Some(offset) = offset {
                        fmt!(f, " OFFSET " offset);
                    }
                }
                (None, Some(offset)) => fmt!(f, " LIMIT -1 OFFSET " offset),
                (None, None) => {}
            },
        }
    }
}

impl ToSql for &Columns {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self {
            Columns::Documents => fmt!(f, column::DATA ", " column::VERSION),
            Columns::Locator(locator) => fmt!(f, locator),
            Columns::Count => fmt!(f, "COUNT(*)"),
            Columns::Aggregate(aggregate, locator) => {
                AggregateCall(*aggregate, AggregateArg::Locator(locator)).to_sql(f)
            }
        }
    }
}

/// The outer column list of an aggregate over a derived table.
struct Outer<'a>(&'a Columns);

impl ToSql for Outer<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self.0 {
            Columns::Aggregate(aggregate, _) => {
                AggregateCall(*aggregate, AggregateArg::Derived).to_sql(f)
            }
            _ => fmt!(f, "COUNT(*)"),
        }
    }
}

enum AggregateArg<'a> {
    Locator(&'a Locator),
    Derived,
}

struct AggregateCall<'a>(Aggregate, AggregateArg<'a>);

impl ToSql for AggregateCall<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let name = match self.0 {
            Aggregate::Sum => "SUM(",
            Aggregate::Min => "MIN(",
            Aggregate::Max => "MAX(",
            Aggregate::Avg => "AVG(",
        };

        // SQL Server averages integers with integer division
        let widen = matches!(self.0, Aggregate::Avg) && f.flavor.is_mssql();

        fmt!(f, name);
        if widen {
            fmt!(f, "CAST(");
        }
        match self.1 {
            AggregateArg::Locator(locator) => fmt!(f, locator),
            AggregateArg::Derived => fmt!(f, "v"),
        }
        if widen {
            fmt!(f, " AS float)");
        }
        fmt!(f, ")");
    }
}

impl ToSql for &OrderBy {
    fn to_sql(self, f: &mut CommandBuilder) {
        let direction = if self.direction.is_desc() {
            " DESC"
        } else {
            " ASC"
        };
        fmt!(f, &self.locator direction);
    }
}

/// The WHERE clause: caller filters, then the tenant and soft-delete scopes.
struct Conditions<'a>(&'a Select);

impl Conditions<'_> {
    fn is_empty(&self) -> bool {
        self.0.filters.is_empty()
            && self.0.tenant.is_none()
            && matches!(self.0.deleted, DeletedFilter::Any)
    }
}

impl ToSql for Conditions<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let select = self.0;
        let scopes = Scopes {
            tenant: select.tenant.as_deref(),
            deleted: select.deleted,
        };
        let conditions = select
            .filters
            .iter()
            .map(Condition::Fragment)
            .chain(scopes.conditions());

        fmt!(f, Delimited(conditions, " AND "));
    }
}

/// Tenant and soft-delete predicates shared by reads and bulk writes.
pub(super) struct Scopes<'a> {
    pub(super) tenant: Option<&'a str>,
    pub(super) deleted: DeletedFilter,
}

pub(super) enum Condition<'a> {
    Fragment(&'a Fragment),
    Tenant(&'a str),
    Deleted(DeletedFilter),
}

impl<'a> Scopes<'a> {
    pub(super) fn conditions(self) -> impl Iterator<Item = Condition<'a>> {
        let deleted = match self.deleted {
            DeletedFilter::Any => None,
            other => Some(Condition::Deleted(other)),
        };
        self.tenant.map(Condition::Tenant).into_iter().chain(deleted)
    }
}

impl ToSql for Condition<'_> {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self {
            Condition::Fragment(fragment) => fmt!(f, fragment),
            Condition::Tenant(tenant) => {
                fmt!(f, column::TENANT_ID " = " docket_core::stmt::Value::from(tenant))
            }
            Condition::Deleted(filter) => match filter {
                DeletedFilter::Any => {}
                DeletedFilter::NotDeleted => fmt!(f, column::IS_DELETED " = 0"),
                DeletedFilter::Deleted => fmt!(f, column::IS_DELETED " = 1"),
                DeletedFilter::DeletedSince(since) => fmt!(
                    f,
                    column::IS_DELETED " = 1 AND " column::DELETED_AT " >= " docket_core::stmt::Value::from(since)
                ),
                DeletedFilter::DeletedBefore(before) => fmt!(
                    f,
                    column::IS_DELETED " = 1 AND " column::DELETED_AT " < " docket_core::stmt::Value::from(before)
                ),
            },
        }
    }
}
