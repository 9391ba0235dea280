use docket_core::{schema::TableName, stmt::Direction};

use super::{DeletedFilter, Fragment, Locator};

/// A compiled read against one document table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: TableName,

    pub columns: Columns,

    /// WHERE fragments, joined with `AND`.
    pub filters: Vec<Fragment>,

    /// `Some` scopes the read to one tenant. `None` reads every tenant.
    pub tenant: Option<String>,

    pub deleted: DeletedFilter,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    pub distinct: bool,

    /// Rewrites the statement into `SELECT CASE WHEN EXISTS (...) THEN 1
    /// ELSE 0 END`.
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    /// `data, version`: full documents plus the version for tracking.
    Documents,

    /// The located value of a single member.
    Locator(Locator),

    Count,

    Aggregate(Aggregate, Locator),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
    Avg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub locator: Locator,
    pub direction: Direction,
}

impl Select {
    pub fn new(table: TableName, columns: Columns) -> Select {
        Select {
            table,
            columns,
            filters: vec![],
            tenant: None,
            deleted: DeletedFilter::Any,
            order_by: vec![],
            limit: None,
            offset: None,
            distinct: false,
            exists: false,
        }
    }

    pub fn is_paged(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }
}
