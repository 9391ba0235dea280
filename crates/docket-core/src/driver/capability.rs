/// The SQL dialect a database speaks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dialect {
    /// Microsoft SQL Server, T-SQL with `JSON_VALUE`/`OPENJSON`.
    Mssql,

    /// SQLite with the JSON1 functions.
    Sqlite,
}

#[derive(Debug)]
pub struct Capability {
    pub dialect: Dialect,

    /// Upper bound on bound parameters in a single command. Batches that would
    /// exceed it are rejected before they reach the database.
    pub max_parameters: usize,

    /// When true, the database itself returns one result set per statement of
    /// a multi-statement command. Otherwise the driver splits the command and
    /// runs it statement by statement within a single `exec` call.
    pub native_multiple_result_sets: bool,

    /// When true, dropping an in-flight `exec` future leaves the connection
    /// usable. Otherwise a cancelled connection is discarded.
    pub cancel_safe: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        max_parameters: 32_766,
        native_multiple_result_sets: false,
        // Statements run synchronously within a single poll
        cancel_safe: true,
    };

    /// SQL Server capabilities.
    pub const MSSQL: Self = Self {
        dialect: Dialect::Mssql,
        max_parameters: 2_100,
        native_multiple_result_sets: true,
        cancel_safe: false,
    };
}
