mod execute_sql;
pub use execute_sql::ExecuteSql;

mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug)]
pub enum Operation {
    /// Run a write statement and report the number of affected rows.
    ExecuteSql(ExecuteSql),

    /// Run one or more row-returning statements.
    QuerySql(QuerySql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    pub fn sql(&self) -> Option<&str> {
        match self {
            Operation::ExecuteSql(op) => Some(&op.sql),
            Operation::QuerySql(op) => Some(&op.sql),
            Operation::Transaction(_) => None,
        }
    }
}
