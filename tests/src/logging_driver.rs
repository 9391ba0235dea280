use docket::driver::{Capability, Connection, Driver, Operation, Response};
use docket_core::{async_trait, driver::operation::Transaction, Result};
use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

/// A driver wrapper that records every operation sent to the database.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with every connection the pool opens
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    faults: Faults,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
            faults: Faults::default(),
        }
    }

    /// Get a handle to inject transaction failures
    pub fn faults_handle(&self) -> Faults {
        self.faults.clone()
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log_handle(),
            faults: self.faults.clone(),
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        self.inner.max_connections()
    }
}

/// One operation as the driver saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverOp {
    Execute { sql: String, params: usize },
    Query { sql: String, params: usize, result_sets: usize },
    Start,
    Commit,
    Rollback,
}

/// Transaction operations that fail the next time they are sent. A failed
/// operation never reaches the database.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pending: Arc<Mutex<Vec<Transaction>>>,
}

impl Faults {
    pub fn fail_next_commit(&self) {
        self.pending.lock().unwrap().push(Transaction::Commit);
    }

    pub fn fail_next_rollback(&self) {
        self.pending.lock().unwrap().push(Transaction::Rollback);
    }

    fn take(&self, operation: &Operation) -> bool {
        let Operation::Transaction(transaction) = operation else {
            return false;
        };
        let mut pending = self.pending.lock().unwrap();
        match pending.iter().position(|fault| fault == transaction) {
            Some(index) => {
                pending.remove(index);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug)]
struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
    faults: Faults,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        let mut logged = match &operation {
            Operation::ExecuteSql(op) => DriverOp::Execute {
                sql: op.sql.clone(),
                params: op.params.len(),
            },
            Operation::QuerySql(op) => DriverOp::Query {
                sql: op.sql.clone(),
                params: op.params.len(),
                result_sets: 0,
            },
            Operation::Transaction(Transaction::Start) => DriverOp::Start,
            Operation::Transaction(Transaction::Commit) => DriverOp::Commit,
            Operation::Transaction(Transaction::Rollback) => DriverOp::Rollback,
        };

        // Failed operations are logged too; a round trip happened either way
        let response = if self.faults.take(&operation) {
            Err(docket::err!("injected failure: {logged:?}"))
        } else {
            self.inner.exec(operation).await
        };

        if let (DriverOp::Query { result_sets, .. }, Ok(response)) = (&mut logged, &response) {
            if let docket::driver::Rows::ResultSets(sets) = &response.rows {
                *result_sets = sets.len();
            }
        }

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(logged);

        response
    }
}
