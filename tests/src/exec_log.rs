use crate::logging_driver::DriverOp;
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&DriverOp) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(op))
            .count()
    }

    /// Number of read round trips.
    pub fn queries(&self) -> usize {
        self.count(|op| matches!(op, DriverOp::Query { .. }))
    }

    /// Number of write statements, DDL included.
    pub fn executes(&self) -> usize {
        self.count(|op| matches!(op, DriverOp::Execute { .. }))
    }

    pub fn rollbacks(&self) -> usize {
        self.count(|op| matches!(op, DriverOp::Rollback))
    }

    /// SQL text of the most recent read.
    pub fn last_query(&self) -> Option<String> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            DriverOp::Query { sql, .. } => Some(sql.clone()),
            _ => None,
        })
    }

    /// Clear the log
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&self) -> Option<DriverOp> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }
}
