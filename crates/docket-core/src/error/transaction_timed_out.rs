use std::time::Duration;

use super::{Error, ErrorKind};

/// `save_changes` did not finish within the store's transaction timeout.
#[derive(Debug)]
pub(super) struct TransactionTimedOut {
    duration: Duration,
}

impl Error {
    pub fn transaction_timed_out(duration: Duration) -> Error {
        ErrorKind::TransactionTimedOut(TransactionTimedOut { duration }).into()
    }

    pub fn is_transaction_timed_out(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransactionTimedOut(_))
    }
}

impl std::error::Error for TransactionTimedOut {}

impl core::fmt::Display for TransactionTimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transaction timed out after {:?}", self.duration)
    }
}
