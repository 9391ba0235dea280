use super::Error;
use crate::stmt::Id;

/// A version-checked write matched no row at the version the session
/// expected.
///
/// This is distinct from [`Error::is_document_not_found`]: the document may
/// well exist, but another writer has moved it to a newer version since it
/// was read.
#[derive(Debug)]
pub(super) struct ConcurrencyConflict {
    pub(super) document_type: Box<str>,
    pub(super) id: Id,
    pub(super) expected_version: i64,
}

impl std::error::Error for ConcurrencyConflict {}

impl core::fmt::Display for ConcurrencyConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "concurrency conflict: {} {} was not at expected version {}",
            self.document_type, self.id, self.expected_version
        )
    }
}

impl Error {
    /// Creates a concurrency conflict error for the given document.
    pub fn concurrency_conflict(
        document_type: impl Into<String>,
        id: Id,
        expected_version: i64,
    ) -> Error {
        Error::from(super::ErrorKind::ConcurrencyConflict(ConcurrencyConflict {
            document_type: document_type.into().into(),
            id,
            expected_version,
        }))
    }

    /// Returns `true` if this error, or any error in its context chain, is a
    /// concurrency conflict.
    pub fn is_concurrency_conflict(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::ConcurrencyConflict(_)))
    }
}
