use super::Error;

/// The database rejected a write because of a primary key or unique
/// constraint violation.
///
/// Drivers raise this from their native error codes. The session translates
/// it into [`Error::document_already_exists`] once it knows which document
/// was being written.
#[derive(Debug)]
pub(super) struct DuplicateKey {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DuplicateKey {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate key: {}", self.inner)
    }
}

impl Error {
    pub fn duplicate_key(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::DuplicateKey(DuplicateKey {
            inner: Box::new(err),
        }))
    }

    pub fn is_duplicate_key(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::DuplicateKey(_)))
    }
}
