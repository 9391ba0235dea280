use super::Error;
use crate::stmt::Id;

/// An insert targeted an id that is already stored for the tenant.
#[derive(Debug)]
pub(super) struct DocumentAlreadyExists {
    pub(super) document_type: Box<str>,
    pub(super) id: Id,
}

impl std::error::Error for DocumentAlreadyExists {}

impl core::fmt::Display for DocumentAlreadyExists {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "document already exists: {} {}",
            self.document_type, self.id
        )
    }
}

impl Error {
    pub fn document_already_exists(document_type: impl Into<String>, id: Id) -> Error {
        Error::from(super::ErrorKind::DocumentAlreadyExists(
            DocumentAlreadyExists {
                document_type: document_type.into().into(),
                id,
            },
        ))
    }

    pub fn is_document_already_exists(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::DocumentAlreadyExists(_)))
    }
}
