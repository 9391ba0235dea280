use super::Error;
use crate::stmt::Id;

/// An update or delete without a version check matched no row.
#[derive(Debug)]
pub(super) struct DocumentNotFound {
    pub(super) document_type: Box<str>,
    pub(super) id: Id,
}

impl std::error::Error for DocumentNotFound {}

impl core::fmt::Display for DocumentNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "document not found: {} {}", self.document_type, self.id)
    }
}

impl Error {
    pub fn document_not_found(document_type: impl Into<String>, id: Id) -> Error {
        Error::from(super::ErrorKind::DocumentNotFound(DocumentNotFound {
            document_type: document_type.into().into(),
            id,
        }))
    }

    pub fn is_document_not_found(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::DocumentNotFound(_)))
    }
}
