use super::Error;

/// A single-value read allowed at most one row but the query returned more.
#[derive(Debug)]
pub(super) struct MoreThanOneElement;

impl std::error::Error for MoreThanOneElement {}

impl core::fmt::Display for MoreThanOneElement {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("sequence contains more than one element")
    }
}

impl Error {
    pub fn more_than_one_element() -> Error {
        Error::from(super::ErrorKind::MoreThanOneElement(MoreThanOneElement))
    }

    pub fn is_more_than_one_element(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MoreThanOneElement(_))
    }
}
