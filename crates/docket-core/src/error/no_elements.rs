use super::Error;

/// A single-value read required a row but the query returned none.
#[derive(Debug)]
pub(super) struct NoElements;

impl std::error::Error for NoElements {}

impl core::fmt::Display for NoElements {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("sequence contains no elements")
    }
}

impl Error {
    pub fn no_elements() -> Error {
        Error::from(super::ErrorKind::NoElements(NoElements))
    }

    pub fn is_no_elements(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoElements(_))
    }
}
