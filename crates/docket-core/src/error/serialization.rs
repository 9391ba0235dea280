use super::Error;

/// A document payload could not be encoded to, or decoded from, JSON.
#[derive(Debug)]
pub(super) struct SerializationError {
    inner: serde_json::Error,
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl core::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "serialization failed: {}", self.inner)
    }
}

impl Error {
    pub fn serialization(err: serde_json::Error) -> Error {
        Error::from(super::ErrorKind::Serialization(SerializationError {
            inner: err,
        }))
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Serialization(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::serialization(err)
    }
}
