mod adhoc;
mod concurrency_conflict;
mod connection_pool;
mod document_already_exists;
mod document_not_found;
mod driver_operation_failed;
mod duplicate_key;
mod invalid_connection_url;
mod invalid_result;
mod more_than_one_element;
mod no_elements;
mod serialization;
mod transaction_timed_out;
mod type_conversion;
mod unknown_tenant;
mod unsupported_expression;
mod unsupported_feature;

use adhoc::AdhocError;
use concurrency_conflict::ConcurrencyConflict;
use connection_pool::ConnectionPoolError;
use document_already_exists::DocumentAlreadyExists;
use document_not_found::DocumentNotFound;
use driver_operation_failed::DriverOperationFailed;
use duplicate_key::DuplicateKey;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_result::InvalidResultError;
use more_than_one_element::MoreThanOneElement;
use no_elements::NoElements;
use serialization::SerializationError;
use std::sync::Arc;
use transaction_timed_out::TransactionTimedOut;
use type_conversion::TypeConversionError;
use unknown_tenant::UnknownTenant;
use unsupported_expression::UnsupportedExpression;
use unsupported_feature::UnsupportedFeature;

use crate::stmt::Id;

/// Return early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Docket.
///
/// The error is a single pointer wide and cheap to clone, which lets one
/// failure be handed to every pending batch result.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Finds the first kind in the context chain matching `f`.
    fn find<'a, T>(&'a self, f: impl Fn(&'a ErrorKind) -> Option<T>) -> Option<T> {
        self.chain().find_map(|err| f(err.kind()))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// The document type involved in a write or lookup failure, when known.
    pub fn document_type(&self) -> Option<&str> {
        self.find(|kind| match kind {
            ErrorKind::ConcurrencyConflict(err) => Some(&*err.document_type),
            ErrorKind::DocumentAlreadyExists(err) => Some(&*err.document_type),
            ErrorKind::DocumentNotFound(err) => Some(&*err.document_type),
            _ => None,
        })
    }

    /// The id of the document involved in a write or lookup failure, when known.
    pub fn document_id(&self) -> Option<&Id> {
        self.find(|kind| match kind {
            ErrorKind::ConcurrencyConflict(err) => Some(&err.id),
            ErrorKind::DocumentAlreadyExists(err) => Some(&err.id),
            ErrorKind::DocumentNotFound(err) => Some(&err.id),
            _ => None,
        })
    }

    /// The version a conflicting write expected to find in storage.
    pub fn expected_version(&self) -> Option<i64> {
        self.find(|kind| match kind {
            ErrorKind::ConcurrencyConflict(err) => Some(err.expected_version),
            _ => None,
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            ErrorKind::DuplicateKey(err) => Some(err),
            ErrorKind::ConnectionPool(err) => Some(err),
            ErrorKind::Serialization(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    ConcurrencyConflict(ConcurrencyConflict),
    ConnectionPool(ConnectionPoolError),
    DocumentAlreadyExists(DocumentAlreadyExists),
    DocumentNotFound(DocumentNotFound),
    DriverOperationFailed(DriverOperationFailed),
    DuplicateKey(DuplicateKey),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidResult(InvalidResultError),
    MoreThanOneElement(MoreThanOneElement),
    NoElements(NoElements),
    Serialization(SerializationError),
    TransactionTimedOut(TransactionTimedOut),
    TypeConversion(TypeConversionError),
    UnknownTenant(UnknownTenant),
    UnsupportedExpression(UnsupportedExpression),
    UnsupportedFeature(UnsupportedFeature),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            ConcurrencyConflict(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            DocumentAlreadyExists(err) => core::fmt::Display::fmt(err, f),
            DocumentNotFound(err) => core::fmt::Display::fmt(err, f),
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            DuplicateKey(err) => core::fmt::Display::fmt(err, f),
            InvalidConnectionUrl(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            MoreThanOneElement(err) => core::fmt::Display::fmt(err, f),
            NoElements(err) => core::fmt::Display::fmt(err, f),
            Serialization(err) => core::fmt::Display::fmt(err, f),
            TransactionTimedOut(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UnknownTenant(err) => core::fmt::Display::fmt(err, f),
            UnsupportedExpression(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown docket error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
