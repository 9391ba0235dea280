use super::Error;

/// A predicate or projection uses a shape the SQL compiler cannot translate.
///
/// Raised while a query is being built, never deferred to execution.
#[derive(Debug)]
pub(super) struct UnsupportedExpression {
    message: Box<str>,
}

impl std::error::Error for UnsupportedExpression {}

impl core::fmt::Display for UnsupportedExpression {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported expression: {}", self.message)
    }
}

impl Error {
    pub fn unsupported_expression(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedExpression(
            UnsupportedExpression {
                message: message.into().into(),
            },
        ))
    }

    /// A method call that no registered translator accepted.
    pub fn unsupported_method(method: &str) -> Error {
        Error::unsupported_expression(format!(
            "no translator is registered for method `{method}`"
        ))
    }

    pub fn is_unsupported_expression(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedExpression(_))
    }
}
