use std::fmt;

/// Error returned when a selector or member rule cannot be applied.
///
/// Every failing call is all-or-nothing: no view is created or mutated when
/// an `ExposeError` is returned.
///
/// # Examples
///
/// ```
/// use expose_core::{ExposeError, ExposeErrorKind};
///
/// let error = ExposeError::new(ExposeErrorKind::InvalidSelector, "unknown field `email`");
/// assert_eq!(error.kind(), ExposeErrorKind::InvalidSelector);
/// assert_eq!(error.message(), "unknown field `email`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposeError {
    kind: ExposeErrorKind,
    message: String,
}

impl ExposeError {
    /// Creates a new error.
    pub fn new(kind: ExposeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_selector(message: impl Into<String>) -> Self {
        Self::new(ExposeErrorKind::InvalidSelector, message)
    }

    pub(crate) fn invalid_member(message: impl Into<String>) -> Self {
        Self::new(ExposeErrorKind::InvalidMemberSelector, message)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ExposeErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ExposeError {}

/// Kind of projection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposeErrorKind {
    /// The selector contains a node that is not a field access or a tuple of
    /// field accesses, names a field the type does not declare, or could not
    /// be parsed.
    InvalidSelector,
    /// A member-rule selector did not resolve to exactly one field.
    InvalidMemberSelector,
}

impl fmt::Display for ExposeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelector => write!(f, "invalid selector"),
            Self::InvalidMemberSelector => write!(f, "invalid member selector"),
        }
    }
}
