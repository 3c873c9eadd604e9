use super::{Error, ErrorKind};

/// Error when a resolved schema violates one of its own invariants.
///
/// Parsed schemas satisfy these by construction. The check matters when a
/// schema is reloaded from persisted artifacts that may have been edited or
/// produced by a different run, e.g. a reverse index that no longer mirrors
/// the forward index.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is, or wraps, an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::InvalidSchema(_)))
    }
}
