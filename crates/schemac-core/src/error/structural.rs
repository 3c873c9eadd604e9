use super::{Error, ErrorKind};

/// Error when a schema line cannot be classified or does not match the
/// grammar of the block it appears in.
///
/// This occurs when:
/// - A block header is missing its name or redeclares an entity
/// - A foreign key line fails the fixed-format match
/// - A line appears outside of any block and is not a foreign key
/// - A block entry has the wrong number of parts
///
/// Structural errors are fatal. The parser stops at the first one.
#[derive(Debug)]
pub(super) struct StructuralError {
    line: usize,
    text: Box<str>,
    message: Box<str>,
}

impl std::error::Error for StructuralError {}

impl core::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "line {}: {}: `{}`", self.line, self.message, self.text)
    }
}

impl Error {
    /// Creates a structural parse error for the given 1-based line number and
    /// raw line text.
    pub fn structural(line: usize, text: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Structural(StructuralError {
            line,
            text: text.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is, or wraps, a structural parse error.
    pub fn is_structural(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::Structural(_)))
    }

    /// The schema line number of the structural error, if any.
    pub fn line(&self) -> Option<usize> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Structural(err) => Some(err.line),
            _ => None,
        })
    }
}
