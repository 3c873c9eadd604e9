use super::{Error, ErrorKind};
use std::path::PathBuf;

/// Error when an emitter fails partway through writing its output.
///
/// Carries the files that were already written so the caller can report
/// them. A re-run overwrites the whole output set, so no attempt is made to
/// roll these back.
#[derive(Debug)]
pub(super) struct EmitFailed {
    emitter: Box<str>,
    written: Vec<PathBuf>,
}

impl std::error::Error for EmitFailed {}

impl core::fmt::Display for EmitFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "emitter `{}` failed after writing {} file(s)",
            self.emitter,
            self.written.len()
        )
    }
}

impl Error {
    /// Creates an emit failure for `emitter`, recording the files written
    /// before the failure.
    pub fn emit_failed(emitter: impl Into<String>, written: Vec<PathBuf>) -> Error {
        Error::from(ErrorKind::EmitFailed(EmitFailed {
            emitter: emitter.into().into(),
            written,
        }))
    }

    pub fn is_emit_failed(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::EmitFailed(_)))
    }

    /// Files written before an emit failure, if this is one.
    pub fn written_files(&self) -> Option<&[PathBuf]> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::EmitFailed(err) => Some(&err.written[..]),
            _ => None,
        })
    }
}
