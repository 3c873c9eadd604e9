use super::{Error, ErrorKind};

/// Error when an emitter needs a default member for an enum that declares no
/// aliased value.
#[derive(Debug)]
pub(super) struct MissingEnumDefault {
    name: Box<str>,
}

impl std::error::Error for MissingEnumDefault {}

impl core::fmt::Display for MissingEnumDefault {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "enum `{}` has no aliased value to use as its default",
            self.name
        )
    }
}

impl Error {
    pub fn missing_enum_default(name: impl Into<String>) -> Error {
        Error::from(ErrorKind::MissingEnumDefault(MissingEnumDefault {
            name: name.into().into(),
        }))
    }

    pub fn is_missing_enum_default(&self) -> bool {
        self.any(|kind| matches!(kind, ErrorKind::MissingEnumDefault(_)))
    }
}
