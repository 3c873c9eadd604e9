#[macro_use]
mod error;
pub use error::{Error, IntoError};

mod diagnostic;
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};

pub(crate) mod parse;

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses the schema compiler's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
