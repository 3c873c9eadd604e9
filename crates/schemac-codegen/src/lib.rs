#[macro_use]
mod fmt;

mod emitter;
pub use emitter::{Emitter, EmitterKind, GeneratedFile, Output, Target};

pub mod type_map;

mod relation;

mod writer;
pub use writer::write_output;

mod client_model;
pub use client_model::ClientModel;

mod endpoint;
pub use endpoint::Endpoint;

mod persistence;
pub use persistence::Persistence;

mod protocol;
pub use protocol::ProtocolEmitter;

mod transfer;
pub use transfer::Transfer;

mod view_model;
pub use view_model::ViewModel;
