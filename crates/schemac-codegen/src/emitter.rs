use crate::{client_model, endpoint, persistence, protocol, transfer, view_model};

use schemac_core::{bail, Diagnostics, Error, Result, Schema};
use std::{fmt, path::PathBuf, str::FromStr};

/// Turns a resolved schema into the source files of one consumer layer.
///
/// Emitters are pure: they read the schema and return file contents without
/// touching the filesystem. Output must depend only on the schema, so two
/// runs over the same schema produce the same bytes. Emitters run on
/// separate threads and share the schema read-only.
pub trait Emitter: Send + Sync {
    fn kind(&self) -> EmitterKind;

    fn emit(&self, schema: &Schema) -> Result<Output>;

    /// Name of the emitter, also used as its default output directory
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Everything one emitter produced in a single run.
#[derive(Debug, Default)]
pub struct Output {
    /// Files in the order they were generated
    pub files: Vec<GeneratedFile>,

    /// Entities skipped or defaulted while emitting
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the emitter's output directory
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmitterKind {
    /// SQLAlchemy ORM classes
    Persistence,

    /// Pydantic transfer schemas
    Transfer,

    /// Swift data models
    ClientModel,

    /// SwiftUI view models
    ViewModel,

    /// Swift network endpoint stubs
    Endpoint,

    /// Swift protocols, composite models and factories
    Protocol,
}

/// A set of emitters selected by name on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,

    /// persistence and transfer
    Server,

    /// client-model, view-model, endpoint and protocol
    Client,

    One(EmitterKind),
}

impl Output {
    pub fn new() -> Output {
        Output::default()
    }

    pub(crate) fn push(&mut self, path: impl Into<PathBuf>, contents: String) {
        self.files.push(GeneratedFile {
            path: path.into(),
            contents,
        });
    }

    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files
            .iter()
            .find(|file| file.path == std::path::Path::new(path))
    }
}

impl EmitterKind {
    pub const ALL: [EmitterKind; 6] = [
        EmitterKind::Persistence,
        EmitterKind::Transfer,
        EmitterKind::ClientModel,
        EmitterKind::ViewModel,
        EmitterKind::Endpoint,
        EmitterKind::Protocol,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmitterKind::Persistence => "persistence",
            EmitterKind::Transfer => "transfer",
            EmitterKind::ClientModel => "client-model",
            EmitterKind::ViewModel => "view-model",
            EmitterKind::Endpoint => "endpoint",
            EmitterKind::Protocol => "protocol",
        }
    }

    /// The emitter with its default settings
    pub fn emitter(self) -> Box<dyn Emitter> {
        match self {
            EmitterKind::Persistence => Box::new(persistence::Persistence::default()),
            EmitterKind::Transfer => Box::new(transfer::Transfer::default()),
            EmitterKind::ClientModel => Box::new(client_model::ClientModel),
            EmitterKind::ViewModel => Box::new(view_model::ViewModel),
            EmitterKind::Endpoint => Box::new(endpoint::Endpoint),
            EmitterKind::Protocol => Box::new(protocol::ProtocolEmitter),
        }
    }

    pub fn is_server(self) -> bool {
        matches!(self, EmitterKind::Persistence | EmitterKind::Transfer)
    }
}

impl Target {
    pub fn kinds(self) -> Vec<EmitterKind> {
        EmitterKind::ALL
            .into_iter()
            .filter(|kind| match self {
                Target::All => true,
                Target::Server => kind.is_server(),
                Target::Client => !kind.is_server(),
                Target::One(one) => *kind == one,
            })
            .collect()
    }
}

impl FromStr for EmitterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match EmitterKind::ALL.into_iter().find(|kind| kind.as_str() == s) {
            Some(kind) => Ok(kind),
            None => bail!("unknown emitter `{s}`"),
        }
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "all" => Target::All,
            "server" => Target::Server,
            "client" => Target::Client,
            _ => match s.parse() {
                Ok(kind) => Target::One(kind),
                Err(_) => bail!(
                    "unknown target `{s}`; expected all, server, client or one of: {}",
                    EmitterKind::ALL.map(EmitterKind::as_str).join(", ")
                ),
            },
        })
    }
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("all"),
            Target::Server => f.write_str("server"),
            Target::Client => f.write_str("client"),
            Target::One(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_select_emitters() {
        assert_eq!(Target::All.kinds().len(), 6);
        assert_eq!(
            "server".parse::<Target>().unwrap().kinds(),
            [EmitterKind::Persistence, EmitterKind::Transfer]
        );
        assert_eq!(
            "client".parse::<Target>().unwrap().kinds(),
            [
                EmitterKind::ClientModel,
                EmitterKind::ViewModel,
                EmitterKind::Endpoint,
                EmitterKind::Protocol
            ]
        );
        assert_eq!(
            "view-model".parse::<Target>().unwrap(),
            Target::One(EmitterKind::ViewModel)
        );
    }

    #[test]
    fn unknown_target() {
        let err = "mobile".parse::<Target>().unwrap_err();
        assert!(err.to_string().contains("client-model"));
    }

    #[test]
    fn names_round_trip() {
        for kind in EmitterKind::ALL {
            assert_eq!(kind.as_str().parse::<EmitterKind>().unwrap(), kind);
            assert_eq!(kind.emitter().name(), kind.as_str());
        }
    }
}
