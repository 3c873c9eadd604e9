use anyhow::{bail, Context, Result};
use schemac_codegen::{Emitter, EmitterKind, Persistence, Transfer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration file read when `--config` is not given
pub const CONFIG_FILE: &str = "Schemac.toml";

/// Configuration for schemac operations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Schema source file
    pub schema_file: Option<PathBuf>,

    /// Directory holding the intermediate representation
    pub build_dir: PathBuf,

    /// Root of the generated code. Each emitter writes to a subdirectory
    /// named after it unless `targets` says otherwise.
    pub out_dir: PathBuf,

    /// Output directory per emitter name
    targets: BTreeMap<String, PathBuf>,

    /// Package layout of the generated Python code
    pub python: PythonConfig,
}

/// Python package settings shared by the persistence and transfer emitters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythonConfig {
    /// Package the persistence models are imported from
    pub models_package: Option<String>,

    /// Package the transfer schemas are imported from
    pub schemas_package: Option<String>,

    /// Import statement providing the declarative `Base`
    pub base_import: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_file: None,
            build_dir: PathBuf::from("build"),
            out_dir: PathBuf::from("generated"),
            targets: BTreeMap::new(),
            python: PythonConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema source file
    pub fn schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_file = Some(path.into());
        self
    }

    /// Set the build directory
    pub fn build_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_dir = path.into();
        self
    }

    /// Set the output root
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = path.into();
        self
    }

    /// Send one emitter's output to `path` instead of `<out_dir>/<name>`
    pub fn target_dir(mut self, kind: EmitterKind, path: impl Into<PathBuf>) -> Self {
        self.targets.insert(kind.as_str().to_string(), path.into());
        self
    }

    /// Set the Python package layout
    pub fn python(mut self, python: PythonConfig) -> Self {
        self.python = python;
        self
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;

        contents
            .parse()
            .with_context(|| format!("invalid config `{}`", path.display()))
    }

    /// Loads `explicit` when given, otherwise `Schemac.toml` in the current
    /// directory if there is one, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if std::fs::exists(CONFIG_FILE)? {
            tracing::debug!(path = CONFIG_FILE, "using config file");
            return Self::load(CONFIG_FILE);
        }

        Ok(Self::default())
    }

    /// Applies command-line paths on top of the file's values
    pub(crate) fn with_overrides(
        mut self,
        schema_file: Option<PathBuf>,
        build_dir: Option<PathBuf>,
        out_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = schema_file {
            self = self.schema_file(path);
        }
        if let Some(path) = build_dir {
            self = self.build_dir(path);
        }
        if let Some(path) = out_dir {
            self = self.out_dir(path);
            // `--out-dir` replaces the file's per-emitter directories too
            self.targets.clear();
        }
        self
    }

    pub(crate) fn require_schema_file(&self) -> Result<&Path> {
        match &self.schema_file {
            Some(path) => Ok(path),
            None => bail!(
                "no schema file; pass --schema-file or set `schema_file` in {CONFIG_FILE}"
            ),
        }
    }

    /// Where `kind` writes its files
    pub fn output_dir(&self, kind: EmitterKind) -> PathBuf {
        match self.targets.get(kind.as_str()) {
            Some(path) => path.clone(),
            None => self.out_dir.join(kind.as_str()),
        }
    }

    /// The emitter for `kind`, configured from this file
    pub fn emitter(&self, kind: EmitterKind) -> Box<dyn Emitter> {
        match kind {
            EmitterKind::Persistence => {
                let mut emitter = Persistence::new();
                if let Some(package) = &self.python.schemas_package {
                    emitter = emitter.schemas_package(package);
                }
                if let Some(import) = &self.python.base_import {
                    emitter = emitter.base_import(import);
                }
                Box::new(emitter)
            }
            EmitterKind::Transfer => {
                let mut emitter = Transfer::new();
                if let Some(package) = &self.python.models_package {
                    emitter = emitter.models_package(package);
                }
                Box::new(emitter)
            }
            _ => kind.emitter(),
        }
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;

        for name in config.targets.keys() {
            if EmitterKind::from_str(name).is_err() {
                let known: Vec<_> = EmitterKind::ALL.iter().map(|kind| kind.as_str()).collect();
                bail!(
                    "unknown emitter `{name}` in [targets]; expected one of: {}",
                    known.join(", ")
                );
            }
        }

        Ok(config)
    }
}
