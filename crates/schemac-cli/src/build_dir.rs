use anyhow::{Context, Result};
use schemac_core::Schema;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const TABLES: &str = "tables.json";
const ENUMS: &str = "enums.json";
const MODELS: &str = "models.json";
const PROTOCOLS: &str = "protocols.json";
const FOREIGN_KEYS: &str = "foreign_keys.json";
const REVERSE_FKS: &str = "reverse_fks.json";
const CIRCULAR_DEPS: &str = "circular_deps.json";

/// The intermediate representation on disk: one JSON artifact per schema
/// collection, written by `parse` and read back by `generate`.
#[derive(Debug, Clone)]
pub struct BuildDir {
    path: PathBuf,
}

impl BuildDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the artifacts, in the order they are written
    pub fn artifacts() -> [&'static str; 7] {
        [
            TABLES,
            ENUMS,
            MODELS,
            PROTOCOLS,
            FOREIGN_KEYS,
            REVERSE_FKS,
            CIRCULAR_DEPS,
        ]
    }

    /// Write every artifact, replacing existing ones
    pub fn save(&self, schema: &Schema) -> Result<()> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("failed to create `{}`", self.path.display()))?;

        self.write(TABLES, &schema.tables)?;
        self.write(ENUMS, &schema.enums)?;
        self.write(MODELS, &schema.models)?;
        self.write(PROTOCOLS, &schema.protocols)?;
        self.write(FOREIGN_KEYS, &schema.foreign_keys)?;
        self.write(REVERSE_FKS, &schema.reverse_fks)?;
        self.write(CIRCULAR_DEPS, &schema.circular_deps)?;

        Ok(())
    }

    /// Read the artifacts back and check they still describe a consistent
    /// schema. Hand-edited artifacts are accepted only if they pass.
    pub fn load(&self) -> Result<Schema> {
        let schema = Schema {
            tables: self.read(TABLES)?,
            enums: self.read(ENUMS)?,
            models: self.read(MODELS)?,
            protocols: self.read(PROTOCOLS)?,
            foreign_keys: self.read(FOREIGN_KEYS)?,
            reverse_fks: self.read(REVERSE_FKS)?,
            circular_deps: self.read(CIRCULAR_DEPS)?,
        };

        schema
            .verify()
            .with_context(|| format!("build directory `{}` is inconsistent", self.path.display()))?;

        Ok(schema)
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path.join(name);
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');

        fs::write(&path, json).with_context(|| format!("failed to write `{}`", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote artifact");

        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path.join(name);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "failed to read `{}`; run `schemac parse` first",
                path.display()
            )
        })?;

        serde_json::from_str(&json)
            .with_context(|| format!("malformed artifact `{}`", path.display()))
    }
}
