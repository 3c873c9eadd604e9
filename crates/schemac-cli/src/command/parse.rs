use super::{heading, success, warning};
use crate::{BuildDir, Config};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use schemac_core::{Diagnostics, Schema};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ParseCommand {
    /// Schema source file
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Directory to write the intermediate representation to
    #[arg(long)]
    build_dir: Option<PathBuf>,
}

impl ParseCommand {
    pub(crate) fn run(self, config: &Config) -> Result<()> {
        let config = config
            .clone()
            .with_overrides(self.schema_file, self.build_dir, None);

        heading("Parse Schema");

        let schema = parse_schema(&config)?;
        save_build_dir(&schema, &config)?;

        println!();
        Ok(())
    }
}

/// Reads, parses and resolves the configured schema file, printing a summary
pub(crate) fn parse_schema(config: &Config) -> Result<Schema> {
    let path = config.require_schema_file()?;
    let src = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema `{}`", path.display()))?;

    let mut diagnostics = Diagnostics::new();
    let schema = Schema::parse_with_diagnostics(&src, &mut diagnostics)
        .with_context(|| format!("failed to parse `{}`", path.display()))?;

    success(format!(
        "Parsed {}: {} tables, {} enums, {} models, {} protocols",
        path.display(),
        schema.tables.len(),
        schema.enums.len(),
        schema.models.len(),
        schema.protocols.len(),
    ));
    success(format!(
        "Resolved {} foreign keys, {} circular pairs",
        schema.foreign_keys.len(),
        schema.circular_deps.len(),
    ));

    for diagnostic in &diagnostics {
        warning(diagnostic);
    }

    Ok(schema)
}

pub(crate) fn save_build_dir(schema: &Schema, config: &Config) -> Result<()> {
    let build_dir = BuildDir::new(&config.build_dir);
    build_dir.save(schema)?;

    success(style(format!("Wrote {}", build_dir.path().display())).dim());
    Ok(())
}
