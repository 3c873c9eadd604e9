use super::{generate, heading, parse};
use crate::Config;
use anyhow::Result;
use clap::Parser;
use schemac_codegen::Target;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct BuildCommand {
    /// Schema source file
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Directory to write the intermediate representation to
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Emitters to run: all, server, client or a single emitter name
    #[arg(long, default_value = "all")]
    target: Target,

    /// Root directory for generated code
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

impl BuildCommand {
    pub(crate) fn run(self, config: &Config) -> Result<()> {
        let config = config
            .clone()
            .with_overrides(self.schema_file, self.build_dir, self.out_dir);

        heading("Build");

        let schema = parse::parse_schema(&config)?;
        parse::save_build_dir(&schema, &config)?;

        println!();
        generate::generate(&schema, &config, self.target)
    }
}
