mod build_dir;
mod command;
mod config;

pub use build_dir::BuildDir;
pub use command::*;
pub use config::*;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Schema compiler command-line interface
pub struct SchemacCli {
    config: Option<Config>,
}

impl SchemacCli {
    /// Create a new SchemacCli that reads its configuration from `--config`
    /// or `Schemac.toml`
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Create a new SchemacCli with a fixed configuration; `--config` is
    /// ignored
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Parse and execute CLI commands from command-line arguments
    pub fn parse_and_run(&self) -> Result<()> {
        let cli = Cli::parse();
        self.run(cli)
    }

    /// Parse and execute CLI commands from an iterator of arguments
    pub fn parse_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::parse_from(args);
        self.run(cli)
    }

    fn run(&self, cli: Cli) -> Result<()> {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => Config::discover(cli.config.as_deref())?,
        };

        match cli.command {
            Command::Parse(cmd) => cmd.run(&config),
            Command::Generate(cmd) => cmd.run(&config),
            Command::Build(cmd) => cmd.run(&config),
        }
    }
}

impl Default for SchemacCli {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Parser, Debug)]
#[command(name = "schemac")]
#[command(about = "schemac - Compile a schema into server and client source code")]
#[command(version)]
struct Cli {
    /// Configuration file [default: Schemac.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Parse a schema file and write the intermediate representation
    Parse(ParseCommand),

    /// Generate code from a previously written intermediate representation
    Generate(GenerateCommand),

    /// Parse and generate in one step
    Build(BuildCommand),
}
