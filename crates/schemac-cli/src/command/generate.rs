use super::{failure, heading, success, warning};
use crate::{BuildDir, Config};
use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use schemac_codegen::{write_output, Emitter, Target};
use schemac_core::{err, Diagnostics, Schema};
use std::path::{Path, PathBuf};
use std::thread;

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Directory holding the intermediate representation
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Emitters to run: all, server, client or a single emitter name
    #[arg(long, default_value = "all")]
    target: Target,

    /// Root directory for generated code
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

impl GenerateCommand {
    pub(crate) fn run(self, config: &Config) -> Result<()> {
        let config = config
            .clone()
            .with_overrides(None, self.build_dir, self.out_dir);

        heading("Generate");

        let schema = BuildDir::new(&config.build_dir).load()?;
        generate(&schema, &config, self.target)
    }
}

/// One emitter's successful run
struct Report {
    dir: PathBuf,
    written: Vec<PathBuf>,
    diagnostics: Diagnostics,
}

/// Runs the selected emitters concurrently, each into its own directory.
///
/// A failing emitter does not stop the others; the command fails once all
/// of them have finished.
pub(crate) fn generate(schema: &Schema, config: &Config, target: Target) -> Result<()> {
    let kinds = target.kinds();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = kinds
            .iter()
            .map(|&kind| {
                let emitter = config.emitter(kind);
                let dir = config.output_dir(kind);
                scope.spawn(move || run_emitter(&*emitter, schema, &dir))
            })
            .collect();

        handles
            .into_iter()
            .zip(&kinds)
            .map(|(handle, &kind)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|_| Err(err!("emitter `{kind}` panicked")));
                (kind, result)
            })
            .collect()
    });

    let mut failed = 0;

    for (kind, result) in &results {
        match result {
            Ok(report) => {
                success(format!(
                    "{:<13} {} files {}",
                    kind.as_str(),
                    report.written.len(),
                    style(format!("→ {}", report.dir.display())).dim()
                ));
                for diagnostic in &report.diagnostics {
                    warning(diagnostic);
                }
            }
            Err(err) => {
                failed += 1;
                failure(format!("{:<13} {err}", kind.as_str()));
                for path in err.written_files().unwrap_or_default() {
                    println!("      {}", style(path.display()).dim());
                }
            }
        }
    }

    println!();

    if failed > 0 {
        bail!("{failed} of {} emitters failed", results.len());
    }

    Ok(())
}

fn run_emitter(emitter: &dyn Emitter, schema: &Schema, dir: &Path) -> schemac_core::Result<Report> {
    let output = emitter.emit(schema)?;
    let written = write_output(emitter.name(), &output, dir)?;

    Ok(Report {
        dir: dir.to_path_buf(),
        written,
        diagnostics: output.diagnostics,
    })
}
