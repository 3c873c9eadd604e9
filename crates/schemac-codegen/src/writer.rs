use crate::Output;

use schemac_core::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Writes an emitter's files under `dir`, creating directories as needed.
///
/// Existing files are overwritten. When a write fails, the returned error
/// lists the files already written by this call; they are left in place.
pub fn write_output(emitter: &str, output: &Output, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = vec![];

    for file in &output.files {
        let path = dir.join(&file.path);

        if let Err(err) = write_file(&path, &file.contents) {
            return Err(Error::from(err).context(Error::emit_failed(emitter, written)));
        }

        info!(emitter, path = %path.display(), "wrote file");
        written.push(path);
    }

    debug!(emitter, files = written.len(), dir = %dir.display(), "output written");
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)
}
