pub mod nifti;
pub mod metadata;

use std::path::{Path, PathBuf};

use crate::error::{io_error, Result};

/// Empty file whose presence signals that a stage finished writing its outputs
pub const COMPLETION_MARKER: &str = "CompletedOK.txt";

pub fn write_completion_marker(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(COMPLETION_MARKER);
    std::fs::File::create(&path).map_err(io_error(&path))?;
    Ok(path)
}

pub fn create_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(io_error(dir))
}
