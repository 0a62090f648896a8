//! Errors produced by the processing stages

use std::path::PathBuf;
use std::process::ExitStatus;

use crate::index::BoxDim_u;

#[derive(Debug, thiserror::Error)]
pub enum Error {

    #[error("I/O error on `{}`: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not read NIfTI `{}`: {source}", path.display())]
    Nifti { path: PathBuf, #[source] source: nifti::NiftiError },

    #[error("`{}` holds {volumes} volumes; a single 3D volume is required", path.display())]
    NotAVolume { path: PathBuf, volumes: usize },

    #[error("`{}` has no frame {frame}: it holds {volumes} volumes", path.display())]
    NoSuchFrame { path: PathBuf, frame: usize, volumes: usize },

    #[error("malformed metadata sidecar `{}`: {source}", path.display())]
    Metadata { path: PathBuf, #[source] source: serde_json::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("malformed configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("voxel grids differ: {expected:?} vs {found:?}")]
    GridMismatch { expected: BoxDim_u, found: BoxDim_u },

    #[error("{classes} tissue-class images but {priors} tissue-probability images")]
    TissueCountMismatch { classes: usize, priors: usize },

    #[error("several maps are called `{stem}`; their smoothed outputs would overwrite each other")]
    DuplicateStem { stem: String },

    #[error("no {0} supplied")]
    NoInputs(&'static str),

    #[error("`{}` contains no finite voxels", path.display())]
    NoFiniteVoxels { path: PathBuf },

    #[error("segmentation failed: `{}` exited with {status}", program.display())]
    SegmentationFailed { program: PathBuf, status: ExitStatus },

    #[error("segmentation left no `{stem}` volume in `{}`", dir.display())]
    MissingOutput { dir: PathBuf, stem: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach the offending path to an `io::Error`
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io { path, source }
}
