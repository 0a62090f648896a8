//! Provenance sidecars
//!
//! Every volume written by a processing stage is accompanied by a JSON file
//! (same directory, same stem, `.json` extension) recording the processing
//! step, its parameters, and the history of each input. Histories chain: an
//! input's own `history` object is embedded verbatim, so the full processing
//! lineage of any output can be recovered from its sidecar alone.

use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use serde_json::Value;

use crate::error::{io_error, Error, Result};
use crate::io::nifti::file_stem;

/// Recorded in place of a history when an input has no sidecar
pub const NO_HISTORY: &str = "No history available.";

/// Name and version of the software that produced an output
pub const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sidecar {
    pub history: History,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct History {
    pub procstep: ProcStep,
    pub input: Vec<Input>,
    pub output: Output,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcStep {
    pub descrip: String,
    pub version: String,
    pub procpar: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Input {
    pub filename: PathBuf,
    pub history: InputHistory,
}

/// Sidecars written by other tools are not guaranteed to follow our layout,
/// so a chained history is kept as an opaque JSON value.
///
/// Variant order matters for deserialization: a bare string is the fallback,
/// anything else is a chained history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum InputHistory {
    Unavailable(String),
    Chained(Value),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Output {
    pub imtype: String,
    pub units: String,
}

impl ProcStep {
    pub fn new(descrip: &str, procpar: Value) -> Self {
        Self { descrip: descrip.into(), version: VERSION.into(), procpar }
    }
}

impl Output {
    pub fn new(imtype: &str, units: &str) -> Self {
        Self { imtype: imtype.into(), units: units.into() }
    }
}

impl Sidecar {

    /// Collect the histories of `inputs` (in order) into a new sidecar
    pub fn new(procstep: ProcStep, inputs: &[&Path], output: Output) -> Result<Self> {
        let input = inputs.iter()
            .map(|&path| Ok(Input { filename: path.to_path_buf(), history: read_history(path)? }))
            .collect::<Result<_>>()?;
        Ok(Self { history: History { procstep, input, output } })
    }

    /// Write the sidecar belonging to the volume at `image`
    pub fn write(&self, image: &Path) -> Result<PathBuf> {
        let path = sidecar_path(image);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(io_error(&path))?;
        Ok(path)
    }

    pub fn read(image: &Path) -> Result<Self> {
        let path = sidecar_path(image);
        let text = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        serde_json::from_str(&text).map_err(|source| Error::Metadata { path, source })
    }
}

/// `dir/R1.nii.gz` -> `dir/R1.json`
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_file_name(format!("{}.json", file_stem(image)))
}

/// The `history` recorded in the sidecar of `image`, or `NO_HISTORY` if there
/// is no sidecar (or it records no history).
pub fn read_history(image: &Path) -> Result<InputHistory> {
    Ok(match read_sidecar_value(image)? {
        Some(Value::Object(mut fields)) => match fields.remove("history") {
            Some(history) => InputHistory::Chained(history),
            None          => InputHistory::Unavailable(NO_HISTORY.into()),
        },
        _ => InputHistory::Unavailable(NO_HISTORY.into()),
    })
}

/// Units of `image`, as recorded in its sidecar
pub fn read_units(image: &Path) -> Result<Option<String>> {
    Ok(read_sidecar_value(image)?
       .and_then(|v| v.pointer("/history/output/units").cloned())
       .and_then(|u| u.as_str().map(str::to_string)))
}

fn read_sidecar_value(image: &Path) -> Result<Option<Value>> {
    let path = sidecar_path(image);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(&path)(e)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| Error::Metadata { path, source })
}
