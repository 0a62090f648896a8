//! Configuration of tissue-weighted smoothing

use serde::Deserialize;

use units::{mm, Length};
use units::todo::Probabilityf32;
use super::deserialize_uom;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Isotropic smoothing kernel (full width at half maximum)
    #[serde(default = "default_fwhm")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub fwhm: Length,

    /// Voxels whose tissue prior is at or below this are excluded from the
    /// weighted average
    #[serde(default = "default_threshold")]
    pub prior_threshold: Probabilityf32,

    /// Voxels whose smoothed tissue probability is at or below this are zero
    /// in the output
    #[serde(default = "default_threshold")]
    pub smoothed_threshold: Probabilityf32,
}

fn default_fwhm     () -> Length         { mm(6.0) }
fn default_threshold() -> Probabilityf32 { 0.05 }

impl Default for Config {
    fn default() -> Self {
        Self {
            fwhm              : default_fwhm(),
            prior_threshold   : default_threshold(),
            smoothed_threshold: default_threshold(),
        }
    }
}

impl Config {
    pub fn fwhm_xyz(&self) -> [Length; 3] { [self.fwhm; 3] }
}
