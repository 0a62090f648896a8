//! Configuration of UNICORT: mask threshold, bias-field model and the fixed
//! parameters handed to the unified segmentation

use std::path::PathBuf;

use serde::Deserialize;

use units::{mm, Length};
use super::deserialize_uom;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Mask threshold, as a multiple of the modal PDw intensity
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Regularization of the bias field
    #[serde(default = "default_bias_reg")]
    pub bias_reg: f64,

    /// Smoothness of the bias field (full width at half maximum)
    #[serde(default = "default_bias_fwhm")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub bias_fwhm: Length,

    /// Tissue probability atlas: one frame per tissue class
    #[serde(default = "default_tpm")]
    pub tpm: PathBuf,

    /// Number of Gaussians modelling each tissue class
    #[serde(default = "default_n_gaussians")]
    pub n_gaussians: Vec<usize>,

    /// Warping regularization weights
    #[serde(default = "default_warp_reg")]
    pub warp_reg: [f64; 5],

    /// Template space for the initial affine registration
    #[serde(default = "default_affine_reg")]
    pub affine_reg: String,

    /// Sampling distance used when fitting the model
    #[serde(default = "default_sampling")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub sampling: Length,

    /// Smoothness of the image intensities, accounting for correlated noise
    #[serde(default = "default_smoothness")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub smoothness: Length,

    /// Markov random field strength used to clean up tissue classes
    #[serde(default = "default_mrf")]
    pub mrf: f64,

    #[serde(default = "default_cleanup")]
    pub cleanup: u8,

    /// Units in which the R1 map is expressed
    #[serde(default = "default_r1_units")]
    pub r1_units: String,

    /// The program implementing unified segmentation
    pub segmenter: Option<Segmenter>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Segmenter {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_threshold () -> f32        { 5.0 }
fn default_bias_reg  () -> f64        { 1e-3 }
fn default_bias_fwhm () -> Length     { mm(60.0) }
fn default_tpm       () -> PathBuf    { "TPM.nii".into() }
fn default_n_gaussians() -> Vec<usize> { vec![2, 2, 2, 3, 4, 2] }
fn default_warp_reg  () -> [f64; 5]   { [0.0, 1e-3, 0.5, 0.05, 0.2] }
fn default_affine_reg() -> String     { "mni".into() }
fn default_sampling  () -> Length     { mm(3.0) }
fn default_smoothness() -> Length     { mm(0.0) }
fn default_mrf       () -> f64        { 1.0 }
fn default_cleanup   () -> u8         { 1 }
fn default_r1_units  () -> String     { "1000/s".into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold  : default_threshold(),
            bias_reg   : default_bias_reg(),
            bias_fwhm  : default_bias_fwhm(),
            tpm        : default_tpm(),
            n_gaussians: default_n_gaussians(),
            warp_reg   : default_warp_reg(),
            affine_reg : default_affine_reg(),
            sampling   : default_sampling(),
            smoothness : default_smoothness(),
            mrf        : default_mrf(),
            cleanup    : default_cleanup(),
            r1_units   : default_r1_units(),
            segmenter  : None,
        }
    }
}
