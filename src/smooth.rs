//! Tissue-weighted smoothing of quantitative maps
//!
//! For tissue class `c` with probability map `tc` and prior `p`, a map `m`
//! is smoothed as
//!
//! ```text
//!         S[ m·tc · 1(p > 0.05) ]
//!  out = -------------------------   where S[tc] > 0.05, 0 elsewhere
//!                 S[tc]
//! ```
//!
//! where `S` is Gaussian smoothing. Each output averages the map over nearby
//! voxels belonging to one tissue class, avoiding partial-volume mixing with
//! the others.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use itertools::Itertools;
use serde_json::json;

use units::{decimal, mm_decimal};
use crate::config::smooth::Config;
use crate::error::{Error, Result};
use crate::gauss;
use crate::image::Image;
use crate::io::{create_output_dir, write_completion_marker};
use crate::io::metadata::{read_units, Output, ProcStep, Sidecar};
use crate::io::nifti::{derived_path, file_stem, read_image, write_image};

pub const DEFAULT_UNITS: &str = "a.u.";

#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub maps: Vec<PathBuf>,
    /// Tissue probability maps, one per class
    pub tissue_classes: Vec<PathBuf>,
    /// Priors, matching `tissue_classes` one to one
    pub priors: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Smoothed {
    /// Index into `Inputs::maps`
    pub map: usize,
    /// Index into `Inputs::tissue_classes`
    pub class: usize,
    pub path: PathBuf,
}

impl Inputs {
    pub fn validate(&self) -> Result<()> {
        if self.tissue_classes.len() != self.priors.len() {
            return Err(Error::TissueCountMismatch {
                classes: self.tissue_classes.len(),
                priors : self.priors.len(),
            })
        }
        if self.maps          .is_empty() { return Err(Error::NoInputs("maps")) }
        if self.tissue_classes.is_empty() { return Err(Error::NoInputs("tissue classes")) }
        // Outputs are named after the map's stem only
        if let Some(stem) = self.maps.iter().map(|m| file_stem(m)).duplicates().next() {
            return Err(Error::DuplicateStem { stem })
        }
        Ok(())
    }

    pub fn n_outputs(&self) -> usize { self.maps.len() * self.tissue_classes.len() }
}

/// `ws_c<class>_<map>.nii`, with classes counted from 1
pub fn output_path(out_dir: &Path, map: &Path, class: usize) -> PathBuf {
    derived_path(out_dir, &format!("ws_c{}_", class + 1), map, "")
}

pub fn run(inputs: &Inputs, config: &Config, out_dir: &Path, progress: &ProgressBar) -> Result<Vec<Smoothed>> {
    inputs.validate()?;
    create_output_dir(out_dir)?;
    progress.set_length(inputs.n_outputs() as u64);

    let fwhm = config.fwhm_xyz();
    let mut outputs = Vec::with_capacity(inputs.n_outputs());

    for (class, (tc_path, prior_path)) in inputs.tissue_classes.iter().zip_eq(&inputs.priors).enumerate() {
        let tc    = read_image(tc_path)?.map(finite_or_zero);
        let prior = read_image(prior_path)?;
        tc.check_same_space(&prior.grid)?;
        let smoothed_tc = gauss::smooth(&tc, fwhm);

        for (i, map_path) in inputs.maps.iter().enumerate() {
            progress.set_message(format!("c{} {}", class + 1, map_path.display()));
            let map = read_image(map_path)?;
            let out = weighted_average(&map, &tc, &prior, &smoothed_tc, config)?;

            let path = output_path(out_dir, map_path, class);
            write_image(&out, &path)?;
            let units = read_units(map_path)?.unwrap_or_else(|| DEFAULT_UNITS.into());
            Sidecar::new(
                ProcStep::new("Tissue-weighted smoothing", json!({
                    "fwhm_mm": mm_decimal(config.fwhm),
                    "prior_threshold": decimal(config.prior_threshold),
                    "smoothed_threshold": decimal(config.smoothed_threshold),
                    "tissue_class": class + 1,
                })),
                &[map_path, tc_path, prior_path],
                Output::new(&format!("Tissue-weighted smoothed map (class {})", class + 1), &units),
            )?.write(&path)?;

            outputs.push(Smoothed { map: i, class, path });
            progress.inc(1);
        }
    }
    write_completion_marker(out_dir)?;
    Ok(outputs)
}

/// The tissue-weighted average of `map` for a single class. `smoothed_tc`
/// must be `tc` smoothed with `config.fwhm`.
pub fn weighted_average(
    map        : &Image,
    tc         : &Image,
    prior      : &Image,
    smoothed_tc: &Image,
    config     : &Config,
) -> Result<Image> {
    let inside_prior = prior.above(config.prior_threshold);
    let weighted = map
        .zip_map(tc, |m, t| finite_or_zero(m * t))?
        .masked(&inside_prior)?;
    let numerator = gauss::smooth(&weighted, config.fwhm_xyz());
    let threshold = config.smoothed_threshold;
    numerator.zip_map(smoothed_tc, |n, s| if s > threshold { n / s } else { 0.0 })
}

fn finite_or_zero(x: f32) -> f32 { if x.is_finite() { x } else { 0.0 } }
