//! UNICORT: correction of R1 maps for RF transmit inhomogeneity using the
//! bias field estimated by unified segmentation
//!
//! 1. Mask the R1 map with a head/neck mask thresholded from the PDw image
//! 2. Hand the masked R1 map to the segmentation, which estimates the bias
//!    field and writes the bias-corrected map
//! 3. Convert the bias field into a B1+ map: `100 × √bias` (percent of the
//!    nominal flip angle)
//!
//! Every output is accompanied by a provenance sidecar.

use std::path::{Path, PathBuf};

use serde_json::json;

use units::{decimal, mm_decimal, todo::Intensityf32};
use crate::config::unicort::Config;
use crate::error::{io_error, Error, Result};
use crate::image::Mask;
use crate::io::{create_output_dir, write_completion_marker};
use crate::io::metadata::{Output, ProcStep, Sidecar};
use crate::io::nifti::{derived_path, file_stem, read_image, volume_files, write_image};
use crate::segment::{locate_outputs, SegmentationJob, Segmenter};
use crate::threshold::head_mask;

#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    /// Intensity below which PDw voxels were excluded from the head mask
    pub threshold: Intensityf32,
    pub masked_r1: PathBuf,
    pub corrected_r1: PathBuf,
    pub b1_map: PathBuf,
    pub bias_field: PathBuf,
}

/// B1+ in percent of nominal, from a multiplicative bias field
pub fn b1_from_bias(bias: Intensityf32) -> Intensityf32 { 100.0 * bias.sqrt() }

pub fn run(
    pdw      : &Path,
    r1       : &Path,
    config   : &Config,
    segmenter: &dyn Segmenter,
    out_dir  : &Path,
) -> Result<Outputs> {

    // ----- Head mask and masked R1 --------------------------------------------------------
    let pdw_image = read_image(pdw)?;
    let r1_image = read_image(r1)?;
    r1_image.check_same_space(&pdw_image.grid)?;

    let (threshold, mask) = head_mask(&pdw_image, config.threshold)
        .ok_or_else(|| Error::NoFiniteVoxels { path: pdw.to_path_buf() })?;

    create_output_dir(out_dir)?;
    let masked_r1 = derived_path(out_dir, "", r1, "_masked");
    write_image(&r1_image.masked(&mask)?, &masked_r1)?;
    Sidecar::new(
        ProcStep::new("UNICORT: R1 map masked by thresholded PDw image", json!({
            "threshold_multiplier": decimal(config.threshold),
            "threshold": decimal(threshold),
            "mask_voxels": mask.count(),
        })),
        &[r1, pdw],
        Output::new("R1 map (masked)", &config.r1_units),
    )?.write(&masked_r1)?;

    // ----- Bias-field estimation -----------------------------------------------------------
    let job = SegmentationJob::unicort(&masked_r1, config);
    segmenter.segment(&job)?;
    let outputs = locate_outputs(out_dir, &file_stem(&masked_r1))?;

    // ----- Bias-corrected R1 ---------------------------------------------------------------
    let corrected_r1 = derived_path(out_dir, "", r1, "_UNICORT");
    write_masked(&outputs.corrected, &mask, &corrected_r1)?;
    for file in volume_files(&outputs.corrected) {
        if file != corrected_r1 {
            std::fs::remove_file(&file).map_err(io_error(&file))?;
        }
    }
    Sidecar::new(
        ProcStep::new("UNICORT: bias-field corrected R1 map", procpar(config)),
        &[&masked_r1],
        Output::new("R1 map (UNICORT)", &config.r1_units),
    )?.write(&corrected_r1)?;

    // ----- B1+ map -------------------------------------------------------------------------
    let b1_map = derived_path(out_dir, "", r1, "_B1map_UNICORT");
    let bias = read_image(&outputs.bias_field)?;
    write_image(&bias.select(&mask, b1_from_bias)?, &b1_map)?;
    Sidecar::new(
        ProcStep::new("UNICORT: B1+ map from bias field", procpar(config)),
        &[&outputs.bias_field, pdw],
        Output::new("B1+ map", "p.u."),
    )?.write(&b1_map)?;

    write_completion_marker(out_dir)?;

    Ok(Outputs { threshold, masked_r1, corrected_r1, b1_map, bias_field: outputs.bias_field })
}

/// Re-read `input`, zero everything outside `mask` and write it to `output`
fn write_masked(input: &Path, mask: &Mask, output: &Path) -> Result<()> {
    let image = read_image(input)?;
    write_image(&image.masked(mask)?, output)
}

fn procpar(config: &Config) -> serde_json::Value {
    json!({
        "threshold_multiplier": decimal(config.threshold),
        "bias_reg": config.bias_reg,
        "bias_fwhm_mm": mm_decimal(config.bias_fwhm),
        "tpm": config.tpm,
        "n_gaussians": config.n_gaussians,
        "warp_reg": config.warp_reg,
        "affine_reg": config.affine_reg,
        "sampling_mm": mm_decimal(config.sampling),
        "smoothness_mm": mm_decimal(config.smoothness),
    })
}
